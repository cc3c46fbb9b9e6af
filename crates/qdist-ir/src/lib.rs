//! qdist Circuit Intermediate Representation
//!
//! The small circuit IR the swap-test estimator builds its circuits in, and
//! the form every backend receives them in.
//!
//! # Core Components
//!
//! - **Wires**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] (H, X, Z, CX, SWAP, CSWAP)
//! - **Instructions**: [`Instruction`] combining a gate, an amplitude
//!   initialization, a measurement or a barrier with its operands
//! - **DAG**: [`CircuitDag`] wire-ordered graph of instructions
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: A Swap Test
//!
//! ```rust
//! use qdist_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("swap_test", 3, 1);
//! let s = std::f64::consts::FRAC_1_SQRT_2;
//!
//! circuit
//!     .initialize(&[s, s], [QubitId(1)])
//!     .unwrap()
//!     .initialize(&[1.0, 0.0], [QubitId(2)])
//!     .unwrap()
//!     .h(QubitId(0))
//!     .unwrap()
//!     .cswap(QubitId(0), QubitId(1), QubitId(2))
//!     .unwrap()
//!     .h(QubitId(0))
//!     .unwrap()
//!     .measure(QubitId(0), ClbitId(0))
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.num_ops(), 6);
//! ```

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind, NORM_TOLERANCE};
pub use qubit::{ClbitId, QubitId};
