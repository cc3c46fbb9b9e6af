//! qdist Local Statevector Simulator
//!
//! A sampling backend for the swap-test estimator and for tests. The circuit
//! is evolved once as an exact statevector; shots are then drawn from the
//! final distribution, so sampling noise behaves like a real device's.
//!
//! # Features
//!
//! - **Amplitude initialization**: real amplitude vectors loaded onto any qubits
//! - **Standard gates**: every gate in `qdist-ir`
//! - **Seeded sampling**: `with_seed` or a `seed` entry in [`BackendConfig`]
//! - **Bounded job table**: the oldest finished jobs are dropped past
//!   [`DEFAULT_JOB_RETENTION`] (see `with_job_retention`)
//!
//! # Performance
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 5 | 512 B |
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//!
//! # Example
//!
//! ```ignore
//! use qdist_adapter_sim::SimulatorBackend;
//! use qdist_hal::Backend;
//! use qdist_ir::{Circuit, ClbitId, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(7);
//!
//!     let mut circuit = Circuit::with_size("plus", 1, 1);
//!     circuit.h(QubitId(0))?.measure(QubitId(0), ClbitId(0))?;
//!
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```
//!
//! [`BackendConfig`]: qdist_hal::BackendConfig

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_JOB_RETENTION, SimulatorBackend};
