//! IR error types.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operation refers to a qubit the circuit does not have.
    #[error("{op}: qubit {} is not part of the circuit", qubit.0)]
    QubitNotFound { qubit: QubitId, op: String },

    /// An operation refers to a classical bit the circuit does not have.
    #[error("{op}: classical bit {} is not part of the circuit", clbit.0)]
    ClbitNotFound { clbit: ClbitId, op: String },

    /// The same qubit appears twice in one operation.
    #[error("{op}: qubit {} is used more than once", qubit.0)]
    DuplicateQubit { qubit: QubitId, op: String },

    /// A gate was given the wrong number of qubits.
    #[error("{gate} acts on {expected} qubit(s) but {got} were given")]
    WrongArity {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Amplitudes handed to an `initialize` are not a valid state.
    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    /// The circuit graph is inconsistent or an operation is malformed.
    #[error("malformed circuit: {0}")]
    Malformed(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
