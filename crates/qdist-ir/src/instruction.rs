//! Operations placed on circuit wires.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// Tolerance on `|Σ a² − 1|` accepted for initialization amplitudes.
pub const NORM_TOLERANCE: f64 = 1e-10;

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InstructionKind {
    /// A unitary gate.
    Gate { gate: StandardGate },
    /// Load a real amplitude vector into the target qubits.
    ///
    /// Bit `k` of an amplitude index is the `k`-th listed qubit, so the first
    /// qubit is the least-significant bit.
    Initialize { amplitudes: Vec<f64> },
    /// Computational-basis measurement, qubit `i` into clbit `i`.
    Measure,
    /// Scheduling fence; no effect on the state.
    Barrier,
}

/// An operation together with the wires it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(flatten)]
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    fn quantum(kind: InstructionKind, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// A gate on `qubits`, in operand order.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::quantum(InstructionKind::Gate { gate }, qubits)
    }

    /// Amplitude initialization of `qubits`.
    pub fn initialize(amplitudes: &[f64], qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::quantum(
            InstructionKind::Initialize {
                amplitudes: amplitudes.to_vec(),
            },
            qubits,
        )
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::quantum(InstructionKind::Barrier, qubits)
    }

    /// The gate, if this is one.
    pub fn as_gate(&self) -> Option<StandardGate> {
        match self.kind {
            InstructionKind::Gate { gate } => Some(gate),
            _ => None,
        }
    }

    pub fn is_initialize(&self) -> bool {
        matches!(self.kind, InstructionKind::Initialize { .. })
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Short lowercase name, as used in gate sets.
    pub fn name(&self) -> &'static str {
        match self.kind {
            InstructionKind::Gate { gate } => gate.name(),
            InstructionKind::Initialize { .. } => "initialize",
            InstructionKind::Measure => "measure",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Check operand counts, and for initializations that the amplitudes
    /// form a normalized state over the listed qubits.
    pub fn validate_operands(&self) -> IrResult<()> {
        let n = self.qubits.len();
        match &self.kind {
            InstructionKind::Gate { gate } if gate.arity() != n => Err(IrError::WrongArity {
                gate: gate.name().to_string(),
                expected: gate.arity(),
                got: n,
            }),
            InstructionKind::Initialize { amplitudes } => check_amplitudes(amplitudes, n),
            InstructionKind::Measure if n != self.clbits.len() => Err(IrError::Malformed(format!(
                "measure pairs {n} qubit(s) with {} classical bit(s)",
                self.clbits.len()
            ))),
            _ => Ok(()),
        }
    }
}

fn check_amplitudes(amplitudes: &[f64], num_qubits: usize) -> IrResult<()> {
    if num_qubits == 0 {
        return Err(IrError::InvalidInitialState(
            "no target qubits".to_string(),
        ));
    }
    let expected = 1usize << num_qubits;
    if amplitudes.len() != expected {
        return Err(IrError::InvalidInitialState(format!(
            "{num_qubits} qubit(s) take {expected} amplitudes, got {}",
            amplitudes.len()
        )));
    }
    if let Some(bad) = amplitudes.iter().find(|a| !a.is_finite()) {
        return Err(IrError::InvalidInitialState(format!(
            "amplitude {bad} is not finite"
        )));
    }
    let norm_sq: f64 = amplitudes.iter().map(|a| a * a).sum();
    if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
        return Err(IrError::InvalidInitialState(format!(
            "squared norm is {norm_sq}"
        )));
    }
    Ok(())
}
