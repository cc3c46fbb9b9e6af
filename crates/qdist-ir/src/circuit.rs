//! Circuit builder.

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A named quantum circuit over a fixed set of qubits and classical bits.
///
/// Builder methods return `&mut Self` so calls chain with `?`.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    dag: CircuitDag,
}

impl Circuit {
    /// An empty circuit with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            dag: CircuitDag::new(),
        }
    }

    /// A circuit with qubits `0..num_qubits` and clbits `0..num_clbits`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Append a qubit and return its id.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        self.dag.add_qubit(id);
        id
    }

    /// Append a classical bit and return its id.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        self.dag.add_clbit(id);
        id
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Prepare `qubits` in the real amplitude vector `amplitudes`.
    ///
    /// The first listed qubit is the least-significant bit of the amplitude
    /// index. Fails with `InvalidInitialState` unless there are exactly
    /// `2^qubits` finite amplitudes of unit norm.
    pub fn initialize(
        &mut self,
        amplitudes: &[f64],
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::initialize(amplitudes, qubits))
    }

    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Z, [qubit])
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [a, b])
    }

    /// Controlled swap of `a` and `b`.
    pub fn cswap(&mut self, control: QubitId, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CSwap, [control, a, b])
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Barrier across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.push(Instruction::barrier(qubits))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Length of the longest chain of dependent operations.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Instructions in the order they were added.
    pub fn instructions(&self) -> Vec<&Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst).collect()
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }
}
