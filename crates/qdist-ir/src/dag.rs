//! Wire-ordered DAG of circuit instructions.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Start of a wire.
    In(WireId),
    /// End of a wire.
    Out(WireId),
    /// An instruction.
    Op(Instruction),
}

impl DagNode {
    /// The instruction held by an `Op` node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

/// An edge in the circuit DAG: one segment of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this segment belongs to.
    pub wire: WireId,
}

/// Endpoints and current tail of one wire.
#[derive(Debug, Clone, Copy)]
struct Wire {
    output: NodeIndex,
    /// Last node before `output`: the input node or the latest op.
    front: NodeIndex,
}

/// DAG-based circuit representation.
///
/// Every wire runs from an `In` node through the ops that touch it to an
/// `Out` node. Ops are only ever appended, so insertion order is a
/// topological order and is kept in `ops`.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    wires: FxHashMap<WireId, Wire>,
    ops: Vec<NodeIndex>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        self.add_wire(WireId::Qubit(qubit));
    }

    /// Add a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        self.add_wire(WireId::Clbit(clbit));
    }

    fn add_wire(&mut self, wire: WireId) {
        if self.wires.contains_key(&wire) {
            return;
        }
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, DagEdge { wire });
        self.wires.insert(
            wire,
            Wire {
                output,
                front: input,
            },
        );
    }

    /// Append an instruction at the end of its wires.
    ///
    /// Operands are validated first; on error the DAG is left unchanged.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        instruction.validate_operands()?;
        self.check_wires(&instruction)?;

        let touched: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for wire in touched {
            let Wire { output, front } = self.wires[&wire];
            let segment = self
                .graph
                .edges_directed(front, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == output)
                .map(|e| e.id())
                .ok_or_else(|| IrError::Malformed(format!("wire {wire:?} has no open tail")))?;

            self.graph.remove_edge(segment);
            self.graph.add_edge(front, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, output, DagEdge { wire });
            if let Some(w) = self.wires.get_mut(&wire) {
                w.front = op_node;
            }
        }

        self.ops.push(op_node);
        Ok(op_node)
    }

    fn check_wires(&self, instruction: &Instruction) -> IrResult<()> {
        let op = || instruction.name().to_string();

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op: op(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op: op(),
                });
            }
        }

        match instruction
            .clbits
            .iter()
            .find(|c| !self.wires.contains_key(&WireId::Clbit(**c)))
        {
            Some(&clbit) => Err(IrError::ClbitNotFound {
                clbit,
                op: op(),
            }),
            None => Ok(()),
        }
    }

    /// Operations in the order they were applied.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.ops
            .iter()
            .filter_map(|&idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Number of qubit wires.
    pub fn num_qubits(&self) -> usize {
        self.wires
            .keys()
            .filter(|w| matches!(w, WireId::Qubit(_)))
            .count()
    }

    /// Number of classical wires.
    pub fn num_clbits(&self) -> usize {
        self.wires.len() - self.num_qubits()
    }

    /// Number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Longest chain of operations along any path of wires.
    pub fn depth(&self) -> usize {
        let mut layer: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        for &op in &self.ops {
            let after = self
                .graph
                .edges_directed(op, Direction::Incoming)
                .map(|e| layer.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            layer.insert(op, after + 1);
        }
        layer.values().copied().max().unwrap_or(0)
    }

    /// Qubits in ascending id order.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self
            .wires
            .keys()
            .filter_map(|w| match w {
                WireId::Qubit(q) => Some(*q),
                WireId::Clbit(_) => None,
            })
            .collect();
        qubits.sort_unstable();
        qubits
    }

    /// Classical bits in ascending id order.
    pub fn clbits(&self) -> Vec<ClbitId> {
        let mut clbits: Vec<_> = self
            .wires
            .keys()
            .filter_map(|w| match w {
                WireId::Clbit(c) => Some(*c),
                WireId::Qubit(_) => None,
            })
            .collect();
        clbits.sort_unstable();
        clbits
    }

    /// The underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }
}
