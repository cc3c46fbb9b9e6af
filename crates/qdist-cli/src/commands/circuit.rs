//! Circuit command implementation.

use anyhow::Result;
use serde::Serialize;

use qdist_core::{SwapTestEstimator, classical_distance, prepare_states};
use qdist_ir::{Circuit, Instruction};

/// JSON view of a circuit.
#[derive(Serialize)]
struct CircuitView<'a> {
    name: &'a str,
    num_qubits: usize,
    num_clbits: usize,
    depth: usize,
    instructions: Vec<&'a Instruction>,
}

impl<'a> From<&'a Circuit> for CircuitView<'a> {
    fn from(circuit: &'a Circuit) -> Self {
        Self {
            name: circuit.name(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            depth: circuit.depth(),
            instructions: circuit.instructions(),
        }
    }
}

/// Execute the circuit command.
pub fn execute(a: &[f64], b: &[f64]) -> Result<()> {
    let stats = classical_distance(a, b)?;
    let states = prepare_states(a, b, stats.z)?;
    let circuit = SwapTestEstimator::build_circuit(&states)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&CircuitView::from(&circuit))?
    );
    Ok(())
}
