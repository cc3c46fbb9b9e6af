//! Backend capabilities.

use serde::{Deserialize, Serialize};

/// Static description of what a backend can execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Capability flags, e.g. `"statevector"` or `"initialize"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a local statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec!["statevector".into(), "initialize".into()],
        }
    }

    /// Check a capability flag.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gates a backend accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
    /// Native gates (execute without decomposition on this backend).
    pub native: Vec<String>,
}

impl GateSet {
    /// Every gate the IR can express.
    pub fn universal() -> Self {
        let single_qubit: Vec<String> = ["x", "z", "h"].map(String::from).to_vec();
        let two_qubit: Vec<String> = ["cx", "swap"].map(String::from).to_vec();
        let three_qubit: Vec<String> = vec!["cswap".into()];
        let native = single_qubit
            .iter()
            .chain(&two_qubit)
            .chain(&three_qubit)
            .cloned()
            .collect();
        Self {
            single_qubit,
            two_qubit,
            three_qubit,
            native,
        }
    }

    /// Check whether `gate` is accepted.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .any(|g| g == gate)
    }
}
