//! The gate set.

use serde::{Deserialize, Serialize};

/// Gates the simulator knows how to apply.
///
/// The swap test itself only uses `H` and `CSwap`; the others are there for
/// building reference circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardGate {
    /// Pauli-X.
    X,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// CNOT, control first.
    CX,
    /// SWAP.
    Swap,
    /// Fredkin: swaps the last two qubits when the first is |1⟩.
    CSwap,
}

impl StandardGate {
    /// Lowercase OpenQASM name.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Z => "z",
            Self::H => "h",
            Self::CX => "cx",
            Self::Swap => "swap",
            Self::CSwap => "cswap",
        }
    }

    /// Number of qubit operands.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            Self::X | Self::Z | Self::H => 1,
            Self::CX | Self::Swap => 2,
            Self::CSwap => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_and_name() {
        assert_eq!(StandardGate::H.arity(), 1);
        assert_eq!(StandardGate::CX.arity(), 2);
        assert_eq!(StandardGate::CSwap.arity(), 3);
        assert_eq!(StandardGate::CSwap.name(), "cswap");
    }

    #[test]
    fn test_serialized_name_matches() {
        let json = serde_json::to_string(&StandardGate::CSwap).unwrap();
        assert_eq!(json, "\"cswap\"");
    }
}
