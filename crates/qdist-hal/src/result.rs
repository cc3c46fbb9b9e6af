//! Measurement counts and execution results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Outcome bitstring → number of shots that produced it.
///
/// Character `i` of a bitstring is classical bit `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(bitstring, count)` pairs. Repeated keys accumulate.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, n) in pairs {
            counts.insert(bitstring, n);
        }
        counts
    }

    /// Add `n` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Occurrences of `bitstring`; absent outcomes count as zero.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum over all outcomes.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The outcome seen most often (ties broken by bitstring order).
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Empirical probability of `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / total as f64
        }
    }

    /// Iterate over outcomes in bitstring order.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut pairs: Vec<_> = self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}
