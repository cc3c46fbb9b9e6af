//! Estimator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QDIST_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use qdist_hal::BackendConfig;

use crate::DEFAULT_SHOTS;

/// Settings shared by the CLI and library callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Shots per estimate.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Seed for the local simulator; unseeded runs draw from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Register width cap for the local simulator.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

fn default_max_qubits() -> u32 {
    20
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            seed: None,
            max_qubits: default_max_qubits(),
            log_level: default_log_level(),
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge `QDIST_*` environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides looked up through `var`.
    ///
    /// Only variables that are set override the current values. Unparsable
    /// numbers are logged and ignored.
    pub fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("QDIST_SHOTS") {
            match v.parse() {
                Ok(val) => self.shots = val,
                Err(_) => warn!("ignoring QDIST_SHOTS={v}: not an unsigned integer"),
            }
        }
        if let Some(v) = var("QDIST_SEED") {
            match v.parse() {
                Ok(val) => self.seed = Some(val),
                Err(_) => warn!("ignoring QDIST_SEED={v}: not an unsigned integer"),
            }
        }
        if let Some(v) = var("QDIST_MAX_QUBITS") {
            match v.parse() {
                Ok(val) => self.max_qubits = val,
                Err(_) => warn!("ignoring QDIST_MAX_QUBITS={v}: not an unsigned integer"),
            }
        }
        if let Some(v) = var("QDIST_LOG_LEVEL") {
            self.log_level = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Validation(
                "shots must be greater than 0".to_string(),
            ));
        }

        if self.max_qubits == 0 {
            return Err(ConfigError::Validation(
                "max_qubits must be greater than 0".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Backend configuration for the local simulator.
    pub fn simulator_config(&self) -> BackendConfig {
        let config = BackendConfig::new("simulator")
            .with_extra("max_qubits", serde_json::json!(self.max_qubits));
        match self.seed {
            Some(seed) => config.with_extra("seed", serde_json::json!(seed)),
            None => config,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.shots, 10_000);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_qubits, 20);
        assert_eq!(config.log_level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let config = EstimatorConfig::from_yaml("shots: 2048\nseed: 7\nlog_level: debug\n").unwrap();
        assert_eq!(config.shots, 2048);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_qubits, 20);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let err = EstimatorConfig::from_yaml("shotz: 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_zero_shots() {
        let err = EstimatorConfig::from_yaml("shots: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = EstimatorConfig {
            log_level: "loud".to_string(),
            ..EstimatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QDIST_SHOTS", "500"),
            ("QDIST_SEED", "99"),
            ("QDIST_MAX_QUBITS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = EstimatorConfig::default()
            .merge_vars(|key| vars.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.shots, 500);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.max_qubits, 20);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_missing_file() {
        let err = EstimatorConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("qdist-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "shots: 123\nmax_qubits: 6\n").unwrap();
        let config = EstimatorConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.shots, 123);
        assert_eq!(config.max_qubits, 6);
    }

    #[test]
    fn test_simulator_config() {
        let config = EstimatorConfig {
            seed: Some(3),
            ..EstimatorConfig::default()
        };
        let backend = config.simulator_config();
        assert_eq!(backend.name, "simulator");
        assert_eq!(backend.extra["seed"], serde_json::json!(3));
        assert_eq!(backend.extra["max_qubits"], serde_json::json!(20));

        let unseeded = EstimatorConfig::default().simulator_config();
        assert!(!unseeded.extra.contains_key("seed"));
    }
}
