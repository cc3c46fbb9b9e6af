//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use qdist_adapter_sim::SimulatorBackend;
use qdist_core::{ConfigError, DistanceEstimate, EstimatorConfig};
use qdist_hal::BackendFactory;

/// Load the configuration file and `QDIST_*` overrides.
///
/// Runs before the global subscriber exists, so warnings about ignored
/// variables go through a temporary stderr subscriber instead.
pub fn load_config(path: Option<&Path>) -> Result<EstimatorConfig, ConfigError> {
    with_startup_logging(std::io::stderr, || EstimatorConfig::load(path))
}

/// Run `f` with a warn-level subscriber writing to `writer`.
pub fn with_startup_logging<W, T>(writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn with_overrides(
    mut config: EstimatorConfig,
    shots: Option<u32>,
    seed: Option<u64>,
) -> EstimatorConfig {
    if let Some(shots) = shots {
        config.shots = shots;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config
}

/// Create the local simulator described by `config`.
pub fn create_backend(config: &EstimatorConfig) -> Result<SimulatorBackend> {
    SimulatorBackend::from_config(config.simulator_config())
        .context("Failed to configure the local simulator")
}

/// Print an estimate in a table format (shared by estimate and demo).
pub fn print_estimate(estimate: &DistanceEstimate) {
    println!(
        "\n{} Swap test ({} shots):",
        style("✓").green().bold(),
        estimate.shots
    );
    println!("  P(ancilla = 0): {:.4}", estimate.p0);
    println!("  Overlap:        {:.4}", estimate.overlap);
    println!();
    println!(
        "  Classical distance: {}",
        style(format!("{:.4}", estimate.classical)).cyan()
    );
    println!(
        "  Quantum estimate:   {}",
        style(format!("{:.4}", estimate.quantum)).yellow()
    );
    println!(
        "  Absolute error:     {}",
        style(format!("{:.4}", estimate.error())).dim()
    );
}

/// Format a vector for display.
pub fn format_vector(v: &[f64]) -> String {
    let items: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_env_warnings_logged_during_startup() {
        let buffer = Buffer::default();
        let writer = buffer.clone();

        let config = with_startup_logging(
            move || writer.clone(),
            || {
                EstimatorConfig::default().merge_vars(|key| match key {
                    "QDIST_SHOTS" => Some("lots".to_string()),
                    _ => None,
                })
            },
        );

        assert_eq!(config.shots, EstimatorConfig::default().shots);
        let logged = buffer.text();
        assert!(logged.contains("WARN"), "nothing logged: {logged:?}");
        assert!(logged.contains("ignoring QDIST_SHOTS=lots"));
    }

    #[test]
    fn test_startup_logging_returns_value() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let config = with_startup_logging(
            move || writer.clone(),
            || EstimatorConfig::default().merge_vars(|_| None),
        );
        assert_eq!(config.log_level, "warn");
        assert!(buffer.text().is_empty());
    }
}
