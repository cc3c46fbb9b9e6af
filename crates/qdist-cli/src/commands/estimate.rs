//! Estimate command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qdist_core::{EstimatorConfig, SwapTestEstimator};

use super::common::{create_backend, format_vector, print_estimate};
use crate::OutputFormat;

/// Execute the estimate command.
pub async fn execute(
    a: &[f64],
    b: &[f64],
    config: &EstimatorConfig,
    format: OutputFormat,
) -> Result<()> {
    let backend = create_backend(config)?;
    let estimator = SwapTestEstimator::new(config.shots);

    if format == OutputFormat::Json {
        let estimate = estimator.run(a, b, &backend).await?;
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!(
        "{} Estimating ‖A − B‖ for A = {}, B = {}",
        style("→").cyan().bold(),
        style(format_vector(a)).green(),
        style(format_vector(b)).green()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Sampling swap test ({} shots)...", config.shots));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = estimator.run(a, b, &backend).await;
    spinner.finish_and_clear();

    print_estimate(&result?);
    Ok(())
}
