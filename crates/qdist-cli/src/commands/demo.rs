//! Demo command implementation.

use anyhow::Result;

use qdist_core::{EstimatorConfig, estimate_distance};

use super::common::create_backend;

/// Shots used by the demo unless overridden.
pub const DEMO_SHOTS: u32 = 50_000;

const DEMO_A: [f64; 4] = [2.0, 9.0, 8.0, 5.0];
const DEMO_B: [f64; 4] = [7.0, 5.0, 10.0, 3.0];

/// Execute the demo command.
pub async fn execute(config: &EstimatorConfig) -> Result<()> {
    let backend = create_backend(config)?;
    let (classical, quantum) = estimate_distance(&DEMO_A, &DEMO_B, config.shots, &backend).await?;

    println!("Classical distance: {classical:.4}");
    println!("Quantum estimate:   {quantum:.4}");
    Ok(())
}
