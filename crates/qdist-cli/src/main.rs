//! qdist Command-Line Interface
//!
//! Estimates the Euclidean distance between two short real vectors with a
//! swap test on the local simulator and compares it to the exact value.
//!
//! ```text
//!   q0 ──── H ──●── H ── M
//!   q1 ─ φ ─────×─────────
//!   q2 ┐        │
//!   q3 ├ ψ ─────×─────────
//!   q4 ┘
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{circuit, demo, estimate, version};

/// qdist - swap-test Euclidean distance estimation
#[derive(Parser)]
#[command(name = "qdist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "QDIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the distance between two vectors
    Estimate {
        /// First vector, comma separated (e.g. 1,2,3)
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        a: Vec<f64>,

        /// Second vector, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        b: Vec<f64>,

        /// Number of shots (defaults to the configured value)
        #[arg(short, long)]
        shots: Option<u32>,

        /// Simulator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run the built-in demonstration vectors
    Demo {
        /// Number of shots
        #[arg(short, long, default_value_t = demo::DEMO_SHOTS)]
        shots: u32,

        /// Simulator seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the swap-test circuit for two vectors as JSON
    Circuit {
        /// First vector, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        a: Vec<f64>,

        /// Second vector, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        b: Vec<f64>,
    },

    /// Show version information
    Version,
}

/// How `estimate` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Table,
    /// A single JSON object
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match commands::common::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Setup logging
    let filter = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Estimate {
            a,
            b,
            shots,
            seed,
            format,
        } => {
            let config = commands::common::with_overrides(config, shots, seed);
            estimate::execute(&a, &b, &config, format).await
        }

        Commands::Demo { shots, seed } => {
            let config = commands::common::with_overrides(config, Some(shots), seed);
            demo::execute(&config).await
        }

        Commands::Circuit { a, b } => circuit::execute(&a, &b),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
