//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - swap-test Euclidean distance estimation",
        style("qdist").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qdist-ir           Circuit intermediate representation");
    println!("  qdist-hal          Backend abstraction layer");
    println!("  qdist-adapter-sim  Local statevector simulator");
    println!("  qdist-core         Classical distance, state preparation, swap test");
    println!("  qdist-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
