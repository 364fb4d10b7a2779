//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - synthesis of reversible circuits from SyReC",
        style("SyReC").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  syrec-ir     Reversible circuits, simulation and cost metrics");
    println!("  syrec-lang   Parser, emitter and statement reversal");
    println!("  syrec-synth  Synthesis of programs into circuits");
    println!("  syrec-cli    Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
