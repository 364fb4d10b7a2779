//! Simulate command implementation.

use anyhow::Result;
use console::style;

use syrec_ir::simulate;

use super::common::{format_bits, load_program, parse_bits, parse_strategy, synthesize_program};

/// Execute the simulate command.
pub fn execute(
    input: &str,
    bits: &str,
    strategy: &str,
    main: Option<&str>,
    bitwidth: u32,
) -> Result<()> {
    let strategy = parse_strategy(strategy)?;
    let program = load_program(input, bitwidth)?;
    let (circuit, _) = synthesize_program(&program, strategy, main)?;

    let pattern = parse_bits(bits, circuit.num_lines())?;
    let out = simulate(&circuit, &pattern).map_err(|e| anyhow::anyhow!("Simulation error: {e}"))?;

    println!(
        "{} Simulated {} ({} lines, {} gates)",
        style("✓").green().bold(),
        style(circuit.name()).cyan(),
        circuit.num_lines(),
        circuit.num_gates()
    );
    println!("  Input:  {}", format_bits(&pattern));
    println!("  Output: {}", style(format_bits(&out)).yellow());

    Ok(())
}
