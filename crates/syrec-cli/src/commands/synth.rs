//! Synth command implementation.

use anyhow::Result;
use console::style;

use syrec_ir::{quantum_cost, transistor_cost};
use syrec_synth::AssignCounts;

use super::common::{load_program, parse_strategy, save_circuit, synthesize_program};

/// Execute the synth command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    strategy: &str,
    main: Option<&str>,
    bitwidth: u32,
) -> Result<()> {
    let strategy = parse_strategy(strategy)?;
    println!(
        "{} Synthesizing {} with strategy {}",
        style("→").cyan().bold(),
        style(input).green(),
        style(strategy).yellow()
    );

    let program = load_program(input, bitwidth)?;
    println!("  Loaded: {} modules", program.modules.len());

    let (circuit, statistics) = synthesize_program(&program, strategy, main)?;

    println!("{} Synthesis complete", style("✓").green().bold());
    println!("  Circuit:         {}", style(circuit.name()).cyan());
    println!("  Lines:           {}", circuit.num_lines());
    println!("  Gates:           {}", circuit.num_gates());
    println!("  Quantum cost:    {}", quantum_cost(&circuit));
    println!("  Transistor cost: {}", transistor_cost(&circuit));
    if let Some(counts) = statistics.get::<AssignCounts>() {
        println!(
            "  Assignments:     {} folded, {} in place, {} with additional lines",
            counts.folded, counts.in_place, counts.additional_lines
        );
    }
    println!(
        "  Runtime:         {}",
        style(format!("{:.3} ms", statistics.runtime.as_secs_f64() * 1000.0)).yellow()
    );

    match output {
        Some(path) => {
            save_circuit(&circuit, path)?;
            println!("  Output: {}", style(path).green());
        }
        None => {
            println!();
            for gate in circuit.gates() {
                println!("  {gate}");
            }
        }
    }

    Ok(())
}
