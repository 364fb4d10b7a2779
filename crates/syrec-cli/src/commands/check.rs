//! Check command implementation.

use anyhow::Result;
use console::style;

use syrec_lang::Statement;

use super::common::load_program;

/// Execute the check command.
pub fn execute(input: &str, bitwidth: u32) -> Result<()> {
    let program = load_program(input, bitwidth)?;

    println!(
        "{} {} is valid SyReC ({} modules)",
        style("✓").green().bold(),
        style(input).green(),
        program.modules.len()
    );
    for module in &program.modules {
        println!(
            "  {}: {} parameters, {} locals, {} statements",
            style(&module.name).cyan(),
            module.parameters.len(),
            module.variables.len(),
            count_statements(&module.statements)
        );
    }

    Ok(())
}

/// Count statements, including those nested in conditionals and loops.
fn count_statements(statements: &[Statement]) -> usize {
    statements
        .iter()
        .map(|statement| match statement {
            Statement::If {
                then_statements,
                else_statements,
                ..
            } => 1 + count_statements(then_statements) + count_statements(else_statements),
            Statement::For { statements, .. } => 1 + count_statements(statements),
            _ => 1,
        })
        .sum()
}
