//! Reverse command implementation.

use anyhow::Result;

use syrec_lang::emit_module;

use super::common::{load_program, select_module};

/// Execute the reverse command.
pub fn execute(input: &str, module: Option<&str>, bitwidth: u32) -> Result<()> {
    let program = load_program(input, bitwidth)?;
    let module = select_module(&program, module)?;
    print!("{}", emit_module(&module.reversed()));
    Ok(())
}
