//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use syrec_ir::{Circuit, to_real};
use syrec_lang::{Module, Program, ReadSettings, parse_with_settings};
use syrec_synth::{Statistics, Strategy, SynthesisSettings, synthesize};

/// Load and parse a SyReC program.
pub fn load_program(path: &str, bitwidth: u32) -> Result<Program> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    debug!("Read {} bytes from {path}", source.len());
    let settings = ReadSettings::new().with_default_bitwidth(bitwidth);

    parse_with_settings(&source, &settings).map_err(|e| anyhow::anyhow!("Parse error: {e}"))
}

/// Parse a strategy name.
pub fn parse_strategy(name: &str) -> Result<Strategy> {
    name.parse::<Strategy>().map_err(|e| anyhow::anyhow!(e))
}

/// Synthesize a program with the given strategy and main module.
pub fn synthesize_program(
    program: &Program,
    strategy: Strategy,
    main: Option<&str>,
) -> Result<(Circuit, Statistics)> {
    let mut settings = SynthesisSettings::new().with_strategy(strategy);
    if let Some(name) = main {
        settings = settings.with_main_module(name);
    }

    let mut statistics = Statistics::new();
    let circuit = synthesize(program, &settings, &mut statistics)
        .map_err(|e| anyhow::anyhow!("Synthesis error: {e}"))?;
    Ok((circuit, statistics))
}

/// Pick a module by name, else `main`, else the first module.
pub fn select_module<'p>(program: &'p Program, name: Option<&str>) -> Result<&'p Module> {
    if let Some(name) = name {
        return program
            .find_module(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown module: '{name}'"));
    }
    program
        .find_module("main")
        .or_else(|| program.modules.first())
        .ok_or_else(|| anyhow::anyhow!("Program has no modules"))
}

/// Save a circuit; the format follows the file extension.
pub fn save_circuit(circuit: &Circuit, path: &str) -> Result<()> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let content = match ext.to_lowercase().as_str() {
        "real" => to_real(circuit),
        "json" => circuit
            .to_json()
            .map_err(|e| anyhow::anyhow!("Serialization error: {e}"))?,
        other => anyhow::bail!("Unsupported output format: '{other}'. Available: real, json"),
    };

    fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))?;
    Ok(())
}

/// Render a line pattern, line 0 first.
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parse a line pattern of `0` and `1` characters, line 0 first.
pub fn parse_bits(bits: &str, num_lines: usize) -> Result<Vec<bool>> {
    let pattern = bits
        .chars()
        .filter(|c| *c != '_')
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => anyhow::bail!("Invalid bit '{other}' in input pattern"),
        })
        .collect::<Result<Vec<_>>>()?;

    if pattern.len() != num_lines {
        anyhow::bail!(
            "Input pattern has {} bits, circuit has {num_lines} lines",
            pattern.len()
        );
    }
    Ok(pattern)
}
