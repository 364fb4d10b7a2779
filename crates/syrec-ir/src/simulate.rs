//! Gate-level simulation of reversible circuits.
//!
//! A state is one boolean per line, indexed by [`LineId`]. Toffoli gates
//! flip their target when every control is 1; Fredkin gates swap their two
//! targets under the same condition.

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};
use crate::line::LineId;

/// Apply a single gate to `state`.
///
/// The gate must only reference lines within `state`.
pub fn apply_gate(gate: &Gate, state: &mut [bool]) {
    if !gate.controls.iter().all(|c| state[c.index()]) {
        return;
    }
    match gate.kind {
        GateKind::Toffoli => {
            let t = gate.targets[0].index();
            state[t] = !state[t];
        }
        GateKind::Fredkin => {
            state.swap(gate.targets[0].index(), gate.targets[1].index());
        }
    }
}

/// Simulate `circuit` on one input pattern and return the output pattern.
pub fn simulate(circuit: &Circuit, input: &[bool]) -> IrResult<Vec<bool>> {
    if input.len() != circuit.num_lines() {
        return Err(IrError::InputLengthMismatch {
            expected: circuit.num_lines(),
            got: input.len(),
        });
    }
    let mut state = input.to_vec();
    for gate in circuit.gates() {
        apply_gate(gate, &mut state);
    }
    Ok(state)
}

/// Build the input pattern given by the circuit's constant lines, all other
/// lines set to 0.
pub fn constant_pattern(circuit: &Circuit) -> Vec<bool> {
    circuit.constants().map(|c| c.unwrap_or(false)).collect()
}

/// Write `value` into `lines` (bit 0 on `lines[0]`).
pub fn encode(state: &mut [bool], lines: &[LineId], value: u64) {
    for (i, line) in lines.iter().enumerate() {
        state[line.index()] = i < 64 && (value >> i) & 1 == 1;
    }
}

/// Read the value held by `lines` (bit 0 on `lines[0]`).
pub fn decode(state: &[bool], lines: &[LineId]) -> u64 {
    lines
        .iter()
        .enumerate()
        .take(64)
        .filter(|(_, line)| state[line.index()])
        .fold(0, |acc, (i, _)| acc | (1 << i))
}
