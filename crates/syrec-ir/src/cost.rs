//! Cost metrics for reversible circuits.

use crate::circuit::Circuit;
use crate::gate::{Gate, GateKind};

/// Quantum cost of a single gate in a circuit with `num_lines` lines.
///
/// Follows the RevLib cost table: the cost grows with the number of controls
/// `c` and shrinks when enough unused lines `e` are available as ancillae.
/// A Fredkin gate is costed as a Toffoli gate with one additional control.
pub fn gate_quantum_cost(gate: &Gate, num_lines: usize) -> u64 {
    let mut c = gate.controls.len();
    if gate.kind == GateKind::Fredkin {
        c += 1;
    }
    if num_lines > 0 {
        c = c.min(num_lines - 1);
    }
    let e = num_lines.saturating_sub(c + 1);

    match c {
        0 | 1 => 1,
        2 => 5,
        3 => 13,
        4 if e >= 2 => 26,
        4 => 29,
        5 if e >= 3 => 38,
        5 if e >= 1 => 52,
        5 => 61,
        6 if e >= 4 => 50,
        6 if e >= 1 => 80,
        6 => 125,
        7 if e >= 5 => 62,
        7 if e >= 1 => 100,
        7 => 253,
        8 if e >= 6 => 74,
        8 if e >= 1 => 128,
        8 => 509,
        9 if e >= 7 => 86,
        9 if e >= 1 => 152,
        9 => 1021,
        _ => {
            let c = c as u64;
            if e as u64 >= c - 2 {
                12 * c - 33
            } else if e >= 1 {
                24 * c - 87
            } else {
                (1u64 << (c + 1).min(63)) - 3
            }
        }
    }
}

/// Quantum cost of the whole circuit.
pub fn quantum_cost(circuit: &Circuit) -> u64 {
    circuit
        .gates()
        .iter()
        .map(|g| gate_quantum_cost(g, circuit.num_lines()))
        .sum()
}

/// Transistor cost of a single gate: eight transistors per control line.
pub fn gate_transistor_cost(gate: &Gate) -> u64 {
    8 * gate.controls.len() as u64
}

/// Transistor cost of the whole circuit.
pub fn transistor_cost(circuit: &Circuit) -> u64 {
    circuit.gates().iter().map(gate_transistor_cost).sum()
}
