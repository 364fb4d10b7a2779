//! Property-based tests for circuit reversibility.
//!
//! Every gate in the vocabulary is self-inverse, so a cascade followed by its
//! mirror image must realize the identity.

use proptest::prelude::*;
use syrec_ir::{Circuit, Gate, LineId, simulate};

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    Not(u32),
    Cnot(u32, u32),
    Toffoli(u32, u32, u32),
    Fredkin(u32, u32),
}

impl GateOp {
    fn gate(&self) -> Gate {
        match *self {
            GateOp::Not(t) => Gate::not(LineId(t)),
            GateOp::Cnot(c, t) => Gate::cnot(LineId(c), LineId(t)),
            GateOp::Toffoli(c1, c2, t) => Gate::toffoli(LineId(c1), LineId(c2), LineId(t)),
            GateOp::Fredkin(a, b) => Gate::fredkin(LineId(a), LineId(b)),
        }
    }
}

/// Generate a random gate operation for a circuit with at least 3 lines.
fn arb_gate_op(num_lines: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_lines).prop_map(GateOp::Not),
        (0..num_lines, 0..num_lines)
            .prop_filter("Control and target must differ", |(c, t)| c != t)
            .prop_map(|(c, t)| GateOp::Cnot(c, t)),
        (0..num_lines, 0..num_lines, 0..num_lines)
            .prop_filter("Lines must differ", |(a, b, c)| a != b && b != c && a != c)
            .prop_map(|(a, b, c)| GateOp::Toffoli(a, b, c)),
        (0..num_lines, 0..num_lines)
            .prop_filter("Targets must differ", |(a, b)| a != b)
            .prop_map(|(a, b)| GateOp::Fredkin(a, b)),
    ]
}

/// Generate a circuit with 3-6 lines and 1-20 gates, together with an input.
fn arb_circuit_and_input() -> impl Strategy<Value = (Circuit, Vec<bool>)> {
    (3_u32..=6).prop_flat_map(|num_lines| {
        (
            prop::collection::vec(arb_gate_op(num_lines), 1..=20),
            prop::collection::vec(any::<bool>(), num_lines as usize),
        )
            .prop_map(move |(ops, input)| {
                let mut circuit = Circuit::with_lines("random", num_lines).unwrap();
                for op in ops {
                    circuit.append(op.gate()).unwrap();
                }
                (circuit, input)
            })
    })
}

proptest! {
    /// A cascade followed by its mirror image is the identity.
    #[test]
    fn test_mirror_is_identity((circuit, input) in arb_circuit_and_input()) {
        let mut mirrored = circuit.clone();
        for gate in circuit.gates().iter().rev() {
            mirrored.append(gate.clone()).unwrap();
        }

        let output = simulate(&mirrored, &input).unwrap();
        prop_assert_eq!(output, input);
    }

    /// Simulation is a bijection: distinct inputs give distinct outputs.
    #[test]
    fn test_simulation_is_injective(
        (circuit, input) in arb_circuit_and_input(),
        flip in 0_usize..6,
    ) {
        let flip = flip % input.len();
        let mut other = input.clone();
        other[flip] = !other[flip];

        let a = simulate(&circuit, &input).unwrap();
        let b = simulate(&circuit, &other).unwrap();
        prop_assert_ne!(a, b);
    }
}
