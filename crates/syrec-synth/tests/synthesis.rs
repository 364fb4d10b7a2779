//! End-to-end synthesis tests: parse, synthesize, simulate.

use syrec_ir::{Circuit, LineId, constant_pattern, decode, encode, simulate};
use syrec_synth::{AssignCounts, Statistics, Strategy, SynthError, SynthesisSettings, synthesize};

const STRATEGIES: [Strategy; 2] = [Strategy::AdditionalLines, Strategy::NoAdditionalLines];

fn synth(source: &str, strategy: Strategy) -> (Circuit, Statistics) {
    let program = syrec_lang::parse(source).unwrap();
    let settings = SynthesisSettings::new().with_strategy(strategy);
    let mut statistics = Statistics::new();
    let circuit = synthesize(&program, &settings, &mut statistics).unwrap();
    (circuit, statistics)
}

fn synth_err(source: &str) -> SynthError {
    let program = syrec_lang::parse(source).unwrap();
    synthesize(&program, &SynthesisSettings::default(), &mut Statistics::new()).unwrap_err()
}

/// Lines of the variable (or array element) named `name`, bit 0 first.
fn lines(circuit: &Circuit, name: &str) -> Vec<LineId> {
    let lines: Vec<LineId> = circuit
        .lines()
        .iter()
        .filter(|line| {
            line.input
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|bit| bit.parse::<u32>().is_ok())
        })
        .map(|line| line.id)
        .collect();
    assert!(!lines.is_empty(), "no lines for '{name}'");
    lines
}

/// Simulate with the given variable values, all other lines at their
/// constant values.
fn run(circuit: &Circuit, inputs: &[(&str, u64)]) -> Vec<bool> {
    let mut state = constant_pattern(circuit);
    for (name, value) in inputs {
        encode(&mut state, &lines(circuit, name), *value);
    }
    simulate(circuit, &state).unwrap()
}

fn value(circuit: &Circuit, state: &[bool], name: &str) -> u64 {
    decode(state, &lines(circuit, name))
}

#[test]
fn test_add_constant() {
    for strategy in STRATEGIES {
        let (circuit, _) = synth("module main(out a(4)) a += 3", strategy);
        let out = run(&circuit, &[]);
        assert_eq!(value(&circuit, &out, "a"), 3);
        let out = run(&circuit, &[("a", 5)]);
        assert_eq!(value(&circuit, &out, "a"), 8);
    }
}

#[test]
fn test_exor_of_repeated_operand_is_free() {
    let source = "module main(inout x(4), in a(4)) x ^= (a ^ a)";
    let (circuit, statistics) = synth(source, Strategy::NoAdditionalLines);
    assert_eq!(circuit.num_gates(), 0);
    assert_eq!(circuit.num_lines(), 8);
    assert_eq!(statistics.get::<AssignCounts>().unwrap().folded, 1);

    let (circuit, _) = synth(source, Strategy::AdditionalLines);
    assert!(circuit.num_gates() > 0);
    let out = run(&circuit, &[("x", 6), ("a", 9)]);
    assert_eq!(value(&circuit, &out, "x"), 6);
}

#[test]
fn test_arithmetic_operators() {
    type Expected = fn(u64, u64) -> u64;
    let cases: [(&str, Expected); 10] = [
        ("(a + b)", |a, b| (a + b) % 16),
        ("(a - b)", |a, b| (a + 16 - b) % 16),
        ("(a ^ b)", |a, b| a ^ b),
        ("(a * b)", |a, b| (a * b) % 16),
        ("(a / b)", |a, b| a / b),
        ("(a % b)", |a, b| a % b),
        ("(a & b)", |a, b| a & b),
        ("(a | b)", |a, b| a | b),
        ("(a << 2)", |a, _| (a << 2) % 16),
        ("(a >> 1)", |a, _| a >> 1),
    ];

    for strategy in STRATEGIES {
        for (expr, expected) in cases {
            let source = format!("module main(in a(4), in b(4), out r(4)) r ^= {expr}");
            let (circuit, _) = synth(&source, strategy);
            for (a, b) in [(13, 4), (7, 3), (15, 1), (2, 9), (0, 5)] {
                let out = run(&circuit, &[("a", a), ("b", b)]);
                assert_eq!(value(&circuit, &out, "r"), expected(a, b), "{expr} on ({a}, {b})");
                assert_eq!(value(&circuit, &out, "a"), a);
                assert_eq!(value(&circuit, &out, "b"), b);
            }
        }
    }
}

#[test]
fn test_boolean_operators() {
    type Expected = fn(u64, u64) -> bool;
    let cases: [(&str, Expected); 8] = [
        ("(a < b)", |a, b| a < b),
        ("(a > b)", |a, b| a > b),
        ("(a <= b)", |a, b| a <= b),
        ("(a >= b)", |a, b| a >= b),
        ("(a = b)", |a, b| a == b),
        ("(a != b)", |a, b| a != b),
        ("(a.0 && b.0)", |a, b| a & b & 1 == 1),
        ("(a.0 || b.0)", |a, b| (a | b) & 1 == 1),
    ];

    for (expr, expected) in cases {
        let source = format!("module main(in a(4), in b(4), out c(1)) c ^= {expr}");
        let (circuit, _) = synth(&source, Strategy::AdditionalLines);
        for (a, b) in [(3, 3), (3, 8), (8, 3), (0, 0), (5, 4)] {
            let out = run(&circuit, &[("a", a), ("b", b)]);
            assert_eq!(value(&circuit, &out, "c") == 1, expected(a, b), "{expr} on ({a}, {b})");
        }
    }
}

#[test]
fn test_if_statement() {
    let source = r"
        module main(in c(1), inout x(4), inout y(4))
            if c then ++= x else --= y fi c
    ";
    for strategy in STRATEGIES {
        let (circuit, _) = synth(source, strategy);
        let out = run(&circuit, &[("c", 1), ("x", 4), ("y", 4)]);
        assert_eq!(value(&circuit, &out, "x"), 5);
        assert_eq!(value(&circuit, &out, "y"), 4);

        let out = run(&circuit, &[("c", 0), ("x", 4), ("y", 4)]);
        assert_eq!(value(&circuit, &out, "x"), 4);
        assert_eq!(value(&circuit, &out, "y"), 3);
    }
}

#[test]
fn test_for_loops() {
    let source = r"
        module main(inout v[4](4), inout n(4))
            for $i = 0 to 3 do v[$i] += $i rof;
            for $i = 3 to 0 step - 2 do ++= v[$i] rof;
            for 3 do ++= n rof
    ";
    let (circuit, _) = synth(source, Strategy::AdditionalLines);
    let out = run(&circuit, &[]);
    let values: Vec<u64> = (0..4)
        .map(|i| value(&circuit, &out, &format!("v[{i}]")))
        .collect();
    assert_eq!(values, vec![0, 2, 2, 4]);
    assert_eq!(value(&circuit, &out, "n"), 3);
}

#[test]
fn test_call_and_uncall() {
    let adder = r"
        module adder(in a(4), in b(4), inout c(4))
            wire t(4)
            t += a;
            c += t;
            t -= a;
            c += b
    ";

    let source = format!("{adder}\nmodule main(inout x(4), inout y(4), inout z(4)) call adder(x, y, z)");
    let (circuit, _) = synth(&source, Strategy::AdditionalLines);
    let out = run(&circuit, &[("x", 3), ("y", 5), ("z", 1)]);
    assert_eq!(value(&circuit, &out, "z"), 9);
    assert_eq!(value(&circuit, &out, "x"), 3);

    let source = format!(
        "{adder}\nmodule main(inout x(4), inout y(4), inout z(4)) call adder(x, y, z); uncall adder(x, y, z)"
    );
    for strategy in STRATEGIES {
        let (circuit, _) = synth(&source, strategy);
        let out = run(&circuit, &[("x", 3), ("y", 5), ("z", 1)]);
        assert_eq!(value(&circuit, &out, "z"), 1);
    }
}

#[test]
fn test_main_module_selection() {
    let source = "module first(inout a(2)) ++= a\nmodule main(inout b(3)) ++= b";
    let program = syrec_lang::parse(source).unwrap();
    let mut statistics = Statistics::new();

    let circuit = synthesize(&program, &SynthesisSettings::new(), &mut statistics).unwrap();
    assert_eq!(circuit.name(), "main");
    assert_eq!(circuit.num_lines(), 3);

    let settings = SynthesisSettings::new().with_main_module("first");
    let circuit = synthesize(&program, &settings, &mut statistics).unwrap();
    assert_eq!(circuit.num_lines(), 2);

    let settings = SynthesisSettings::new().with_main_module("missing");
    let err = synthesize(&program, &settings, &mut statistics).unwrap_err();
    assert!(matches!(err, SynthError::UnknownModule(ref name) if name == "missing"));

    let program = syrec_lang::parse("module other(inout a(2)) ++= a").unwrap();
    let circuit = synthesize(&program, &SynthesisSettings::new(), &mut statistics).unwrap();
    assert_eq!(circuit.name(), "other");
}

#[test]
fn test_errors_carry_statement_position() {
    let err = synth_err("module main(inout v[4](2)) skip; for $i = 0 to 4 do ++= v[$i] rof");
    let SynthError::InStatement { module, index, .. } = &err else {
        panic!("expected statement context, got {err:?}");
    };
    assert_eq!(module, "main");
    assert_eq!(*index, 1);
    assert!(matches!(err.root_cause(), SynthError::UnresolvedVariable { .. }));

    let err = synth_err("module main(inout a(2)) for $i = 0 to 3 step 0 do ++= a rof");
    assert!(matches!(err.root_cause(), SynthError::InvalidLoop(_)));
}

#[test]
fn test_deterministic() {
    let source = r"
        module main(inout x(4), in a(4), in b(4), inout v[2](4))
            x += ((a - b) ^ (a & b));
            if (a < b) then v[0] <=> v[1] else x -= (a + b) fi (a < b);
            for $i = 0 to 1 do v[$i] ^= (a * b) rof
    ";
    for strategy in STRATEGIES {
        let (first, _) = synth(source, strategy);
        let (second, _) = synth(source, strategy);
        assert_eq!(first, second);
    }
}

#[test]
fn test_folding_matches_additional_lines() {
    let cases = [
        "x += ((a - b) + b)",
        "x -= ((a + b) - a)",
        "x ^= ((a + b) ^ b)",
        "x += ((a ^ b) - (a ^ b))",
        "x -= ((a - c) - (c - b))",
    ];
    for rhs in cases {
        let source = format!("module main(inout x(4), in a(4), in b(4), in c(4)) {rhs}");
        let (folded, statistics) = synth(&source, Strategy::NoAdditionalLines);
        let (baseline, _) = synth(&source, Strategy::AdditionalLines);
        assert_eq!(folded.num_lines(), 16, "{rhs}");
        assert_eq!(
            statistics.get::<AssignCounts>().map(|c| c.folded),
            Some(1),
            "{rhs}"
        );

        for (x, a, b, c) in [(1, 2, 3, 4), (15, 9, 12, 0), (7, 7, 1, 14)] {
            let inputs = [("x", x), ("a", a), ("b", b), ("c", c)];
            let out = run(&folded, &inputs);
            let expected = run(&baseline, &inputs);
            for name in ["x", "a", "b", "c"] {
                assert_eq!(
                    value(&folded, &out, name),
                    value(&baseline, &expected, name),
                    "{name} after {rhs} on {inputs:?}"
                );
            }
        }
    }
}

#[test]
fn test_in_place_restores_operands() {
    let source = "module main(inout x(4), in a(4), in b(4), in c(4)) x += ((a - b) ^ c)";
    let (circuit, statistics) = synth(source, Strategy::NoAdditionalLines);
    assert_eq!(circuit.num_lines(), 16);
    assert_eq!(statistics.get::<AssignCounts>().unwrap().in_place, 1);

    let out = run(&circuit, &[("x", 2), ("a", 9), ("b", 4), ("c", 3)]);
    assert_eq!(value(&circuit, &out, "x"), (2 + ((9 - 4) ^ 3)) % 16);
    assert_eq!(value(&circuit, &out, "a"), 9);
    assert_eq!(value(&circuit, &out, "b"), 4);
    assert_eq!(value(&circuit, &out, "c"), 3);

    let source = "module main(inout x(4), in a(4), in b(4)) x -= (a - b)";
    let (circuit, _) = synth(source, Strategy::NoAdditionalLines);
    assert_eq!(circuit.num_lines(), 12);
    let out = run(&circuit, &[("x", 10), ("a", 6), ("b", 1)]);
    assert_eq!(value(&circuit, &out, "x"), 5);
}

#[test]
fn test_statistics() {
    let (circuit, statistics) = synth(
        "module main(inout x(4), in a(4)) x += (a & a)",
        Strategy::AdditionalLines,
    );
    assert_eq!(statistics.num_lines, circuit.num_lines());
    assert_eq!(statistics.num_gates, circuit.num_gates());
    assert_eq!(
        statistics.get::<AssignCounts>(),
        Some(&AssignCounts {
            additional_lines: 1,
            ..AssignCounts::default()
        })
    );
}

#[test]
fn test_uncall_undoes_loop_with_uneven_step() {
    let helper = "module m(inout v[6](4)) for $i = 0 to 4 step 3 do ++= v[$i] rof";

    for strategy in STRATEGIES {
        let source = format!("{helper}\nmodule main(inout v[6](4)) call m(v)");
        let (circuit, _) = synth(&source, strategy);
        let out = run(&circuit, &[]);
        let values: Vec<u64> = (0..6)
            .map(|i| value(&circuit, &out, &format!("v[{i}]")))
            .collect();
        assert_eq!(values, vec![1, 0, 0, 1, 0, 0]);

        let source = format!("{helper}\nmodule main(inout v[6](4)) call m(v); uncall m(v)");
        let (circuit, _) = synth(&source, strategy);
        let inputs = [("v[0]", 0), ("v[1]", 15), ("v[3]", 7), ("v[4]", 2)];
        let out = run(&circuit, &inputs);
        for (name, expected) in inputs {
            assert_eq!(value(&circuit, &out, name), expected, "{name}");
        }
        assert_eq!(value(&circuit, &out, "v[2]"), 0);
        assert_eq!(value(&circuit, &out, "v[5]"), 0);
    }
}

#[test]
fn test_operand_holding_if_control() {
    let source = r"
        module main(inout x(4), in a(4), in b(4))
            if a.1 then x ^= (a + b) else skip fi a.1
    ";
    for strategy in STRATEGIES {
        let (circuit, statistics) = synth(source, strategy);
        assert_eq!(statistics.get::<AssignCounts>().unwrap().additional_lines, 1);

        let out = run(&circuit, &[("x", 0), ("a", 3), ("b", 5)]);
        assert_eq!(value(&circuit, &out, "x"), 8);
        assert_eq!(value(&circuit, &out, "a"), 3);
        assert_eq!(value(&circuit, &out, "b"), 5);

        let out = run(&circuit, &[("x", 6), ("a", 1), ("b", 5)]);
        assert_eq!(value(&circuit, &out, "x"), 6);
        assert_eq!(value(&circuit, &out, "a"), 1);
    }
}

#[test]
fn test_repeated_operands_of_rewriting_operators() {
    type Expected = fn(u64) -> u64;
    let cases: [(&str, u32, Expected); 5] = [
        ("(a * a)", 4, |a| (a * a) % 16),
        ("(a = a)", 1, |_| 1),
        ("(a < a)", 1, |_| 0),
        ("(a >= a)", 1, |_| 1),
        ("(a / a)", 4, |_| 1),
    ];
    for (expr, width, expected) in cases {
        let source = format!("module main(out r({width}), in a(4)) r ^= {expr}");
        for strategy in STRATEGIES {
            let (circuit, _) = synth(&source, strategy);
            for a in [1, 3, 6, 7] {
                let out = run(&circuit, &[("a", a)]);
                assert_eq!(value(&circuit, &out, "r"), expected(a), "{expr} with a = {a}");
                assert_eq!(value(&circuit, &out, "a"), a);
            }
        }
    }
}

#[test]
fn test_add_operand_holding_if_control() {
    let source = "module main(inout x(4), in a(4)) if a.1 then x += a else skip fi a.1";
    for strategy in STRATEGIES {
        let (circuit, _) = synth(source, strategy);
        let out = run(&circuit, &[("x", 2), ("a", 6)]);
        assert_eq!(value(&circuit, &out, "x"), 8);
        assert_eq!(value(&circuit, &out, "a"), 6);

        let out = run(&circuit, &[("x", 2), ("a", 5)]);
        assert_eq!(value(&circuit, &out, "x"), 2);
        assert_eq!(value(&circuit, &out, "a"), 5);
    }
}

#[test]
fn test_width_mismatch_is_the_same_for_both_strategies() {
    let source = "module main(inout x(4), in a(4)) for $i = 2 to 2 do x += (a.0:$i - a.0:$i) rof";
    let program = syrec_lang::parse(source).unwrap();
    for strategy in STRATEGIES {
        let settings = SynthesisSettings::new().with_strategy(strategy);
        let err = synthesize(&program, &settings, &mut Statistics::new()).unwrap_err();
        assert!(
            matches!(err.root_cause(), SynthError::WidthMismatch { expected: 4, got: 3 }),
            "{strategy}: {err}"
        );
    }
}
