//! Property-based tests for synthesis.

use proptest::prelude::*;
use syrec_ir::{Circuit, LineId, constant_pattern, decode, encode, simulate};
use syrec_lang::reverse_statements;
use syrec_lang::syntax::{
    AssignOp, BinaryOp, Expression, Module, Number, Program, Statement, UnaryOp, Variable,
    VariableAccess, VariableType,
};
use syrec_synth::{CallTree, Statistics, Strategy as SynthStrategy, SynthesisSettings, synthesize};

const WIDTH: u32 = 4;
/// Parameters of `main` and the helper module, in line order.
const VARIABLES: [(&str, VariableType, u32); 6] = [
    ("x", VariableType::Inout, WIDTH),
    ("y", VariableType::Inout, WIDTH),
    ("a", VariableType::In, WIDTH),
    ("b", VariableType::In, WIDTH),
    ("c", VariableType::In, WIDTH),
    ("d", VariableType::In, 1),
];
/// Index of the first `in` variable in `VARIABLES`.
const FIRST_IN: usize = 2;
const HELPER: &str = "helper";

fn variable(name: &str) -> Variable {
    let (name, ty, width) = VARIABLES
        .iter()
        .copied()
        .find(|(n, ..)| *n == name)
        .unwrap();
    Variable::new(name, ty, width)
}

fn access(name: &str) -> VariableAccess {
    VariableAccess::new(variable(name))
}

fn bit(name: &str, index: Number) -> VariableAccess {
    VariableAccess {
        range: Some((index.clone(), index)),
        ..access(name)
    }
}

fn loop_bit(name: &str) -> VariableAccess {
    bit(name, Number::LoopVariable("i".into()))
}

fn arb_leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        3 => prop::sample::select(vec!["a", "b", "c"])
            .prop_map(|name| Expression::Variable(access(name))),
        1 => (0_u64..16).prop_map(|value| Expression::Numeric {
            value: Number::Constant(value),
            bitwidth: WIDTH,
        }),
    ]
}

/// Expressions over `a`, `b` and `c` in which operands may repeat.
fn arb_expression() -> impl Strategy<Value = Expression> {
    arb_leaf().prop_recursive(3, 12, 2, |inner| {
        (
            inner.clone(),
            prop_oneof![
                3 => Just(BinaryOp::Add),
                3 => Just(BinaryOp::Subtract),
                3 => Just(BinaryOp::Exor),
                1 => Just(BinaryOp::BitwiseAnd),
                1 => Just(BinaryOp::BitwiseOr),
            ],
            inner,
        )
            .prop_map(|(lhs, op, rhs)| Expression::binary(lhs, op, rhs))
    })
}

fn arb_assign_op() -> impl Strategy<Value = AssignOp> {
    prop_oneof![
        Just(AssignOp::Add),
        Just(AssignOp::Subtract),
        Just(AssignOp::Exor),
    ]
}

fn arb_unary_op() -> impl Strategy<Value = UnaryOp> {
    prop_oneof![
        Just(UnaryOp::Invert),
        Just(UnaryOp::Increment),
        Just(UnaryOp::Decrement),
    ]
}

/// Assignments, unary statements and swaps on `x` and `y`.
fn arb_simple_statement() -> impl Strategy<Value = Statement> {
    let target = prop::sample::select(vec!["x", "y"]);
    prop_oneof![
        4 => (target.clone(), arb_assign_op(), arb_expression()).prop_map(|(lhs, op, rhs)| {
            Statement::Assign {
                lhs: access(lhs),
                op,
                rhs,
            }
        }),
        1 => (target, arb_unary_op()).prop_map(|(var, op)| Statement::Unary {
            op,
            var: access(var),
        }),
        1 => Just(Statement::Swap {
            lhs: access("x"),
            rhs: access("y"),
        }),
    ]
}

/// Loop bodies: statements on bit `$i` of `x` and `y`, and simple
/// statements.
fn arb_loop_body_statement() -> impl Strategy<Value = Statement> {
    prop_oneof![
        arb_unary_op().prop_map(|op| Statement::Unary {
            op,
            var: loop_bit("x"),
        }),
        (arb_assign_op(), prop::sample::select(vec!["a", "b", "c"])).prop_map(|(op, name)| {
            Statement::Assign {
                lhs: loop_bit("y"),
                op,
                rhs: Expression::Variable(loop_bit(name)),
            }
        }),
        arb_simple_statement(),
    ]
}

/// A condition on `d` or on one bit of an operand.
fn arb_condition() -> impl Strategy<Value = Expression> {
    prop_oneof![
        Just(Expression::Variable(access("d"))),
        (prop::sample::select(vec!["a", "b"]), 0_u64..4)
            .prop_map(|(name, index)| Expression::Variable(bit(name, Number::Constant(index)))),
    ]
}

/// Statements of the helper module: simple statements, conditionals and
/// loops over constant ranges whose step need not divide the range.
fn arb_statement() -> impl Strategy<Value = Statement> {
    prop_oneof![
        4 => arb_simple_statement(),
        1 => (
            arb_condition(),
            prop::collection::vec(arb_simple_statement(), 1..3),
            prop::collection::vec(arb_simple_statement(), 0..2),
        )
            .prop_map(|(condition, then_statements, else_statements)| Statement::If {
                fi_condition: condition.clone(),
                condition,
                then_statements,
                else_statements,
            }),
        1 => (
            0_u64..4,
            0_u64..4,
            1_u64..4,
            prop::collection::vec(arb_loop_body_statement(), 1..3),
        )
            .prop_map(|(from, to, step, statements)| Statement::For {
                loop_variable: Some("i".into()),
                from: Some(Number::Constant(from)),
                to: Number::Constant(to),
                step: Number::Constant(step),
                negative_step: from > to,
                statements,
            }),
    ]
}

/// Statements of `main`: helper statements, and calls and uncalls of the
/// helper with `x` and `y` in either order.
fn arb_main_statement() -> impl Strategy<Value = Statement> {
    prop_oneof![
        4 => arb_statement(),
        1 => (any::<bool>(), any::<bool>()).prop_map(|(uncall, swapped)| {
            let mut parameters: Vec<String> =
                VARIABLES.iter().map(|(name, ..)| name.to_string()).collect();
            if swapped {
                parameters.swap(0, 1);
            }
            let target = HELPER.to_string();
            if uncall {
                Statement::Uncall { target, parameters }
            } else {
                Statement::Call { target, parameters }
            }
        }),
    ]
}

fn arb_helper() -> impl Strategy<Value = Vec<Statement>> {
    prop::collection::vec(arb_statement(), 1..4)
}

fn arb_main() -> impl Strategy<Value = Vec<Statement>> {
    prop::collection::vec(arb_main_statement(), 1..5)
}

fn module(name: &str, statements: Vec<Statement>) -> Module {
    let mut module = Module::new(name);
    module.parameters = VARIABLES.iter().map(|(name, ..)| variable(name)).collect();
    module.statements = statements;
    module
}

fn program(helper: Vec<Statement>, main: Vec<Statement>) -> Program {
    Program {
        modules: vec![module(HELPER, helper), module("main", main)],
    }
}

fn synth(program: &Program, strategy: SynthStrategy) -> Circuit {
    let settings = SynthesisSettings::new().with_strategy(strategy);
    synthesize(program, &settings, &mut Statistics::new()).unwrap()
}

/// Run `circuit` on variable values `inputs` (in `VARIABLES` order) and
/// return the resulting variable values. Variables occupy the first lines.
fn run(circuit: &Circuit, inputs: &[u64; 6]) -> [u64; 6] {
    let mut layout = vec![];
    let mut next = 0;
    for (.., width) in VARIABLES {
        layout.push((next..next + width).map(LineId).collect::<Vec<_>>());
        next += width;
    }

    let mut state = constant_pattern(circuit);
    for (lines, value) in layout.iter().zip(inputs) {
        encode(&mut state, lines, *value);
    }
    let out = simulate(circuit, &state).unwrap();
    std::array::from_fn(|i| decode(&out, &layout[i]))
}

fn arb_inputs() -> impl Strategy<Value = [u64; 6]> {
    [0_u64..16, 0_u64..16, 0_u64..16, 0_u64..16, 0_u64..16, 0_u64..2]
}

proptest! {
    /// Both strategies compute the same values on the variables' lines.
    #[test]
    fn test_strategies_agree(
        helper in arb_helper(),
        main in arb_main(),
        inputs in arb_inputs(),
    ) {
        let program = program(helper, main);
        let baseline = synth(&program, SynthStrategy::AdditionalLines);
        let folded = synth(&program, SynthStrategy::NoAdditionalLines);
        prop_assert!(folded.num_lines() <= baseline.num_lines());
        prop_assert_eq!(run(&baseline, &inputs), run(&folded, &inputs));
    }

    /// `in` variables are never changed, including those holding a control.
    #[test]
    fn test_operands_restored(
        helper in arb_helper(),
        main in arb_main(),
        inputs in arb_inputs(),
    ) {
        let program = program(helper, main);
        for strategy in [SynthStrategy::AdditionalLines, SynthStrategy::NoAdditionalLines] {
            let out = run(&synth(&program, strategy), &inputs);
            prop_assert_eq!(&out[FIRST_IN..], &inputs[FIRST_IN..]);
        }
    }

    /// A body followed by its reversal leaves every variable unchanged.
    #[test]
    fn test_reversal_is_identity(
        helper in arb_helper(),
        main in arb_main(),
        inputs in arb_inputs(),
    ) {
        let mut body = main.clone();
        body.extend(reverse_statements(&main));
        let program = program(helper, body);
        for strategy in [SynthStrategy::AdditionalLines, SynthStrategy::NoAdditionalLines] {
            prop_assert_eq!(run(&synth(&program, strategy), &inputs), inputs);
        }
    }

    /// Uncalling the helper undoes calling it.
    #[test]
    fn test_uncall_undoes_call(helper in arb_helper(), inputs in arb_inputs()) {
        let parameters: Vec<String> =
            VARIABLES.iter().map(|(name, ..)| name.to_string()).collect();
        let main = vec![
            Statement::Call {
                target: HELPER.into(),
                parameters: parameters.clone(),
            },
            Statement::Uncall {
                target: HELPER.into(),
                parameters,
            },
        ];
        let program = program(helper, main);
        for strategy in [SynthStrategy::AdditionalLines, SynthStrategy::NoAdditionalLines] {
            prop_assert_eq!(run(&synth(&program, strategy), &inputs), inputs);
        }
    }

    /// `increase` adds modulo 2^w and `decrease` undoes it, for all widths.
    #[test]
    fn test_increase_decrease_roundtrip(
        width in 1_u32..=64,
        x in any::<u64>(),
        y in any::<u64>(),
    ) {
        let mask = if width == 64 { u64::MAX } else { (1 << width) - 1 };
        let (x, y) = (x & mask, y & mask);
        let dest: Vec<LineId> = (0..width).map(LineId).collect();
        let src: Vec<LineId> = (width..2 * width).map(LineId).collect();

        let mut tree = CallTree::new();
        tree.increase(&dest, &src).unwrap();
        let mut add = Circuit::with_lines("add", 2 * width).unwrap();
        for gate in tree.finish().unwrap() {
            add.append(gate).unwrap();
        }

        let mut tree = CallTree::new();
        tree.decrease(&dest, &src).unwrap();
        let mut sub = Circuit::with_lines("sub", 2 * width).unwrap();
        for gate in tree.finish().unwrap() {
            sub.append(gate).unwrap();
        }

        let mut state = vec![false; 2 * width as usize];
        encode(&mut state, &dest, x);
        encode(&mut state, &src, y);

        let sum = simulate(&add, &state).unwrap();
        prop_assert_eq!(decode(&sum, &dest), x.wrapping_add(y) & mask);
        prop_assert_eq!(decode(&sum, &src), y);

        let back = simulate(&sub, &sum).unwrap();
        prop_assert_eq!(back, state);
    }
}
