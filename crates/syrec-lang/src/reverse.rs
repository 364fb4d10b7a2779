//! Statement reversal.
//!
//! Maps a statement to the statement that undoes it. Used to synthesize
//! `uncall` and by the `reverse` command.

use crate::ast::{Module, Number, Statement, UnaryOp};

impl Statement {
    /// The inverse of this statement.
    pub fn reverse(&self) -> Statement {
        match self {
            Statement::Swap { .. } | Statement::Skip => self.clone(),
            Statement::Unary { op, var } => Statement::Unary {
                op: match op {
                    UnaryOp::Invert => UnaryOp::Invert,
                    UnaryOp::Increment => UnaryOp::Decrement,
                    UnaryOp::Decrement => UnaryOp::Increment,
                },
                var: var.clone(),
            },
            Statement::Assign { lhs, op, rhs } => Statement::Assign {
                lhs: lhs.clone(),
                op: op.inverse(),
                rhs: rhs.clone(),
            },
            Statement::If {
                condition,
                then_statements,
                else_statements,
                fi_condition,
            } => Statement::If {
                condition: fi_condition.clone(),
                then_statements: reverse_statements(then_statements),
                else_statements: reverse_statements(else_statements),
                fi_condition: condition.clone(),
            },
            Statement::For {
                loop_variable,
                from,
                to,
                step,
                negative_step,
                statements,
            } => {
                let start = from.clone().unwrap_or(Number::Constant(1));
                Statement::For {
                    loop_variable: loop_variable.clone(),
                    from: Some(last_value(&start, to, step).unwrap_or_else(|| to.clone())),
                    to: start,
                    step: step.clone(),
                    negative_step: !negative_step,
                    statements: reverse_statements(statements),
                }
            }
            Statement::Call { target, parameters } => Statement::Uncall {
                target: target.clone(),
                parameters: parameters.clone(),
            },
            Statement::Uncall { target, parameters } => Statement::Call {
                target: target.clone(),
                parameters: parameters.clone(),
            },
        }
    }
}

/// The last value visited by a loop from `from` towards `to` by `step`,
/// when all three are constants. The reversed loop starts there, so it
/// visits the same values even when `step` does not divide the range.
fn last_value(from: &Number, to: &Number, step: &Number) -> Option<Number> {
    let (&Number::Constant(from), &Number::Constant(to), &Number::Constant(step)) =
        (from, to, step)
    else {
        return None;
    };
    if step == 0 {
        return None;
    }
    let last = if from <= to {
        from + (to - from) / step * step
    } else {
        from - (from - to) / step * step
    };
    Some(Number::Constant(last))
}

/// Reverse a statement list: inverse statements in reverse order.
pub fn reverse_statements(statements: &[Statement]) -> Vec<Statement> {
    statements.iter().rev().map(Statement::reverse).collect()
}

impl Module {
    /// A copy of this module whose body undoes the original body.
    pub fn reversed(&self) -> Module {
        Module {
            statements: reverse_statements(&self.statements),
            ..self.clone()
        }
    }
}
