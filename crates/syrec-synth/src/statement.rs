//! Statement synthesis.

use syrec_lang::reverse_statements;
use syrec_lang::syntax::{Expression, Number, Statement, UnaryOp};
use tracing::debug;

use crate::binding::Bound;
use crate::error::{SynthError, SynthResult};
use crate::synthesizer::Synthesizer;

/// Iteration values of an unrolled loop: from `from` towards `to`
/// inclusive, moving by `step` in the direction of `to`.
pub(crate) fn loop_values(from: u64, to: u64, step: u64) -> impl Iterator<Item = u64> {
    let ascending = from <= to;
    std::iter::successors(Some(from), move |&i| {
        if ascending {
            i.checked_add(step)
        } else {
            i.checked_sub(step)
        }
    })
    .take_while(move |&i| if ascending { i <= to } else { i >= to })
}

impl Synthesizer<'_> {
    pub(crate) fn statements(&mut self, statements: &[Statement]) -> SynthResult<()> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    pub(crate) fn statement(&mut self, statement: &Statement) -> SynthResult<()> {
        debug!(
            "Synthesizing {} statement at depth {}",
            statement.kind_name(),
            self.tree.depth()
        );

        match statement {
            Statement::Swap { lhs, rhs } => {
                let lhs = self.resolve(lhs)?;
                let rhs = self.resolve(rhs)?;
                self.tree.swap(&lhs, &rhs)
            }
            Statement::Unary { op, var } => {
                let lines = self.resolve(var)?;
                match op {
                    UnaryOp::Invert => {
                        self.tree.bitwise_negation(&lines);
                        Ok(())
                    }
                    UnaryOp::Increment => self.tree.increment(&lines),
                    UnaryOp::Decrement => self.tree.decrement(&lines),
                }
            }
            Statement::Assign { lhs, op, rhs } => {
                let lines = self.resolve(lhs)?;
                let strategy = self.strategy;
                debug!("Assigning with {} strategy", strategy.name());
                strategy.assign(self, &lines, *op, rhs)
            }
            Statement::If {
                condition,
                then_statements,
                else_statements,
                ..
            } => self.if_statement(condition, then_statements, else_statements),
            Statement::For {
                loop_variable,
                from,
                to,
                step,
                statements,
                ..
            } => self.for_statement(loop_variable.as_deref(), from.as_ref(), to, step, statements),
            Statement::Call { target, parameters } => self.call(target, parameters, false),
            Statement::Uncall { target, parameters } => self.call(target, parameters, true),
            Statement::Skip => Ok(()),
        }
    }

    fn if_statement(
        &mut self,
        condition: &Expression,
        then_statements: &[Statement],
        else_statements: &[Statement],
    ) -> SynthResult<()> {
        let lines = self.expression(condition)?;
        let control = match lines.as_slice() {
            [line] => *line,
            _ => {
                return Err(SynthError::WidthMismatch {
                    expected: 1,
                    got: lines.len(),
                });
            }
        };

        self.scoped(Some(control), |s| s.statements(then_statements))?;
        self.tree.not(control);
        self.scoped(Some(control), |s| s.statements(else_statements))?;
        self.tree.not(control);
        Ok(())
    }

    fn for_statement(
        &mut self,
        loop_variable: Option<&str>,
        from: Option<&Number>,
        to: &Number,
        step: &Number,
        statements: &[Statement],
    ) -> SynthResult<()> {
        let from = match from {
            Some(from) => self.evaluate(from)?,
            None => 1,
        };
        let to = self.evaluate(to)?;
        let step = self.evaluate(step)?;
        if step == 0 {
            return Err(SynthError::InvalidLoop("step must not be zero".into()));
        }
        debug!("Unrolling loop from {from} to {to} by {step}");

        // a called module may reuse the name of a loop variable of its caller
        let outer = loop_variable.and_then(|name| self.loop_map.get(name).copied());

        let mut result = Ok(());
        for value in loop_values(from, to, step) {
            if let Some(name) = loop_variable {
                self.loop_map.insert(name.to_string(), value);
            }
            result = self.statements(statements);
            if result.is_err() {
                break;
            }
        }
        if let Some(name) = loop_variable {
            match outer {
                Some(value) => self.loop_map.insert(name.to_string(), value),
                None => self.loop_map.remove(name),
            };
        }
        result
    }

    /// Synthesize a call, or with `reverse` an uncall, of `target` on the
    /// caller's variables `arguments`.
    fn call(&mut self, target: &str, arguments: &[String], reverse: bool) -> SynthResult<()> {
        let program = self.program;
        let module = program
            .find_module(target)
            .ok_or_else(|| SynthError::UnknownModule(target.to_string()))?;
        if module.parameters.len() != arguments.len() {
            return Err(SynthError::UnresolvedVariable {
                name: target.to_string(),
                reason: format!(
                    "expects {} arguments, got {}",
                    module.parameters.len(),
                    arguments.len()
                ),
            });
        }

        let firsts = arguments
            .iter()
            .map(|name| self.binding.lookup(name).map(|bound| bound.first))
            .collect::<SynthResult<Vec<_>>>()?;

        let reversed;
        let statements = if reverse {
            reversed = reverse_statements(&module.statements);
            reversed.as_slice()
        } else {
            module.statements.as_slice()
        };

        self.binding.push_frame();
        let result = self.scoped(None, |s| {
            for (parameter, first) in module.parameters.iter().zip(firsts) {
                s.binding.bind(
                    parameter.name.clone(),
                    Bound {
                        first,
                        var: parameter.clone(),
                    },
                )?;
            }
            s.binding.add_variables(&mut s.circuit, &module.variables)?;
            s.module_statements(&module.name, statements)
        });
        self.binding.pop_frame();
        result
    }
}
