//! Folding of repeated operands into the assignment target.
//!
//! For `L op= e` where `e` is built from `+`, `-` and `^`, the value of `e`
//! can often be accumulated into `L` operand by operand, with no helper
//! lines: `L += (a - b)` is `L += a` followed by `L -= b`. Each operand
//! accumulates with the operator its position implies; a right operand
//! composes its parent's operator with the binary operator above it.
//! Operand pairs whose operators do not compose (`L ^= (a + b)`) are
//! computed in place onto the right operand, applied and uncomputed.
//!
//! Folding is only attempted when operands repeat, since that is where it
//! saves the most: `L ^= (a ^ a)` needs no gates at all.

use syrec_ir::LineId;
use syrec_lang::syntax::{AssignOp, Expression};

use super::overlaps;
use crate::call_tree::CallTree;
use crate::error::{SynthError, SynthResult};
use crate::synthesizer::Synthesizer;

/// One flattened binary node: its operand lines, empty for anything that
/// is not a variable access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Flow {
    lhs: Vec<LineId>,
    rhs: Vec<LineId>,
}

/// An elementary step of a fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FoldStep {
    /// `target op= src`.
    Apply { op: AssignOp, src: Vec<LineId> },
    /// `target op= (lhs exp rhs)`, computed in place on `rhs`.
    Solve {
        op: AssignOp,
        lhs: Vec<LineId>,
        exp: AssignOp,
        rhs: Vec<LineId>,
    },
}

/// Flatten the binary nodes of `expr` in post-order.
pub(crate) fn flow(synth: &Synthesizer<'_>, expr: &Expression, out: &mut Vec<Flow>) -> SynthResult<()> {
    match expr {
        Expression::Binary { lhs, rhs, .. } => {
            flow(synth, lhs, out)?;
            flow(synth, rhs, out)?;
            out.push(Flow {
                lhs: operand_lines(synth, lhs)?,
                rhs: operand_lines(synth, rhs)?,
            });
        }
        Expression::Shift { lhs, .. } => flow(synth, lhs, out)?,
        Expression::Numeric { .. } | Expression::Variable(_) => {}
    }
    Ok(())
}

fn operand_lines(synth: &Synthesizer<'_>, expr: &Expression) -> SynthResult<Vec<LineId>> {
    match expr {
        Expression::Variable(access) => synth.resolve(access),
        _ => Ok(vec![]),
    }
}

/// Whether any operand vector occurs twice: as two right operands, or as
/// the left operand of one step and the right operand of another (or the
/// same) step.
pub(crate) fn has_repeats(steps: &[Flow]) -> bool {
    let lhs: Vec<&[LineId]> = steps
        .iter()
        .map(|s| s.lhs.as_slice())
        .filter(|l| !l.is_empty())
        .collect();
    let rhs: Vec<&[LineId]> = steps
        .iter()
        .map(|s| s.rhs.as_slice())
        .filter(|r| !r.is_empty())
        .collect();

    let repeated_rhs = rhs
        .iter()
        .enumerate()
        .any(|(i, r)| rhs[i + 1..].contains(r));
    repeated_rhs || lhs.iter().any(|l| rhs.contains(l))
}

/// Compose the operator a node accumulates with and the node's binary
/// operator into the operator its right operand accumulates with.
fn compose(outer: AssignOp, inner: AssignOp) -> Option<AssignOp> {
    match (outer, inner) {
        (AssignOp::Exor, AssignOp::Exor) => Some(AssignOp::Exor),
        (AssignOp::Add, AssignOp::Add) | (AssignOp::Subtract, AssignOp::Subtract) => {
            Some(AssignOp::Add)
        }
        (AssignOp::Add, AssignOp::Subtract) | (AssignOp::Subtract, AssignOp::Add) => {
            Some(AssignOp::Subtract)
        }
        _ => None,
    }
}

/// Plan `target op= expr` as elementary steps.
///
/// Fails with [`SynthError::RepeatCheckFailed`] when no operands repeat,
/// and with [`SynthError::UnsupportedExpression`] or
/// [`SynthError::UnsupportedOperator`] when `expr` cannot be folded.
/// Nothing is emitted while planning.
pub(crate) fn plan(
    synth: &Synthesizer<'_>,
    target: &[LineId],
    op: AssignOp,
    expr: &Expression,
) -> SynthResult<Vec<FoldStep>> {
    let mut flows = vec![];
    flow(synth, expr, &mut flows)?;
    if flows.is_empty() || !has_repeats(&flows) {
        return Err(SynthError::RepeatCheckFailed);
    }

    let controls = synth.tree.controls();
    let mut steps = vec![];
    Planner {
        synth,
        target,
        controls: &controls,
    }
    .node(expr, op, &mut steps)?;
    Ok(steps)
}

struct Planner<'s, 'a> {
    synth: &'s Synthesizer<'a>,
    target: &'s [LineId],
    controls: &'s [LineId],
}

impl Planner<'_, '_> {
    fn node(&self, expr: &Expression, op: AssignOp, steps: &mut Vec<FoldStep>) -> SynthResult<()> {
        match expr {
            Expression::Variable(_) => {
                let src = self.operand(expr)?;
                steps.push(FoldStep::Apply { op, src });
                Ok(())
            }
            Expression::Binary {
                lhs,
                op: binary,
                rhs,
            } => {
                let exp = binary
                    .as_assign_op()
                    .ok_or_else(|| SynthError::UnsupportedOperator(binary.symbol().into()))?;

                let leaves = match (lhs.as_ref(), rhs.as_ref()) {
                    (Expression::Variable(_), Expression::Variable(_)) => {
                        Some((self.operand(lhs)?, self.operand(rhs)?))
                    }
                    _ => None,
                };

                if let Some((a, b)) = &leaves {
                    if a == b && exp != AssignOp::Add {
                        // (a - a) and (a ^ a) are zero
                        return Ok(());
                    }
                }

                if let Some(rhs_op) = compose(op, exp) {
                    self.node(lhs, op, steps)?;
                    return self.node(rhs, rhs_op, steps);
                }

                // `operand` checked that both are as wide as the target
                match leaves {
                    Some((a, b)) if !overlaps(&a, &b) => {
                        steps.push(FoldStep::Solve {
                            op,
                            lhs: a,
                            exp,
                            rhs: b,
                        });
                        Ok(())
                    }
                    _ => Err(SynthError::UnsupportedOperator(format!(
                        "cannot fold '{}' under '{op}'",
                        exp.symbol()
                    ))),
                }
            }
            Expression::Numeric { .. } => Err(SynthError::UnsupportedExpression(
                "constant operand".into(),
            )),
            Expression::Shift { .. } => {
                Err(SynthError::UnsupportedExpression("shift operand".into()))
            }
        }
    }

    /// Lines of a variable operand, which must be disjoint from the target
    /// and the open controls, and as wide as the target.
    fn operand(&self, expr: &Expression) -> SynthResult<Vec<LineId>> {
        let Expression::Variable(access) = expr else {
            return Err(SynthError::UnsupportedExpression(
                "operand is not a variable".into(),
            ));
        };
        let lines = self.synth.resolve(access)?;
        if overlaps(&lines, self.target) {
            return Err(SynthError::UnsupportedExpression(format!(
                "operand '{}' overlaps the assignment target",
                access.var.name
            )));
        }
        if overlaps(&lines, self.controls) {
            return Err(SynthError::UnsupportedExpression(format!(
                "operand '{}' holds an open control",
                access.var.name
            )));
        }
        if lines.len() != self.target.len() {
            return Err(SynthError::UnsupportedExpression(format!(
                "operand '{}' has {} bits, the target has {}",
                access.var.name,
                lines.len(),
                self.target.len()
            )));
        }
        Ok(lines)
    }
}

/// Emit a fold plan onto `target`.
pub(crate) fn emit(tree: &mut CallTree, target: &[LineId], steps: &[FoldStep]) -> SynthResult<()> {
    for step in steps {
        match step {
            FoldStep::Apply { op, src } => tree.assign(*op, target, src)?,
            FoldStep::Solve { op, lhs, exp, rhs } => {
                tree.compute_in_place(*exp, rhs, lhs)?;
                tree.assign(*op, target, rhs)?;
                tree.uncompute_in_place(*exp, rhs, lhs)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(lhs: &[u32], rhs: &[u32]) -> Flow {
        Flow {
            lhs: lhs.iter().copied().map(LineId).collect(),
            rhs: rhs.iter().copied().map(LineId).collect(),
        }
    }

    #[test]
    fn test_has_repeats() {
        assert!(has_repeats(&[step(&[0, 1], &[0, 1])]));
        assert!(!has_repeats(&[step(&[0, 1], &[2, 3])]));
        assert!(has_repeats(&[
            step(&[0], &[1]),
            step(&[], &[1]),
        ]));
        assert!(has_repeats(&[
            step(&[0], &[1]),
            step(&[1], &[2]),
        ]));
        // placeholders never count as repeats
        assert!(!has_repeats(&[
            step(&[], &[]),
            step(&[], &[]),
        ]));
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose(AssignOp::Add, AssignOp::Subtract), Some(AssignOp::Subtract));
        assert_eq!(compose(AssignOp::Subtract, AssignOp::Subtract), Some(AssignOp::Add));
        assert_eq!(compose(AssignOp::Subtract, AssignOp::Add), Some(AssignOp::Subtract));
        assert_eq!(compose(AssignOp::Exor, AssignOp::Exor), Some(AssignOp::Exor));
        assert_eq!(compose(AssignOp::Exor, AssignOp::Add), None);
        assert_eq!(compose(AssignOp::Add, AssignOp::Exor), None);
    }
}
