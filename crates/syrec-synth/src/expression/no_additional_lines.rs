//! Assignment with as few helper lines as the expression allows.
//!
//! `L op= e` is encoded by the first of these that applies:
//!
//! 1. **Fold**: operands of `e` repeat and `e` folds into `L` operand by
//!    operand (see [`fold`](super::fold)).
//! 2. **In place**: all operands of `e` are distinct lines disjoint from
//!    `L` and from the controls of enclosing `if` statements. Every `+`,
//!    `-` and `^` node is computed onto its right operand and recorded;
//!    once `L` is updated the records are undone newest first. A root node
//!    with the statement's own operator is not computed at all: both of its
//!    operands are applied to `L` directly.
//! 3. **Additional lines**: the general encoding.

use rustc_hash::FxHashSet;
use syrec_ir::LineId;
use syrec_lang::syntax::{AssignOp, Expression, VariableAccess};
use tracing::debug;

use super::{AdditionalLines, AssignStrategy, fold};
use crate::error::{SynthError, SynthResult};
use crate::synthesizer::Synthesizer;

/// Folds or computes in place where possible, else uses fresh lines.
pub(crate) struct NoAdditionalLines;

impl AssignStrategy for NoAdditionalLines {
    fn name(&self) -> &'static str {
        "no additional lines"
    }

    fn assign(
        &self,
        synth: &mut Synthesizer<'_>,
        lhs: &[LineId],
        op: AssignOp,
        rhs: &Expression,
    ) -> SynthResult<()> {
        match fold::plan(synth, lhs, op, rhs) {
            Ok(steps) => {
                debug!("Folding assignment into {} steps", steps.len());
                fold::emit(&mut synth.tree, lhs, &steps)?;
                synth.counts.folded += 1;
                Ok(())
            }
            Err(SynthError::RepeatCheckFailed) => {
                if operands_disjoint(synth, lhs, rhs)? {
                    debug!("Computing assignment in place");
                    in_place(synth, lhs, op, rhs)?;
                    synth.counts.in_place += 1;
                    Ok(())
                } else {
                    debug!("Operands overlap, using additional lines");
                    AdditionalLines.assign(synth, lhs, op, rhs)
                }
            }
            Err(e) if e.is_recoverable() => {
                debug!("Cannot fold assignment ({e}), using additional lines");
                AdditionalLines.assign(synth, lhs, op, rhs)
            }
            Err(e) => Err(e),
        }
    }
}

/// Whether the variable operands of `expr`, `target` and the open controls
/// are pairwise disjoint.
fn operands_disjoint(
    synth: &Synthesizer<'_>,
    target: &[LineId],
    expr: &Expression,
) -> SynthResult<bool> {
    let mut accesses = vec![];
    collect_operands(expr, &mut accesses);

    let mut seen: FxHashSet<LineId> = target.iter().copied().collect();
    seen.extend(synth.tree.controls());
    for access in accesses {
        for line in synth.resolve(access)? {
            if !seen.insert(line) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn collect_operands<'e>(expr: &'e Expression, out: &mut Vec<&'e VariableAccess>) {
    match expr {
        Expression::Variable(access) => out.push(access),
        Expression::Binary { lhs, rhs, .. } => {
            collect_operands(lhs, out);
            collect_operands(rhs, out);
        }
        Expression::Shift { lhs, .. } => collect_operands(lhs, out),
        Expression::Numeric { .. } => {}
    }
}

/// Operands mutated in place, to be restored newest first.
#[derive(Default)]
struct Pending {
    entries: Vec<(AssignOp, Vec<LineId>, Vec<LineId>)>,
}

/// Value of a sub-expression on the in-place path.
enum Value {
    Lines(Vec<LineId>),
    /// A root node with the statement's operator, left unevaluated.
    Deferred(Vec<LineId>, Vec<LineId>),
}

fn in_place(
    synth: &mut Synthesizer<'_>,
    target: &[LineId],
    op: AssignOp,
    rhs: &Expression,
) -> SynthResult<()> {
    let mut pending = Pending::default();
    match evaluate(synth, rhs, Some(op), &mut pending)? {
        Value::Lines(lines) => synth.tree.assign(op, target, &lines)?,
        Value::Deferred(l, r) => {
            synth.tree.assign(op, target, &l)?;
            let second = match op {
                AssignOp::Subtract => AssignOp::Add,
                other => other,
            };
            synth.tree.assign(second, target, &r)?;
        }
    }

    while let Some((exp, lhs, rhs)) = pending.entries.pop() {
        synth.tree.uncompute_in_place(exp, &rhs, &lhs)?;
    }
    Ok(())
}

/// Evaluate `expr`; `root_op` is the statement operator when `expr` is the
/// whole right-hand side.
fn evaluate(
    synth: &mut Synthesizer<'_>,
    expr: &Expression,
    root_op: Option<AssignOp>,
    pending: &mut Pending,
) -> SynthResult<Value> {
    let lines = match expr {
        Expression::Numeric { .. } | Expression::Variable(_) => synth.expression(expr)?,
        Expression::Binary { lhs, op, rhs } => {
            let l = lines_of(evaluate(synth, lhs, None, pending)?)?;
            let r = lines_of(evaluate(synth, rhs, None, pending)?)?;
            match op.as_assign_op() {
                Some(exp) if root_op == Some(exp) => return Ok(Value::Deferred(l, r)),
                Some(exp) => {
                    synth.tree.compute_in_place(exp, &r, &l)?;
                    pending.entries.push((exp, l, r.clone()));
                    r
                }
                None => synth.binary(*op, &l, &r)?,
            }
        }
        Expression::Shift { lhs, op, amount } => {
            let l = lines_of(evaluate(synth, lhs, None, pending)?)?;
            let amount = synth.evaluate(amount)?;
            synth.shift(*op, &l, amount)?
        }
    };
    Ok(Value::Lines(lines))
}

fn lines_of(value: Value) -> SynthResult<Vec<LineId>> {
    match value {
        Value::Lines(lines) => Ok(lines),
        Value::Deferred(..) => Err(SynthError::UnsupportedExpression(
            "deferred sub-expression".into(),
        )),
    }
}
