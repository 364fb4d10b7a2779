//! Expression synthesis.
//!
//! [`Synthesizer::expression`] is the general encoding: every operator
//! writes its result into fresh zero lines and leaves its operands as they
//! were. Assignments go through an [`AssignStrategy`], which may avoid
//! those fresh lines where the expression allows it.

mod additional_lines;
mod fold;
mod no_additional_lines;

pub(crate) use additional_lines::AdditionalLines;
pub(crate) use no_additional_lines::NoAdditionalLines;

use syrec_ir::LineId;
use syrec_lang::syntax::{AssignOp, BinaryOp, Expression, ShiftOp};
use tracing::trace;

use crate::error::{SynthError, SynthResult};
use crate::settings::Strategy;
use crate::synthesizer::Synthesizer;

/// Encoding of assignment statements `lhs op= rhs`.
pub(crate) trait AssignStrategy: Send + Sync {
    /// Get the name of this strategy.
    fn name(&self) -> &'static str;

    /// Emit gates realizing `lhs op= rhs`.
    fn assign(
        &self,
        synth: &mut Synthesizer<'_>,
        lhs: &[LineId],
        op: AssignOp,
        rhs: &Expression,
    ) -> SynthResult<()>;
}

/// The assignment strategy for a setting.
pub(crate) fn strategy_for(strategy: Strategy) -> &'static dyn AssignStrategy {
    match strategy {
        Strategy::AdditionalLines => &AdditionalLines,
        Strategy::NoAdditionalLines => &NoAdditionalLines,
    }
}

fn first_bit(lines: &[LineId]) -> SynthResult<LineId> {
    lines.first().copied().ok_or(SynthError::WidthMismatch {
        expected: 1,
        got: 0,
    })
}

impl Synthesizer<'_> {
    /// Synthesize `expr` and return the lines holding its value.
    ///
    /// Variable accesses return the variable's own lines, numbers return
    /// constant lines; everything else is computed into fresh lines.
    pub(crate) fn expression(&mut self, expr: &Expression) -> SynthResult<Vec<LineId>> {
        match expr {
            Expression::Numeric { value, bitwidth } => {
                let value = self.evaluate(value)?;
                self.constant_lines(*bitwidth, value)
            }
            Expression::Variable(access) => self.resolve(access),
            Expression::Binary { lhs, op, rhs } => {
                let lhs = self.expression(lhs)?;
                let rhs = self.expression(rhs)?;
                self.binary(*op, &lhs, &rhs)
            }
            Expression::Shift { lhs, op, amount } => {
                let lhs = self.expression(lhs)?;
                let amount = self.evaluate(amount)?;
                self.shift(*op, &lhs, amount)
            }
        }
    }

    /// Compute `lhs op rhs` into fresh lines. The result has the width of
    /// `lhs`, or one line for boolean operators.
    pub(crate) fn binary(
        &mut self,
        op: BinaryOp,
        lhs: &[LineId],
        rhs: &[LineId],
    ) -> SynthResult<Vec<LineId>> {
        let (lhs, rhs) = self.operands(op, lhs, rhs)?;

        if let Some(assign_op) = op.as_assign_op() {
            let lines = self.zero_lines(lhs.len())?;
            self.tree.bitwise_cnot(&lines, &lhs)?;
            self.tree.assign(assign_op, &lines, &rhs)?;
            return Ok(lines);
        }

        if op.is_boolean() {
            let line = first_bit(&self.zero_lines(1)?)?;
            match op {
                BinaryOp::LogicalAnd => {
                    self.tree.conjunction(line, first_bit(&lhs)?, first_bit(&rhs)?);
                }
                BinaryOp::LogicalOr => {
                    self.tree.disjunction(line, first_bit(&lhs)?, first_bit(&rhs)?);
                }
                BinaryOp::LessThan => self.tree.less_than(line, &lhs, &rhs)?,
                BinaryOp::GreaterThan => self.tree.greater_than(line, &lhs, &rhs)?,
                BinaryOp::LessEquals => self.tree.less_equals(line, &lhs, &rhs)?,
                BinaryOp::GreaterEquals => self.tree.greater_equals(line, &lhs, &rhs)?,
                BinaryOp::Equals => self.tree.equals(line, &lhs, &rhs)?,
                BinaryOp::NotEquals => self.tree.not_equals(line, &lhs, &rhs)?,
                other => return Err(SynthError::UnsupportedOperator(other.symbol().into())),
            }
            return Ok(vec![line]);
        }

        let lines = self.zero_lines(lhs.len())?;
        match op {
            BinaryOp::Multiply => self.tree.multiplication(&lines, &lhs, &rhs)?,
            BinaryOp::Divide => self.tree.division(&lines, &lhs, &rhs)?,
            BinaryOp::Modulo => {
                self.tree.bitwise_cnot(&lines, &lhs)?;
                let quotient = self.zero_lines(lhs.len())?;
                self.tree.modulo(&quotient, &lines, &rhs)?;
            }
            BinaryOp::BitwiseAnd => self.tree.bitwise_and(&lines, &lhs, &rhs)?,
            BinaryOp::BitwiseOr => self.tree.bitwise_or(&lines, &lhs, &rhs)?,
            other => return Err(SynthError::UnsupportedOperator(other.symbol().into())),
        }
        Ok(lines)
    }

    /// Operands for the primitive of `op`. An operand the primitive
    /// rewrites while it runs is copied into fresh lines when it shares a
    /// line with the other operand or with an open control.
    fn operands(
        &mut self,
        op: BinaryOp,
        lhs: &[LineId],
        rhs: &[LineId],
    ) -> SynthResult<(Vec<LineId>, Vec<LineId>)> {
        let controls = self.tree.controls();
        match op {
            // lhs is copied before rhs is rewritten
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Modulo => {
                Ok((lhs.to_vec(), self.detached(rhs, &[controls.as_slice()])?))
            }
            // the bits of lhs control the rewrites of rhs
            BinaryOp::Multiply => {
                Ok((lhs.to_vec(), self.detached(rhs, &[controls.as_slice(), lhs])?))
            }
            BinaryOp::Equals | BinaryOp::NotEquals => {
                Ok((self.detached(lhs, &[controls.as_slice(), rhs])?, rhs.to_vec()))
            }
            BinaryOp::Divide
            | BinaryOp::LessThan
            | BinaryOp::GreaterThan
            | BinaryOp::LessEquals
            | BinaryOp::GreaterEquals => {
                let lhs = self.detached(lhs, &[controls.as_slice(), rhs])?;
                let rhs = self.detached(rhs, &[controls.as_slice()])?;
                Ok((lhs, rhs))
            }
            _ => Ok((lhs.to_vec(), rhs.to_vec())),
        }
    }

    /// `lines`, or a copy of them in fresh lines when they share a line
    /// with any of `busy`.
    pub(crate) fn detached(
        &mut self,
        lines: &[LineId],
        busy: &[&[LineId]],
    ) -> SynthResult<Vec<LineId>> {
        if !busy.iter().any(|other| overlaps(lines, other)) {
            return Ok(lines.to_vec());
        }
        trace!("Copying {}-bit operand into fresh lines", lines.len());
        let copy = self.zero_lines(lines.len())?;
        self.tree.bitwise_cnot(&copy, lines)?;
        Ok(copy)
    }

    /// Copy `lhs` shifted by `amount` into fresh lines.
    pub(crate) fn shift(
        &mut self,
        op: ShiftOp,
        lhs: &[LineId],
        amount: u64,
    ) -> SynthResult<Vec<LineId>> {
        let lines = self.zero_lines(lhs.len())?;
        match op {
            ShiftOp::Left => self.tree.left_shift(&lines, lhs, amount)?,
            ShiftOp::Right => self.tree.right_shift(&lines, lhs, amount)?,
        }
        Ok(lines)
    }
}

/// Whether two line vectors share a line.
pub(crate) fn overlaps(a: &[LineId], b: &[LineId]) -> bool {
    a.iter().any(|line| b.contains(line))
}
