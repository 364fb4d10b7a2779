//! Assignment through fresh lines.

use syrec_ir::LineId;
use syrec_lang::syntax::{AssignOp, Expression};

use super::AssignStrategy;
use crate::error::SynthResult;
use crate::synthesizer::Synthesizer;

/// Computes the right-hand side into fresh lines, then applies the
/// assignment operator. Works for every expression.
pub(crate) struct AdditionalLines;

impl AssignStrategy for AdditionalLines {
    fn name(&self) -> &'static str {
        "additional lines"
    }

    fn assign(
        &self,
        synth: &mut Synthesizer<'_>,
        lhs: &[LineId],
        op: AssignOp,
        rhs: &Expression,
    ) -> SynthResult<()> {
        let lines = synth.expression(rhs)?;
        let lines = match op {
            AssignOp::Exor => lines,
            // increase and decrease rewrite their source while they run
            AssignOp::Add | AssignOp::Subtract => {
                let controls = synth.tree.controls();
                synth.detached(&lines, &[controls.as_slice()])?
            }
        };
        synth.tree.assign(op, lhs, &lines)?;
        synth.counts.additional_lines += 1;
        Ok(())
    }
}
