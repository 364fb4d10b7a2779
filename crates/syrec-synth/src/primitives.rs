//! Arithmetic and logic building blocks over line vectors.
//!
//! Every primitive emits gates into the current scope of a [`CallTree`], so
//! it inherits the controls of the enclosing scopes. Line vectors hold bit 0
//! first. Operand vectors must be disjoint unless stated otherwise.

use syrec_ir::{Gate, LineId};
use syrec_lang::syntax::AssignOp;

use crate::call_tree::CallTree;
use crate::error::{SynthError, SynthResult};

fn check_width(expected: &[LineId], got: &[LineId]) -> SynthResult<()> {
    if expected.len() == got.len() {
        Ok(())
    } else {
        Err(SynthError::WidthMismatch {
            expected: expected.len(),
            got: got.len(),
        })
    }
}

fn shift_amount(amount: u64) -> usize {
    usize::try_from(amount).unwrap_or(usize::MAX)
}

impl CallTree {
    // =========================================================================
    // Elementary gates
    // =========================================================================

    /// `target := !target`.
    pub fn not(&mut self, target: LineId) {
        self.emit(Gate::not(target));
    }

    /// `target ^= control`.
    pub fn cnot(&mut self, control: LineId, target: LineId) {
        self.emit(Gate::cnot(control, target));
    }

    /// `target ^= control1 & control2`.
    pub fn toffoli(&mut self, control1: LineId, control2: LineId, target: LineId) {
        self.emit(Gate::toffoli(control1, control2, target));
    }

    /// Swap `a` and `b`.
    pub fn fredkin(&mut self, a: LineId, b: LineId) {
        self.emit(Gate::fredkin(a, b));
    }

    // =========================================================================
    // Bitwise operations
    // =========================================================================

    /// Swap two line vectors bit by bit.
    pub fn swap(&mut self, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        check_width(a, b)?;
        for (&x, &y) in a.iter().zip(b) {
            self.fredkin(x, y);
        }
        Ok(())
    }

    /// `dest ^= src`.
    pub fn bitwise_cnot(&mut self, dest: &[LineId], src: &[LineId]) -> SynthResult<()> {
        check_width(dest, src)?;
        for (&d, &s) in dest.iter().zip(src) {
            self.cnot(s, d);
        }
        Ok(())
    }

    /// `dest := !dest`.
    pub fn bitwise_negation(&mut self, dest: &[LineId]) {
        for &d in dest {
            self.not(d);
        }
    }

    /// `dest ^= a & b` on one bit.
    pub fn conjunction(&mut self, dest: LineId, a: LineId, b: LineId) {
        self.toffoli(a, b, dest);
    }

    /// `dest ^= a | b` on one bit.
    pub fn disjunction(&mut self, dest: LineId, a: LineId, b: LineId) {
        self.cnot(a, dest);
        self.cnot(b, dest);
        self.toffoli(a, b, dest);
    }

    /// `dest ^= a & b`.
    pub fn bitwise_and(&mut self, dest: &[LineId], a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        check_width(dest, a)?;
        check_width(dest, b)?;
        for i in 0..dest.len() {
            self.conjunction(dest[i], a[i], b[i]);
        }
        Ok(())
    }

    /// `dest ^= a | b`.
    pub fn bitwise_or(&mut self, dest: &[LineId], a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        check_width(dest, a)?;
        check_width(dest, b)?;
        for i in 0..dest.len() {
            self.disjunction(dest[i], a[i], b[i]);
        }
        Ok(())
    }

    // =========================================================================
    // Counting
    // =========================================================================

    /// `dest := dest + 1`.
    pub fn increment(&mut self, dest: &[LineId]) -> SynthResult<()> {
        for &d in dest {
            self.enter(Some(d));
        }
        for &d in dest.iter().rev() {
            self.leave()?;
            self.not(d);
        }
        Ok(())
    }

    /// `dest := dest - 1`.
    pub fn decrement(&mut self, dest: &[LineId]) -> SynthResult<()> {
        for &d in dest {
            self.not(d);
            self.enter(Some(d));
        }
        for _ in dest {
            self.leave()?;
        }
        Ok(())
    }

    // =========================================================================
    // Addition and subtraction
    // =========================================================================

    /// `dest := dest + src (mod 2^w)`; `src` is restored.
    pub fn increase(&mut self, dest: &[LineId], src: &[LineId]) -> SynthResult<()> {
        check_width(dest, src)?;
        let w = dest.len();
        match w {
            0 => return Ok(()),
            1 => {
                self.cnot(src[0], dest[0]);
                return Ok(());
            }
            _ => {}
        }

        for i in 1..w {
            self.cnot(src[i], dest[i]);
        }
        for i in (1..w - 1).rev() {
            self.cnot(src[i], src[i + 1]);
        }
        for i in 0..w - 1 {
            self.toffoli(dest[i], src[i], src[i + 1]);
        }
        self.cnot(src[w - 1], dest[w - 1]);
        for i in (1..w - 1).rev() {
            self.toffoli(src[i], dest[i], src[i + 1]);
            self.cnot(src[i], dest[i]);
        }
        self.toffoli(src[0], dest[0], src[1]);
        self.cnot(src[0], dest[0]);
        for i in 1..w - 1 {
            self.cnot(src[i], src[i + 1]);
        }
        for i in 1..w {
            self.cnot(src[i], dest[i]);
        }
        Ok(())
    }

    /// `dest := dest - src (mod 2^w)`; `src` is restored.
    pub fn decrease(&mut self, dest: &[LineId], src: &[LineId]) -> SynthResult<()> {
        self.bitwise_negation(dest);
        self.increase(dest, src)?;
        self.bitwise_negation(dest);
        Ok(())
    }

    /// `rhs := lhs - rhs (mod 2^w)`; `lhs` is restored. Applying it twice is
    /// the identity.
    pub fn decrease_new_assign(&mut self, rhs: &[LineId], lhs: &[LineId]) -> SynthResult<()> {
        self.bitwise_negation(lhs);
        self.increase(rhs, lhs)?;
        self.bitwise_negation(lhs);
        self.bitwise_negation(rhs);
        Ok(())
    }

    /// `dest := dest + src` with the carry out XORed onto `carry`.
    pub fn increase_with_carry(
        &mut self,
        dest: &[LineId],
        src: &[LineId],
        carry: LineId,
    ) -> SynthResult<()> {
        check_width(dest, src)?;
        let w = src.len();
        if w == 0 {
            return Ok(());
        }

        for i in 1..w {
            self.cnot(src[i], dest[i]);
        }
        if w > 1 {
            self.cnot(src[w - 1], carry);
        }
        for i in (1..w - 1).rev() {
            self.cnot(src[i], src[i + 1]);
        }
        for i in 0..w - 1 {
            self.toffoli(src[i], dest[i], src[i + 1]);
        }
        self.toffoli(src[w - 1], dest[w - 1], carry);
        for i in (1..w).rev() {
            self.cnot(src[i], dest[i]);
            self.toffoli(dest[i - 1], src[i - 1], src[i]);
        }
        for i in 1..w - 1 {
            self.cnot(src[i], src[i + 1]);
        }
        for i in 0..w {
            self.cnot(src[i], dest[i]);
        }
        Ok(())
    }

    /// `dest := dest - src` with the borrow XORed onto `carry`.
    pub fn decrease_with_carry(
        &mut self,
        dest: &[LineId],
        src: &[LineId],
        carry: LineId,
    ) -> SynthResult<()> {
        self.bitwise_negation(dest);
        self.increase_with_carry(dest, src, carry)?;
        self.bitwise_negation(dest);
        Ok(())
    }

    /// Apply an assignment operator: `dest op= src`.
    pub fn assign(&mut self, op: AssignOp, dest: &[LineId], src: &[LineId]) -> SynthResult<()> {
        match op {
            AssignOp::Add => self.increase(dest, src),
            AssignOp::Subtract => self.decrease(dest, src),
            AssignOp::Exor => self.bitwise_cnot(dest, src),
        }
    }

    /// Compute `lhs op rhs` in place into `rhs`.
    pub fn compute_in_place(
        &mut self,
        op: AssignOp,
        rhs: &[LineId],
        lhs: &[LineId],
    ) -> SynthResult<()> {
        match op {
            AssignOp::Add => self.increase(rhs, lhs),
            AssignOp::Subtract => self.decrease_new_assign(rhs, lhs),
            AssignOp::Exor => self.bitwise_cnot(rhs, lhs),
        }
    }

    /// Undo [`CallTree::compute_in_place`], restoring `rhs`.
    pub fn uncompute_in_place(
        &mut self,
        op: AssignOp,
        rhs: &[LineId],
        lhs: &[LineId],
    ) -> SynthResult<()> {
        match op {
            AssignOp::Add => self.decrease(rhs, lhs),
            AssignOp::Subtract => self.decrease_new_assign(rhs, lhs),
            AssignOp::Exor => self.bitwise_cnot(rhs, lhs),
        }
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// `dest ^= a < b`. `a` and `b` are restored.
    pub fn less_than(&mut self, dest: LineId, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.decrease_with_carry(a, b, dest)?;
        self.increase(a, b)
    }

    /// `dest ^= a > b`.
    pub fn greater_than(&mut self, dest: LineId, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.less_than(dest, b, a)
    }

    /// `dest ^= a <= b`.
    pub fn less_equals(&mut self, dest: LineId, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.less_than(dest, b, a)?;
        self.not(dest);
        Ok(())
    }

    /// `dest ^= a >= b`.
    pub fn greater_equals(&mut self, dest: LineId, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.greater_than(dest, b, a)?;
        self.not(dest);
        Ok(())
    }

    /// `dest ^= a == b`. `a` is restored.
    pub fn equals(&mut self, dest: LineId, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        check_width(a, b)?;
        for (&x, &y) in a.iter().zip(b) {
            self.cnot(y, x);
            self.not(x);
        }
        self.emit(Gate::multi_control_toffoli(a.iter().copied(), dest));
        for (&x, &y) in a.iter().zip(b) {
            self.cnot(y, x);
            self.not(x);
        }
        Ok(())
    }

    /// `dest ^= a != b`.
    pub fn not_equals(&mut self, dest: LineId, a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.equals(dest, a, b)?;
        self.not(dest);
        Ok(())
    }

    // =========================================================================
    // Multiplication and division
    // =========================================================================

    /// `dest += a * b (mod 2^w)`, by shift-and-add under the bits of `a`.
    pub fn multiplication(&mut self, dest: &[LineId], a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        check_width(dest, a)?;
        check_width(dest, b)?;
        if dest.is_empty() {
            return Ok(());
        }

        let mut sum = dest.to_vec();
        let mut partial = b.to_vec();
        self.scoped(Some(a[0]), |t| t.bitwise_cnot(&sum, &partial))?;
        for &control in &a[1..] {
            sum.remove(0);
            partial.pop();
            self.scoped(Some(control), |t| t.increase(&sum, &partial))?;
        }
        Ok(())
    }

    /// Restoring division of `a` by `b`: the quotient is XORed onto zero
    /// lines `quotient` and `a` is left holding the remainder. `b` is
    /// restored.
    pub fn modulo(&mut self, quotient: &[LineId], a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.divide_steps(quotient, a, b, true)
    }

    /// `dest ^= a / b` on zero lines `dest`. `a` and `b` are restored.
    pub fn division(&mut self, dest: &[LineId], a: &[LineId], b: &[LineId]) -> SynthResult<()> {
        self.modulo(dest, a, b)?;
        self.divide_steps(dest, a, b, false)
    }

    /// One sweep of restoring division. With `subtract`, each step
    /// subtracts the shifted divisor, records the borrow on the quotient
    /// bit and adds the divisor back when it borrowed. Without it, each
    /// step adds the shifted divisor under the quotient bit, which undoes
    /// the remainder computation.
    fn divide_steps(
        &mut self,
        quotient: &[LineId],
        a: &[LineId],
        b: &[LineId],
        subtract: bool,
    ) -> SynthResult<()> {
        check_width(a, quotient)?;
        check_width(a, b)?;
        let n = a.len();
        if n == 0 {
            return Ok(());
        }

        for &line in &b[1..] {
            self.not(line);
        }
        for &line in &b[1..] {
            self.enter(Some(line));
        }

        let mut sum: Vec<LineId> = vec![];
        let mut partial: Vec<LineId> = vec![];
        for i in (0..n).rev() {
            partial.push(b[n - 1 - i]);
            sum.insert(0, a[i]);

            if subtract {
                self.decrease_with_carry(&sum, &partial, quotient[i])?;
            }
            self.scoped(Some(quotient[i]), |t| t.increase(&sum, &partial))?;
            if subtract {
                self.not(quotient[i]);
            }

            if i > 0 {
                for _ in n - i..n {
                    self.leave()?;
                }
                self.not(b[n - i]);
                for &line in &b[n + 1 - i..n] {
                    self.enter(Some(line));
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Shifts
    // =========================================================================

    /// `dest ^= src << amount` on zero lines `dest`.
    pub fn left_shift(&mut self, dest: &[LineId], src: &[LineId], amount: u64) -> SynthResult<()> {
        check_width(dest, src)?;
        let amount = shift_amount(amount);
        for i in 0..dest.len().saturating_sub(amount) {
            self.cnot(src[i], dest[i + amount]);
        }
        Ok(())
    }

    /// `dest ^= src >> amount` on zero lines `dest`.
    pub fn right_shift(&mut self, dest: &[LineId], src: &[LineId], amount: u64) -> SynthResult<()> {
        check_width(dest, src)?;
        let amount = shift_amount(amount);
        for i in amount..dest.len() {
            self.cnot(src[i], dest[i - amount]);
        }
        Ok(())
    }
}
