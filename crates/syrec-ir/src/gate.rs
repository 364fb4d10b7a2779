//! Reversible gate types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::line::LineId;

/// The gate families produced by synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Multiple-controlled Toffoli: flips its single target when all
    /// controls are 1. NOT and CNOT are Toffoli gates with zero and one
    /// control.
    Toffoli,
    /// Multiple-controlled Fredkin: swaps its two targets when all controls
    /// are 1.
    Fredkin,
}

impl GateKind {
    /// Short name as used in RevLib `.real` files (`t`, `f`).
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Toffoli => "t",
            GateKind::Fredkin => "f",
        }
    }

    /// Number of target lines this gate kind acts on.
    #[inline]
    pub fn num_targets(self) -> usize {
        match self {
            GateKind::Toffoli => 1,
            GateKind::Fredkin => 2,
        }
    }
}

/// A reversible gate: a set of control lines and the target lines it acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate family.
    pub kind: GateKind,
    /// Control lines, all of which must be 1 for the gate to act.
    pub controls: BTreeSet<LineId>,
    /// Target lines.
    pub targets: Vec<LineId>,
}

impl Gate {
    /// NOT gate on `target`.
    pub fn not(target: LineId) -> Self {
        Self {
            kind: GateKind::Toffoli,
            controls: BTreeSet::new(),
            targets: vec![target],
        }
    }

    /// CNOT gate: `target ^= control`.
    pub fn cnot(control: LineId, target: LineId) -> Self {
        Self::not(target).with_controls([control])
    }

    /// Toffoli gate: `target ^= control1 & control2`.
    pub fn toffoli(control1: LineId, control2: LineId, target: LineId) -> Self {
        Self::not(target).with_controls([control1, control2])
    }

    /// Toffoli gate with an arbitrary control set.
    pub fn multi_control_toffoli(
        controls: impl IntoIterator<Item = LineId>,
        target: LineId,
    ) -> Self {
        Self::not(target).with_controls(controls)
    }

    /// Fredkin gate swapping `target1` and `target2`.
    pub fn fredkin(target1: LineId, target2: LineId) -> Self {
        Self {
            kind: GateKind::Fredkin,
            controls: BTreeSet::new(),
            targets: vec![target1, target2],
        }
    }

    /// Add further control lines.
    #[must_use]
    pub fn with_controls(mut self, controls: impl IntoIterator<Item = LineId>) -> Self {
        self.controls.extend(controls);
        self
    }

    /// Total number of lines this gate touches.
    pub fn size(&self) -> usize {
        self.controls.len() + self.targets.len()
    }

    /// Iterate over all lines, controls first.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.controls.iter().copied().chain(self.targets.iter().copied())
    }

    /// Check if this is a Toffoli-family gate.
    pub fn is_toffoli(&self) -> bool {
        self.kind == GateKind::Toffoli
    }

    /// Check if this is a Fredkin-family gate.
    pub fn is_fredkin(&self) -> bool {
        self.kind == GateKind::Fredkin
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.name(), self.size())?;
        for line in self.lines() {
            write!(f, " {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_constructors() {
        let g = Gate::toffoli(LineId(2), LineId(0), LineId(5));
        assert!(g.is_toffoli());
        assert_eq!(g.size(), 3);
        // Controls are kept ordered.
        assert_eq!(g.lines().collect::<Vec<_>>(), vec![LineId(0), LineId(2), LineId(5)]);

        let f = Gate::fredkin(LineId(1), LineId(3)).with_controls([LineId(0)]);
        assert!(f.is_fredkin());
        assert_eq!(f.kind.num_targets(), 2);
    }

    #[test]
    fn test_gate_display() {
        assert_eq!(Gate::not(LineId(4)).to_string(), "t1 x4");
        assert_eq!(Gate::cnot(LineId(0), LineId(1)).to_string(), "t2 x0 x1");
        assert_eq!(Gate::fredkin(LineId(0), LineId(1)).to_string(), "f2 x0 x1");
    }
}
