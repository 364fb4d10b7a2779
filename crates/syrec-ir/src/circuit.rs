//! Reversible circuit container and builder API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::line::{Line, LineId};

/// A reversible circuit: an ordered gate cascade over a fixed set of lines.
///
/// Lines are appended with [`Circuit::add_line`] and never removed. Gates
/// are validated on insertion: every line must exist, targets must be
/// distinct and no line may be both a control and a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Lines in the circuit, indexed by [`LineId`].
    lines: Vec<Line>,
    /// The gate cascade, in application order.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: vec![],
            gates: vec![],
        }
    }

    /// Create a circuit with `num_lines` unnamed, non-constant lines.
    pub fn with_lines(name: impl Into<String>, num_lines: u32) -> IrResult<Self> {
        let mut circuit = Self::new(name);
        for i in 0..num_lines {
            circuit.add_line(format!("i{i}"), format!("o{i}"), None, false)?;
        }
        Ok(circuit)
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a line and return its identifier.
    pub fn add_line(
        &mut self,
        input: impl Into<String>,
        output: impl Into<String>,
        constant: Option<bool>,
        garbage: bool,
    ) -> IrResult<LineId> {
        let id = LineId(u32::try_from(self.lines.len()).map_err(|_| IrError::TooManyLines)?);
        self.lines.push(Line {
            id,
            input: input.into(),
            output: output.into(),
            constant,
            garbage,
        });
        Ok(id)
    }

    /// Get a line by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.index())
    }

    /// Get all lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get the number of lines.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Get the gate cascade.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get the number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Check whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Input names of all lines.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.input.as_str())
    }

    /// Output names of all lines.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.output.as_str())
    }

    /// Constant input values of all lines.
    pub fn constants(&self) -> impl Iterator<Item = Option<bool>> + '_ {
        self.lines.iter().map(|l| l.constant)
    }

    /// Garbage flags of all lines.
    pub fn garbage(&self) -> impl Iterator<Item = bool> + '_ {
        self.lines.iter().map(|l| l.garbage)
    }

    /// Check that a gate is well-formed with respect to this circuit.
    pub fn validate(&self, gate: &Gate) -> IrResult<()> {
        let expected = gate.kind.num_targets();
        if gate.targets.len() != expected {
            return Err(IrError::TargetCountMismatch {
                kind: gate.kind,
                expected,
                got: gate.targets.len(),
            });
        }

        for line in gate.lines() {
            if line.index() >= self.lines.len() {
                return Err(IrError::LineNotFound {
                    line,
                    num_lines: self.lines.len(),
                });
            }
        }

        for (i, target) in gate.targets.iter().enumerate() {
            if gate.controls.contains(target) {
                return Err(IrError::ControlTargetOverlap(*target));
            }
            if gate.targets[..i].contains(target) {
                return Err(IrError::DuplicateTarget(*target));
            }
        }

        Ok(())
    }

    /// Append a gate at the end of the cascade.
    pub fn append(&mut self, gate: Gate) -> IrResult<&mut Self> {
        self.validate(&gate)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Append a sequence of gates, adding `controls` to each of them.
    pub fn append_controlled(
        &mut self,
        gates: impl IntoIterator<Item = Gate>,
        controls: &BTreeSet<LineId>,
    ) -> IrResult<&mut Self> {
        for gate in gates {
            self.append(gate.with_controls(controls.iter().copied()))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Gate builders
    // =========================================================================

    /// Apply NOT on `target`.
    pub fn not(&mut self, target: LineId) -> IrResult<&mut Self> {
        self.append(Gate::not(target))
    }

    /// Apply CNOT: `target ^= control`.
    pub fn cnot(&mut self, control: LineId, target: LineId) -> IrResult<&mut Self> {
        self.append(Gate::cnot(control, target))
    }

    /// Apply Toffoli: `target ^= control1 & control2`.
    pub fn toffoli(
        &mut self,
        control1: LineId,
        control2: LineId,
        target: LineId,
    ) -> IrResult<&mut Self> {
        self.append(Gate::toffoli(control1, control2, target))
    }

    /// Apply a Toffoli gate with an arbitrary control set.
    pub fn multi_control_toffoli(
        &mut self,
        controls: impl IntoIterator<Item = LineId>,
        target: LineId,
    ) -> IrResult<&mut Self> {
        self.append(Gate::multi_control_toffoli(controls, target))
    }

    /// Apply an uncontrolled Fredkin (swap) gate.
    pub fn fredkin(&mut self, target1: LineId, target2: LineId) -> IrResult<&mut Self> {
        self.append(Gate::fredkin(target1, target2))
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize the circuit as pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a circuit from JSON.
    pub fn from_json(json: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_creation() {
        let circuit = Circuit::with_lines("test", 3).unwrap();
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_lines(), 3);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_builder_chaining() {
        let mut circuit = Circuit::with_lines("test", 3).unwrap();
        circuit
            .not(LineId(0))
            .unwrap()
            .cnot(LineId(0), LineId(1))
            .unwrap()
            .toffoli(LineId(0), LineId(1), LineId(2))
            .unwrap();
        assert_eq!(circuit.num_gates(), 3);
    }

    #[test]
    fn test_rejects_unknown_line() {
        let mut circuit = Circuit::with_lines("test", 2).unwrap();
        let result = circuit.cnot(LineId(0), LineId(2));
        assert!(matches!(result, Err(IrError::LineNotFound { .. })));
    }

    #[test]
    fn test_rejects_overlap() {
        let mut circuit = Circuit::with_lines("test", 2).unwrap();
        let result = circuit.cnot(LineId(1), LineId(1));
        assert!(matches!(result, Err(IrError::ControlTargetOverlap(LineId(1)))));

        let result = circuit.fredkin(LineId(0), LineId(0));
        assert!(matches!(result, Err(IrError::DuplicateTarget(LineId(0)))));
    }

    #[test]
    fn test_append_controlled() {
        let mut circuit = Circuit::with_lines("test", 4).unwrap();
        let controls: BTreeSet<_> = [LineId(3)].into_iter().collect();
        circuit
            .append_controlled(
                [Gate::not(LineId(0)), Gate::cnot(LineId(0), LineId(1))],
                &controls,
            )
            .unwrap();

        assert_eq!(circuit.gates()[0].controls.len(), 1);
        assert_eq!(circuit.gates()[1].controls.len(), 2);
        assert!(circuit.gates().iter().all(|g| g.controls.contains(&LineId(3))));
    }

    #[test]
    fn test_line_metadata() {
        let mut circuit = Circuit::new("meta");
        circuit.add_line("a.0", "a.0", None, false).unwrap();
        circuit.add_line("const_0", "garbage", Some(false), true).unwrap();

        assert_eq!(circuit.constants().collect::<Vec<_>>(), vec![None, Some(false)]);
        assert_eq!(circuit.garbage().collect::<Vec<_>>(), vec![false, true]);
        assert_eq!(circuit.outputs().nth(1), Some("garbage"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut circuit = Circuit::with_lines("json", 2).unwrap();
        circuit.cnot(LineId(0), LineId(1)).unwrap();
        let json = circuit.to_json().unwrap();
        let restored = Circuit::from_json(&json).unwrap();
        assert_eq!(circuit, restored);
    }
}
