//! Circuit lines and their metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a line within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

impl LineId {
    /// Index of this line into the circuit's line table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<u32> for LineId {
    fn from(id: u32) -> Self {
        LineId(id)
    }
}

/// A circuit line together with its interface description.
///
/// `constant` is the fixed value the line carries on input (helper lines,
/// `out` and `wire` variables); `garbage` marks lines whose output value
/// is not part of the function's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// The unique identifier.
    pub id: LineId,
    /// Name of the line on the input side.
    pub input: String,
    /// Name of the line on the output side.
    pub output: String,
    /// Constant input value, if any.
    pub constant: Option<bool>,
    /// Whether the output of this line is garbage.
    pub garbage: bool,
}

impl Line {
    /// Create a line whose input and output share one name.
    pub fn named(id: LineId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            input: name.clone(),
            output: name,
            constant: None,
            garbage: false,
        }
    }

    /// Set the constant input value.
    #[must_use]
    pub fn with_constant(mut self, constant: Option<bool>) -> Self {
        self.constant = constant;
        self
    }

    /// Mark the output as garbage.
    #[must_use]
    pub fn with_garbage(mut self, garbage: bool) -> Self {
        self.garbage = garbage;
        self
    }

    /// Whether this line is a constant helper line.
    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.input)?;
        if let Some(value) = self.constant {
            write!(f, " = {}", u8::from(value))?;
        }
        if self.garbage {
            write!(f, " [garbage]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_id_display() {
        assert_eq!(format!("{}", LineId(7)), "x7");
        assert_eq!(LineId::from(3).index(), 3);
    }

    #[test]
    fn test_line_display() {
        let line = Line::named(LineId(0), "a.0");
        assert_eq!(format!("{line}"), "x0 (a.0)");

        let helper = Line::named(LineId(4), "const_1")
            .with_constant(Some(true))
            .with_garbage(true);
        assert!(helper.is_constant());
        assert_eq!(format!("{helper}"), "x4 (const_1) = 1 [garbage]");
    }
}
