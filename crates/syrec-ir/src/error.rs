//! Error types for the IR crate.

use crate::gate::GateKind;
use crate::line::LineId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Line not found in circuit.
    #[error("Line {line} not found in circuit with {num_lines} lines")]
    LineNotFound {
        /// The line that was not found.
        line: LineId,
        /// Number of lines in the circuit.
        num_lines: usize,
    },

    /// A line is used both as control and as target of one gate.
    #[error("Line {0} is both control and target of a gate")]
    ControlTargetOverlap(LineId),

    /// A line appears twice among the targets of one gate.
    #[error("Duplicate target {0} in gate")]
    DuplicateTarget(LineId),

    /// Gate has the wrong number of targets for its kind.
    #[error("Gate '{}' requires {expected} targets, got {got}", .kind.name())]
    TargetCountMismatch {
        /// The gate kind.
        kind: GateKind,
        /// Expected number of targets.
        expected: usize,
        /// Actual number of targets.
        got: usize,
    },

    /// Simulation input does not cover every line.
    #[error("Input pattern has {got} bits, circuit has {expected} lines")]
    InputLengthMismatch {
        /// Number of lines in the circuit.
        expected: usize,
        /// Length of the supplied pattern.
        got: usize,
    },

    /// Line counter exceeded `u32::MAX`.
    #[error("Too many lines in circuit")]
    TooManyLines,

    /// Serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
