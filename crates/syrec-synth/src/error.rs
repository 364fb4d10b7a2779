//! Error types for synthesis.

use syrec_ir::IrError;
use thiserror::Error;

/// Errors that can occur while synthesizing a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// A variable access does not resolve to bound lines.
    #[error("Cannot resolve '{name}': {reason}")]
    UnresolvedVariable {
        /// The accessed name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// An expression shape the current strategy cannot encode.
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// An operator without an encoding on the current path.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// The operands of an assignment contain no repeated lines to fold.
    #[error("No repeated operands to fold")]
    RepeatCheckFailed,

    /// Call-tree scopes were entered and left unevenly.
    #[error("Scope imbalance: {0}")]
    ScopeImbalance(String),

    /// The requested module does not exist.
    #[error("Unknown module '{0}'")]
    UnknownModule(String),

    /// Two line vectors that must have equal length differ.
    #[error("Width mismatch: expected {expected} lines, got {got}")]
    WidthMismatch {
        /// Expected number of lines.
        expected: usize,
        /// Actual number of lines.
        got: usize,
    },

    /// A loop that cannot be unrolled.
    #[error("Invalid loop: {0}")]
    InvalidLoop(String),

    /// Error from the circuit builder.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),

    /// An error raised while synthesizing a statement of a module.
    #[error("In module '{module}', statement {index}: {source}")]
    InStatement {
        /// Module containing the statement.
        module: String,
        /// Zero-based position of the statement in the module body.
        index: usize,
        /// The underlying error.
        #[source]
        source: Box<SynthError>,
    },
}

impl SynthError {
    /// The innermost error, with statement context stripped.
    pub fn root_cause(&self) -> &SynthError {
        match self {
            SynthError::InStatement { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether a folding strategy may recover from this error by falling
    /// back to a more general encoding.
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SynthError::RepeatCheckFailed
                | SynthError::UnsupportedExpression(_)
                | SynthError::UnsupportedOperator(_)
        )
    }
}

/// Result type for synthesis.
pub type SynthResult<T> = Result<T, SynthError>;
