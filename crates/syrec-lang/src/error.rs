//! Error types for the SyReC parser.

use thiserror::Error;

/// Errors that can occur during parsing and semantic checking.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Reference to an undeclared variable or loop variable.
    #[error("Undefined identifier at line {line}: {name}")]
    UndefinedIdentifier { line: usize, name: String },

    /// Call or uncall of a module that has not been declared before.
    #[error("Unknown module at line {line}: {name}")]
    UnknownModule { line: usize, name: String },

    /// Variable, loop variable or module declared twice.
    #[error("Duplicate declaration at line {line}: {name}")]
    DuplicateDeclaration { line: usize, name: String },

    /// Wrong number of array indexes in a variable access.
    #[error("Variable '{name}' at line {line} needs {expected} indexes, got {got}")]
    IndexCount {
        line: usize,
        name: String,
        expected: usize,
        got: usize,
    },

    /// Constant array index or bit range outside the declaration.
    #[error("Access to '{name}' at line {line} is out of range: {message}")]
    OutOfRange {
        line: usize,
        name: String,
        message: String,
    },

    /// Operands of a swap or assignment differ in bit-width.
    #[error("Bit-width mismatch at line {line}: {lhs} vs {rhs}")]
    WidthMismatch { line: usize, lhs: u32, rhs: u32 },

    /// The assigned variable is also read by the right-hand side.
    #[error("Variable '{name}' at line {line} is assigned and read in one statement")]
    SelfReference { line: usize, name: String },

    /// Argument list does not match the called module's parameters.
    #[error("Call of '{module}' at line {line}: {message}")]
    ArgumentMismatch {
        line: usize,
        module: String,
        message: String,
    },

    /// Constant number expression that cannot be evaluated.
    #[error("Invalid number at line {line}: {message}")]
    InvalidNumber { line: usize, message: String },

    /// Generic parse error.
    #[error("Parse error: {0}")]
    Generic(String),
}

impl ParseError {
    /// Source line of the error, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::LexerError { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UndefinedIdentifier { line, .. }
            | ParseError::UnknownModule { line, .. }
            | ParseError::DuplicateDeclaration { line, .. }
            | ParseError::IndexCount { line, .. }
            | ParseError::OutOfRange { line, .. }
            | ParseError::WidthMismatch { line, .. }
            | ParseError::SelfReference { line, .. }
            | ParseError::ArgumentMismatch { line, .. }
            | ParseError::InvalidNumber { line, .. } => Some(*line),
            ParseError::UnexpectedEof(_) | ParseError::Generic(_) => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
