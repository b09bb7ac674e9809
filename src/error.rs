//! Error types for the Ember interpreter

use thiserror::Error;

/// Ember interpreter errors
///
/// Every variant is fatal: nothing in the pipeline retries or recovers, the
/// first error unwinds to whoever called into the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Parse errors
    /// A recognized statement form is missing a required keyword, delimiter
    /// or closing token
    ///
    /// **Triggered by:** `print 1`, `if (x { ... }`, `while (c) { x = 1 }`
    ///
    /// The position is kept for callers that want it; the message itself
    /// never mentions it.
    #[error("{message}")]
    SyntaxError {
        /// Line of the offending token (1-indexed)
        line: usize,
        /// Column of the offending token (1-indexed)
        col: usize,
        /// Error description
        message: String,
    },

    // Runtime errors
    /// Reference to a variable that is not bound in the current environment
    #[error("Undefined variable: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Call to a function that was never declared at top level
    #[error("Unknown function: {name}")]
    UndefinedFunction {
        /// Function name
        name: String,
    },

    /// Call with the wrong number of arguments
    #[error("Argument count mismatch in call to {name}: expected {expected}, got {got}")]
    ArgumentCountMismatch {
        /// Function name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Operator applied to an unsupported combination of operand types
    ///
    /// **Example:** `[1] + 1`, `"a" < "b"`, `1 - "x"`
    #[error("Invalid operands for operator: {op} ({left_type}, {right_type})")]
    InvalidOperands {
        /// Operator symbol
        op: String,
        /// Left operand type
        left_type: String,
        /// Right operand type
        right_type: String,
    },

    /// A value of the wrong shape where a specific one is required
    ///
    /// **Example:** `len(5)`, `x[0]` where `x` is a number, `for i = "a" to 3`
    #[error("Type error in {context}: expected {expected}, got {got}")]
    TypeError {
        /// What was being evaluated
        context: String,
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// Array index outside `0..length`
    #[error("Array index out of bounds: {index} for array of length {length}")]
    IndexOutOfBounds {
        /// Requested index (after truncation)
        index: i64,
        /// Array length
        length: usize,
    },

    /// Element assignment whose target is not `name[index]`
    #[error("Invalid assignment target: {message}")]
    InvalidAssignmentTarget {
        /// What was wrong with the target
        message: String,
    },

    /// Writing program output failed
    #[error("Output error: {0}")]
    Io(String),
}

impl Error {
    /// Create a syntax error at the given position
    pub fn syntax(line: usize, col: usize, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create a type error
    pub fn type_error(
        context: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Error::TypeError {
            context: context.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Source position (line, column) of the offending token, if known
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::SyntaxError { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }

    /// True for errors raised while parsing, false for runtime errors
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::SyntaxError { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for Ember operations
pub type Result<T> = std::result::Result<T, Error>;
