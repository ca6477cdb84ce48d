//! Error types for tapegrad.

use thiserror::Error;

/// Result type alias using [`AutogradError`].
pub type Result<T> = std::result::Result<T, AutogradError>;

/// Errors that can occur while building or differentiating a computation.
///
/// All failures are synchronous and abort the operation in progress.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AutogradError {
    /// An operand was neither a variable nor a plain number.
    #[error("invalid operand type: expected {expected}, got {found}")]
    InvalidOperandType {
        expected: &'static str,
        found: &'static str,
    },

    /// An operator was built with the wrong number of operands.
    #[error("{operator} takes exactly {expected} operands, got {actual}")]
    ArityViolation {
        operator: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Backward was invoked inside a no-grad scope.
    #[error("cannot compute gradients while grad mode is disabled (inside a no_grad scope?)")]
    GradDisabled,

    /// Index dimensionality or reduction target is incompatible with the shape.
    #[error("shape violation: {message}")]
    ShapeViolation { message: String },

    /// Two shapes that must agree do not.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {dim_size}")]
    IndexOutOfBounds { index: usize, dim_size: usize },

    /// The operation is deliberately not supported.
    #[error("operation `{operation}` is not implemented")]
    Unimplemented { operation: &'static str },
}

impl AutogradError {
    pub(crate) fn shape_violation(message: impl Into<String>) -> Self {
        Self::ShapeViolation {
            message: message.into(),
        }
    }
}
