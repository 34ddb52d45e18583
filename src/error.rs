/// Error types that can occur while building, running or training a network
///
/// # Variants
///
/// - `ShapeMismatch` - Indicates that tensor operands have incompatible dimensions for the requested operation
/// - `SequenceLengthMismatch` - Indicates that a recurrent backward pass received a different number of gradients than forward calls were made
/// - `UninitializedState` - Indicates that a backward pass (or update) was requested without the forward state it depends on
/// - `InputValidationError` - Indicates that construction parameters or training arguments are invalid
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    ShapeMismatch(String),
    SequenceLengthMismatch { expected: usize, actual: usize },
    UninitializedState(String),
    InputValidationError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            ModelError::SequenceLengthMismatch { expected, actual } => write!(
                f,
                "Sequence length mismatch: expected {} gradients, got {}",
                expected, actual
            ),
            ModelError::UninitializedState(msg) => write!(f, "Uninitialized state: {}", msg),
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}
