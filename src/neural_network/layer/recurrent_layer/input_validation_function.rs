use super::*;

/// Validates the dimensions of a recurrent layer
///
/// # Parameters
///
/// - `input_dim` - The input dimension to validate
/// - `hidden_dim` - The hidden state dimension to validate
/// - `output_dim` - The output dimension to validate
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_recurrent_dimensions(
    input_dim: usize,
    hidden_dim: usize,
    output_dim: usize,
) -> Result<(), ModelError> {
    validate_dimension_greater_than_zero(input_dim, "input_dim")?;
    validate_dimension_greater_than_zero(hidden_dim, "hidden_dim")?;
    validate_dimension_greater_than_zero(output_dim, "output_dim")?;
    Ok(())
}

/// Validates that a gradient clip threshold is positive and finite
pub(super) fn validate_clip_threshold(threshold: f32) -> Result<(), ModelError> {
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(ModelError::InputValidationError(format!(
            "clip threshold must be positive and finite, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Validates that one output gradient was supplied per recorded timestep
pub(super) fn validate_sequence_length(
    expected: usize,
    actual: usize,
) -> Result<(), ModelError> {
    if expected != actual {
        return Err(ModelError::SequenceLengthMismatch { expected, actual });
    }
    Ok(())
}
