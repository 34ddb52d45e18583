use super::*;

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::InputValidationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Validates that a single-sample input has exactly one row of `expected_cols` entries
pub(super) fn validate_single_row(
    input: &Tensor,
    expected_cols: usize,
    layer_name: &str,
) -> Result<(), ModelError> {
    if input.dim() != (1, expected_cols) {
        return Err(ModelError::ShapeMismatch(format!(
            "{} expects input of shape (1, {}), got {:?}",
            layer_name,
            expected_cols,
            input.dim()
        )));
    }
    Ok(())
}

/// Validates that a gradient tensor matches the shape of the output it belongs to
pub(super) fn validate_gradient_shape(
    grad_output: &Tensor,
    expected: (usize, usize),
    layer_name: &str,
) -> Result<(), ModelError> {
    if grad_output.dim() != expected {
        return Err(ModelError::ShapeMismatch(format!(
            "{} expects output gradient of shape {:?}, got {:?}",
            layer_name,
            expected,
            grad_output.dim()
        )));
    }
    Ok(())
}

/// Validates that a replacement parameter tensor keeps the shape of the one it replaces
pub(super) fn validate_parameter_shape(
    new_value: &Tensor,
    current: &Tensor,
    name: &str,
) -> Result<(), ModelError> {
    if new_value.dim() != current.dim() {
        return Err(ModelError::ShapeMismatch(format!(
            "{} must have shape {:?}, got {:?}",
            name,
            current.dim(),
            new_value.dim()
        )));
    }
    Ok(())
}
