use super::*;

/// Validates the filters parameter.
///
/// # Errors
///
/// Returns `ModelError::InputValidationError` if filters is 0.
pub(super) fn validate_filters(filters: usize) -> Result<(), ModelError> {
    if filters == 0 {
        return Err(ModelError::InputValidationError(
            "Number of filters must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates kernel size for 2D convolution.
///
/// # Errors
///
/// Returns `ModelError::InputValidationError` if any dimension is 0.
pub(super) fn validate_kernel_size_2d(kernel_size: (usize, usize)) -> Result<(), ModelError> {
    if kernel_size.0 == 0 || kernel_size.1 == 0 {
        return Err(ModelError::InputValidationError(
            "Kernel dimensions must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates that the kernel fits inside the configured input grid.
///
/// # Errors
///
/// Returns `ModelError::InputValidationError` if the input grid is empty or smaller than the kernel.
pub(super) fn validate_input_grid(
    input_shape: (usize, usize),
    kernel_size: (usize, usize),
) -> Result<(), ModelError> {
    if input_shape.0 == 0 || input_shape.1 == 0 {
        return Err(ModelError::InputValidationError(
            "Input dimensions must be greater than 0".to_string(),
        ));
    }
    if kernel_size.0 > input_shape.0 || kernel_size.1 > input_shape.1 {
        return Err(ModelError::InputValidationError(format!(
            "Kernel {:?} does not fit into input {:?}",
            kernel_size, input_shape
        )));
    }
    Ok(())
}

/// Validates that a forward input has the configured grid shape.
///
/// # Errors
///
/// Returns `ModelError::ShapeMismatch` if the shapes differ.
pub(super) fn validate_input_shape_2d(
    input: &Tensor,
    input_shape: (usize, usize),
) -> Result<(), ModelError> {
    if input.dim() != input_shape {
        return Err(ModelError::ShapeMismatch(format!(
            "Conv2D expects input of shape {:?}, got {:?}",
            input_shape,
            input.dim()
        )));
    }
    Ok(())
}
