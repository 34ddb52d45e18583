use super::*;
use ndarray::Zip;

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// A simple optimization algorithm that updates parameters in the direction
/// of the negative gradient, scaled by the learning rate.
///
/// # Fields
///
/// * `learning_rate` - Learning rate controlling the size of parameter updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for parameter updates
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new SGD optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If the learning rate is not positive and finite
    pub fn new(learning_rate: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }

    /// Returns the learning rate of this optimizer
    pub fn get_learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Updates a parameter tensor in place: `param -= lr * grad`.
    ///
    /// The tensor keeps its allocation; only its entries change.
    ///
    /// # Parameters
    ///
    /// - `param` - Parameter tensor to update
    /// - `grad` - Gradient with the same shape as `param`
    /// - `lr` - Learning rate
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The parameter was updated
    /// - `Err(ModelError::ShapeMismatch)` - If `grad` does not match `param`
    pub fn update_sgd_parameters(
        param: &mut Tensor,
        grad: &Tensor,
        lr: f32,
    ) -> Result<(), ModelError> {
        if param.dim() != grad.dim() {
            return Err(ModelError::ShapeMismatch(format!(
                "gradient of shape {:?} cannot update parameter of shape {:?}",
                grad.dim(),
                param.dim()
            )));
        }
        Zip::from(param).and(grad).for_each(|p, &g| {
            *p -= g * lr;
        });
        Ok(())
    }
}

impl Optimizer for SGD {
    fn update(&mut self, layer: &mut dyn Layer) -> Result<(), ModelError> {
        // Directly call the layer's parameter update method
        layer.update_parameters_sgd(self.learning_rate)
    }
}
