use crate::error::ModelError;
use crate::neural_network::neural_network_trait::LossFunction;
use crate::tensor::{self, Tensor};

/// Half Squared Error loss function
///
/// `L = ½ Σ (y_pred - y_true)²`. The factor ½ cancels the exponent, so the gradient
/// with respect to the prediction is simply `y_pred - y_true`.
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use scratchnet::neural_network::loss_function::HalfSquaredError;
/// use scratchnet::neural_network::neural_network_trait::LossFunction;
///
/// let loss_fn = HalfSquaredError::new();
///
/// let y_true = array![[1.0_f32, 0.0]];
/// let y_pred = array![[0.5_f32, 0.5]];
///
/// // ½ (0.25 + 0.25)
/// assert_eq!(loss_fn.compute_loss(&y_true, &y_pred).unwrap(), 0.25);
/// assert_eq!(loss_fn.compute_grad(&y_true, &y_pred).unwrap(), array![[-0.5_f32, 0.5]]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalfSquaredError;

impl HalfSquaredError {
    /// Creates a new instance of HalfSquaredError
    pub fn new() -> Self {
        Self
    }
}

impl LossFunction for HalfSquaredError {
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<f32, ModelError> {
        let diff = tensor::subtract(y_pred, y_true)?;
        Ok(0.5 * diff.iter().map(|d| d * d).sum::<f32>())
    }

    fn compute_grad(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor, ModelError> {
        tensor::subtract(y_pred, y_true)
    }
}
