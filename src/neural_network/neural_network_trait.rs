use crate::error::ModelError;
use crate::neural_network::layer::TrainingParameters;
use crate::neural_network::layer::layer_weight::LayerWeight;
use crate::tensor::Tensor;

/// Defines an elementwise activation function.
///
/// `backward` receives the *output* of `forward`, not its input: the local
/// derivative is expressed in terms of the activation value (for the sigmoid,
/// `σ'(z) = σ(z)(1 - σ(z))`). Every layer relies on this contract, so any new
/// activation must follow it to stay interchangeable.
pub trait Activation: Send + Sync {
    /// Applies the activation to every entry of the pre-activation tensor `z`.
    fn forward(&self, z: &Tensor) -> Tensor;

    /// Returns the local derivative evaluated from the activation output `a`.
    fn backward(&self, a: &Tensor) -> Tensor;

    /// Returns the name of the activation (e.g. "Sigmoid").
    fn name(&self) -> &str;
}

/// Defines the interface for neural network layers.
///
/// This trait provides the core functionality that all layers driven by
/// [`Network`](crate::neural_network::network::Network) must implement: forward and
/// backward propagation plus the in-place parameter update. Whether `update_parameters_sgd`
/// does anything is announced up front through [`Layer::param_count`], so callers never
/// need to inspect the concrete layer type.
pub trait Layer {
    /// Performs forward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `input` - The input tensor to the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The output tensor after forward computation
    /// - `Err(ModelError)` - If the input shape does not match the layer
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError>;

    /// Performs backward propagation through the layer.
    ///
    /// Consumes the context stored by the preceding `forward` call and keeps the
    /// parameter gradients until the next `update_parameters_sgd` call.
    ///
    /// # Parameters
    ///
    /// - `grad_output` - The gradient tensor from the next layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The gradient tensor to be passed to the previous layer
    /// - `Err(ModelError)` - If no forward pass preceded this call or the gradient has the wrong shape
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError>;

    /// Returns the type name of the layer (e.g. "Dense").
    fn layer_type(&self) -> &str {
        "Unknown"
    }

    /// Returns a description of the output shape of the layer.
    fn output_shape(&self) -> String {
        "Unknown".to_string()
    }

    /// Returns the number of trainable parameters, or `NoTrainable` for shape-only layers.
    fn param_count(&self) -> TrainingParameters;

    /// Applies the gradients computed by the last `backward` call with plain SGD.
    ///
    /// Does nothing when no gradients are pending.
    ///
    /// # Parameters
    ///
    /// - `_lr` - Learning rate for parameter updates
    fn update_parameters_sgd(&mut self, _lr: f32) -> Result<(), ModelError>;

    /// Returns read-only references to the layer's parameters.
    fn get_weights(&self) -> LayerWeight<'_>;
}

/// Defines the interface for loss functions used in training.
///
/// This trait provides methods to compute both the loss value and its gradient
/// with respect to the predicted values.
pub trait LossFunction {
    /// Computes the loss between true and predicted values.
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The scalar loss value
    /// - `Err(ModelError::ShapeMismatch)` - If the tensors differ in shape
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<f32, ModelError>;

    /// Computes the gradient of the loss with respect to the predictions.
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Gradient of the loss with respect to `y_pred`
    /// - `Err(ModelError::ShapeMismatch)` - If the tensors differ in shape
    fn compute_grad(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor, ModelError>;
}

/// Defines the interface for optimization algorithms.
///
/// This trait provides methods to update layer parameters during
/// the training process.
pub trait Optimizer {
    /// Updates the parameters of a layer according to the optimization algorithm.
    ///
    /// # Parameters
    ///
    /// - `layer` - The layer whose parameters should be updated
    fn update(&mut self, layer: &mut dyn Layer) -> Result<(), ModelError>;
}
