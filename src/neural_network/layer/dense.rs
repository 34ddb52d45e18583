use super::*;

/// Values produced by a dense forward pass and consumed by the matching backward pass
///
/// # Fields
///
/// - `input` - The `1 × input_dim` input row
/// - `output` - The `1 × output_dim` activation output
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCache {
    pub input: Tensor,
    pub output: Tensor,
}

/// Parameter gradients of a dense layer
///
/// # Fields
///
/// - `weights` - Gradient of the weight matrix, shape (input_dim, output_dim)
/// - `bias` - Gradient of the bias row, shape (1, output_dim)
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGradients {
    pub weights: Tensor,
    pub bias: Tensor,
}

/// Dense (Fully Connected) layer implementation for neural networks.
///
/// This layer performs a linear transformation of a single input row using a weight
/// matrix and bias row, followed by an activation function:
/// `output = activation(input · weights + bias)`.
///
/// Weights are drawn uniformly from `[-scale, scale]` using the generator passed to
/// the constructor; biases start at zero.
///
/// # Dimensions
///
/// - Input shape: (1, input_dim)
/// - Output shape: (1, output_dim)
///
/// # Fields
///
/// ## Core fields
/// - `input_dim` - Input dimension size
/// - `output_dim` - Output dimension size
/// - `weights` - Weight matrix with shape (input_dim, output_dim)
/// - `bias` - Bias row with shape (1, output_dim)
/// - `activation` - Activation function for the layer
///
/// ## Cache
/// - `cache` - Forward-pass context used by the next backward pass
/// - `gradients` - Gradients computed by the last backward pass, waiting to be applied
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use scratchnet::prelude::*;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let mut dense = Dense::new(2, 3, Sigmoid::new(), &mut rng).unwrap();
///
/// let y = dense.forward(&array![[1.0_f32, 0.5]]).unwrap();
/// assert_eq!(y.dim(), (1, 3));
///
/// let gx = dense.backward(&array![[0.1_f32, -0.2, 0.3]]).unwrap();
/// assert_eq!(gx.dim(), (1, 2));
/// dense.update_parameters_sgd(0.5).unwrap();
/// ```
pub struct Dense<T: Activation> {
    input_dim: usize,
    output_dim: usize,
    weights: Tensor,
    bias: Tensor,
    activation: T,
    cache: Option<DenseCache>,
    gradients: Option<DenseGradients>,
}

impl<T: Activation> Dense<T> {
    /// Creates a new dense layer with weights drawn from `[-1, 1]`.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - The size of each input row
    /// - `output_dim` - The number of output units
    /// - `activation` - Activation applied to the affine output
    /// - `rng` - Seedable random source used for weight initialisation
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - A new layer instance
    /// - `Err(ModelError::InputValidationError)` - If a dimension is 0
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        output_dim: usize,
        activation: T,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        Self::new_with_scale(input_dim, output_dim, activation, DEFAULT_INIT_SCALE, rng)
    }

    /// Creates a new dense layer with weights drawn from `[-init_scale, init_scale]`.
    pub fn new_with_scale<R: Rng + ?Sized>(
        input_dim: usize,
        output_dim: usize,
        activation: T,
        init_scale: f32,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_dimension_greater_than_zero(input_dim, "input_dim")?;
        validate_dimension_greater_than_zero(output_dim, "output_dim")?;

        let weights = tensor::random_fill(input_dim, output_dim, init_scale, rng)?;
        let bias = tensor::constant_fill(1, output_dim, 0.0);

        Ok(Dense {
            input_dim,
            output_dim,
            weights,
            bias,
            activation,
            cache: None,
            gradients: None,
        })
    }

    /// Returns the input dimension of the layer
    pub fn get_input_dim(&self) -> usize {
        self.input_dim
    }

    /// Returns the output dimension of the layer
    pub fn get_output_dim(&self) -> usize {
        self.output_dim
    }

    /// Sets the weights for this layer.
    ///
    /// # Parameters
    ///
    /// - `weights` - Weight matrix with shape (input_dim, output_dim)
    /// - `bias` - Bias row with shape (1, output_dim)
    pub fn set_weights(&mut self, weights: Tensor, bias: Tensor) -> Result<(), ModelError> {
        validate_parameter_shape(&weights, &self.weights, "Dense weights")?;
        validate_parameter_shape(&bias, &self.bias, "Dense bias")?;
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    /// Computes the layer output without touching any stored state.
    ///
    /// # Returns
    ///
    /// - `Ok((Tensor, DenseCache))` - The activation output and the context the backward pass needs
    /// - `Err(ModelError::ShapeMismatch)` - If `input` is not `1 × input_dim`
    pub fn forward_pass(&self, input: &Tensor) -> Result<(Tensor, DenseCache), ModelError> {
        validate_single_row(input, self.input_dim, "Dense")?;

        let z = tensor::add(&tensor::matmul(input, &self.weights)?, &self.bias)?;
        let output = self.activation.forward(&z);

        let cache = DenseCache {
            input: input.clone(),
            output: output.clone(),
        };
        Ok((output, cache))
    }

    /// Computes the input gradient and the parameter gradients for a forward context.
    ///
    /// # Returns
    ///
    /// - `Ok((Tensor, DenseGradients))` - Gradient for the previous layer and the parameter gradients
    /// - `Err(ModelError::ShapeMismatch)` - If `grad_output` does not match the cached output
    pub fn backward_pass(
        &self,
        cache: &DenseCache,
        grad_output: &Tensor,
    ) -> Result<(Tensor, DenseGradients), ModelError> {
        validate_gradient_shape(grad_output, cache.output.dim(), "Dense")?;

        // dL/dz = dL/da ⊙ σ'(a)
        let grad_z = tensor::multiply(grad_output, &self.activation.backward(&cache.output))?;

        let grad_input = tensor::matmul(&grad_z, &tensor::transpose(&self.weights))?;
        let grad_weights = tensor::matmul(&tensor::transpose(&cache.input), &grad_z)?;

        // A single input row means the bias gradient is grad_z itself
        Ok((
            grad_input,
            DenseGradients {
                weights: grad_weights,
                bias: grad_z,
            },
        ))
    }

    /// Applies `gradients` to the weights and bias in place with learning rate `lr`.
    pub fn apply_gradients(
        &mut self,
        gradients: &DenseGradients,
        lr: f32,
    ) -> Result<(), ModelError> {
        SGD::update_sgd_parameters(&mut self.weights, &gradients.weights, lr)?;
        SGD::update_sgd_parameters(&mut self.bias, &gradients.bias, lr)
    }
}

impl<T: Activation> Layer for Dense<T> {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let (output, cache) = self.forward_pass(input)?;
        self.cache = Some(cache);
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let cache = take_cache(&mut self.cache, "Dense")?;
        let (grad_input, gradients) = self.backward_pass(&cache, grad_output)?;
        self.gradients = Some(gradients);
        Ok(grad_input)
    }

    fn layer_type(&self) -> &str {
        "Dense"
    }

    fn output_shape(&self) -> String {
        format!("(1, {})", self.output_dim)
    }

    fn param_count(&self) -> TrainingParameters {
        // Parameter count = number of weight parameters + number of bias parameters
        TrainingParameters::Trainable(self.input_dim * self.output_dim + self.output_dim)
    }

    fn update_parameters_sgd(&mut self, lr: f32) -> Result<(), ModelError> {
        match self.gradients.take() {
            Some(gradients) => self.apply_gradients(&gradients, lr),
            None => Ok(()),
        }
    }

    fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::Dense(DenseLayerWeight {
            weight: &self.weights,
            bias: &self.bias,
        })
    }
}
