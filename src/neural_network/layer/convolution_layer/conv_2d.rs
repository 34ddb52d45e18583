use super::*;

/// Values produced by a convolution forward pass
///
/// # Fields
///
/// - `input` - The input grid
/// - `patches` - The unrolled windows of the input, one row per output position
/// - `output` - The activation output, one row per output position and one column per filter
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2DCache {
    pub input: Tensor,
    pub patches: Tensor,
    pub output: Tensor,
}

/// Parameter gradients of a convolutional layer
///
/// # Fields
///
/// - `weights` - Gradient of the kernel matrix, shape (kernel_height * kernel_width, filters)
/// - `bias` - Gradient of the bias row, shape (1, filters)
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2DGradients {
    pub weights: Tensor,
    pub bias: Tensor,
}

/// A 2D convolutional layer for single-channel grids.
///
/// The convolution is computed as a plain matrix product over the unrolled windows of
/// the input ([`tensor::extract_patches`]): valid windows only, stride 1, no padding.
/// Each filter is one column of the kernel matrix.
///
/// # Fields
///
/// - `filters` - Number of convolution filters
/// - `kernel_size` - Size of the convolution kernel as (height, width)
/// - `input_shape` - Size of the input grid as (height, width)
/// - `weights` - Kernel matrix with shape (kernel_height * kernel_width, filters)
/// - `bias` - Bias row with shape (1, filters)
/// - `activation` - Activation applied to every output position
/// - `cache` - Forward-pass context used by the next backward pass
/// - `gradients` - Gradients waiting to be applied
///
/// # Shape Information
///
/// Input shape: (height, width)
/// Output shape: (output_height * output_width, filters) with
/// `output_height = height - kernel_height + 1` and `output_width = width - kernel_width + 1`
///
/// # Example
/// ```rust
/// use ndarray::Array2;
/// use scratchnet::prelude::*;
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let mut conv = Conv2D::new(2, (2, 2), (3, 3), Sigmoid::new(), &mut rng).unwrap();
///
/// let output = conv.forward(&Array2::ones((3, 3))).unwrap();
/// // 2×2 output positions, 2 filters
/// assert_eq!(output.dim(), (4, 2));
/// ```
pub struct Conv2D<T: Activation> {
    filters: usize,
    kernel_size: (usize, usize),
    input_shape: (usize, usize),
    weights: Tensor,
    bias: Tensor,
    activation: T,
    cache: Option<Conv2DCache>,
    gradients: Option<Conv2DGradients>,
}

impl<T: Activation> Conv2D<T> {
    /// Creates a new 2D convolutional layer with weights drawn from `[-1, 1]`.
    ///
    /// # Parameters
    ///
    /// - `filters` - Number of convolution filters
    /// - `kernel_size` - Size of the convolution kernel as (height, width)
    /// - `input_shape` - Size of the input grid as (height, width)
    /// - `activation` - Activation applied to the convolution output
    /// - `rng` - Seedable random source used for weight initialisation
    ///
    /// # Returns
    ///
    /// - `Ok(Conv2D)` - A new layer instance. Biases start at zero.
    /// - `Err(ModelError::InputValidationError)` - If a size is 0 or the kernel is larger than the input
    pub fn new<R: Rng + ?Sized>(
        filters: usize,
        kernel_size: (usize, usize),
        input_shape: (usize, usize),
        activation: T,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        Self::new_with_scale(
            filters,
            kernel_size,
            input_shape,
            activation,
            DEFAULT_INIT_SCALE,
            rng,
        )
    }

    /// Creates a new 2D convolutional layer with weights drawn from `[-init_scale, init_scale]`.
    pub fn new_with_scale<R: Rng + ?Sized>(
        filters: usize,
        kernel_size: (usize, usize),
        input_shape: (usize, usize),
        activation: T,
        init_scale: f32,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_filters(filters)?;
        validate_kernel_size_2d(kernel_size)?;
        validate_input_grid(input_shape, kernel_size)?;

        let weights =
            tensor::random_fill(kernel_size.0 * kernel_size.1, filters, init_scale, rng)?;
        let bias = tensor::constant_fill(1, filters, 0.0);

        Ok(Conv2D {
            filters,
            kernel_size,
            input_shape,
            weights,
            bias,
            activation,
            cache: None,
            gradients: None,
        })
    }

    /// Returns the number of filters
    pub fn get_filters(&self) -> usize {
        self.filters
    }

    /// Returns the kernel size as (height, width)
    pub fn get_kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    /// Returns the output grid size as (height, width)
    pub fn get_output_grid(&self) -> (usize, usize) {
        (
            self.input_shape.0 - self.kernel_size.0 + 1,
            self.input_shape.1 - self.kernel_size.1 + 1,
        )
    }

    /// Sets the weights for this layer.
    ///
    /// # Parameters
    ///
    /// - `weights` - Kernel matrix with shape (kernel_height * kernel_width, filters)
    /// - `bias` - Bias row with shape (1, filters)
    pub fn set_weights(&mut self, weights: Tensor, bias: Tensor) -> Result<(), ModelError> {
        validate_parameter_shape(&weights, &self.weights, "Conv2D weights")?;
        validate_parameter_shape(&bias, &self.bias, "Conv2D bias")?;
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    /// Computes the convolution output without touching any stored state.
    ///
    /// # Returns
    ///
    /// - `Ok((Tensor, Conv2DCache))` - The activation output and the backward context
    /// - `Err(ModelError::ShapeMismatch)` - If `input` does not have the configured grid shape
    pub fn forward_pass(&self, input: &Tensor) -> Result<(Tensor, Conv2DCache), ModelError> {
        validate_input_shape_2d(input, self.input_shape)?;

        let patches = tensor::extract_patches(input, self.kernel_size.0, self.kernel_size.1)?;
        let z = tensor::add_row_broadcast(&tensor::matmul(&patches, &self.weights)?, &self.bias)?;
        let output = self.activation.forward(&z);

        let cache = Conv2DCache {
            input: input.clone(),
            patches,
            output: output.clone(),
        };
        Ok((output, cache))
    }

    /// Computes the input gradient and the parameter gradients for a forward context.
    ///
    /// # Returns
    ///
    /// - `Ok((Tensor, Conv2DGradients))` - Gradient with the shape of the input grid and the parameter gradients
    /// - `Err(ModelError::ShapeMismatch)` - If `grad_output` does not match the cached output
    pub fn backward_pass(
        &self,
        cache: &Conv2DCache,
        grad_output: &Tensor,
    ) -> Result<(Tensor, Conv2DGradients), ModelError> {
        validate_gradient_shape(grad_output, cache.output.dim(), "Conv2D")?;

        let grad_z = tensor::multiply(grad_output, &self.activation.backward(&cache.output))?;

        let grad_patches = tensor::matmul(&grad_z, &tensor::transpose(&self.weights))?;
        let grad_weights = tensor::matmul(&tensor::transpose(&cache.patches), &grad_z)?;
        // Every output position shares the bias row
        let grad_bias = tensor::reduce_sum(&grad_z, Axis(0))?;

        let (input_height, input_width) = cache.input.dim();
        let grad_input = tensor::scatter_patches(
            &grad_patches,
            input_height,
            input_width,
            self.kernel_size.0,
            self.kernel_size.1,
        )?;

        Ok((
            grad_input,
            Conv2DGradients {
                weights: grad_weights,
                bias: grad_bias,
            },
        ))
    }

    /// Applies `gradients` to the kernel and bias in place with learning rate `lr`.
    pub fn apply_gradients(
        &mut self,
        gradients: &Conv2DGradients,
        lr: f32,
    ) -> Result<(), ModelError> {
        SGD::update_sgd_parameters(&mut self.weights, &gradients.weights, lr)?;
        SGD::update_sgd_parameters(&mut self.bias, &gradients.bias, lr)
    }
}

impl<T: Activation> Layer for Conv2D<T> {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let (output, cache) = self.forward_pass(input)?;
        self.cache = Some(cache);
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let cache = take_cache(&mut self.cache, "Conv2D")?;
        let (grad_input, gradients) = self.backward_pass(&cache, grad_output)?;
        self.gradients = Some(gradients);
        Ok(grad_input)
    }

    fn layer_type(&self) -> &str {
        "Conv2D"
    }

    fn output_shape(&self) -> String {
        let (output_height, output_width) = self.get_output_grid();
        format!("({}, {})", output_height * output_width, self.filters)
    }

    fn param_count(&self) -> TrainingParameters {
        TrainingParameters::Trainable(
            self.kernel_size.0 * self.kernel_size.1 * self.filters + self.filters,
        )
    }

    fn update_parameters_sgd(&mut self, lr: f32) -> Result<(), ModelError> {
        match self.gradients.take() {
            Some(gradients) => self.apply_gradients(&gradients, lr),
            None => Ok(()),
        }
    }

    fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::Conv2D(Conv2DLayerWeight {
            weight: &self.weights,
            bias: &self.bias,
        })
    }
}
