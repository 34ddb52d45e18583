use super::*;

/// Lifecycle of a recurrent layer over one sequence.
///
/// `Idle → Accumulating → Updated → (reset_state) → Idle`
///
/// # Variants
///
/// - `Idle` - Fresh or reset; hidden state is zero and history is empty
/// - `Accumulating` - At least one forward call has been recorded for the current sequence
/// - `Updated` - Gradients were applied; the layer must be reset before the next sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrentState {
    Idle,
    Accumulating,
    Updated,
}

/// Gradients of the five recurrent parameters, summed over a whole sequence
///
/// # Fields
///
/// - `input_kernel` - Gradient of the input-to-hidden matrix
/// - `recurrent_kernel` - Gradient of the hidden-to-hidden matrix
/// - `output_kernel` - Gradient of the hidden-to-output matrix
/// - `hidden_bias` - Gradient of the hidden bias row
/// - `output_bias` - Gradient of the output bias row
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentGradients {
    pub input_kernel: Tensor,
    pub recurrent_kernel: Tensor,
    pub output_kernel: Tensor,
    pub hidden_bias: Tensor,
    pub output_bias: Tensor,
}

impl RecurrentGradients {
    /// Returns a copy with every entry clamped to `[-threshold, threshold]`
    pub fn clip(&self, threshold: f32) -> RecurrentGradients {
        RecurrentGradients {
            input_kernel: tensor::clip(&self.input_kernel, threshold),
            recurrent_kernel: tensor::clip(&self.recurrent_kernel, threshold),
            output_kernel: tensor::clip(&self.output_kernel, threshold),
            hidden_bias: tensor::clip(&self.hidden_bias, threshold),
            output_bias: tensor::clip(&self.output_bias, threshold),
        }
    }

    /// Returns the largest absolute entry over all five gradients
    pub fn max_abs(&self) -> f32 {
        [
            &self.input_kernel,
            &self.recurrent_kernel,
            &self.output_kernel,
            &self.hidden_bias,
            &self.output_bias,
        ]
        .iter()
        .flat_map(|g| g.iter())
        .fold(0.0_f32, |acc, &v| acc.max(v.abs()))
    }
}

/// A Simple Recurrent Neural Network (SimpleRNN) layer trained with backpropagation through time.
///
/// The layer is fed one timestep at a time. Each call to [`SimpleRNN::forward`] computes
///
/// - `h_t = activation(h_{t-1} · Wh + x_t · Wx + bH)`
/// - `y_t = h_t · Wy + bY`
///
/// and appends `x_t`, `h_t` and `y_t` to the sequence history. [`SimpleRNN::backward`]
/// walks that history from the last timestep to the first and returns the summed
/// gradients without applying them; [`SimpleRNN::update`] applies them after clipping.
/// [`SimpleRNN::reset_state`] must be called between sequences.
///
/// # Dimensions
///
/// - Input shape per timestep: (1, input_dim)
/// - Output shape per timestep: (1, output_dim)
///
/// # Fields
///
/// ## Core fields
/// - `input_dim` - Number of input features
/// - `hidden_dim` - Number of hidden units
/// - `output_dim` - Number of output features
/// - `input_kernel` - Input-to-hidden matrix (shape: input_dim, hidden_dim)
/// - `recurrent_kernel` - Hidden-to-hidden matrix (shape: hidden_dim, hidden_dim)
/// - `output_kernel` - Hidden-to-output matrix (shape: hidden_dim, output_dim)
/// - `hidden_bias` - Hidden bias row (shape: 1, hidden_dim)
/// - `output_bias` - Output bias row (shape: 1, output_dim)
/// - `activation` - Activation applied to the hidden state
/// - `clip_threshold` - Bound applied to every gradient entry before an update
///
/// ## Sequence state
/// - `hidden_state` - Hidden state after the most recent forward call
/// - `input_history` - Inputs of the current sequence
/// - `hidden_history` - Hidden states of the current sequence
/// - `output_history` - Outputs of the current sequence
/// - `state` - Lifecycle position within the current sequence
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use scratchnet::prelude::*;
///
/// let mut rng = StdRng::seed_from_u64(11);
/// let mut rnn = SimpleRNN::new(1, 4, 1, Sigmoid::new(), &mut rng).unwrap();
///
/// let y1 = rnn.forward(&array![[0.1_f32]]).unwrap();
/// let y2 = rnn.forward(&array![[0.2_f32]]).unwrap();
///
/// let dys = vec![y1 - array![[0.2_f32]], y2 - array![[0.3_f32]]];
/// let grads = rnn.backward(&dys).unwrap();
/// rnn.update(&grads, 0.1).unwrap();
/// rnn.reset_state();
/// assert_eq!(rnn.sequence_len(), 0);
/// ```
pub struct SimpleRNN<T: Activation> {
    input_dim: usize,
    hidden_dim: usize,
    output_dim: usize,
    input_kernel: Tensor,
    recurrent_kernel: Tensor,
    output_kernel: Tensor,
    hidden_bias: Tensor,
    output_bias: Tensor,
    activation: T,
    clip_threshold: f32,
    hidden_state: Tensor,
    input_history: Vec<Tensor>,
    hidden_history: Vec<Tensor>,
    output_history: Vec<Tensor>,
    state: RecurrentState,
}

impl<T: Activation> SimpleRNN<T> {
    /// Creates a new SimpleRNN layer with weights drawn from `[-1, 1]`.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - The size of each input row
    /// - `hidden_dim` - The number of hidden units
    /// - `output_dim` - The size of each output row
    /// - `activation` - Activation applied to the hidden state
    /// - `rng` - Seedable random source used for weight initialisation
    ///
    /// # Returns
    ///
    /// - `Ok(SimpleRNN)` - A new layer in the `Idle` state with zero biases and clip threshold 1.0
    /// - `Err(ModelError::InputValidationError)` - If a dimension is 0
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        activation: T,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        Self::new_with_scale(
            input_dim,
            hidden_dim,
            output_dim,
            activation,
            DEFAULT_INIT_SCALE,
            rng,
        )
    }

    /// Creates a new SimpleRNN layer with weights drawn from `[-init_scale, init_scale]`.
    pub fn new_with_scale<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        activation: T,
        init_scale: f32,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, hidden_dim, output_dim)?;

        let input_kernel = tensor::random_fill(input_dim, hidden_dim, init_scale, rng)?;
        let recurrent_kernel = tensor::random_fill(hidden_dim, hidden_dim, init_scale, rng)?;
        let output_kernel = tensor::random_fill(hidden_dim, output_dim, init_scale, rng)?;

        Ok(SimpleRNN {
            input_dim,
            hidden_dim,
            output_dim,
            input_kernel,
            recurrent_kernel,
            output_kernel,
            hidden_bias: tensor::constant_fill(1, hidden_dim, 0.0),
            output_bias: tensor::constant_fill(1, output_dim, 0.0),
            activation,
            clip_threshold: DEFAULT_CLIP_THRESHOLD,
            hidden_state: tensor::constant_fill(1, hidden_dim, 0.0),
            input_history: Vec::new(),
            hidden_history: Vec::new(),
            output_history: Vec::new(),
            state: RecurrentState::Idle,
        })
    }

    /// Sets the bound applied to every gradient entry by [`SimpleRNN::update`].
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The threshold was stored
    /// - `Err(ModelError::InputValidationError)` - If `threshold` is not positive and finite
    pub fn set_clip_threshold(&mut self, threshold: f32) -> Result<(), ModelError> {
        validate_clip_threshold(threshold)?;
        self.clip_threshold = threshold;
        Ok(())
    }

    /// Returns the gradient clip threshold
    pub fn get_clip_threshold(&self) -> f32 {
        self.clip_threshold
    }

    /// Returns the input dimension of the layer
    pub fn get_input_dim(&self) -> usize {
        self.input_dim
    }

    /// Returns the number of hidden units
    pub fn get_hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Returns the output dimension of the layer
    pub fn get_output_dim(&self) -> usize {
        self.output_dim
    }

    /// Returns the hidden state after the most recent forward call
    pub fn get_hidden_state(&self) -> &Tensor {
        &self.hidden_state
    }

    /// Returns the lifecycle position of the current sequence
    pub fn get_state(&self) -> RecurrentState {
        self.state
    }

    /// Returns the outputs recorded for the current sequence
    pub fn get_output_history(&self) -> &[Tensor] {
        &self.output_history
    }

    /// Returns the number of forward calls recorded since the last reset
    pub fn sequence_len(&self) -> usize {
        self.input_history.len()
    }

    /// Sets the weights for this layer.
    ///
    /// # Parameters
    ///
    /// - `input_kernel` - Input-to-hidden matrix with shape (input_dim, hidden_dim)
    /// - `recurrent_kernel` - Hidden-to-hidden matrix with shape (hidden_dim, hidden_dim)
    /// - `output_kernel` - Hidden-to-output matrix with shape (hidden_dim, output_dim)
    /// - `hidden_bias` - Hidden bias row with shape (1, hidden_dim)
    /// - `output_bias` - Output bias row with shape (1, output_dim)
    pub fn set_weights(
        &mut self,
        input_kernel: Tensor,
        recurrent_kernel: Tensor,
        output_kernel: Tensor,
        hidden_bias: Tensor,
        output_bias: Tensor,
    ) -> Result<(), ModelError> {
        validate_parameter_shape(&input_kernel, &self.input_kernel, "SimpleRNN input_kernel")?;
        validate_parameter_shape(
            &recurrent_kernel,
            &self.recurrent_kernel,
            "SimpleRNN recurrent_kernel",
        )?;
        validate_parameter_shape(
            &output_kernel,
            &self.output_kernel,
            "SimpleRNN output_kernel",
        )?;
        validate_parameter_shape(&hidden_bias, &self.hidden_bias, "SimpleRNN hidden_bias")?;
        validate_parameter_shape(&output_bias, &self.output_bias, "SimpleRNN output_bias")?;

        self.input_kernel = input_kernel;
        self.recurrent_kernel = recurrent_kernel;
        self.output_kernel = output_kernel;
        self.hidden_bias = hidden_bias;
        self.output_bias = output_bias;
        Ok(())
    }

    /// Returns read-only references to the five parameter tensors
    pub fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::SimpleRNN(SimpleRNNLayerWeight {
            input_kernel: &self.input_kernel,
            recurrent_kernel: &self.recurrent_kernel,
            output_kernel: &self.output_kernel,
            hidden_bias: &self.hidden_bias,
            output_bias: &self.output_bias,
        })
    }

    /// Returns the number of trainable parameters
    pub fn param_count(&self) -> TrainingParameters {
        let kernels = self.input_dim * self.hidden_dim
            + self.hidden_dim * self.hidden_dim
            + self.hidden_dim * self.output_dim;
        TrainingParameters::Trainable(kernels + self.hidden_dim + self.output_dim)
    }

    /// Processes one timestep and records it in the sequence history.
    ///
    /// # Parameters
    ///
    /// - `input` - The `1 × input_dim` input of this timestep
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The `1 × output_dim` output of this timestep
    /// - `Err(ModelError::ShapeMismatch)` - If `input` has the wrong shape
    /// - `Err(ModelError::UninitializedState)` - If the layer was updated and not reset since
    pub fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        if self.state == RecurrentState::Updated {
            return Err(ModelError::UninitializedState(
                "SimpleRNN: reset_state must be called before starting a new sequence".to_string(),
            ));
        }
        validate_single_row(input, self.input_dim, "SimpleRNN")?;

        let z = tensor::add(
            &tensor::add(
                &tensor::matmul(&self.hidden_state, &self.recurrent_kernel)?,
                &tensor::matmul(input, &self.input_kernel)?,
            )?,
            &self.hidden_bias,
        )?;
        let hidden = self.activation.forward(&z);
        let output = tensor::add(
            &tensor::matmul(&hidden, &self.output_kernel)?,
            &self.output_bias,
        )?;

        self.input_history.push(input.clone());
        self.hidden_history.push(hidden.clone());
        self.output_history.push(output.clone());
        self.hidden_state = hidden;
        self.state = RecurrentState::Accumulating;

        Ok(output)
    }

    /// Backpropagates through every recorded timestep.
    ///
    /// `grad_outputs[t]` is the loss gradient with respect to the output of the `t`-th
    /// forward call. The returned gradients are summed over the whole sequence and are
    /// not applied; the layer itself is left untouched.
    ///
    /// # Returns
    ///
    /// - `Ok(RecurrentGradients)` - The accumulated gradients of all five parameters
    /// - `Err(ModelError::UninitializedState)` - If no forward call was recorded since the last reset,
    ///   or the sequence was already used for an update
    /// - `Err(ModelError::SequenceLengthMismatch)` - If the number of gradients differs from the
    ///   number of recorded forward calls
    /// - `Err(ModelError::ShapeMismatch)` - If a gradient is not `1 × output_dim`
    pub fn backward(&self, grad_outputs: &[Tensor]) -> Result<RecurrentGradients, ModelError> {
        if self.state != RecurrentState::Accumulating {
            return Err(ModelError::UninitializedState(
                "SimpleRNN: backward called without a forward pass since the last reset"
                    .to_string(),
            ));
        }
        validate_sequence_length(self.input_history.len(), grad_outputs.len())?;

        let mut grads = RecurrentGradients {
            input_kernel: tensor::constant_fill(self.input_dim, self.hidden_dim, 0.0),
            recurrent_kernel: tensor::constant_fill(self.hidden_dim, self.hidden_dim, 0.0),
            output_kernel: tensor::constant_fill(self.hidden_dim, self.output_dim, 0.0),
            hidden_bias: tensor::constant_fill(1, self.hidden_dim, 0.0),
            output_bias: tensor::constant_fill(1, self.output_dim, 0.0),
        };

        let zero_state = tensor::constant_fill(1, self.hidden_dim, 0.0);
        let output_kernel_t = tensor::transpose(&self.output_kernel);
        let recurrent_kernel_t = tensor::transpose(&self.recurrent_kernel);
        let mut grad_hidden_next = tensor::constant_fill(1, self.hidden_dim, 0.0);

        for t in (0..grad_outputs.len()).rev() {
            let grad_output = &grad_outputs[t];
            validate_gradient_shape(grad_output, (1, self.output_dim), "SimpleRNN")?;

            let hidden = &self.hidden_history[t];
            let hidden_prev = if t == 0 {
                &zero_state
            } else {
                &self.hidden_history[t - 1]
            };

            let grad_hidden = tensor::add(
                &tensor::matmul(grad_output, &output_kernel_t)?,
                &grad_hidden_next,
            )?;
            let grad_z = tensor::multiply(&grad_hidden, &self.activation.backward(hidden))?;

            grads.input_kernel += &tensor::matmul(
                &tensor::transpose(&self.input_history[t]),
                &grad_z,
            )?;
            grads.recurrent_kernel +=
                &tensor::matmul(&tensor::transpose(hidden_prev), &grad_z)?;
            grads.output_kernel += &tensor::matmul(&tensor::transpose(hidden), grad_output)?;
            grads.hidden_bias += &grad_z;
            grads.output_bias += grad_output;

            grad_hidden_next = tensor::matmul(&grad_z, &recurrent_kernel_t)?;
        }

        Ok(grads)
    }

    /// Clips `gradients` to the layer's threshold and applies them in place.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - All five parameters were updated and the layer moved to `Updated`
    /// - `Err(ModelError::UninitializedState)` - If the current sequence has no recorded forward
    ///   calls or was already used for an update
    /// - `Err(ModelError::ShapeMismatch)` - If a gradient does not match its parameter
    pub fn update(&mut self, gradients: &RecurrentGradients, lr: f32) -> Result<(), ModelError> {
        if self.state != RecurrentState::Accumulating {
            return Err(ModelError::UninitializedState(
                "SimpleRNN: update called outside an accumulated sequence".to_string(),
            ));
        }
        // Check every shape first so a bad gradient leaves all parameters untouched
        validate_parameter_shape(
            &gradients.input_kernel,
            &self.input_kernel,
            "input_kernel gradient",
        )?;
        validate_parameter_shape(
            &gradients.recurrent_kernel,
            &self.recurrent_kernel,
            "recurrent_kernel gradient",
        )?;
        validate_parameter_shape(
            &gradients.output_kernel,
            &self.output_kernel,
            "output_kernel gradient",
        )?;
        validate_parameter_shape(
            &gradients.hidden_bias,
            &self.hidden_bias,
            "hidden_bias gradient",
        )?;
        validate_parameter_shape(
            &gradients.output_bias,
            &self.output_bias,
            "output_bias gradient",
        )?;

        let clipped = gradients.clip(self.clip_threshold);
        SGD::update_sgd_parameters(&mut self.input_kernel, &clipped.input_kernel, lr)?;
        SGD::update_sgd_parameters(&mut self.recurrent_kernel, &clipped.recurrent_kernel, lr)?;
        SGD::update_sgd_parameters(&mut self.output_kernel, &clipped.output_kernel, lr)?;
        SGD::update_sgd_parameters(&mut self.hidden_bias, &clipped.hidden_bias, lr)?;
        SGD::update_sgd_parameters(&mut self.output_bias, &clipped.output_bias, lr)?;

        self.state = RecurrentState::Updated;
        Ok(())
    }

    /// Zeroes the hidden state, clears the sequence history and returns to `Idle`.
    pub fn reset_state(&mut self) {
        self.hidden_state.fill(0.0);
        self.input_history.clear();
        self.hidden_history.clear();
        self.output_history.clear();
        self.state = RecurrentState::Idle;
    }
}
