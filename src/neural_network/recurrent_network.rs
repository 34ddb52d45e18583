use super::*;
use crate::neural_network::optimizer::validate_learning_rate;
use log::{debug, info};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;

/// One training sequence with a target for every timestep
///
/// # Fields
///
/// - `inputs` - Per-timestep inputs, each `1 × input_dim`
/// - `targets` - Per-timestep targets, each `1 × output_dim`
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSample {
    pub inputs: Vec<Tensor>,
    pub targets: Vec<Tensor>,
}

impl SequenceSample {
    /// Creates a new sequence sample
    pub fn new(inputs: Vec<Tensor>, targets: Vec<Tensor>) -> Self {
        SequenceSample { inputs, targets }
    }
}

/// Construction parameters of a [`RecurrentNetwork`]
///
/// # Fields
///
/// - `input_dim` - Size of each input row
/// - `hidden_dim` - Number of hidden units
/// - `output_dim` - Size of each output row
/// - `clip_threshold` - Bound applied to every gradient entry before an update
/// - `seed` - Seed of the generator used for weight initialisation
/// - `init_scale` - Weights are drawn uniformly from `[-init_scale, init_scale]`
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentNetworkConfig {
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub clip_threshold: f32,
    pub seed: u64,
    pub init_scale: f32,
}

impl Default for RecurrentNetworkConfig {
    fn default() -> Self {
        RecurrentNetworkConfig {
            input_dim: 1,
            hidden_dim: 8,
            output_dim: 1,
            clip_threshold: DEFAULT_CLIP_THRESHOLD,
            seed: 0,
            init_scale: DEFAULT_INIT_SCALE,
        }
    }
}

/// Sequence driver around a sigmoid [`SimpleRNN`] layer.
///
/// Every call that consumes a sequence starts from a reset layer, so sequences never
/// share hidden state. Training seeds the half squared error gradient `y_t - t_t` for each
/// timestep, backpropagates through time, applies the clipped update and resets.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use scratchnet::prelude::*;
///
/// let config = RecurrentNetworkConfig { hidden_dim: 4, seed: 5, ..Default::default() };
/// let mut network = RecurrentNetwork::from_config(&config).unwrap();
///
/// let inputs = vec![array![[0.1_f32]], array![[0.2_f32]], array![[0.3_f32]]];
/// let targets = vec![array![[0.2_f32]], array![[0.3_f32]], array![[0.4_f32]]];
/// let loss = network.train_one(&inputs, &targets, 0.1).unwrap();
/// assert!(loss.is_finite());
///
/// let outputs = network.predict(&inputs).unwrap();
/// assert_eq!(outputs.len(), 3);
/// ```
pub struct RecurrentNetwork {
    layer: SimpleRNN<Sigmoid>,
    loss: HalfSquaredError,
    log_interval: usize,
}

impl RecurrentNetwork {
    /// Wraps an existing recurrent layer. The layer is reset first.
    pub fn new(mut layer: SimpleRNN<Sigmoid>) -> Self {
        layer.reset_state();
        RecurrentNetwork {
            layer,
            loss: HalfSquaredError::new(),
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }

    /// Builds the network from a configuration
    ///
    /// # Returns
    ///
    /// - `Ok(RecurrentNetwork)` - The initialised network
    /// - `Err(ModelError::InputValidationError)` - If a dimension is 0 or the clip threshold is invalid
    pub fn from_config(config: &RecurrentNetworkConfig) -> Result<Self, ModelError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut layer = SimpleRNN::new_with_scale(
            config.input_dim,
            config.hidden_dim,
            config.output_dim,
            Sigmoid::new(),
            config.init_scale,
            &mut rng,
        )?;
        layer.set_clip_threshold(config.clip_threshold)?;
        debug!(
            "Built SimpleRNN {} -> {} -> {} with {} trainable parameters",
            config.input_dim,
            config.hidden_dim,
            config.output_dim,
            layer.param_count().count()
        );
        Ok(Self::new(layer))
    }

    /// Sets the number of epochs between two progress reports of `train_all`; 0 disables them
    pub fn set_log_interval(&mut self, log_interval: usize) -> &mut Self {
        self.log_interval = log_interval;
        self
    }

    /// Returns the wrapped recurrent layer
    pub fn get_layer(&self) -> &SimpleRNN<Sigmoid> {
        &self.layer
    }

    /// Resets the layer and feeds every timestep of `inputs`.
    ///
    /// The recorded history stays in the layer until the next reset.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Tensor>)` - One output per timestep
    /// - `Err(ModelError)` - If the sequence is empty or an input has the wrong shape
    pub fn forward(&mut self, inputs: &[Tensor]) -> Result<Vec<Tensor>, ModelError> {
        if inputs.is_empty() {
            return Err(ModelError::InputValidationError(
                "Input sequence cannot be empty".to_string(),
            ));
        }
        self.layer.reset_state();
        inputs.iter().map(|x| self.layer.forward(x)).collect()
    }

    /// Generates one prediction per timestep of `inputs`
    pub fn predict(&mut self, inputs: &[Tensor]) -> Result<Vec<Tensor>, ModelError> {
        let outputs = self.forward(inputs)?;
        self.layer.reset_state();
        Ok(outputs)
    }

    /// Performs one BPTT update on a single sequence
    ///
    /// # Parameters
    ///
    /// - `inputs` - Per-timestep inputs
    /// - `targets` - Per-timestep targets, one for every input
    /// - `lr` - Learning rate
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - Half squared error summed over the sequence, measured before the update
    /// - `Err(ModelError::SequenceLengthMismatch)` - If `targets` and `inputs` differ in length
    /// - `Err(ModelError)` - If the learning rate is invalid or a shape does not match
    pub fn train_one(
        &mut self,
        inputs: &[Tensor],
        targets: &[Tensor],
        lr: f32,
    ) -> Result<f32, ModelError> {
        validate_learning_rate(lr)?;
        if inputs.len() != targets.len() {
            return Err(ModelError::SequenceLengthMismatch {
                expected: inputs.len(),
                actual: targets.len(),
            });
        }

        let outputs = self.forward(inputs)?;

        let mut loss_value = 0.0;
        let mut grad_outputs = Vec::with_capacity(outputs.len());
        for (output, target) in outputs.iter().zip(targets) {
            loss_value += self.loss.compute_loss(target, output)?;
            grad_outputs.push(self.loss.compute_grad(target, output)?);
        }

        let gradients = self.layer.backward(&grad_outputs)?;
        self.layer.update(&gradients, lr)?;
        self.layer.reset_state();

        Ok(loss_value)
    }

    /// Trains on every sequence of `dataset` for `epochs` epochs.
    ///
    /// The summed error of an epoch is reported through `log::info!` every `log_interval`
    /// epochs and once training completes.
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Self)` - The trained network
    /// - `Err(ModelError::InputValidationError)` - If the dataset is empty or `lr` is invalid
    /// - `Err(ModelError)` - If a sequence does not fit the network
    pub fn train_all(
        &mut self,
        dataset: &[SequenceSample],
        epochs: usize,
        lr: f32,
    ) -> Result<&mut Self, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::InputValidationError(
                "Dataset cannot be empty".to_string(),
            ));
        }
        validate_learning_rate(lr)?;

        let mut epoch_loss = 0.0;
        for epoch in 0..epochs {
            epoch_loss = 0.0;
            for sample in dataset {
                epoch_loss += self.train_one(&sample.inputs, &sample.targets, lr)?;
            }

            if self.log_interval > 0 && (epoch + 1) % self.log_interval == 0 {
                info!("Epoch {}/{} | Error: {:.6}", epoch + 1, epochs, epoch_loss);
            }
        }

        info!(
            "Recurrent network training completed: {} sequences, {} epochs, final error {:.6}",
            dataset.len(),
            epochs,
            epoch_loss
        );

        Ok(self)
    }
}
