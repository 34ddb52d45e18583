use super::*;
use log::{debug, info};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;

/// Number of epochs between two progress reports of [`Network::train_all`]
pub const DEFAULT_LOG_INTERVAL: usize = 1000;

/// One training example: an input tensor and the target the network should produce for it
///
/// # Fields
///
/// - `input` - Input tensor fed to the first layer
/// - `target` - Expected output of the last layer
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Tensor,
    pub target: Tensor,
}

impl Sample {
    /// Creates a new sample from an input and its target
    pub fn new(input: Tensor, target: Tensor) -> Self {
        Sample { input, target }
    }
}

/// Description of one layer of a [`NetworkConfig`]. Every layer owning a
/// nonlinearity uses the sigmoid activation.
///
/// # Variants
///
/// - `Dense` - Fully connected layer mapping `1 × input_dim` to `1 × output_dim`
/// - `Conv2D` - Valid convolution of an `input_height × input_width` grid
/// - `Flatten` - Grid to row adapter
#[derive(Debug, Clone, PartialEq)]
pub enum LayerConfig {
    Dense {
        input_dim: usize,
        output_dim: usize,
    },
    Conv2D {
        input_height: usize,
        input_width: usize,
        kernel_height: usize,
        kernel_width: usize,
        filters: usize,
    },
    Flatten,
}

/// Construction parameters of a [`Network`]
///
/// # Fields
///
/// - `layers` - Layers in forward order
/// - `seed` - Seed of the generator used to initialise every layer
/// - `init_scale` - Weights are drawn uniformly from `[-init_scale, init_scale]`
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub layers: Vec<LayerConfig>,
    pub seed: u64,
    pub init_scale: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            layers: Vec::new(),
            seed: 0,
            init_scale: DEFAULT_INIT_SCALE,
        }
    }
}

/// Fails with `ShapeMismatch` if the layer at `index` cannot consume `previous`
fn check_layer_input(
    index: usize,
    previous: Option<(usize, usize)>,
    expected: (usize, usize),
) -> Result<(), ModelError> {
    match previous {
        Some(shape) if shape != expected => Err(ModelError::ShapeMismatch(format!(
            "Layer {} expects input of shape {:?}, previous layer produces {:?}",
            index, expected, shape
        ))),
        _ => Ok(()),
    }
}

/// A feed-forward neural network built by stacking layers.
///
/// Samples are single rows (or single grids for convolutional inputs); there is no
/// batching. Training uses the half squared error loss and plain SGD: after each layer's
/// backward pass, layers reporting trainable parameters apply their gradients in place.
///
/// # Fields
///
/// - `layers` - The layers in forward order, exclusively owned by the network
/// - `loss` - Loss used to seed the backward pass
/// - `log_interval` - Number of epochs between two progress reports (0 disables them)
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use scratchnet::prelude::*;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut network = Network::new();
/// network
///     .add(Dense::new(2, 3, Sigmoid::new(), &mut rng).unwrap())
///     .add(Dense::new(3, 1, Sigmoid::new(), &mut rng).unwrap());
///
/// let samples = vec![
///     Sample::new(array![[0.0_f32, 1.0]], array![[1.0_f32]]),
///     Sample::new(array![[1.0_f32, 1.0]], array![[0.0_f32]]),
/// ];
/// network.train_all(&samples, 10, 0.5).unwrap();
///
/// let prediction = network.predict(&array![[0.0_f32, 1.0]]).unwrap();
/// assert_eq!(prediction.dim(), (1, 1));
/// ```
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
    loss: HalfSquaredError,
    log_interval: usize,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Creates a new empty network
    pub fn new() -> Self {
        Network {
            layers: Vec::new(),
            loss: HalfSquaredError::new(),
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }

    /// Builds a network from a configuration, seeding one generator for all layers.
    ///
    /// # Parameters
    ///
    /// - `config` - Layer list, seed and initialisation scale
    ///
    /// # Returns
    ///
    /// - `Ok(Network)` - The initialised network
    /// - `Err(ModelError::InputValidationError)` - If the layer list is empty or a layer is invalid
    /// - `Err(ModelError::ShapeMismatch)` - If a layer does not accept the output of the previous one
    pub fn from_config(config: &NetworkConfig) -> Result<Self, ModelError> {
        if config.layers.is_empty() {
            return Err(ModelError::InputValidationError(
                "Layers not specified".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut network = Network::new();
        // Output shape of the last layer built so far; unknown until a layer fixes it
        let mut shape: Option<(usize, usize)> = None;
        for (index, layer_config) in config.layers.iter().enumerate() {
            match *layer_config {
                LayerConfig::Dense {
                    input_dim,
                    output_dim,
                } => {
                    check_layer_input(index, shape, (1, input_dim))?;
                    network.add(Dense::new_with_scale(
                        input_dim,
                        output_dim,
                        Sigmoid::new(),
                        config.init_scale,
                        &mut rng,
                    )?);
                    shape = Some((1, output_dim));
                }
                LayerConfig::Conv2D {
                    input_height,
                    input_width,
                    kernel_height,
                    kernel_width,
                    filters,
                } => {
                    check_layer_input(index, shape, (input_height, input_width))?;
                    let conv = Conv2D::new_with_scale(
                        filters,
                        (kernel_height, kernel_width),
                        (input_height, input_width),
                        Sigmoid::new(),
                        config.init_scale,
                        &mut rng,
                    )?;
                    let (output_height, output_width) = conv.get_output_grid();
                    shape = Some((output_height * output_width, filters));
                    network.add(conv);
                }
                LayerConfig::Flatten => {
                    network.add(Flatten::new());
                    shape = shape.map(|(rows, cols)| (1, rows * cols));
                }
            }
        }
        Ok(network)
    }

    /// Adds a layer to the end of the network
    ///
    /// Supports method chaining pattern
    ///
    /// # Parameters
    ///
    /// * `layer` - The layer to add to the network
    ///
    /// # Returns
    ///
    /// * `&mut Network` - Mutable reference to self for method chaining
    pub fn add<L: 'static + Layer>(&mut self, layer: L) -> &mut Self {
        debug!(
            "Adding layer {} ({}) with output shape {} and {} trainable parameters",
            self.layers.len(),
            layer.layer_type(),
            layer.output_shape(),
            layer.param_count().count()
        );
        self.layers.push(Box::new(layer));
        self
    }

    /// Sets the number of epochs between two progress reports of `train_all`; 0 disables them
    pub fn set_log_interval(&mut self, log_interval: usize) -> &mut Self {
        self.log_interval = log_interval;
        self
    }

    /// Returns the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the network has no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn validate_layers(&self) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InputValidationError(
                "Layers not specified".to_string(),
            ));
        }
        Ok(())
    }

    /// Threads `input` through every layer in order.
    ///
    /// Each layer keeps the context of this pass for a following backward pass.
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Output of the last layer
    /// - `Err(ModelError)` - If the network is empty or a layer rejects its input
    pub fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        self.validate_layers()?;

        let mut output = input.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Generates a prediction for one input.
    ///
    /// Identical to [`Network::forward`]; layer caches stay populated afterwards.
    pub fn predict(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        self.forward(input)
    }

    /// Performs one SGD step on a single sample
    ///
    /// # Parameters
    ///
    /// - `input` - Input tensor of the sample
    /// - `target` - Expected output of the sample
    /// - `lr` - Learning rate
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - Half squared error of the prediction made before the update
    /// - `Err(ModelError)` - If the learning rate is invalid or any shape does not match
    pub fn train_one(
        &mut self,
        input: &Tensor,
        target: &Tensor,
        lr: f32,
    ) -> Result<f32, ModelError> {
        let mut optimizer = SGD::new(lr)?;
        self.train_step(input, target, &mut optimizer)
    }

    fn train_step(
        &mut self,
        input: &Tensor,
        target: &Tensor,
        optimizer: &mut SGD,
    ) -> Result<f32, ModelError> {
        let output = self.forward(input)?;

        let loss_value = self.loss.compute_loss(target, &output)?;
        let mut grad = self.loss.compute_grad(target, &output)?;

        // Backward pass and parameter updates (iterate through layers in reverse)
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
            if layer.param_count().is_trainable() {
                optimizer.update(&mut **layer)?;
            }
        }

        Ok(loss_value)
    }

    /// Trains the network on every sample of `dataset` for `epochs` epochs.
    ///
    /// The summed half squared error of an epoch is reported through `log::info!` every
    /// `log_interval` epochs and once training completes.
    ///
    /// # Parameters
    ///
    /// - `dataset` - Training samples, visited in order every epoch
    /// - `epochs` - Number of passes over the dataset
    /// - `lr` - Learning rate
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Self)` - The trained network
    /// - `Err(ModelError::InputValidationError)` - If the dataset or the network is empty, or `lr` is invalid
    /// - `Err(ModelError)` - If a sample does not fit the network
    pub fn train_all(
        &mut self,
        dataset: &[Sample],
        epochs: usize,
        lr: f32,
    ) -> Result<&mut Self, ModelError> {
        self.validate_layers()?;
        if dataset.is_empty() {
            return Err(ModelError::InputValidationError(
                "Dataset cannot be empty".to_string(),
            ));
        }
        let mut optimizer = SGD::new(lr)?;

        let mut epoch_loss = 0.0;
        for epoch in 0..epochs {
            epoch_loss = 0.0;
            for sample in dataset {
                epoch_loss += self.train_step(&sample.input, &sample.target, &mut optimizer)?;
            }

            if self.log_interval > 0 && (epoch + 1) % self.log_interval == 0 {
                info!("Epoch {}/{} | Error: {:.6}", epoch + 1, epochs, epoch_loss);
            }
        }

        info!(
            "Neural network training completed: {} samples, {} epochs, final error {:.6}",
            dataset.len(),
            epochs,
            epoch_loss
        );

        Ok(self)
    }

    /// Returns a table describing every layer and the parameter totals
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("{:<28} {:<16} {:>10}", "Layer (type)", "Output Shape", "Param #"),
            "=".repeat(56),
        ];
        let mut trainable_param_count = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            let param_count = layer.param_count().count();
            trainable_param_count += param_count;
            lines.push(format!(
                "{:<28} {:<16} {:>10}",
                format!("Layer_{} ({})", i, layer.layer_type()),
                layer.output_shape(),
                param_count
            ));
        }
        lines.push("=".repeat(56));
        lines.push(format!("Trainable params: {}", trainable_param_count));
        lines.join("\n")
    }

    /// Returns all the weights from each layer in the network.
    ///
    /// # Returns
    ///
    /// * `Vec<LayerWeight>` - One entry per layer, in forward order:
    ///   - `LayerWeight::Dense` for Dense layers
    ///   - `LayerWeight::Conv2D` for Conv2D layers
    ///   - `LayerWeight::Empty` for Flatten layers
    pub fn get_weights(&self) -> Vec<LayerWeight<'_>> {
        self.layers.iter().map(|layer| layer.get_weights()).collect()
    }
}
