//! A small from-scratch neural network engine on dense 2-D tensors.
//!
//! Every sample is a single row (or a single grid for convolutional inputs). Layers run
//! their own forward and backward passes and update their parameters in place with plain
//! stochastic gradient descent; there is no computation graph and no batching.

/// Error type returned by every fallible operation
pub mod error;

/// Module `tensor` contains the dense 2-D tensor type and the algebra built on it.
///
/// # Core Functions
///
/// ## Construction
/// - `random_fill` - Uniform random tensor drawn from a caller-supplied generator
/// - `constant_fill` - Tensor with every entry set to one value
///
/// ## Linear Algebra
/// - `matmul` - Matrix product
/// - `transpose` - Matrix transpose
/// - `multiply`, `add`, `subtract` - Elementwise binary operations
/// - `add_row_broadcast` - Adds one row to every row of a tensor
/// - `scale`, `map_elementwise`, `clip` - Elementwise unary operations
/// - `reduce_sum` - Sums along an axis into a single row
///
/// ## Sliding Windows
/// - `extract_patches` - Unrolls every kernel window into a row (im2col)
/// - `scatter_patches` - Overlap-add inverse of `extract_patches` (col2im)
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use scratchnet::tensor::{matmul, transpose};
///
/// let a = array![[1.0_f32, 2.0]];
/// assert_eq!(matmul(&a, &transpose(&a)).unwrap(), array![[5.0_f32]]);
/// ```
pub mod tensor;

/// Module `neural_network` provides the layers and the network drivers.
///
/// # Components
///
/// ## Layers
/// - **Dense**: Fully connected layer
/// - **SimpleRNN**: Recurrent layer trained with backpropagation through time
/// - **Conv2D**: Single-channel valid convolution, stride 1
/// - **Flatten**: Grid to row adapter
///
/// ## Training
/// - **Sigmoid**: Logistic activation
/// - **HalfSquaredError**: Loss whose gradient is `prediction - target`
/// - **SGD**: In-place stochastic gradient descent
///
/// ## Drivers
/// - **Network**: Feed-forward stack of layers
/// - **RecurrentNetwork**: Sequence driver around a `SimpleRNN`
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use scratchnet::prelude::*;
///
/// let config = NetworkConfig {
///     layers: vec![
///         LayerConfig::Dense { input_dim: 2, output_dim: 2 },
///         LayerConfig::Dense { input_dim: 2, output_dim: 1 },
///     ],
///     seed: 42,
///     ..Default::default()
/// };
/// let mut network = Network::from_config(&config).unwrap();
///
/// let dataset = vec![Sample::new(array![[1.0_f32, 0.0]], array![[1.0_f32]])];
/// network.train_all(&dataset, 100, 0.5).unwrap();
///
/// let prediction = network.predict(&array![[1.0_f32, 0.0]]).unwrap();
/// assert!(prediction[[0, 0]] > 0.5);
/// ```
pub mod neural_network;

/// Re-exports of the types needed to build and train a network
pub mod prelude;

pub use error::ModelError;
