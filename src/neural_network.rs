/// Module that contains activation function implementations
pub mod activation;
/// Module that contains neural network layer implementations
pub mod layer;
/// Module that contains loss function implementations
pub mod loss_function;
/// Module that contains the feed-forward network driver
pub mod network;
/// Module that contains the traits shared by layers, activations, losses and optimizers
pub mod neural_network_trait;
/// Module that contains optimization algorithms for neural network training
pub mod optimizer;
/// Module that contains the sequence driver for recurrent layers
pub mod recurrent_network;

pub use activation::*;
pub use layer::*;
pub use loss_function::*;
pub use network::*;
pub use neural_network_trait::*;
pub use optimizer::*;
pub use recurrent_network::*;

pub use crate::error::ModelError;
pub use crate::tensor::Tensor;
