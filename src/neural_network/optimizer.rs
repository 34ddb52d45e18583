use crate::error::ModelError;
use crate::neural_network::neural_network_trait::{Layer, Optimizer};
use crate::tensor::Tensor;

/// Input validation functions for optimizers
mod input_validation_function;
/// Stochastic Gradient Descent optimizer
pub mod sgd;

pub(crate) use input_validation_function::validate_learning_rate;
pub use sgd::*;
