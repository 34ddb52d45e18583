use super::*;
use input_validation_function::*;

/// 2D Convolutional Layer
pub mod conv_2d;
/// Input validation functions for convolutional layers
mod input_validation_function;

pub use conv_2d::*;
