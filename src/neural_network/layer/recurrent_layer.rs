use super::*;
use input_validation_function::*;

/// Input validation functions for Recurrent layers
mod input_validation_function;
/// A Simple Recurrent Neural Network (SimpleRNN) layer implementation
pub mod simple_rnn;

pub use simple_rnn::*;

/// Clip threshold applied to recurrent gradients when none is configured
pub const DEFAULT_CLIP_THRESHOLD: f32 = 1.0;
