use crate::error::ModelError;
use crate::neural_network::layer::layer_weight::*;
use crate::neural_network::neural_network_trait::{Activation, Layer};
use crate::neural_network::optimizer::SGD;
use crate::tensor::{self, Tensor};
use input_validation_function::*;
use ndarray::Axis;
use ndarray_rand::rand::Rng;

/// Describes whether a layer owns trainable parameters and how many.
///
/// The network uses this tag to decide whether a layer takes part in the
/// parameter update step.
///
/// # Variants
///
/// - `Trainable(usize)` - The layer owns this many trainable scalars
/// - `NoTrainable` - The layer only reshapes data and has nothing to update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingParameters {
    Trainable(usize),
    NoTrainable,
}

impl TrainingParameters {
    /// Returns `true` if the layer has parameters to update
    pub fn is_trainable(&self) -> bool {
        matches!(self, TrainingParameters::Trainable(_))
    }

    /// Returns the number of trainable scalars (0 for `NoTrainable`)
    pub fn count(&self) -> usize {
        match self {
            TrainingParameters::Trainable(count) => *count,
            TrainingParameters::NoTrainable => 0,
        }
    }
}

/// Half-width of the uniform range used to initialise weights
pub const DEFAULT_INIT_SCALE: f32 = 1.0;

/// Takes a forward-pass cache out of its slot, failing if forward has not run.
fn take_cache<T>(cache: &mut Option<T>, layer_name: &str) -> Result<T, ModelError> {
    cache.take().ok_or_else(|| {
        ModelError::UninitializedState(format!(
            "{}: backward called before forward pass",
            layer_name
        ))
    })
}

/// A macro that generates the parameter-related `Layer` methods for layers
/// without trainable parameters.
macro_rules! no_trainable_parameters_layer_functions {
    () => {
        fn param_count(&self) -> TrainingParameters {
            TrainingParameters::NoTrainable
        }

        fn update_parameters_sgd(&mut self, _lr: f32) -> Result<(), ModelError> {
            Ok(())
        }

        fn get_weights(&self) -> LayerWeight<'_> {
            LayerWeight::Empty
        }
    };
}

/// 2D convolutional layer built on sliding-window extraction
pub mod convolution_layer;
/// Dense (fully connected) layer
pub mod dense;
/// Shape-only layer turning a grid into a single row
pub mod flatten;
/// Input validation functions shared by all layers
mod input_validation_function;
/// Read-only views of layer parameters
pub mod layer_weight;
/// Recurrent layer trained with backpropagation through time
pub mod recurrent_layer;

pub use convolution_layer::*;
pub use dense::*;
pub use flatten::*;
pub use layer_weight::*;
pub use recurrent_layer::*;
