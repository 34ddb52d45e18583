pub use crate::error::ModelError;
pub use crate::neural_network::activation::*;
pub use crate::neural_network::layer::convolution_layer::*;
pub use crate::neural_network::layer::recurrent_layer::*;
pub use crate::neural_network::layer::{
    DEFAULT_INIT_SCALE, Dense, DenseCache, DenseGradients, Flatten, LayerWeight,
    TrainingParameters,
};
pub use crate::neural_network::loss_function::*;
pub use crate::neural_network::network::*;
pub use crate::neural_network::neural_network_trait::*;
pub use crate::neural_network::optimizer::SGD;
pub use crate::neural_network::recurrent_network::*;
pub use crate::tensor::Tensor;
pub use ndarray_rand::rand::SeedableRng;
pub use ndarray_rand::rand::rngs::StdRng;
