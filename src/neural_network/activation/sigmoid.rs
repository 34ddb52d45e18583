use crate::neural_network::neural_network_trait::Activation;
use crate::tensor::{Tensor, map_elementwise};

/// Min input clipping value to prevent overflow in exp function
const INPUT_CLIP_MIN: f32 = -500.0;

/// Max input clipping value to prevent overflow in exp function
const INPUT_CLIP_MAX: f32 = 500.0;

/// Logistic sigmoid activation.
///
/// Applies `1 / (1 + e^(-x))` element-wise, squashing values to (0, 1). The
/// derivative is computed from the activation output as `a * (1 - a)`.
///
/// # Examples
///
/// ```rust
/// use ndarray::array;
/// use scratchnet::neural_network::activation::Sigmoid;
/// use scratchnet::neural_network::neural_network_trait::Activation;
///
/// let sigmoid = Sigmoid::new();
/// let a = sigmoid.forward(&array![[0.0_f32]]);
/// assert_eq!(a, array![[0.5_f32]]);
/// assert_eq!(sigmoid.backward(&a), array![[0.25_f32]]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Sigmoid {
    /// Creates a new Sigmoid activation.
    pub fn new() -> Self {
        Sigmoid
    }
}

impl Activation for Sigmoid {
    fn forward(&self, z: &Tensor) -> Tensor {
        map_elementwise(z, |x| {
            let clipped_x = x.clamp(INPUT_CLIP_MIN, INPUT_CLIP_MAX);
            1.0 / (1.0 + (-clipped_x).exp())
        })
    }

    fn backward(&self, a: &Tensor) -> Tensor {
        map_elementwise(a, |out| out * (1.0 - out))
    }

    fn name(&self) -> &str {
        "Sigmoid"
    }
}
