use crate::tensor::Tensor;

/// Container for the parameters of the different layer types
///
/// Each variant borrows the parameter tensors of one layer type, letting callers
/// inspect a network's weights without being able to alias them mutably.
///
/// # Variants
///
/// - `Dense` - Weights for dense (fully connected) layers
/// - `SimpleRNN` - Weights for recurrent layers
/// - `Conv2D` - Weights for convolutional layers
/// - `Empty` - A layer with no trainable parameters
pub enum LayerWeight<'a> {
    Dense(DenseLayerWeight<'a>),
    SimpleRNN(SimpleRNNLayerWeight<'a>),
    Conv2D(Conv2DLayerWeight<'a>),
    Empty,
}

/// Weights for a dense (fully connected) layer
///
/// # Fields
///
/// - `weight` - Weight matrix with shape (input_dim, output_dim)
/// - `bias` - Bias row with shape (1, output_dim)
pub struct DenseLayerWeight<'a> {
    pub weight: &'a Tensor,
    pub bias: &'a Tensor,
}

/// Weights for a recurrent layer
///
/// # Fields
///
/// - `input_kernel` - Input-to-hidden matrix with shape (input_dim, hidden_dim)
/// - `recurrent_kernel` - Hidden-to-hidden matrix with shape (hidden_dim, hidden_dim)
/// - `output_kernel` - Hidden-to-output matrix with shape (hidden_dim, output_dim)
/// - `hidden_bias` - Hidden bias row with shape (1, hidden_dim)
/// - `output_bias` - Output bias row with shape (1, output_dim)
pub struct SimpleRNNLayerWeight<'a> {
    pub input_kernel: &'a Tensor,
    pub recurrent_kernel: &'a Tensor,
    pub output_kernel: &'a Tensor,
    pub hidden_bias: &'a Tensor,
    pub output_bias: &'a Tensor,
}

/// Weights for a 2D convolutional layer
///
/// # Fields
///
/// - `weight` - Kernel matrix with shape (kernel_height * kernel_width, filters)
/// - `bias` - Bias row with shape (1, filters)
pub struct Conv2DLayerWeight<'a> {
    pub weight: &'a Tensor,
    pub bias: &'a Tensor,
}
