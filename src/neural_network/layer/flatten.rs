use super::*;
use ndarray::{Array2, ShapeError};

/// Layer that turns a 2D grid into a single row.
///
/// The layer is typically placed between a convolutional layer and a dense layer.
/// The forward pass concatenates the rows of its input in row-major order; the backward
/// pass slices the gradient row back into the grid shape recorded by the last forward pass.
///
/// # Input shape
///
/// Any `rows × cols` grid
///
/// # Output shape
///
/// A single row of `rows * cols` entries
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use scratchnet::prelude::*;
///
/// let mut flatten = Flatten::new();
/// let row = flatten.forward(&array![[1.0_f32, 2.0], [3.0, 4.0]]).unwrap();
/// assert_eq!(row, array![[1.0_f32, 2.0, 3.0, 4.0]]);
///
/// let grid = flatten.backward(&array![[0.1_f32, 0.2, 0.3, 0.4]]).unwrap();
/// assert_eq!(grid, array![[0.1_f32, 0.2], [0.3, 0.4]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Flatten {
    grid_shape: Option<(usize, usize)>,
}

fn shape_error(err: ShapeError) -> ModelError {
    ModelError::ShapeMismatch(format!("Flatten: {}", err))
}

impl Flatten {
    /// Creates a new Flatten layer
    pub fn new() -> Self {
        Flatten { grid_shape: None }
    }

    /// Returns the grid shape recorded by the last forward pass, if any
    pub fn get_grid_shape(&self) -> Option<(usize, usize)> {
        self.grid_shape
    }

    /// Flattens `input` into one row and returns the grid shape needed to undo it.
    pub fn forward_pass(input: &Tensor) -> Result<(Tensor, (usize, usize)), ModelError> {
        let grid_shape = input.dim();
        let row = Array2::from_shape_vec(
            (1, grid_shape.0 * grid_shape.1),
            input.iter().copied().collect(),
        )
        .map_err(shape_error)?;
        Ok((row, grid_shape))
    }

    /// Slices a gradient row back into a `grid_shape` grid.
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The gradient with the shape of the original input
    /// - `Err(ModelError::ShapeMismatch)` - If `grad_output` is not `1 × rows * cols`
    pub fn backward_pass(
        grid_shape: (usize, usize),
        grad_output: &Tensor,
    ) -> Result<Tensor, ModelError> {
        validate_gradient_shape(grad_output, (1, grid_shape.0 * grid_shape.1), "Flatten")?;
        Array2::from_shape_vec(grid_shape, grad_output.iter().copied().collect())
            .map_err(shape_error)
    }
}

impl Layer for Flatten {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let (row, grid_shape) = Self::forward_pass(input)?;
        self.grid_shape = Some(grid_shape);
        Ok(row)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let grid_shape = self.grid_shape.ok_or_else(|| {
            ModelError::UninitializedState(
                "Flatten: backward called before forward pass".to_string(),
            )
        })?;
        Self::backward_pass(grid_shape, grad_output)
    }

    fn layer_type(&self) -> &str {
        "Flatten"
    }

    fn output_shape(&self) -> String {
        match self.grid_shape {
            Some((rows, cols)) => format!("(1, {})", rows * cols),
            None => String::from("Unknown"),
        }
    }

    no_trainable_parameters_layer_functions!();
}
