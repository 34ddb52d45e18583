use crate::ModelError;
use ndarray::{Array, Array2, Axis, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;

/// Dense row-major 2-D tensor used throughout the crate
pub type Tensor = Array2<f32>;

/// Checks that two tensors have identical shapes for an elementwise operation
fn check_same_shape(a: &Tensor, b: &Tensor, op: &str) -> Result<(), ModelError> {
    if a.dim() != b.dim() {
        return Err(ModelError::ShapeMismatch(format!(
            "{} requires identical shapes, got {:?} and {:?}",
            op,
            a.dim(),
            b.dim()
        )));
    }
    Ok(())
}

/// Creates a tensor filled with values drawn uniformly from `[-scale, scale]`.
///
/// # Parameters
///
/// - `rows` - Number of rows
/// - `cols` - Number of columns
/// - `scale` - Half-width of the symmetric sampling range, must be finite and non-negative
/// - `rng` - Seedable random source the values are drawn from
///
/// # Returns
///
/// - `Ok(Tensor)` - A `rows × cols` tensor of random values
/// - `Err(ModelError::InputValidationError)` - If `scale` is negative or not finite
///
/// # Examples
/// ```rust
/// use ndarray_rand::rand::SeedableRng;
/// use ndarray_rand::rand::rngs::StdRng;
/// use scratchnet::tensor::random_fill;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let w = random_fill(3, 2, 0.5, &mut rng).unwrap();
/// assert_eq!(w.dim(), (3, 2));
/// assert!(w.iter().all(|v| v.abs() <= 0.5));
/// ```
pub fn random_fill<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    scale: f32,
    rng: &mut R,
) -> Result<Tensor, ModelError> {
    // The width of the range must be representable as well
    if !(2.0 * scale).is_finite() || scale < 0.0 {
        return Err(ModelError::InputValidationError(format!(
            "initialisation scale must be non-negative with a finite range, got {}",
            scale
        )));
    }
    Ok(Array::random_using(
        (rows, cols),
        Uniform::new_inclusive(-scale, scale),
        rng,
    ))
}

/// Creates a `rows × cols` tensor with every entry set to `value`.
pub fn constant_fill(rows: usize, cols: usize, value: f32) -> Tensor {
    Array2::from_elem((rows, cols), value)
}

/// Returns the transpose of `a` as a new, standard-layout tensor.
pub fn transpose(a: &Tensor) -> Tensor {
    a.t().as_standard_layout().into_owned()
}

/// Matrix product of `a` (`n × m`) and `b` (`m × p`).
///
/// The accumulation runs row index outermost, contraction index second and
/// output column innermost, starting from zero. Results are reproducible bit for bit.
///
/// # Returns
///
/// - `Ok(Tensor)` - The `n × p` product
/// - `Err(ModelError::ShapeMismatch)` - If `a.ncols() != b.nrows()`
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use scratchnet::tensor::matmul;
///
/// let c = matmul(&array![[1.0_f32, 2.0]], &array![[1.0_f32], [1.0]]).unwrap();
/// assert_eq!(c, array![[3.0_f32]]);
/// ```
pub fn matmul(a: &Tensor, b: &Tensor) -> Result<Tensor, ModelError> {
    let (n, m) = a.dim();
    let (bm, p) = b.dim();
    if m != bm {
        return Err(ModelError::ShapeMismatch(format!(
            "matmul requires left columns == right rows, got {:?} · {:?}",
            a.dim(),
            b.dim()
        )));
    }

    let mut result = Array2::<f32>::zeros((n, p));
    for i in 0..n {
        for k in 0..m {
            let a_ik = a[[i, k]];
            for j in 0..p {
                result[[i, j]] += a_ik * b[[k, j]];
            }
        }
    }
    Ok(result)
}

/// Elementwise (Hadamard) product of two equally shaped tensors.
pub fn multiply(a: &Tensor, b: &Tensor) -> Result<Tensor, ModelError> {
    check_same_shape(a, b, "multiply")?;
    Ok(Zip::from(a).and(b).map_collect(|&x, &y| x * y))
}

/// Elementwise sum of two equally shaped tensors.
pub fn add(a: &Tensor, b: &Tensor) -> Result<Tensor, ModelError> {
    check_same_shape(a, b, "add")?;
    Ok(Zip::from(a).and(b).map_collect(|&x, &y| x + y))
}

/// Elementwise difference `a - b` of two equally shaped tensors.
pub fn subtract(a: &Tensor, b: &Tensor) -> Result<Tensor, ModelError> {
    check_same_shape(a, b, "subtract")?;
    Ok(Zip::from(a).and(b).map_collect(|&x, &y| x - y))
}

/// Adds the `1 × cols` tensor `row` to every row of `a`.
///
/// # Returns
///
/// - `Ok(Tensor)` - `a` with `row` broadcast over its rows
/// - `Err(ModelError::ShapeMismatch)` - If `row` is not a single row of `a.ncols()` entries
pub fn add_row_broadcast(a: &Tensor, row: &Tensor) -> Result<Tensor, ModelError> {
    if row.nrows() != 1 || row.ncols() != a.ncols() {
        return Err(ModelError::ShapeMismatch(format!(
            "row broadcast requires a 1 × {} row, got {:?}",
            a.ncols(),
            row.dim()
        )));
    }
    Ok(a + row)
}

/// Multiplies every entry of `a` by `scalar`.
pub fn scale(a: &Tensor, scalar: f32) -> Tensor {
    a.mapv(|v| v * scalar)
}

/// Applies `f` to every entry of `a`.
pub fn map_elementwise<F>(a: &Tensor, f: F) -> Tensor
where
    F: Fn(f32) -> f32,
{
    a.mapv(f)
}

/// Sums `a` along `axis`, always returning a single row.
///
/// # Parameters
///
/// - `a` - Tensor to reduce
/// - `axis` - `Axis(0)` sums each column (result `1 × cols`), `Axis(1)` sums each row (result `1 × rows`)
///
/// # Returns
///
/// - `Ok(Tensor)` - The reduced row
/// - `Err(ModelError::InputValidationError)` - If `axis` is neither 0 nor 1
///
/// # Examples
/// ```rust
/// use ndarray::{array, Axis};
/// use scratchnet::tensor::reduce_sum;
///
/// let a = array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// assert_eq!(reduce_sum(&a, Axis(0)).unwrap(), array![[5.0_f32, 7.0, 9.0]]);
/// assert_eq!(reduce_sum(&a, Axis(1)).unwrap(), array![[6.0_f32, 15.0]]);
/// ```
pub fn reduce_sum(a: &Tensor, axis: Axis) -> Result<Tensor, ModelError> {
    match axis.index() {
        0 | 1 => Ok(a.sum_axis(axis).insert_axis(Axis(0))),
        other => Err(ModelError::InputValidationError(format!(
            "reduce_sum axis must be 0 or 1, got {}",
            other
        ))),
    }
}

/// Clamps every entry of `a` to `[-threshold, threshold]`. NaN entries stay NaN.
pub fn clip(a: &Tensor, threshold: f32) -> Tensor {
    a.mapv(|v| {
        if v.is_nan() {
            v
        } else {
            v.max(-threshold).min(threshold)
        }
    })
}

/// Validates a kernel against an input grid and returns the output grid size
fn output_grid(
    input_height: usize,
    input_width: usize,
    kernel_height: usize,
    kernel_width: usize,
) -> Result<(usize, usize), ModelError> {
    if kernel_height == 0 || kernel_width == 0 {
        return Err(ModelError::InputValidationError(
            "Kernel dimensions must be greater than 0".to_string(),
        ));
    }
    if kernel_height > input_height || kernel_width > input_width {
        return Err(ModelError::ShapeMismatch(format!(
            "kernel {}×{} does not fit into input {}×{}",
            kernel_height, kernel_width, input_height, input_width
        )));
    }
    Ok((
        input_height - kernel_height + 1,
        input_width - kernel_width + 1,
    ))
}

/// Unrolls every `kernel_height × kernel_width` window of `x` into a row (im2col).
///
/// Valid windows only, stride 1. Windows are visited in row-major raster order and
/// each window is flattened in row-major kernel order, so the result has
/// `(iH-kH+1)*(iW-kW+1)` rows and `kH*kW` columns.
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use scratchnet::tensor::extract_patches;
///
/// let x = array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let patches = extract_patches(&x, 2, 2).unwrap();
/// assert_eq!(patches, array![[1.0_f32, 2.0, 4.0, 5.0], [2.0, 3.0, 5.0, 6.0]]);
/// ```
pub fn extract_patches(
    x: &Tensor,
    kernel_height: usize,
    kernel_width: usize,
) -> Result<Tensor, ModelError> {
    let (input_height, input_width) = x.dim();
    let (output_height, output_width) =
        output_grid(input_height, input_width, kernel_height, kernel_width)?;

    let mut patches =
        Array2::<f32>::zeros((output_height * output_width, kernel_height * kernel_width));
    for i in 0..output_height {
        for j in 0..output_width {
            let row = i * output_width + j;
            for ky in 0..kernel_height {
                for kx in 0..kernel_width {
                    patches[[row, ky * kernel_width + kx]] = x[[i + ky, j + kx]];
                }
            }
        }
    }
    Ok(patches)
}

/// Folds a patch matrix back onto an `input_height × input_width` grid (col2im).
///
/// This is the adjoint of [`extract_patches`]: every patch entry is *added* to the
/// input cell it was read from, so cells shared by overlapping windows receive the
/// sum of all their contributions.
///
/// # Returns
///
/// - `Ok(Tensor)` - The accumulated `input_height × input_width` grid
/// - `Err(ModelError::ShapeMismatch)` - If `patches` is not `(oH*oW) × (kH*kW)`
pub fn scatter_patches(
    patches: &Tensor,
    input_height: usize,
    input_width: usize,
    kernel_height: usize,
    kernel_width: usize,
) -> Result<Tensor, ModelError> {
    let (output_height, output_width) =
        output_grid(input_height, input_width, kernel_height, kernel_width)?;
    let expected = (output_height * output_width, kernel_height * kernel_width);
    if patches.dim() != expected {
        return Err(ModelError::ShapeMismatch(format!(
            "patch matrix must be {:?} for a {}×{} input and {}×{} kernel, got {:?}",
            expected,
            input_height,
            input_width,
            kernel_height,
            kernel_width,
            patches.dim()
        )));
    }

    let mut grid = Array2::<f32>::zeros((input_height, input_width));
    for i in 0..output_height {
        for j in 0..output_width {
            let row = i * output_width + j;
            for ky in 0..kernel_height {
                for kx in 0..kernel_width {
                    grid[[i + ky, j + kx]] += patches[[row, ky * kernel_width + kx]];
                }
            }
        }
    }
    Ok(grid)
}
