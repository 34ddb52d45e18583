use super::*;

#[test]
fn test_half_squared_error_loss() {
    let loss_fn = HalfSquaredError::new();
    let y_true = array![[1.0_f32, 0.0, 2.0]];
    let y_pred = array![[0.5_f32, 0.5, 4.0]];

    // 0.5 * (0.25 + 0.25 + 4.0)
    assert_relative_eq!(loss_fn.compute_loss(&y_true, &y_pred).unwrap(), 2.25);
    assert_relative_eq!(loss_fn.compute_loss(&y_true, &y_true).unwrap(), 0.0);
}

#[test]
fn test_half_squared_error_gradient_is_difference() {
    let loss_fn = HalfSquaredError::new();
    let y_true = array![[1.0_f32, 0.0, 2.0]];
    let y_pred = array![[0.5_f32, 0.5, 4.0]];

    assert_eq!(
        loss_fn.compute_grad(&y_true, &y_pred).unwrap(),
        array![[-0.5_f32, 0.5, 2.0]]
    );
}

#[test]
fn test_half_squared_error_shape_mismatch() {
    let loss_fn = HalfSquaredError::new();
    let y_true = Array2::<f32>::zeros((1, 2));
    let y_pred = Array2::<f32>::zeros((1, 3));

    assert!(matches!(
        loss_fn.compute_loss(&y_true, &y_pred),
        Err(ModelError::ShapeMismatch(_))
    ));
    assert!(matches!(
        loss_fn.compute_grad(&y_true, &y_pred),
        Err(ModelError::ShapeMismatch(_))
    ));
}
