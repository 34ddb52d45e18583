use super::*;

fn fixed_dense() -> Dense<Sigmoid> {
    let mut dense = Dense::new(2, 1, Sigmoid::new(), &mut StdRng::seed_from_u64(0)).unwrap();
    dense
        .set_weights(array![[0.5_f32], [-0.5]], array![[0.1_f32]])
        .unwrap();
    dense
}

#[test]
fn test_dense_forward_pass_dimensions() {
    let mut dense = Dense::new(4, 3, Sigmoid::new(), &mut StdRng::seed_from_u64(1)).unwrap();
    let input = Array2::ones((1, 4));

    let output = dense.forward(&input).unwrap();
    assert_eq!(output.dim(), (1, 3));
    for value in output.iter() {
        assert!(
            *value > 0.0 && *value < 1.0,
            "Sigmoid output should be in (0,1) range: {}",
            value
        );
    }
}

#[test]
fn test_dense_forward_known_values() {
    let dense = fixed_dense();
    let (output, cache) = dense.forward_pass(&array![[1.0_f32, 2.0]]).unwrap();

    // z = 1 * 0.5 + 2 * (-0.5) + 0.1
    let expected = 1.0 / (1.0 + 0.4_f32.exp());
    assert_relative_eq!(output[[0, 0]], expected, epsilon = 1e-6);
    assert_eq!(cache.input, array![[1.0_f32, 2.0]]);
    assert_eq!(cache.output, output);
}

#[test]
fn test_dense_backward_known_values() {
    let dense = fixed_dense();
    let (output, cache) = dense.forward_pass(&array![[1.0_f32, 2.0]]).unwrap();
    let (grad_input, grads) = dense.backward_pass(&cache, &array![[1.0_f32]]).unwrap();

    let y = output[[0, 0]];
    let gz = y * (1.0 - y);
    assert_relative_eq!(grad_input[[0, 0]], 0.5 * gz, epsilon = 1e-6);
    assert_relative_eq!(grad_input[[0, 1]], -0.5 * gz, epsilon = 1e-6);
    assert_relative_eq!(grads.weights[[0, 0]], gz, epsilon = 1e-6);
    assert_relative_eq!(grads.weights[[1, 0]], 2.0 * gz, epsilon = 1e-6);
    assert_relative_eq!(grads.bias[[0, 0]], gz, epsilon = 1e-6);
}

#[test]
fn test_dense_apply_gradients_in_place() {
    let mut dense = fixed_dense();
    let grads = DenseGradients {
        weights: array![[1.0_f32], [2.0]],
        bias: array![[-1.0_f32]],
    };
    dense.apply_gradients(&grads, 0.1).unwrap();

    if let LayerWeight::Dense(weights) = dense.get_weights() {
        assert_relative_eq!(weights.weight[[0, 0]], 0.4, epsilon = 1e-6);
        assert_relative_eq!(weights.weight[[1, 0]], -0.7, epsilon = 1e-6);
        assert_relative_eq!(weights.bias[[0, 0]], 0.2, epsilon = 1e-6);
    } else {
        panic!("Expected Dense weights");
    }
}

#[test]
fn test_dense_layer_trait_matches_explicit_passes() {
    let input = array![[0.3_f32, -0.7]];
    let grad_output = array![[0.6_f32]];

    let mut explicit = fixed_dense();
    let (_, cache) = explicit.forward_pass(&input).unwrap();
    let (expected_grad_input, grads) = explicit.backward_pass(&cache, &grad_output).unwrap();
    explicit.apply_gradients(&grads, 0.5).unwrap();

    let mut stateful = fixed_dense();
    stateful.forward(&input).unwrap();
    let grad_input = stateful.backward(&grad_output).unwrap();
    stateful.update_parameters_sgd(0.5).unwrap();
    // Pending gradients are consumed by the first update
    stateful.update_parameters_sgd(0.5).unwrap();

    assert_eq!(grad_input, expected_grad_input);
    match (explicit.get_weights(), stateful.get_weights()) {
        (LayerWeight::Dense(a), LayerWeight::Dense(b)) => {
            assert_eq!(a.weight, b.weight);
            assert_eq!(a.bias, b.bias);
        }
        _ => panic!("Expected Dense weights"),
    }
}

#[test]
fn test_dense_input_gradient_matches_finite_difference() {
    let dense = Dense::new(3, 2, Sigmoid::new(), &mut StdRng::seed_from_u64(5)).unwrap();
    let input = array![[0.2_f32, -0.4, 0.9]];
    let probe = array![[0.7_f32, -1.3]];

    let (_, cache) = dense.forward_pass(&input).unwrap();
    let (grad_input, grads) = dense.backward_pass(&cache, &probe).unwrap();

    for j in 0..3 {
        let numeric = numeric_partial(&input, (0, j), 1e-2, |x| {
            weighted_sum(&dense.forward_pass(x).unwrap().0, &probe)
        });
        assert_abs_diff_eq!(grad_input[[0, j]], numeric, epsilon = 1e-3);
    }

    // dL/dW[i][j] = x[i] * gz[j], and gz is the bias gradient
    for i in 0..3 {
        for j in 0..2 {
            assert_relative_eq!(
                grads.weights[[i, j]],
                input[[0, i]] * grads.bias[[0, j]],
                epsilon = 1e-6
            );
        }
    }
}

#[test]
fn test_dense_rejects_wrong_input_shape() {
    let mut dense = Dense::new(2, 3, Sigmoid::new(), &mut StdRng::seed_from_u64(1)).unwrap();

    assert!(matches!(
        dense.forward(&Array2::ones((1, 3))),
        Err(ModelError::ShapeMismatch(_))
    ));
    // Batches are not supported
    assert!(matches!(
        dense.forward(&Array2::ones((2, 2))),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_dense_rejects_wrong_gradient_shape() {
    let mut dense = Dense::new(2, 3, Sigmoid::new(), &mut StdRng::seed_from_u64(1)).unwrap();
    dense.forward(&Array2::ones((1, 2))).unwrap();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 2))),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_dense_backward_before_forward() {
    let mut dense = Dense::new(2, 3, Sigmoid::new(), &mut StdRng::seed_from_u64(1)).unwrap();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 3))),
        Err(ModelError::UninitializedState(_))
    ));
}

#[test]
fn test_dense_backward_consumes_cache() {
    let mut dense = Dense::new(2, 1, Sigmoid::new(), &mut StdRng::seed_from_u64(1)).unwrap();
    dense.forward(&Array2::ones((1, 2))).unwrap();
    dense.backward(&Array2::ones((1, 1))).unwrap();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 1))),
        Err(ModelError::UninitializedState(_))
    ));
}

#[test]
fn test_dense_invalid_construction() {
    let mut rng = StdRng::seed_from_u64(1);

    assert!(matches!(
        Dense::new(0, 3, Sigmoid::new(), &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        Dense::new(3, 0, Sigmoid::new(), &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        Dense::new_with_scale(3, 2, Sigmoid::new(), -0.5, &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_dense_set_weights_rejects_wrong_shape() {
    let mut dense = fixed_dense();

    assert!(matches!(
        dense.set_weights(array![[1.0_f32, 2.0]], array![[0.0_f32]]),
        Err(ModelError::ShapeMismatch(_))
    ));
    assert!(matches!(
        dense.set_weights(array![[1.0_f32], [2.0]], array![[0.0_f32, 0.0]]),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_dense_metadata_and_initialisation() {
    let dense = Dense::new(2, 3, Sigmoid::new(), &mut StdRng::seed_from_u64(8)).unwrap();
    let same_seed = Dense::new(2, 3, Sigmoid::new(), &mut StdRng::seed_from_u64(8)).unwrap();

    assert_eq!(dense.layer_type(), "Dense");
    assert_eq!(dense.output_shape(), "(1, 3)");
    assert_eq!(dense.param_count(), TrainingParameters::Trainable(9));
    assert_eq!(dense.get_input_dim(), 2);
    assert_eq!(dense.get_output_dim(), 3);

    match (dense.get_weights(), same_seed.get_weights()) {
        (LayerWeight::Dense(a), LayerWeight::Dense(b)) => {
            assert_eq!(a.weight, b.weight);
            assert!(a.weight.iter().all(|v| v.abs() <= DEFAULT_INIT_SCALE));
            assert!(a.bias.iter().all(|&v| v == 0.0));
        }
        _ => panic!("Expected Dense weights"),
    }
}
