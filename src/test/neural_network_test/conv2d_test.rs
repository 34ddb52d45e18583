use super::*;

fn sample_grid() -> Tensor {
    array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]
}

fn seeded_conv(filters: usize, seed: u64) -> Conv2D<Sigmoid> {
    Conv2D::new(
        filters,
        (2, 2),
        (3, 3),
        Sigmoid::new(),
        &mut StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

#[test]
fn test_conv2d_output_shape() {
    let mut conv = seeded_conv(3, 0);
    let output = conv.forward(&sample_grid()).unwrap();

    assert_eq!(output.dim(), (4, 3));
    assert_eq!(conv.get_output_grid(), (2, 2));
    assert_eq!(conv.output_shape(), "(4, 3)");
}

#[test]
fn test_conv2d_forward_known_values() {
    let mut conv = seeded_conv(1, 0);
    // Diagonal kernel: top-left + bottom-right of every window
    conv.set_weights(array![[1.0_f32], [0.0], [0.0], [1.0]], array![[-10.0_f32]])
        .unwrap();

    let (output, cache) = conv.forward_pass(&sample_grid()).unwrap();
    let expected = Sigmoid::new().forward(&array![[-4.0_f32], [-2.0], [2.0], [4.0]]);

    assert_eq!(
        cache.patches,
        tensor::extract_patches(&sample_grid(), 2, 2).unwrap()
    );
    for (a, b) in output.iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn test_conv2d_bias_gradient_sums_positions() {
    let conv = seeded_conv(2, 3);
    let (output, cache) = conv.forward_pass(&sample_grid()).unwrap();
    let grad_output = array![[0.1_f32, -0.2], [0.3, 0.4], [-0.5, 0.6], [0.7, -0.8]];

    let (_, grads) = conv.backward_pass(&cache, &grad_output).unwrap();

    let grad_z = tensor::multiply(&grad_output, &Sigmoid::new().backward(&output)).unwrap();
    let expected = tensor::reduce_sum(&grad_z, Axis(0)).unwrap();
    assert_eq!(grads.bias.dim(), (1, 2));
    for (a, b) in grads.bias.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn test_conv2d_gradients_match_finite_difference() {
    let mut rng = StdRng::seed_from_u64(17);
    let conv = Conv2D::new(2, (2, 2), (3, 4), Sigmoid::new(), &mut rng).unwrap();
    let input = tensor::random_fill(3, 4, 1.0, &mut rng).unwrap();
    let probe = tensor::random_fill(6, 2, 1.0, &mut rng).unwrap();

    let (_, cache) = conv.forward_pass(&input).unwrap();
    let (grad_input, grads) = conv.backward_pass(&cache, &probe).unwrap();
    assert_eq!(grad_input.dim(), (3, 4));

    for i in 0..3 {
        for j in 0..4 {
            let numeric = numeric_partial(&input, (i, j), 1e-2, |x| {
                weighted_sum(&conv.forward_pass(x).unwrap().0, &probe)
            });
            assert_abs_diff_eq!(grad_input[[i, j]], numeric, epsilon = 2e-3);
        }
    }

    let (weights, bias) = match conv.get_weights() {
        LayerWeight::Conv2D(w) => (w.weight.clone(), w.bias.clone()),
        _ => panic!("Expected Conv2D weights"),
    };
    let mut perturbed =
        Conv2D::new(2, (2, 2), (3, 4), Sigmoid::new(), &mut StdRng::seed_from_u64(0)).unwrap();
    for k in 0..4 {
        for f in 0..2 {
            let numeric = numeric_partial(&weights, (k, f), 1e-2, |w| {
                let mut probe_layer = Conv2D::new(
                    2,
                    (2, 2),
                    (3, 4),
                    Sigmoid::new(),
                    &mut StdRng::seed_from_u64(0),
                )
                .unwrap();
                probe_layer.set_weights(w.clone(), bias.clone()).unwrap();
                weighted_sum(&probe_layer.forward_pass(&input).unwrap().0, &probe)
            });
            assert_abs_diff_eq!(grads.weights[[k, f]], numeric, epsilon = 2e-3);
        }
    }

    // Same parameters reproduce the same output
    perturbed.set_weights(weights, bias).unwrap();
    assert_eq!(
        perturbed.forward_pass(&input).unwrap().0,
        conv.forward_pass(&input).unwrap().0
    );
}

#[test]
fn test_conv2d_training_step_updates_parameters() {
    let mut conv = seeded_conv(1, 4);
    let before = match conv.get_weights() {
        LayerWeight::Conv2D(w) => w.weight.clone(),
        _ => panic!("Expected Conv2D weights"),
    };

    conv.forward(&sample_grid()).unwrap();
    let grad_input = conv.backward(&Array2::ones((4, 1))).unwrap();
    assert_eq!(grad_input.dim(), (3, 3));
    conv.update_parameters_sgd(0.5).unwrap();

    match conv.get_weights() {
        LayerWeight::Conv2D(w) => assert_ne!(*w.weight, before),
        _ => panic!("Expected Conv2D weights"),
    }
}

#[test]
fn test_conv2d_rejects_wrong_input_shape() {
    let mut conv = seeded_conv(1, 0);

    assert!(matches!(
        conv.forward(&Array2::zeros((4, 4))),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_conv2d_backward_before_forward() {
    let mut conv = seeded_conv(1, 0);

    assert!(matches!(
        conv.backward(&Array2::zeros((4, 1))),
        Err(ModelError::UninitializedState(_))
    ));
}

#[test]
fn test_conv2d_invalid_construction() {
    let mut rng = StdRng::seed_from_u64(0);

    assert!(matches!(
        Conv2D::new(0, (2, 2), (3, 3), Sigmoid::new(), &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        Conv2D::new(1, (0, 2), (3, 3), Sigmoid::new(), &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        Conv2D::new(1, (4, 2), (3, 3), Sigmoid::new(), &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_conv2d_metadata() {
    let conv = seeded_conv(2, 0);

    assert_eq!(conv.layer_type(), "Conv2D");
    assert_eq!(conv.get_filters(), 2);
    assert_eq!(conv.get_kernel_size(), (2, 2));
    assert_eq!(conv.param_count(), TrainingParameters::Trainable(10));
}
