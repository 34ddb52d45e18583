use super::*;

fn dense_config(seed: u64) -> NetworkConfig {
    NetworkConfig {
        layers: vec![
            LayerConfig::Dense {
                input_dim: 2,
                output_dim: 3,
            },
            LayerConfig::Dense {
                input_dim: 3,
                output_dim: 1,
            },
        ],
        seed,
        ..Default::default()
    }
}

fn conv_config() -> NetworkConfig {
    NetworkConfig {
        layers: vec![
            LayerConfig::Conv2D {
                input_height: 3,
                input_width: 3,
                kernel_height: 2,
                kernel_width: 2,
                filters: 2,
            },
            LayerConfig::Flatten,
            LayerConfig::Dense {
                input_dim: 8,
                output_dim: 1,
            },
        ],
        seed: 7,
        ..Default::default()
    }
}

#[test]
fn test_from_config_is_reproducible() {
    let x = array![[0.3_f32, -0.8]];

    let a = Network::from_config(&dense_config(11)).unwrap().predict(&x).unwrap();
    let b = Network::from_config(&dense_config(11)).unwrap().predict(&x).unwrap();
    let c = Network::from_config(&dense_config(12)).unwrap().predict(&x).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_from_config_rejects_invalid_layers() {
    assert!(matches!(
        Network::from_config(&NetworkConfig::default()),
        Err(ModelError::InputValidationError(_))
    ));

    let config = NetworkConfig {
        layers: vec![LayerConfig::Dense {
            input_dim: 0,
            output_dim: 1,
        }],
        ..Default::default()
    };
    assert!(matches!(
        Network::from_config(&config),
        Err(ModelError::InputValidationError(_))
    ));

    let oversized = NetworkConfig {
        init_scale: f32::MAX,
        ..dense_config(0)
    };
    assert!(matches!(
        Network::from_config(&oversized),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_from_config_rejects_unchained_layers() {
    let dense_gap = NetworkConfig {
        layers: vec![
            LayerConfig::Dense {
                input_dim: 2,
                output_dim: 3,
            },
            LayerConfig::Dense {
                input_dim: 2,
                output_dim: 1,
            },
        ],
        ..Default::default()
    };
    assert!(matches!(
        Network::from_config(&dense_gap),
        Err(ModelError::ShapeMismatch(_))
    ));

    // Conv2D output (4, 2) flattens to (1, 8), not (1, 4)
    let mut flatten_gap = conv_config();
    flatten_gap.layers[2] = LayerConfig::Dense {
        input_dim: 4,
        output_dim: 1,
    };
    assert!(matches!(
        Network::from_config(&flatten_gap),
        Err(ModelError::ShapeMismatch(_))
    ));

    // Without Flatten, Dense receives the (4, 2) grid
    let mut missing_flatten = conv_config();
    missing_flatten.layers.remove(1);
    assert!(matches!(
        Network::from_config(&missing_flatten),
        Err(ModelError::ShapeMismatch(_))
    ));

    let conv_after_dense = NetworkConfig {
        layers: vec![
            LayerConfig::Dense {
                input_dim: 2,
                output_dim: 9,
            },
            LayerConfig::Conv2D {
                input_height: 3,
                input_width: 3,
                kernel_height: 2,
                kernel_width: 2,
                filters: 1,
            },
        ],
        ..Default::default()
    };
    assert!(matches!(
        Network::from_config(&conv_after_dense),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_empty_network_cannot_run() {
    let mut network = Network::new();
    assert!(network.is_empty());

    assert!(matches!(
        network.forward(&array![[1.0_f32]]),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_forward_equals_predict() {
    let mut network = Network::from_config(&conv_config()).unwrap();
    let x = tensor::random_fill(3, 3, 1.0, &mut StdRng::seed_from_u64(1)).unwrap();

    let forward = network.forward(&x).unwrap();
    let predict = network.predict(&x).unwrap();
    assert_eq!(forward.dim(), (1, 1));
    assert_eq!(forward, predict);
}

#[test]
fn test_train_one_returns_loss_before_update() {
    let mut network = Network::from_config(&dense_config(3)).unwrap();
    let x = array![[1.0_f32, 0.0]];
    let t = array![[1.0_f32]];

    let y = network.predict(&x).unwrap();
    let loss = network.train_one(&x, &t, 0.5).unwrap();
    assert_relative_eq!(loss, 0.5 * (y[[0, 0]] - 1.0).powi(2), epsilon = 1e-6);

    let y_after = network.predict(&x).unwrap();
    assert!(y_after[[0, 0]] > y[[0, 0]]);
}

#[test]
fn test_train_one_through_conv_and_flatten() {
    let mut network = Network::from_config(&conv_config()).unwrap();
    let x = array![[0.0_f32, 0.0, 0.0], [1.0, 1.0, 1.0], [0.0, 0.0, 0.0]];
    let t = array![[1.0_f32]];

    let first = network.train_one(&x, &t, 0.5).unwrap();
    let mut last = first;
    for _ in 0..50 {
        last = network.train_one(&x, &t, 0.5).unwrap();
    }
    assert!(last < first);
}

#[test]
fn test_train_one_rejects_bad_arguments() {
    let mut network = Network::from_config(&dense_config(0)).unwrap();
    let x = array![[1.0_f32, 0.0]];

    assert!(matches!(
        network.train_one(&x, &array![[1.0_f32, 0.0]], 0.5),
        Err(ModelError::ShapeMismatch(_))
    ));
    assert!(matches!(
        network.train_one(&x, &array![[1.0_f32]], 0.0),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        network.train_one(&array![[1.0_f32]], &array![[1.0_f32]], 0.5),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_train_all_reduces_error() {
    let mut network = Network::from_config(&dense_config(5)).unwrap();
    let dataset = vec![
        Sample::new(array![[0.0_f32, 1.0]], array![[1.0_f32]]),
        Sample::new(array![[1.0_f32, 0.0]], array![[0.0_f32]]),
    ];
    let error = |network: &mut Network| -> f32 {
        dataset
            .iter()
            .map(|s| {
                let y = network.predict(&s.input).unwrap();
                0.5 * (y[[0, 0]] - s.target[[0, 0]]).powi(2)
            })
            .sum()
    };

    let before = error(&mut network);
    network
        .set_log_interval(100)
        .train_all(&dataset, 2000, 0.5)
        .unwrap();
    let after = error(&mut network);

    assert!(after < before);
    assert!(after < 0.1);
}

#[test]
fn test_train_all_rejects_bad_arguments() {
    let mut network = Network::from_config(&dense_config(0)).unwrap();
    let dataset = vec![Sample::new(array![[0.0_f32, 1.0]], array![[1.0_f32]])];

    assert!(matches!(
        network.train_all(&[], 10, 0.5),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        network.train_all(&dataset, 10, -0.5),
        Err(ModelError::InputValidationError(_))
    ));

    let mut empty = Network::new();
    assert!(matches!(
        empty.train_all(&dataset, 10, 0.5),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_summary_lists_layers() {
    let mut network = Network::from_config(&conv_config()).unwrap();
    assert_eq!(network.len(), 3);

    network
        .forward(&Array2::zeros((3, 3)))
        .unwrap();
    let summary = network.summary();

    assert!(summary.contains("Layer_0 (Conv2D)"));
    assert!(summary.contains("Layer_1 (Flatten)"));
    assert!(summary.contains("Layer_2 (Dense)"));
    // 2*2*2 + 2 + 8*1 + 1
    assert!(summary.contains("Trainable params: 19"));
}
