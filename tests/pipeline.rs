use rand::rngs::StdRng;
use rand::SeedableRng;

use strata_nn::pipeline::Pipeline;
use strata_nn::train::{one_hot, softmax_loss_gradient, BatchStats};
use strata_nn::{
    fill_from, Dropout, FullyConnected, Layer, NormalSequence, Relu, Sigmoid, Softmax,
};

/// The hand-verified two-layer network, driven through the pipeline instead
/// of layer-by-layer calls.
fn sanity_network() -> Pipeline {
    let mut fc1 = FullyConnected::new(2, 2);
    fc1.biases.copy_from_slice(&[0.35, 0.35]);
    fc1.weights.copy_from_slice(&[0.15, 0.25, 0.20, 0.30]);

    let mut fc2 = FullyConnected::new(2, 2);
    fc2.biases.copy_from_slice(&[0.60, 0.60]);
    fc2.weights.copy_from_slice(&[0.40, 0.50, 0.45, 0.55]);

    Pipeline::new(vec![
        Layer::FullyConnected(fc1),
        Layer::Sigmoid(Sigmoid::new(2)),
        Layer::FullyConnected(fc2),
        Layer::Sigmoid(Sigmoid::new(2)),
    ])
}

#[test]
fn forward_matches_the_worked_first_iteration() {
    // Known first-pass outputs for these fixed weights.
    let mut net = sanity_network();
    let output = net.forward(&[0.05, 0.10]).unwrap();

    assert!((output[0] - 0.751_365).abs() < 1e-4, "{}", output[0]);
    assert!((output[1] - 0.772_928).abs() < 1e-4, "{}", output[1]);
}

#[test]
fn training_drives_outputs_toward_targets() {
    let mut net = sanity_network();
    let input = [0.05f32, 0.10];
    let target = [0.01f32, 0.99];

    let first_loss: f32 = {
        let output = net.forward(&input).unwrap();
        output
            .iter()
            .zip(&target)
            .map(|(&o, &t)| (o - t) * (o - t) / 2.0)
            .sum()
    };

    for _ in 0..5_000 {
        let output = net.forward(&input).unwrap();
        let error: Vec<f32> = output.iter().zip(&target).map(|(&o, &t)| o - t).collect();

        net.backward(&error).unwrap();
        net.optimize(&input, 0.5).unwrap();
    }

    let output = net.forward(&input).unwrap();
    let last_loss: f32 = output
        .iter()
        .zip(&target)
        .map(|(&o, &t)| (o - t) * (o - t) / 2.0)
        .sum();

    assert!(last_loss < first_loss / 100.0);
    assert!((output[0] - 0.01).abs() < 0.05);
    assert!((output[1] - 0.99).abs() < 0.05);
}

#[test]
fn pipeline_matches_manual_layer_calls() {
    let mut weights = NormalSequence::seeded(0.0, 0.4, 60);

    let mut fc_a = FullyConnected::new(3, 5);
    fill_from(&mut fc_a.weights, weights.by_ref());
    let mut fc_b = FullyConnected::new(3, 5);
    fc_b.weights.copy_from_slice(&fc_a.weights);

    let mut relu_a = Relu::new(5, 0.1);
    let relu_b = Relu::new(5, 0.1);

    let input = [0.3f32, -0.7, 1.2];
    let upstream = [1.0f32, -1.0, 0.5, 0.0, 2.0];

    // Manual sequencing.
    fc_a.feed(&input).unwrap();
    relu_a.feed(&fc_a.output).unwrap();
    relu_a.compute_gradient(&upstream).unwrap();
    fc_a.compute_gradient(&relu_a.input_gradient).unwrap();
    fc_a.optimize(&input, 0.1).unwrap();

    // Pipeline sequencing.
    let mut net = Pipeline::new(vec![
        Layer::FullyConnected(fc_b),
        Layer::Relu(relu_b),
    ]);
    net.forward(&input).unwrap();
    net.backward(&upstream).unwrap();
    net.optimize(&input, 0.1).unwrap();

    let Layer::FullyConnected(fc_b) = &net.layers[0] else {
        unreachable!()
    };

    assert_eq!(fc_a.output, fc_b.output);
    assert_eq!(fc_a.input_gradient, fc_b.input_gradient);
    assert_eq!(fc_a.weights, fc_b.weights);
    assert_eq!(fc_a.biases, fc_b.biases);
}

#[test]
fn optimize_skips_untrainable_layers() {
    let mut net = Pipeline::new(vec![
        Layer::Dropout(Dropout::new(4, 0.5, StdRng::seed_from_u64(1))),
        Layer::Softmax(Softmax::new(4)),
    ]);

    assert!(!net.layers[0].is_trainable());
    assert!(!net.layers[1].is_trainable());

    net.forward(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    net.backward(&[0.1, 0.2, 0.3, 0.4]).unwrap();
    // No trainable parameters anywhere: still Ok, nothing to update.
    net.optimize(&[1.0, 2.0, 3.0, 4.0], 0.5).unwrap();
}

#[test]
fn batch_stats_aggregate_per_sample_metrics() {
    let mut stats = BatchStats::default();

    // Prediction argmax 2 vs label 2: correct.
    stats.record(&[0.1, 0.2, 0.7], &one_hot(2, 3), 2);
    // Prediction argmax 0 vs label 1: wrong.
    stats.record(&[0.8, 0.1, 0.1], &one_hot(1, 3), 1);

    let mean = stats.mean(2);
    assert!((mean.accuracy - 0.5).abs() < 1e-6);
    assert!(mean.square_loss > 0.0);
    assert!(mean.cross_entropy_loss > 0.0);
}

#[test]
#[should_panic]
fn one_hot_rejects_out_of_range_classes() {
    one_hot(3, 3);
}

#[test]
fn softmax_loss_gradient_is_prediction_minus_target() {
    let gradient = softmax_loss_gradient(&[0.3, 0.5, 0.2], &one_hot(1, 3));

    assert!((gradient[0] - 0.3).abs() < 1e-6);
    assert!((gradient[1] + 0.5).abs() < 1e-6);
    assert!((gradient[2] - 0.2).abs() < 1e-6);
}
