// The worked 2×2 pooling example: a 4×4 image with 2 channels. Fixtures are
// written channel-first for readability and permuted into the layer's
// channel-last layout, which doubles as a workout for Tensor::permute.

use strata_nn::{Pool2x2, Tensor};

fn channel_last(channel_first: Vec<f32>, shape: Vec<usize>) -> Vec<f32> {
    Tensor::new(shape, channel_first)
        .unwrap()
        .permute(&[1, 2, 0])
        .unwrap()
        .into_data()
}

#[rustfmt::skip]
fn fed_layer() -> (Pool2x2, Vec<f32>) {
    let input = channel_last(
        vec![
            // channel 0
            1.0, 2.0, 3.0, 4.0,
            8.0, 7.0, 6.0, 5.0,
            1.0, 2.0, 4.0, 3.0,
            7.0, 8.0, 6.0, 5.0,
            // channel 1
            4.0, 3.0, 2.0, 1.0,
            5.0, 6.0, 7.0, 8.0,
            3.0, 4.0, 2.0, 1.0,
            5.0, 6.0, 8.0, 7.0,
        ],
        vec![2, 4, 4],
    );

    let mut layer = Pool2x2::new((2, 2, 2));
    layer.feed(&input).unwrap();

    (layer, input)
}

#[test]
#[rustfmt::skip]
fn feed_selects_window_maxima() {
    let (layer, _) = fed_layer();

    let expected_output = channel_last(
        vec![
            // channel 0
            8.0, 6.0,
            8.0, 6.0,
            // channel 1
            6.0, 8.0,
            6.0, 8.0,
        ],
        vec![2, 2, 2],
    );

    assert_eq!(layer.output, expected_output);
}

#[test]
#[rustfmt::skip]
fn feed_flags_argmax_positions() {
    let (layer, _) = fed_layer();

    let expected_selection = channel_last(
        vec![
            // channel 0
            0.0, 0.0, 0.0, 0.0,
            1.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 0.0,
            // channel 1
            0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 0.0,
        ],
        vec![2, 4, 4],
    );

    assert_eq!(layer.selection, expected_selection);
}

#[test]
#[rustfmt::skip]
fn backward_reproduces_reference_pattern() {
    // Pins the documented gradient rule: the upstream index is the flat
    // input index over four, and the routed value is multiplied by the
    // cached forward output as well as the upstream gradient.
    let (mut layer, _) = fed_layer();

    layer
        .compute_gradient(&[2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 0.0, 1.0])
        .unwrap();

    let expected_gradient = channel_last(
        vec![
            // channel 0
            0.0,  0.0, 0.0,  0.0,
            24.0, 0.0, 48.0, 0.0,
            0.0,  0.0, 0.0,  0.0,
            0.0,  0.0, 8.0,  0.0,
            // channel 1
            0.0, 0.0,  0.0, 0.0,
            0.0, 24.0, 0.0, 48.0,
            0.0, 0.0,  0.0, 0.0,
            0.0, 0.0,  8.0, 0.0,
        ],
        vec![2, 4, 4],
    );

    assert_eq!(layer.input_gradient, expected_gradient);
}

#[test]
fn ties_keep_the_earliest_compared_cell() {
    // All four window cells equal: the top-left flag must win.
    let mut layer = Pool2x2::new((1, 1, 1));
    layer.feed(&[5.0, 5.0, 5.0, 5.0]).unwrap();

    assert_eq!(layer.selection, vec![1.0, 0.0, 0.0, 0.0]);
    assert_eq!(layer.output, vec![5.0]);
}

#[test]
fn input_must_be_double_the_output_extent() {
    let mut layer = Pool2x2::new((2, 2, 2));

    assert!(layer.feed(&[0.0; 16]).is_err());
    assert!(layer.compute_gradient(&[0.0; 16]).is_err());
}
