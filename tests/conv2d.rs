use strata_nn::{Conv2d, LayerError};

#[test]
fn same_padding_keeps_spatial_size_for_odd_kernels() {
    let layer = Conv2d::new(28, 28, 1, 5, 5, 32);

    assert_eq!(layer.output_dims, (28, 28, 32));
    assert_eq!(layer.padding, (2, 2, 2, 2));

    let layer = Conv2d::new(7, 9, 3, 3, 3, 4);
    assert_eq!(layer.output_dims, (7, 9, 4));
}

#[test]
fn even_kernels_shrink_by_one() {
    // (k-1)/2 = 0 of padding on each side for a 2-wide kernel.
    let layer = Conv2d::new(4, 4, 1, 2, 2, 1);

    assert_eq!(layer.padding, (0, 0, 0, 0));
    assert_eq!(layer.output_dims, (3, 3, 1));
}

#[test]
fn pointwise_convolution_is_scale_plus_bias() {
    let mut layer = Conv2d::new(2, 2, 1, 1, 1, 1);
    layer.kernel[0] = 2.0;
    layer.biases[0] = 0.5;

    layer.feed(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(layer.output, vec![2.5, 4.5, 6.5, 8.5]);

    layer.compute_gradient(&[1.0, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(layer.input_gradient, vec![2.0, 2.0, 2.0, 2.0]);

    layer.optimize(&[1.0, 2.0, 3.0, 4.0], 0.1).unwrap();
    // bias -= 0.1 * Σ og; kernel -= 0.1 * Σ input * og
    assert!((layer.biases[0] - 0.1).abs() < 1e-6);
    assert!((layer.kernel[0] - 1.0).abs() < 1e-6);
}

#[test]
fn clipped_windows_sum_fewer_cells() {
    // 3×3 ones kernel over a 3×3 ones image: corners see a 2×2 window,
    // edges 2×3, the center the full 3×3.
    let mut layer = Conv2d::new(3, 3, 1, 3, 3, 1);
    layer.kernel.iter_mut().for_each(|k| *k = 1.0);

    layer.feed(&[1.0; 9]).unwrap();

    assert_eq!(
        layer.output,
        vec![4.0, 6.0, 4.0, 6.0, 9.0, 6.0, 4.0, 6.0, 4.0]
    );
}

#[test]
fn backward_distributes_through_flipped_kernel() {
    // Upstream gradient of 1 at the center output only: the input gradient
    // is the 180°-rotated kernel.
    let mut layer = Conv2d::new(3, 3, 1, 3, 3, 1);
    for (i, k) in layer.kernel.iter_mut().enumerate() {
        *k = (i + 1) as f32;
    }

    layer.feed(&[0.0; 9]).unwrap();

    let mut upstream = [0.0; 9];
    upstream[4] = 1.0;
    layer.compute_gradient(&upstream).unwrap();

    assert_eq!(
        layer.input_gradient,
        vec![9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]
    );
}

#[test]
fn kernel_runs_are_output_channel_fastest() {
    // 1×1 spatial extent, 2 input channels, 3 output channels: the kernel is
    // [in_c, out_c] with out_c contiguous.
    let mut layer = Conv2d::new(1, 1, 2, 1, 1, 3);
    layer.kernel.copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    layer.biases.copy_from_slice(&[0.1, 0.2, 0.3]);

    layer.feed(&[1.0, 2.0]).unwrap();

    let expected = [
        1.0 * 1.0 + 2.0 * 4.0 + 0.1,
        1.0 * 2.0 + 2.0 * 5.0 + 0.2,
        1.0 * 3.0 + 2.0 * 6.0 + 0.3,
    ];

    for (o, e) in layer.output.iter().zip(expected) {
        assert!((o - e).abs() < 1e-6, "{} vs {}", o, e);
    }
}

#[test]
fn overlapping_windows_accumulate_from_zero() {
    // Two backward passes in a row must not leak gradient between calls.
    let mut layer = Conv2d::new(3, 3, 1, 3, 3, 1);
    layer.kernel.iter_mut().for_each(|k| *k = 1.0);

    layer.feed(&[1.0; 9]).unwrap();
    layer.compute_gradient(&[1.0; 9]).unwrap();
    let first = layer.input_gradient.clone();

    layer.compute_gradient(&[1.0; 9]).unwrap();
    assert_eq!(layer.input_gradient, first);

    // Each input cell receives one contribution per window that covers it,
    // which mirrors the forward counts by symmetry.
    assert_eq!(first, vec![4.0, 6.0, 4.0, 6.0, 9.0, 6.0, 4.0, 6.0, 4.0]);
}

#[test]
fn wrong_sizes_are_rejected() {
    let mut layer = Conv2d::new(3, 3, 2, 3, 3, 4);

    assert_eq!(
        layer.feed(&[0.0; 9]),
        Err(LayerError::ShapeMismatch { expected: 18, actual: 9 })
    );
    assert_eq!(
        layer.compute_gradient(&[0.0; 9]),
        Err(LayerError::ShapeMismatch { expected: 36, actual: 9 })
    );
    assert_eq!(
        layer.optimize(&[0.0; 4], 0.1),
        Err(LayerError::ShapeMismatch { expected: 18, actual: 4 })
    );
}
