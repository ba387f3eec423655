//! Dense MNIST classifier: 784 → 1024 ReLU → 10 softmax.
//!
//! Expects the four standard MNIST IDX files in the directory given as the
//! first argument:
//!   train-images.idx3-ubyte  train-labels.idx1-ubyte
//!   t10k-images.idx3-ubyte   t10k-labels.idx1-ubyte
//!
//! Run with: cargo run --release --example mnist_dense -- <data dir>

use std::path::Path;
use std::process::exit;

use strata_nn::idx::{read_idx, IdxData};
use strata_nn::train::{one_hot, softmax_loss_gradient, BatchStats, RunSummary};
use strata_nn::{fill_from, FullyConnected, NormalSequence, Relu, Softmax, Tensor};

const BATCH_SIZE: usize = 100;
const ETA: f32 = 0.001;

fn main() {
    let dir = match std::env::args().nth(1) {
        Some(dir) => dir,
        None => {
            eprintln!("usage: mnist_dense <directory with MNIST IDX files>");
            exit(1);
        }
    };

    let (train_images, train_labels) = load_pair(
        &dir,
        "train-images.idx3-ubyte",
        "train-labels.idx1-ubyte",
    );
    let (test_images, test_labels) =
        load_pair(&dir, "t10k-images.idx3-ubyte", "t10k-labels.idx1-ubyte");

    let pixels = train_images.shape()[1] * train_images.shape()[2];

    // Build network

    let mut fc1 = FullyConnected::new(pixels, 1024);
    let mut act1 = Relu::new(1024, 0.0);
    let mut fc2 = FullyConnected::new(1024, 10);
    let mut act2 = Softmax::new(10);

    let mut weight_init = NormalSequence::seeded(0.0, 0.1, 1);

    fill_from(&mut fc1.weights, weight_init.by_ref());
    fill_from(&mut fc1.biases, std::iter::repeat(0.1));
    fill_from(&mut fc2.weights, weight_init.by_ref());
    fill_from(&mut fc2.biases, std::iter::repeat(0.1));

    // Train

    let image_count = train_images.shape()[0];
    let batch_count = image_count / BATCH_SIZE;
    let mut input = vec![0.0f32; pixels];
    let mut summary = RunSummary::default();

    for i_batch in 0..batch_count {
        let mut stats = BatchStats::default();

        for j_batch in 0..BATCH_SIZE {
            let i_sample = i_batch * BATCH_SIZE + j_batch;
            let label = train_labels.data()[i_sample] as usize;

            scale_pixels(&train_images, i_sample, &mut input);
            let target = one_hot(label, 10);

            fc1.feed(&input).expect("feed fc1");
            act1.feed(&fc1.output).expect("feed act1");
            fc2.feed(&act1.output).expect("feed fc2");
            act2.feed(&fc2.output).expect("feed act2");

            stats.record(&act2.output, &target, label);

            let loss_gradient = softmax_loss_gradient(&act2.output, &target);

            act2.compute_gradient(&loss_gradient).expect("gradient act2");
            fc2.compute_gradient(&act2.input_gradient).expect("gradient fc2");
            act1.compute_gradient(&fc2.input_gradient).expect("gradient act1");
            fc1.compute_gradient(&act1.input_gradient).expect("gradient fc1");

            fc2.optimize(&act1.output, ETA).expect("optimize fc2");
            fc1.optimize(&input, ETA).expect("optimize fc1");
        }

        let mean = stats.mean(BATCH_SIZE);
        summary.push(mean);

        println!(
            "batch {:4}/{}  accuracy {:.4}  squared error {:.6}  x-entropy {:.6}",
            i_batch + 1,
            batch_count,
            mean.accuracy,
            mean.square_loss,
            mean.cross_entropy_loss
        );
    }

    if let Err(err) = summary.save_json("mnist_dense_run.json") {
        eprintln!("could not write run summary: {}", err);
    }

    // Evaluate

    let test_count = test_images.shape()[0];
    let mut stats = BatchStats::default();

    for i_sample in 0..test_count {
        let label = test_labels.data()[i_sample] as usize;

        scale_pixels(&test_images, i_sample, &mut input);
        let target = one_hot(label, 10);

        fc1.feed(&input).expect("feed fc1");
        act1.feed(&fc1.output).expect("feed act1");
        fc2.feed(&act1.output).expect("feed fc2");
        act2.feed(&fc2.output).expect("feed act2");

        stats.record(&act2.output, &target, label);
    }

    let mean = stats.mean(test_count);

    println!();
    println!("test accuracy      {:.6}", mean.accuracy);
    println!("test squared error {:.6}", mean.square_loss);
    println!("test x-entropy     {:.6}", mean.cross_entropy_loss);
}

/// Loads one IDX image file (u8, rank 3) and its label file (u8, rank 1).
fn load_pair(dir: &str, images: &str, labels: &str) -> (Tensor<u8>, Tensor<u8>) {
    let images = match read_idx(Path::new(dir).join(images)) {
        Ok(IdxData::U8(t)) if t.rank() == 3 => t,
        Ok(other) => {
            eprintln!(
                "unexpected image file contents: type 0x{:02X}, shape {:?}",
                other.type_code(),
                other.shape()
            );
            exit(1);
        }
        Err(err) => {
            eprintln!("could not read image file: {}", err);
            exit(1);
        }
    };

    let labels = match read_idx(Path::new(dir).join(labels)) {
        Ok(IdxData::U8(t)) if t.rank() == 1 => t,
        Ok(other) => {
            eprintln!(
                "unexpected label file contents: type 0x{:02X}, shape {:?}",
                other.type_code(),
                other.shape()
            );
            exit(1);
        }
        Err(err) => {
            eprintln!("could not read label file: {}", err);
            exit(1);
        }
    };

    assert_eq!(images.shape()[0], labels.shape()[0], "image/label count mismatch");

    (images, labels)
}

/// Copies one image into `input`, scaling bytes to `[0, 1]`.
fn scale_pixels(images: &Tensor<u8>, i_sample: usize, input: &mut [f32]) {
    let pixels = input.len();
    let sample = &images.data()[i_sample * pixels..][..pixels];

    for (slot, &px) in input.iter_mut().zip(sample) {
        *slot = px as f32 / 255.0;
    }
}
