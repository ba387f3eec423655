//! Convolutional MNIST classifier:
//! conv 5×5×32 → relu → pool → conv 5×5×64 → relu → pool →
//! fc 3136→1024 → relu → dropout 0.5 → fc 1024→10 → softmax.
//!
//! Expects the four standard MNIST IDX files in the directory given as the
//! first argument. Training the full set takes a while; pass a sample count
//! as the second argument to train on a prefix.
//!
//! Run with: cargo run --release --example mnist_conv -- <data dir> [count]

use std::path::Path;
use std::process::exit;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use strata_nn::idx::{read_idx, IdxData};
use strata_nn::pipeline::Pipeline;
use strata_nn::train::{one_hot, softmax_loss_gradient, BatchStats, RunSummary};
use strata_nn::{
    fill_from, Conv2d, Dropout, FullyConnected, Layer, NormalSequence, Pool2x2, Relu, Softmax,
    Tensor,
};

const BATCH_SIZE: usize = 100;
const ETA: f32 = 0.0001;

fn main() {
    let mut args = std::env::args().skip(1);

    let dir = match args.next() {
        Some(dir) => dir,
        None => {
            eprintln!("usage: mnist_conv <directory with MNIST IDX files> [sample count]");
            exit(1);
        }
    };
    let limit: Option<usize> = args.next().and_then(|s| s.parse().ok());

    let (train_images, train_labels) = load_pair(
        &dir,
        "train-images.idx3-ubyte",
        "train-labels.idx1-ubyte",
    );
    let (test_images, test_labels) =
        load_pair(&dir, "t10k-images.idx3-ubyte", "t10k-labels.idx1-ubyte");

    // Build network

    let mut conv1 = Conv2d::new(28, 28, 1, 5, 5, 32);
    let mut conv2 = Conv2d::new(14, 14, 32, 5, 5, 64);
    let mut fc1 = FullyConnected::new(7 * 7 * 64, 1024);
    let mut fc2 = FullyConnected::new(1024, 10);

    let mut weight_init = NormalSequence::seeded(0.0, 0.1, 1);

    fill_from(&mut conv1.kernel, weight_init.by_ref());
    fill_from(&mut conv1.biases, std::iter::repeat(0.1));
    fill_from(&mut conv2.kernel, weight_init.by_ref());
    fill_from(&mut conv2.biases, std::iter::repeat(0.1));
    fill_from(&mut fc1.weights, weight_init.by_ref());
    fill_from(&mut fc1.biases, std::iter::repeat(0.1));
    fill_from(&mut fc2.weights, weight_init.by_ref());
    fill_from(&mut fc2.biases, std::iter::repeat(0.1));

    let mut net = Pipeline::new(vec![
        Layer::Conv2d(conv1),
        Layer::Relu(Relu::with_dims(28, 28, 32, 0.0)),
        Layer::Pool2x2(Pool2x2::new((14, 14, 32))),
        Layer::Conv2d(conv2),
        Layer::Relu(Relu::with_dims(14, 14, 64, 0.0)),
        Layer::Pool2x2(Pool2x2::new((7, 7, 64))),
        Layer::FullyConnected(fc1),
        Layer::Relu(Relu::new(1024, 0.0)),
        Layer::Dropout(Dropout::new(1024, 0.5, StdRng::seed_from_u64(2))),
        Layer::FullyConnected(fc2),
        Layer::Softmax(Softmax::new(10)),
    ]);

    // Train

    let image_count = limit.unwrap_or(train_images.shape()[0]).min(train_images.shape()[0]);
    let batch_count = image_count / BATCH_SIZE;
    let mut input = vec![0.0f32; 28 * 28];
    let mut summary = RunSummary::default();

    for i_batch in 0..batch_count {
        let mut stats = BatchStats::default();
        let batch_start = Instant::now();

        for j_batch in 0..BATCH_SIZE {
            let i_sample = i_batch * BATCH_SIZE + j_batch;
            let label = train_labels.data()[i_sample] as usize;

            scale_pixels(&train_images, i_sample, &mut input);
            let target = one_hot(label, 10);

            let prediction = net.forward(&input).expect("forward");
            stats.record(prediction, &target, label);

            let loss_gradient = softmax_loss_gradient(prediction, &target);
            net.backward(&loss_gradient).expect("backward");
            net.optimize(&input, ETA).expect("optimize");
        }

        let mean = stats.mean(BATCH_SIZE);
        summary.push(mean);

        println!(
            "batch {:4}/{}  accuracy {:.4}  squared error {:.6}  x-entropy {:.6}  ({:.1?})",
            i_batch + 1,
            batch_count,
            mean.accuracy,
            mean.square_loss,
            mean.cross_entropy_loss,
            batch_start.elapsed()
        );
    }

    if let Err(err) = summary.save_json("mnist_conv_run.json") {
        eprintln!("could not write run summary: {}", err);
    }

    // Evaluate

    let test_count = test_images.shape()[0];
    let mut stats = BatchStats::default();

    for i_sample in 0..test_count {
        let label = test_labels.data()[i_sample] as usize;

        scale_pixels(&test_images, i_sample, &mut input);
        let target = one_hot(label, 10);

        let prediction = net.forward(&input).expect("forward");
        stats.record(prediction, &target, label);
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
