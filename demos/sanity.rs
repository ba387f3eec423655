//! Hand-verified two-layer sanity check.
//!
//! A 2-2-2 network of fully-connected + sigmoid pairs with fixed initial
//! weights, trained on a single sample. The outputs should march toward the
//! targets (0.01, 0.99) within a few thousand iterations.
//!
//! Run with: cargo run --release --example sanity

use strata_nn::{FullyConnected, Sigmoid};

fn main() {
    let input = [0.05f32, 0.10];
    let target = [0.01f32, 0.99];
    let eta = 0.5;

    let mut fc1 = FullyConnected::new(2, 2);
    fc1.biases.copy_from_slice(&[0.35, 0.35]);
    fc1.weights.copy_from_slice(&[0.15, 0.25, 0.20, 0.30]);

    let mut sig1 = Sigmoid::new(2);

    let mut fc2 = FullyConnected::new(2, 2);
    fc2.biases.copy_from_slice(&[0.60, 0.60]);
    fc2.weights.copy_from_slice(&[0.40, 0.50, 0.45, 0.55]);

    let mut sig2 = Sigmoid::new(2);

    for _ in 0..10_000 {
        fc1.feed(&input).expect("feed fc1");
        sig1.feed(&fc1.output).expect("feed sig1");
        fc2.feed(&sig1.output).expect("feed fc2");
        sig2.feed(&fc2.output).expect("feed sig2");

        let error = [
            sig2.output[0] - target[0],
            sig2.output[1] - target[1],
        ];

        sig2.compute_gradient(&error).expect("gradient sig2");
        fc2.compute_gradient(&sig2.input_gradient).expect("gradient fc2");
        sig1.compute_gradient(&fc2.input_gradient).expect("gradient sig1");
        fc1.compute_gradient(&sig1.input_gradient).expect("gradient fc1");

        fc2.optimize(&sig1.output, eta).expect("optimize fc2");
        fc1.optimize(&input, eta).expect("optimize fc1");
    }

    println!("output 0: {}  (target {})", sig2.output[0], target[0]);
    println!("output 1: {}  (target {})", sig2.output[1], target[1]);
}
