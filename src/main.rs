// This binary crate is intentionally minimal.
// All layer arithmetic lives in the library (src/lib.rs and its modules).
// Run the training scenarios with:
//   cargo run --release --example sanity
//   cargo run --release --example mnist_dense -- <data dir>
//   cargo run --release --example mnist_conv -- <data dir>
fn main() {
    println!("strata-nn: a minimal feed-forward neural network engine.");
    println!("Run `cargo run --release --example sanity` for the hand-verified demo.");
}
