pub mod stats;

pub use stats::{one_hot, softmax_loss_gradient, BatchStats, RunSummary};
