use serde::{Deserialize, Serialize};

use crate::tensor::ops::max_index;

/// Aggregate statistics over one batch of training or evaluation samples.
///
/// Accumulated per sample with [`BatchStats::record`], then divided by the
/// batch size with [`BatchStats::mean`] before reporting:
/// - `accuracy`: fraction of samples whose argmax prediction matched the
///   target class
/// - `square_loss`: mean of `Σ (target - prediction)² / 2` per sample
/// - `cross_entropy_loss`: mean over samples of the per-class mean of
///   `-target · ln(prediction)`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub accuracy: f32,
    pub square_loss: f32,
    pub cross_entropy_loss: f32,
}

impl BatchStats {
    /// Folds one sample into the running totals. `target` is a one-hot
    /// distribution over the same classes as `prediction`.
    pub fn record(&mut self, prediction: &[f32], target: &[f32], label: usize) {
        let correct = max_index(prediction.iter().copied()) == Some(label);

        let square: f32 = target
            .iter()
            .zip(prediction)
            .map(|(&t, &p)| (t - p) * (t - p) / 2.0)
            .sum();

        let cross_entropy: f32 = target
            .iter()
            .zip(prediction)
            .map(|(&t, &p)| -(t * p.ln()))
            .sum::<f32>()
            / prediction.len() as f32;

        self.accuracy += if correct { 1.0 } else { 0.0 };
        self.square_loss += square;
        self.cross_entropy_loss += cross_entropy;
    }

    /// Totals divided by the number of recorded samples.
    pub fn mean(&self, samples: usize) -> BatchStats {
        let n = samples.max(1) as f32;
        BatchStats {
            accuracy: self.accuracy / n,
            square_loss: self.square_loss / n,
            cross_entropy_loss: self.cross_entropy_loss / n,
        }
    }
}

/// Per-batch statistics for a whole training run, dumpable to JSON for
/// offline inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub batches: Vec<BatchStats>,
}

impl RunSummary {
    pub fn push(&mut self, stats: BatchStats) {
        self.batches.push(stats);
    }

    /// Serializes the summary to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

/// One-hot distribution: `len` zeros with a single one at `class`.
///
/// Panics if `class >= len`; validate labels against the class count before
/// encoding them.
pub fn one_hot(class: usize, len: usize) -> Vec<f32> {
    let mut target = vec![0.0; len];
    target[class] = 1.0;
    target
}

/// Gradient of the softmax-paired loss with respect to the pre-softmax
/// logits: `prediction - target`, elementwise.
///
/// This is the one upstream gradient [`crate::layers::Softmax`]'s
/// pass-through backward is valid for; pass it straight into the softmax
/// layer's `compute_gradient`.
pub fn softmax_loss_gradient(prediction: &[f32], target: &[f32]) -> Vec<f32> {
    prediction
        .iter()
        .zip(target)
        .map(|(&p, &t)| p - t)
        .collect()
}
