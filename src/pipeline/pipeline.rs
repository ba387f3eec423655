use crate::layers::{Layer, LayerError};

/// An ordered stack of layers with the forward/backward/optimize sequencing
/// handled in one place.
///
/// The pipeline owns nothing beyond the layers themselves; every layer keeps
/// its own buffers, and data moves between them as slice reads of the
/// previous layer's cached output. Drivers that need an irregular graph can
/// ignore this type and call the layers directly.
pub struct Pipeline {
    pub layers: Vec<Layer>,
}

impl Pipeline {
    pub fn new(layers: Vec<Layer>) -> Self {
        Pipeline { layers }
    }

    /// Feeds every layer in order and returns the final layer's output.
    pub fn forward(&mut self, input: &[f32]) -> Result<&[f32], LayerError> {
        for i in 0..self.layers.len() {
            let (fed, rest) = self.layers.split_at_mut(i);

            let layer_input = match fed.last() {
                Some(previous) => previous.output(),
                None => input,
            };

            rest[0].feed(layer_input)?;
        }

        Ok(self.output())
    }

    /// Runs `compute_gradient` through the stack in reverse order, starting
    /// from the loss gradient at the network output.
    pub fn backward(&mut self, loss_gradient: &[f32]) -> Result<(), LayerError> {
        for i in (0..self.layers.len()).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);

            let upstream = match tail.first() {
                Some(next) => next.input_gradient(),
                None => loss_gradient,
            };

            head[i].compute_gradient(upstream)?;
        }

        Ok(())
    }

    /// Applies one gradient-descent step to every trainable layer, handing
    /// each the same input its most recent `feed` saw.
    pub fn optimize(&mut self, input: &[f32], eta: f32) -> Result<(), LayerError> {
        for i in 0..self.layers.len() {
            let (fed, rest) = self.layers.split_at_mut(i);

            let layer_input = match fed.last() {
                Some(previous) => previous.output(),
                None => input,
            };

            rest[0].optimize(layer_input, eta)?;
        }

        Ok(())
    }

    /// The last layer's cached output; empty if the pipeline has no layers.
    pub fn output(&self) -> &[f32] {
        self.layers.last().map(Layer::output).unwrap_or(&[])
    }
}
