use ndarray::ArrayView2;

use crate::{
    arch::{loss::LossFn, Sequential},
    optimization::Optimizer,
    Result,
};

/// Runs fixed-epoch, full-batch training of a model.
///
/// Every epoch is one pass over the whole training set: forward, loss,
/// backward, one parameter update. No early stopping, no validation split.
pub struct Trainer<L: LossFn, O: Optimizer> {
    grad: Vec<f32>,
    model: Sequential,
    loss_fn: L,
    optimizer: O,
    epochs: usize,
}

impl<L: LossFn, O: Optimizer> Trainer<L, O> {
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - Dictates how to update the parameters each epoch.
    /// * `loss_fn` - The loss function used to measure the difference between
    ///   the model's output and the expected one.
    /// * `epochs` - The amount of full passes over the training set.
    pub fn new(model: Sequential, optimizer: O, loss_fn: L, epochs: usize) -> Self {
        Self {
            grad: vec![0.0; model.size()],
            model,
            loss_fn,
            optimizer,
            epochs,
        }
    }

    /// Performs `epochs` full passes over `(x, y)`, updating `params` in
    /// place after each pass.
    ///
    /// # Arguments
    /// * `params` - The model's parameters, `model.size()` scalars.
    /// * `x` - The training features, one row per sample.
    /// * `y` - The training targets, one row per sample.
    ///
    /// # Returns
    /// The loss observed at each epoch.
    pub fn fit(
        &mut self,
        params: &mut [f32],
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> Result<Vec<f32>> {
        let mut losses = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            let loss = self
                .model
                .backprop(params, &mut self.grad, &self.loss_fn, x, y)?;
            self.optimizer.update_params(params, &self.grad);

            log::debug!("epoch {epoch}: loss {loss}");
            losses.push(loss);
        }

        Ok(losses)
    }

    /// Gives the model back once training is done.
    pub fn into_model(self) -> Sequential {
        self.model
    }
}
