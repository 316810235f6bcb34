use ndarray::{Array2, ArrayView2};
use rand::Rng;

use super::{layers::Dense, loss::LossFn};
use crate::{MlErr, Result};

/// A sequential model: information flows forward when computing an output and
/// backward when computing the *deltas* of its layers.
///
/// The model owns no parameters; callers hold them in a flat slice of
/// `size()` scalars, laid out layer by layer.
#[derive(Clone)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Dense>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// The amount of parameters in the model.
    pub fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    /// Fresh uniform parameters in [-0.5, 0.5).
    pub fn init_params<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        (0..self.size()).map(|_| rng.random::<f32>() - 0.5).collect()
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The input batch, one row per sample.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if params.len() != self.size() {
            return Err(MlErr::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: self.size(),
            });
        }

        let mut rest = params;
        let mut a = x.to_owned();

        for layer in self.layers.iter_mut() {
            let (chunk, tail) = rest.split_at(layer.size());
            rest = tail;
            a = layer.forward(chunk, a.view())?;
        }

        Ok(a)
    }

    /// Forward pass, loss, backward pass. Overwrites `grad` with the gradient
    /// of the batch loss with respect to `params`.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `grad` - A buffer of `size()` scalars for the computed gradient.
    /// * `loss_fn` - The loss function.
    /// * `x` - The input batch.
    /// * `y` - The expected outputs, one row per input row.
    ///
    /// # Returns
    /// The batch loss.
    pub fn backprop<L: LossFn>(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        loss_fn: &L,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> Result<f32> {
        if grad.len() != self.size() {
            return Err(MlErr::ShapeMismatch {
                what: "grad",
                got: grad.len(),
                expected: self.size(),
            });
        }

        let y_pred = self.forward(params, x)?;
        if y_pred.dim() != y.dim() {
            return Err(MlErr::ShapeMismatch {
                what: "labels",
                got: y.nrows(),
                expected: y_pred.nrows(),
            });
        }

        let loss = loss_fn.loss(y_pred.view(), y);
        let mut d = loss_fn.loss_prime(y_pred.view(), y);

        let mut end = params.len();
        for layer in self.layers.iter_mut().rev() {
            let start = end - layer.size();
            d = layer.backward(&params[start..end], &mut grad[start..end], d)?;
            end = start;
        }

        Ok(loss)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arch::activations::ActFn;
    use crate::arch::loss::Bce;
    use rand::{rngs::StdRng, SeedableRng};

    fn xor_batch() -> (Array2<f32>, Array2<f32>) {
        let x = Array2::from_shape_vec((4, 2), vec![0., 0., 0., 1., 1., 0., 1., 1.]).unwrap();
        let y = Array2::from_shape_vec((4, 1), vec![0., 1., 1., 0.]).unwrap();
        (x, y)
    }

    #[test]
    fn size_sums_the_layers() {
        let model = Sequential::new([
            Dense::new((2, 3), Some(ActFn::sigmoid(1.))),
            Dense::new((3, 1), Some(ActFn::sigmoid(1.))),
        ]);

        assert_eq!(model.size(), (2 + 1) * 3 + (3 + 1) * 1);
    }

    #[test]
    fn forward_rejects_wrong_param_count() {
        let mut model = Sequential::new([Dense::new((2, 1), None)]);
        let x = Array2::zeros((1, 2));

        assert!(matches!(
            model.forward(&[0.; 2], x.view()),
            Err(MlErr::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn backprop_matches_finite_differences() {
        // smooth activations throughout so the numeric derivative behaves
        let mut model = Sequential::new([
            Dense::new((2, 3), Some(ActFn::sigmoid(1.))),
            Dense::new((3, 1), Some(ActFn::sigmoid(1.))),
        ]);

        let (x, y) = xor_batch();
        let mut rng = StdRng::seed_from_u64(11);
        let mut params = model.init_params(&mut rng);
        let mut grad = vec![0.; model.size()];

        let loss_fn = Bce::new();
        model
            .backprop(&params, &mut grad, &loss_fn, x.view(), y.view())
            .unwrap();

        let h = 1e-3;
        for i in 0..params.len() {
            let orig = params[i];

            params[i] = orig + h;
            let up = {
                let p = model.forward(&params, x.view()).unwrap();
                loss_fn.loss(p.view(), y.view())
            };
            params[i] = orig - h;
            let down = {
                let p = model.forward(&params, x.view()).unwrap();
                loss_fn.loss(p.view(), y.view())
            };
            params[i] = orig;

            let numeric = (up - down) / (2. * h);
            assert!(
                (grad[i] - numeric).abs() < 1e-2,
                "param {i}: analytic {} vs numeric {numeric}",
                grad[i]
            );
        }
    }
}
