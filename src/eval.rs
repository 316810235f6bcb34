use ndarray::ArrayView2;

use crate::{arch::Sequential, MlErr, Result};

/// Held-out metrics for one trained model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Fraction of rows predicted positive after thresholding at 0.5.
    pub positive_fraction: f32,
    /// Fraction of rows whose thresholded prediction matches the label.
    pub accuracy: f32,
}

/// Evaluates a trained model on held-out data.
///
/// Predictions are the model's outputs rounded at 0.5.
///
/// # Arguments
/// * `model` - The trained model.
/// * `params` - The parameters produced by training.
/// * `x` - Held-out features, one row per sample.
/// * `y` - Held-out labels, one row per sample.
///
/// # Returns
/// The prediction distribution and accuracy, or an error for empty or
/// mismatched inputs.
pub fn evaluate(
    model: &mut Sequential,
    params: &[f32],
    x: ArrayView2<f32>,
    y: ArrayView2<f32>,
) -> Result<Evaluation> {
    if x.nrows() != y.nrows() {
        return Err(MlErr::ShapeMismatch {
            what: "eval rows",
            got: y.nrows(),
            expected: x.nrows(),
        });
    }
    if x.nrows() == 0 {
        return Err(MlErr::EmptyLabels);
    }

    let y_pred = model.forward(params, x)?;
    let rounded = y_pred.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 });

    let n = y.nrows() as f32;
    let matches = rounded
        .iter()
        .zip(y.iter())
        .filter(|(pred, label)| pred == label)
        .count();

    Ok(Evaluation {
        positive_fraction: rounded.sum() / n,
        accuracy: matches as f32 / n,
    })
}
