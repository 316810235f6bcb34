use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;
use crate::weights::ClassWeights;

// keeps the logs and the division in loss_prime finite
const EPS: f32 = 1e-7;

/// Binary cross-entropy loss, optionally scaled per sample by class weights.
#[derive(Default, Clone, Copy)]
pub struct Bce {
    class_weights: Option<ClassWeights>,
}

impl Bce {
    /// Returns an unweighted `Bce`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a `Bce` that multiplies each sample's loss contribution by its
    /// label's weight before aggregation.
    pub fn weighted(class_weights: ClassWeights) -> Self {
        Self {
            class_weights: Some(class_weights),
        }
    }

    fn sample_weight(&self, label: f32) -> f32 {
        self.class_weights.map_or(1.0, |cw| cw.weight(label))
    }
}

impl LossFn for Bce {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        let n = y.len() as f32;

        Zip::from(&y_pred).and(&y).fold(0.0, |acc, &p, &y| {
            let p = p.clamp(EPS, 1.0 - EPS);
            acc - self.sample_weight(y) * (y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        }) / n
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        let n = y.len() as f32;
        let mut d = Array2::zeros(y_pred.raw_dim());

        Zip::from(&mut d)
            .and(&y_pred)
            .and(&y)
            .for_each(|d, &p, &y| {
                let p = p.clamp(EPS, 1.0 - EPS);
                *d = self.sample_weight(y) * (p - y) / (p * (1.0 - p) * n);
            });

        d
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array1;

    fn column(values: Vec<f32>) -> Array2<f32> {
        let len = values.len();
        Array2::from_shape_vec((len, 1), values).unwrap()
    }

    #[test]
    fn loss_at_half_is_ln_two() {
        let y_pred = column(vec![0.5, 0.5]);
        let y = column(vec![1.0, 0.0]);

        let loss = Bce::new().loss(y_pred.view(), y.view());
        assert!((loss - std::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn confident_mistakes_cost_more() {
        let y = column(vec![1.0]);
        let bce = Bce::new();

        let mild = bce.loss(column(vec![0.4]).view(), y.view());
        let bad = bce.loss(column(vec![0.1]).view(), y.view());
        assert!(bad > mild);
    }

    #[test]
    fn saturated_predictions_stay_finite() {
        let y_pred = column(vec![0.0, 1.0]);
        let y = column(vec![1.0, 0.0]);
        let bce = Bce::new();

        assert!(bce.loss(y_pred.view(), y.view()).is_finite());
        assert!(bce
            .loss_prime(y_pred.view(), y.view())
            .iter()
            .all(|d| d.is_finite()));
    }

    #[test]
    fn class_weights_scale_loss_and_gradient() {
        // 3 majority / 1 minority rows: weight(1.0) = 2.0, weight(0.0) = 2/3
        let labels = Array1::from_vec(vec![0.0, 0.0, 0.0, 1.0]);
        let cw = ClassWeights::balanced(labels.view()).unwrap();
        assert!((cw.weight(1.0) - 2.0).abs() < 1e-6);

        let y_pred = column(vec![0.5]);
        let y = column(vec![1.0]);

        let plain = Bce::new();
        let weighted = Bce::weighted(cw);

        let ratio = weighted.loss(y_pred.view(), y.view()) / plain.loss(y_pred.view(), y.view());
        assert!((ratio - 2.0).abs() < 1e-5);

        let dp = plain.loss_prime(y_pred.view(), y.view());
        let dw = weighted.loss_prime(y_pred.view(), y.view());
        assert!((dw[[0, 0]] / dp[[0, 0]] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn gradient_points_toward_the_label() {
        let y_pred = column(vec![0.3, 0.7]);
        let y = column(vec![1.0, 0.0]);

        let d = Bce::new().loss_prime(y_pred.view(), y.view());
        assert!(d[[0, 0]] < 0.0); // pushing the prediction up
        assert!(d[[1, 0]] > 0.0); // pushing it down
    }
}
