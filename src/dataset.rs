use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::{MlErr, Result};

/// A fixed in-memory table: one feature row per sample plus a binary label
/// (0.0 or 1.0) per row.
pub struct Dataset {
    features: Array2<f32>,
    labels: Array1<f32>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `features` - The feature matrix, one row per sample.
    /// * `labels` - The label vector, one entry per feature row.
    ///
    /// # Returns
    /// A new `Dataset`, or `MlErr::ShapeMismatch` if the row counts disagree.
    pub fn new(features: Array2<f32>, labels: Array1<f32>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(MlErr::ShapeMismatch {
                what: "dataset rows",
                got: labels.len(),
                expected: features.nrows(),
            });
        }

        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<f32> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<f32> {
        self.labels.view()
    }

    /// The labels as a single-column matrix, the shape models train on.
    pub fn targets(&self) -> ArrayView2<f32> {
        self.labels.view().insert_axis(Axis(1))
    }

    /// Counts the rows carrying `label`.
    pub fn count(&self, label: f32) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Removes the first `count` rows carrying `label`, preserving the
    /// relative order of everything else.
    ///
    /// # Arguments
    /// * `label` - The class to starve.
    /// * `count` - How many rows of that class to drop.
    ///
    /// # Returns
    /// The reduced dataset, or `MlErr::ClassUnderflow` when `count` exceeds
    /// the rows available for that class.
    pub fn remove_labeled(&self, label: f32, count: usize) -> Result<Dataset> {
        let available = self.count(label);
        if count > available {
            return Err(MlErr::ClassUnderflow {
                requested: count,
                available,
            });
        }

        let mut remaining = count;
        let keep: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| {
                if l == label && remaining > 0 {
                    remaining -= 1;
                    false
                } else {
                    true
                }
            })
            .map(|(i, _)| i)
            .collect();

        Ok(self.take(&keep))
    }

    /// Seeded, stratified train/test split: each class is shuffled and
    /// partitioned by `test_ratio` separately, so both classes show up in the
    /// held-out set even under heavy skew.
    ///
    /// # Arguments
    /// * `test_ratio` - The fraction of each class held out for testing.
    /// * `seed` - Seed for the shuffles; the same seed always yields the same split.
    ///
    /// # Returns
    /// A `(train, test)` pair whose sizes sum to `self.len()`, or
    /// `MlErr::InvalidInput` when `test_ratio` lies outside [0, 1].
    pub fn split(&self, test_ratio: f32, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(0.0..=1.0).contains(&test_ratio) {
            return Err(MlErr::InvalidInput("test_ratio must be within [0, 1]"));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut train_idx = Vec::new();
        let mut test_idx = Vec::new();

        for label in [0.0, 1.0] {
            let mut indices: Vec<usize> = self
                .labels
                .iter()
                .enumerate()
                .filter(|&(_, &l)| l == label)
                .map(|(i, _)| i)
                .collect();
            indices.shuffle(&mut rng);

            let test_len = (indices.len() as f32 * test_ratio).round() as usize;
            let (test, train) = indices.split_at(test_len);
            test_idx.extend_from_slice(test);
            train_idx.extend_from_slice(train);
        }

        Ok((self.take(&train_idx), self.take(&test_idx)))
    }

    fn take(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }
}

/// Two Gaussian blobs in the plane: class 0.0 centered at `(-center, -center)`,
/// class 1.0 at `(center, center)`, both with standard deviation `spread`.
///
/// Stands in for an external table source; the same seed always yields the
/// same rows. Negative rows come first, then positive rows.
///
/// # Errors
/// Returns `MlErr::InvalidInput` when `spread` is not positive and finite.
pub fn two_blobs(
    n_neg: usize,
    n_pos: usize,
    center: f32,
    spread: f32,
    seed: u64,
) -> Result<Dataset> {
    // Normal::new itself accepts a negative std_dev (it reflects), so the
    // bound has to be checked here
    if !(spread > 0.0 && spread.is_finite()) {
        return Err(MlErr::InvalidInput("spread must be positive and finite"));
    }

    let noise = Normal::new(0.0f32, spread)
        .map_err(|_| MlErr::InvalidInput("spread must be positive and finite"))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let len = n_neg + n_pos;
    let mut data = Vec::with_capacity(len * 2);
    let mut labels = Vec::with_capacity(len);

    for (n, label, c) in [(n_neg, 0.0, -center), (n_pos, 1.0, center)] {
        for _ in 0..n {
            data.push(c + noise.sample(&mut rng));
            data.push(c + noise.sample(&mut rng));
            labels.push(label);
        }
    }

    Dataset::new(
        Array2::from_shape_vec((len, 2), data).unwrap(),
        Array1::from_vec(labels),
    )
}
