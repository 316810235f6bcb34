use ndarray::ArrayView1;

use crate::{MlErr, Result};

/// Per-class loss weights, inversely proportional to class frequency.
///
/// For every class present in the input, `weight(c) * count(c)` is the same,
/// so rare classes contribute as much total loss as common ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassWeights {
    // index 0 holds the weight for label 0.0, index 1 for label 1.0
    weights: [f32; 2],
}

impl ClassWeights {
    /// Computes balanced weights over a binary label sequence:
    /// `weight(c) = n_total / (n_present_classes * count(c))`.
    ///
    /// # Arguments
    /// * `labels` - The training labels, 0.0 or 1.0 per entry.
    ///
    /// # Returns
    /// The weights, or `MlErr::EmptyLabels` for an empty sequence. A class
    /// absent from the input gets weight 0.0; nothing carrying that label
    /// exists to look it up.
    pub fn balanced(labels: ArrayView1<f32>) -> Result<Self> {
        if labels.is_empty() {
            return Err(MlErr::EmptyLabels);
        }

        let total = labels.len() as f32;
        let pos = labels.iter().filter(|&&l| l >= 0.5).count();
        let neg = labels.len() - pos;
        let classes = [neg, pos].iter().filter(|&&c| c > 0).count() as f32;

        let weight = |count: usize| {
            if count == 0 {
                0.0
            } else {
                total / (classes * count as f32)
            }
        };

        Ok(Self {
            weights: [weight(neg), weight(pos)],
        })
    }

    /// The weight for a sample carrying `label`.
    pub fn weight(&self, label: f32) -> f32 {
        self.weights[(label >= 0.5) as usize]
    }
}
