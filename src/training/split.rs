//! Stratified train/validation/test splitting

use ndarray::{Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices assigned to each split
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

/// Rows and labels of one split
#[derive(Debug, Clone)]
pub struct Split {
    pub features: Array2<f64>,
    pub labels: Vec<bool>,
}

impl Split {
    /// Select rows from a full matrix
    #[must_use]
    pub fn select(features: &Array2<f64>, labels: &[bool], rows: &[usize]) -> Self {
        Self {
            features: features.select(Axis(0), rows),
            labels: rows.iter().map(|&i| labels[i]).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Shuffle each class with a seeded generator and cut it into three parts
///
/// Each class contributes `round(n * fraction)` rows to the test and
/// validation splits, so class ratios are preserved. A class always keeps at
/// least one training row.
#[must_use]
pub fn stratified_split(
    labels: &[bool],
    test_fraction: f64,
    validation_fraction: f64,
    seed: u64,
) -> SplitIndices {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = SplitIndices::default();

    for class in [false, true] {
        let mut rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == class)
            .map(|(i, _)| i)
            .collect();
        rows.shuffle(&mut rng);

        let n = rows.len();
        let n_test = portion(n, test_fraction).min(n.saturating_sub(1));
        let n_val = portion(n, validation_fraction).min(n.saturating_sub(n_test + 1));

        split.test.extend_from_slice(&rows[..n_test]);
        split.validation.extend_from_slice(&rows[n_test..n_test + n_val]);
        split.train.extend_from_slice(&rows[n_test + n_val..]);
    }

    split.train.sort_unstable();
    split.validation.sort_unstable();
    split.test.sort_unstable();
    split
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn portion(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction).round() as usize
}
