//! Classification metrics for held-out splits

use std::fmt;

use serde::Serialize;

/// Precision, recall and f1 for one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics and overall accuracy of a binary classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub negative: ClassMetrics,
    pub positive: ClassMetrics,
    pub accuracy: f64,
    pub samples: usize,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn class_metrics(truth: &[bool], predicted: &[bool], class: bool) -> ClassMetrics {
    let pairs = || truth.iter().zip(predicted);
    let tp = pairs().filter(|(t, p)| **t == class && **p == class).count();
    let predicted_count = predicted.iter().filter(|p| **p == class).count();
    let support = truth.iter().filter(|t| **t == class).count();

    let precision = ratio(tp, predicted_count);
    let recall = ratio(tp, support);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    ClassMetrics {
        precision,
        recall,
        f1,
        support,
    }
}

impl ClassificationReport {
    /// Compare predicted labels against the truth
    #[must_use]
    pub fn new(truth: &[bool], predicted: &[bool]) -> Self {
        let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
        Self {
            negative: class_metrics(truth, predicted, false),
            positive: class_metrics(truth, predicted, true),
            accuracy: ratio(correct, truth.len()),
            samples: truth.len(),
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>10} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for (name, m) in [("0", &self.negative), ("1", &self.positive)] {
            writeln!(
                f,
                "{name:>10} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.precision, m.recall, m.f1, m.support
            )?;
        }
        write!(f, "{:>10} {:>29.2} {:>9}", "accuracy", self.accuracy, self.samples)
    }
}
