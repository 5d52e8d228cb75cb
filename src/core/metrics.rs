//! Evaluation Metrics
//!
//! Held-out accuracy and per-position hit counts for the position classifier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hits for a single position label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelHits {
    pub correct: usize,
    pub total: usize,
}

/// Held-out evaluation of a trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub train_size: usize,
    pub test_size: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub n_classes: usize,
    pub per_label: BTreeMap<i32, LabelHits>,
}

impl EvaluationReport {
    /// Build a report from actual and predicted test labels
    ///
    /// Returns `None` when there is nothing to evaluate or the lengths differ.
    pub fn from_predictions(
        actual: &[i32],
        predicted: &[i32],
        train_size: usize,
        n_classes: usize,
    ) -> Option<Self> {
        let accuracy = accuracy(actual, predicted)?;

        let mut per_label: BTreeMap<i32, LabelHits> = BTreeMap::new();
        for (&a, &p) in actual.iter().zip(predicted) {
            let hits = per_label.entry(a).or_default();
            hits.total += 1;
            if a == p {
                hits.correct += 1;
            }
        }

        Some(Self {
            train_size,
            test_size: actual.len(),
            correct: per_label.values().map(|h| h.correct).sum(),
            accuracy,
            n_classes,
            per_label,
        })
    }
}

/// Fraction of predictions equal to the actual label
pub fn accuracy(actual: &[i32], predicted: &[i32]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    Some(correct as f64 / actual.len() as f64)
}
