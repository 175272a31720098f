use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::ClassifierError;

/// Held-out evaluation scores, all in `[0, 1]`.
///
/// Precision, recall and F1 are averaged over classes weighted by each
/// class's support in the true labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Scores for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub category: Category,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of true instances
    pub support: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn check_lengths(predictions: &[Category], truth: &[Category]) -> Result<(), ClassifierError> {
    if predictions.len() != truth.len() {
        return Err(ClassifierError::DataError(format!(
            "{} predictions but {} true labels",
            predictions.len(),
            truth.len()
        )));
    }
    if truth.is_empty() {
        return Err(ClassifierError::DataError("Cannot evaluate on an empty split".into()));
    }
    Ok(())
}

/// Per-class precision, recall and F1 for every category present in either
/// `predictions` or `truth`. Undefined ratios count as zero.
pub fn per_class_metrics(predictions: &[Category], truth: &[Category]) -> Result<Vec<ClassMetrics>, ClassifierError> {
    check_lengths(predictions, truth)?;
    let labels: BTreeSet<Category> = predictions.iter().chain(truth).copied().collect();

    Ok(labels
        .into_iter()
        .map(|category| {
            let pairs = predictions.iter().zip(truth);
            let tp = pairs.clone().filter(|(p, t)| **p == category && **t == category).count();
            let predicted = predictions.iter().filter(|p| **p == category).count();
            let support = truth.iter().filter(|t| **t == category).count();

            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1_score = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics { category, precision, recall, f1_score, support }
        })
        .collect())
}

/// Accuracy and support-weighted precision, recall and F1.
///
/// # Errors
/// `DataError` if the slices differ in length or are empty.
pub fn evaluate(predictions: &[Category], truth: &[Category]) -> Result<Metrics, ClassifierError> {
    let per_class = per_class_metrics(predictions, truth)?;
    let total = truth.len() as f64;
    let correct = predictions.iter().zip(truth).filter(|(p, t)| p == t).count();

    let weighted = |score: fn(&ClassMetrics) -> f64| {
        per_class
            .iter()
            .map(|m| score(m) * m.support as f64)
            .sum::<f64>()
            / total
    };

    Ok(Metrics {
        accuracy: correct as f64 / total,
        precision: weighted(|m| m.precision),
        recall: weighted(|m| m.recall),
        f1_score: weighted(|m| m.f1_score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Category::{Billing, Login, Technical};

    #[test]
    fn test_perfect_predictions() {
        let truth = [Login, Billing, Technical, Login];
        let metrics = evaluate(&truth, &truth).unwrap();
        assert_eq!(metrics, Metrics { accuracy: 1.0, precision: 1.0, recall: 1.0, f1_score: 1.0 });
    }

    #[test]
    fn test_weighted_scores() {
        let truth = [Login, Login, Billing, Technical];
        let predictions = [Login, Billing, Billing, Billing];
        let metrics = evaluate(&predictions, &truth).unwrap();

        assert!((metrics.accuracy - 0.5).abs() < 1e-12);
        // Login: p=1, r=0.5; Billing: p=1/3, r=1; Technical: p=0, r=0
        assert!((metrics.precision - (2.0 * 1.0 + 1.0 / 3.0) / 4.0).abs() < 1e-12);
        assert!((metrics.recall - (2.0 * 0.5 + 1.0) / 4.0).abs() < 1e-12);
        let f1_login = 2.0 * 0.5 / 1.5;
        let f1_billing = 2.0 * (1.0 / 3.0) / (4.0 / 3.0);
        assert!((metrics.f1_score - (2.0 * f1_login + f1_billing) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_class_absent_from_truth_has_no_weight() {
        let per_class = per_class_metrics(&[Technical, Login], &[Login, Login]).unwrap();
        let technical = per_class.iter().find(|m| m.category == Technical).unwrap();
        assert_eq!(technical.support, 0);
        assert_eq!(technical.precision, 0.0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(evaluate(&[], &[]).is_err());
        assert!(evaluate(&[Login], &[Login, Billing]).is_err());
    }
}
