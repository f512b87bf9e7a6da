//! Classifier-style evaluation of predicted tiers against reviewer labels.
//!
//! Reports are recomputed from scratch on every call because the labeled set grows
//! between calls; nothing here is cached or persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{ConsultationRecord, RiskTier};

/// Below this many labeled results no metrics are reported.
pub const MINIMUM_LABELED_SAMPLES: usize = 5;

/// One scored result paired with the reviewer's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledPrediction {
    pub predicted: RiskTier,
    pub actual: RiskTier,
}

impl LabeledPrediction {
    pub fn new(predicted: RiskTier, actual: RiskTier) -> Self {
        Self { predicted, actual }
    }

    /// `None` when the record has not been labeled yet.
    pub fn from_record(record: &ConsultationRecord) -> Option<Self> {
        record
            .ground_truth
            .map(|actual| Self::new(record.result.tier, actual))
    }
}

/// Rows are actual tiers, columns predicted tiers, both in [`RiskTier::ordered`] order.
pub type ConfusionMatrix = [[usize; 4]; 4];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub sample_count: usize,
    pub has_sufficient_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ClassificationMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub f1_weighted: f64,
    pub precision_weighted: f64,
    pub recall_weighted: f64,
    pub f1_per_tier: BTreeMap<RiskTier, f64>,
    pub per_tier: Vec<TierMetrics>,
    pub confusion_matrix: ConfusionMatrix,
    pub labels: [&'static str; 4],
}

/// Precision, recall and F1 for one tier, with its count of actual occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierMetrics {
    pub tier: RiskTier,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

pub fn evaluate(samples: &[LabeledPrediction]) -> EvaluationReport {
    let sample_count = samples.len();
    if sample_count < MINIMUM_LABELED_SAMPLES {
        return EvaluationReport {
            sample_count,
            has_sufficient_data: false,
            message: Some(format!(
                "not enough data for evaluation: {sample_count} labeled result(s), at least {MINIMUM_LABELED_SAMPLES} required"
            )),
            metrics: None,
        };
    }

    let confusion_matrix = confusion_matrix(samples);
    let correct: usize = (0..4).map(|index| confusion_matrix[index][index]).sum();
    let accuracy = correct as f64 / sample_count as f64;

    let per_tier: Vec<TierMetrics> = RiskTier::ordered()
        .into_iter()
        .map(|tier| tier_metrics(tier, &confusion_matrix))
        .collect();

    let weighted = |metric: fn(&TierMetrics) -> f64| -> f64 {
        let total_support: usize = per_tier.iter().map(|entry| entry.support).sum();
        if total_support == 0 {
            return 0.0;
        }
        per_tier
            .iter()
            .map(|entry| metric(entry) * entry.support as f64)
            .sum::<f64>()
            / total_support as f64
    };

    let metrics = ClassificationMetrics {
        accuracy,
        f1_weighted: weighted(|entry| entry.f1),
        precision_weighted: weighted(|entry| entry.precision),
        recall_weighted: weighted(|entry| entry.recall),
        f1_per_tier: per_tier.iter().map(|entry| (entry.tier, entry.f1)).collect(),
        confusion_matrix,
        labels: RiskTier::ordered().map(RiskTier::label),
        per_tier,
    };

    EvaluationReport {
        sample_count,
        has_sufficient_data: true,
        message: None,
        metrics: Some(metrics),
    }
}

/// Evaluate every labeled record in a store snapshot; unlabeled records are skipped.
pub fn evaluate_records<'a, I>(records: I) -> EvaluationReport
where
    I: IntoIterator<Item = &'a ConsultationRecord>,
{
    let samples: Vec<LabeledPrediction> = records
        .into_iter()
        .filter_map(LabeledPrediction::from_record)
        .collect();
    evaluate(&samples)
}

pub fn confusion_matrix(samples: &[LabeledPrediction]) -> ConfusionMatrix {
    let mut matrix = [[0usize; 4]; 4];
    for sample in samples {
        matrix[sample.actual.index()][sample.predicted.index()] += 1;
    }
    matrix
}

fn tier_metrics(tier: RiskTier, matrix: &ConfusionMatrix) -> TierMetrics {
    let index = tier.index();
    let true_positive = matrix[index][index];
    let predicted_total: usize = (0..4).map(|row| matrix[row][index]).sum();
    let support: usize = matrix[index].iter().sum();
    let false_positive = predicted_total - true_positive;
    let false_negative = support - true_positive;

    let precision = ratio(true_positive, predicted_total);
    let recall = ratio(true_positive, support);
    let f1 = ratio(
        2 * true_positive,
        2 * true_positive + false_positive + false_negative,
    );

    TierMetrics {
        tier,
        precision,
        recall,
        f1,
        support,
    }
}

// Zero denominators yield 0 rather than NaN.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Percentage with two decimals, the way reports display metrics.
pub fn as_percent(value: f64) -> f64 {
    (value * 10_000.0).round() / 100.0
}
