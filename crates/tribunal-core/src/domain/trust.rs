//! Weighted-consensus arithmetic over validator batches.
//!
//! All functions here are pure and deterministic: the same batch always
//! yields the same score, bit for bit. The escalation engine makes its
//! accept/escalate decisions on these numbers alone.

use serde::{Deserialize, Serialize};

use crate::domain::run::ValidatorRun;

/// Weight of agreement in the composite score.
const AGREEMENT_WEIGHT: f64 = 0.6;
/// Weight of average confidence in the composite score.
const CONFIDENCE_WEIGHT: f64 = 0.4;

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Round to 3 decimals, half away from zero.
///
/// The rounding mode is part of the decision contract: artifacts pin the
/// rounded value, so it must never drift between releases.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Confidence-weighted share of validators that judged the output valid.
///
/// Entries with no positive confidence carry no weight. A batch with zero
/// total weight has zero agreement.
pub fn weighted_agreement(batch: &[ValidatorRun]) -> f64 {
    let mut total_weight = 0.0;
    let mut valid_weight = 0.0;
    for run in batch {
        if run.confidence_score <= 0.0 {
            continue;
        }
        total_weight += run.confidence_score;
        if run.valid {
            valid_weight += run.confidence_score;
        }
    }
    if total_weight == 0.0 {
        return 0.0;
    }
    valid_weight / total_weight
}

/// Mean confidence over the whole batch, missing slots included.
///
/// Dividing by the full batch size means a degraded batch (padded with
/// zero-confidence placeholders) scores lower than a complete one.
pub fn average_confidence(batch: &[ValidatorRun]) -> f64 {
    if batch.is_empty() {
        return 0.0;
    }
    let sum: f64 = batch.iter().map(|run| run.confidence_score).sum();
    sum / batch.len() as f64
}

/// Composite confidence for one batch:
/// `0.6 × weighted_agreement + 0.4 × average_confidence`,
/// clamped to [0, 1] and rounded to 3 decimals.
pub fn composite_confidence(batch: &[ValidatorRun]) -> f64 {
    let agreement = weighted_agreement(batch);
    let average = average_confidence(batch);
    round3(clamp01(
        AGREEMENT_WEIGHT * agreement + CONFIDENCE_WEIGHT * average,
    ))
}

/// Whether a batch carries at least `minimum` usable responses.
///
/// Usable means positive confidence; placeholders never count.
pub fn has_sufficient_responses(batch: &[ValidatorRun], minimum: usize) -> bool {
    batch
        .iter()
        .filter(|run| run.confidence_score > 0.0)
        .count()
        >= minimum
}

/// Qualitative label for a composite score, used in logs and summaries only.
///
/// Band boundaries track the standard tier thresholds; verdicts never
/// depend on bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
    Unsafe,
}

impl ConfidenceBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Self::High
        } else if score >= 0.65 {
            Self::Medium
        } else if score >= 0.50 {
            Self::Low
        } else {
            Self::Unsafe
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Unsafe => write!(f, "unsafe"),
        }
    }
}
