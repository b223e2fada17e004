//! Individual validator results within an escalation batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for identities and hashes a validator did not report.
pub const UNKNOWN: &str = "unknown";

/// One validator's evaluation of an output against an objective.
///
/// Scores are clamped to [0, 1] at construction; the trust arithmetic
/// assumes in-range weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorRun {
    /// Redundancy level of the batch this run belongs to.
    pub redundancy_level: u32,
    /// Opaque identity of the validator that produced this run.
    pub validator_identity: String,
    /// The validator's boolean judgement.
    pub valid: bool,
    /// Self-reported confidence in the judgement, in [0, 1].
    pub confidence_score: f64,
    /// The validator's overall quality score for the output, in [0, 1].
    pub overall_score: f64,
    /// Hash of the validator's raw response payload.
    pub data_hash: String,
    pub produced_at: DateTime<Utc>,
}

impl ValidatorRun {
    pub fn new(
        redundancy_level: u32,
        validator_identity: impl Into<String>,
        valid: bool,
        confidence_score: f64,
        overall_score: f64,
        data_hash: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            redundancy_level,
            validator_identity: validator_identity.into(),
            valid,
            confidence_score: confidence_score.clamp(0.0, 1.0),
            overall_score: overall_score.clamp(0.0, 1.0),
            data_hash: data_hash.into(),
            produced_at: now,
        }
    }

    /// Placeholder for a validator slot that never answered.
    ///
    /// Missing slots count against the batch: invalid, zero confidence.
    pub fn missing(redundancy_level: u32, now: DateTime<Utc>) -> Self {
        Self {
            redundancy_level,
            validator_identity: UNKNOWN.to_string(),
            valid: false,
            confidence_score: 0.0,
            overall_score: 0.0,
            data_hash: UNKNOWN.to_string(),
            produced_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_scores() {
        let run = ValidatorRun::new(3, "validator-a", true, 1.7, -0.2, "abc", Utc::now());
        assert_eq!(run.confidence_score, 1.0);
        assert_eq!(run.overall_score, 0.0);
    }

    #[test]
    fn test_missing_slot_shape() {
        let run = ValidatorRun::missing(5, Utc::now());
        assert_eq!(run.redundancy_level, 5);
        assert_eq!(run.validator_identity, UNKNOWN);
        assert!(!run.valid);
        assert_eq!(run.confidence_score, 0.0);
        assert_eq!(run.data_hash, UNKNOWN);
    }

    #[test]
    fn test_serde_field_names() {
        let run = ValidatorRun::new(1, "validator-a", true, 0.9, 0.8, "abc", Utc::now());
        let json = serde_json::to_value(&run).unwrap();
        assert!(json.get("validator_identity").is_some());
        assert!(json.get("redundancy_level").is_some());
        assert!(json.get("confidence_score").is_some());
    }
}
