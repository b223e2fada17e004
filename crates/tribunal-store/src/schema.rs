//! Schema definitions for Tribunal SurrealDB tables
//!
//! Tables:
//! - decisions: Signed decision records (append-only)
//! - validator_runs: Per-validator evaluations, keyed by (decision_id, seq)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage_traits::{DecisionRecord, ValidatorRunRecord};

/// Module for serializing chrono DateTime to SurrealDB datetime format
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Row stored in the `decisions` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRow {
    pub decision_id: String,
    pub schema_version: String,
    pub session_id: String,
    pub objective_hash: String,
    pub output: String,
    pub composite_confidence: f64,
    pub threshold_applied: f64,
    pub final_verdict: String,
    pub escalation_path: Vec<u32>,
    pub decision_reason: String,
    pub artifact_hash: String,
    pub signature: String,
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<&DecisionRecord> for DecisionRow {
    fn from(record: &DecisionRecord) -> Self {
        Self {
            decision_id: record.decision_id.clone(),
            schema_version: record.schema_version.clone(),
            session_id: record.session_id.clone(),
            objective_hash: record.objective_hash.clone(),
            output: record.output.clone(),
            composite_confidence: record.composite_confidence,
            threshold_applied: record.threshold_applied,
            final_verdict: record.final_verdict.clone(),
            escalation_path: record.escalation_path.clone(),
            decision_reason: record.decision_reason.clone(),
            artifact_hash: record.artifact_hash.clone(),
            signature: record.signature.clone(),
            created_at: record.created_at,
        }
    }
}

impl From<DecisionRow> for DecisionRecord {
    fn from(row: DecisionRow) -> Self {
        Self {
            decision_id: row.decision_id,
            schema_version: row.schema_version,
            session_id: row.session_id,
            objective_hash: row.objective_hash,
            output: row.output,
            composite_confidence: row.composite_confidence,
            threshold_applied: row.threshold_applied,
            final_verdict: row.final_verdict,
            escalation_path: row.escalation_path,
            decision_reason: row.decision_reason,
            artifact_hash: row.artifact_hash,
            signature: row.signature,
            created_at: row.created_at,
        }
    }
}

/// Row stored in the `validator_runs` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorRunRow {
    pub decision_id: String,
    pub seq: u32,
    pub redundancy_level: u32,
    pub validator_identity: String,
    pub valid: bool,
    pub confidence_score: f64,
    pub overall_score: f64,
    pub data_hash: String,
    #[serde(with = "surreal_datetime")]
    pub produced_at: DateTime<Utc>,
}

impl From<&ValidatorRunRecord> for ValidatorRunRow {
    fn from(record: &ValidatorRunRecord) -> Self {
        Self {
            decision_id: record.decision_id.clone(),
            seq: record.seq,
            redundancy_level: record.redundancy_level,
            validator_identity: record.validator_identity.clone(),
            valid: record.valid,
            confidence_score: record.confidence_score,
            overall_score: record.overall_score,
            data_hash: record.data_hash.clone(),
            produced_at: record.produced_at,
        }
    }
}

impl From<ValidatorRunRow> for ValidatorRunRecord {
    fn from(row: ValidatorRunRow) -> Self {
        Self {
            decision_id: row.decision_id,
            seq: row.seq,
            redundancy_level: row.redundancy_level,
            validator_identity: row.validator_identity,
            valid: row.valid,
            confidence_score: row.confidence_score,
            overall_score: row.overall_score,
            data_hash: row.data_hash,
            produced_at: row.produced_at,
        }
    }
}
