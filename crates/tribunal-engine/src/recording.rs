//! Persistence adapter: bridges domain artifacts to `DecisionStore` rows.
//!
//! The store crate deliberately knows nothing about domain types; these
//! conversions are the only place the two vocabularies meet. The CLI also
//! uses [`record_to_artifact`] to re-verify stored decisions offline.

use tribunal_core::{DecisionArtifact, ValidatorRun};
use tribunal_store::{DecisionRecord, ValidatorRunRecord};

/// Flatten a signed artifact and its decision reason into a storage row.
pub fn decision_to_record(artifact: &DecisionArtifact, decision_reason: &str) -> DecisionRecord {
    DecisionRecord {
        decision_id: artifact.decision_id.to_string(),
        schema_version: artifact.schema_version.clone(),
        session_id: artifact.session_id.to_string(),
        objective_hash: artifact.objective_hash.clone(),
        output: artifact.output.clone(),
        composite_confidence: artifact.composite_confidence,
        threshold_applied: artifact.threshold_applied,
        final_verdict: artifact.final_verdict.as_str().to_string(),
        escalation_path: artifact.escalation_path.clone(),
        decision_reason: decision_reason.to_string(),
        artifact_hash: artifact.artifact_hash.clone(),
        signature: artifact.signature.clone(),
        created_at: artifact.timestamp,
    }
}

/// Number a session's runs into storage rows, 1-indexed in attempt order.
pub fn runs_to_records(decision_id: &str, runs: &[ValidatorRun]) -> Vec<ValidatorRunRecord> {
    runs.iter()
        .enumerate()
        .map(|(idx, run)| ValidatorRunRecord {
            decision_id: decision_id.to_string(),
            seq: (idx + 1) as u32,
            redundancy_level: run.redundancy_level,
            validator_identity: run.validator_identity.clone(),
            valid: run.valid,
            confidence_score: run.confidence_score,
            overall_score: run.overall_score,
            data_hash: run.data_hash.clone(),
            produced_at: run.produced_at,
        })
        .collect()
}

/// Rebuild a verifiable artifact from a stored decision row.
///
/// Goes through serde so identifier and verdict parsing share the wire
/// rules of the artifact itself. The rebuilt artifact hashes to the same
/// value as the original, so signature verification still works.
pub fn record_to_artifact(record: &DecisionRecord) -> tribunal_core::Result<DecisionArtifact> {
    let value = serde_json::json!({
        "decision_id": record.decision_id,
        "schema_version": record.schema_version,
        "session_id": record.session_id,
        "objective_hash": record.objective_hash,
        "output": record.output,
        "composite_confidence": record.composite_confidence,
        "threshold_applied": record.threshold_applied,
        "final_verdict": record.final_verdict,
        "escalation_path": record.escalation_path,
        "timestamp": record.created_at.to_rfc3339(),
        "artifact_hash": record.artifact_hash,
        "signature": record.signature,
    });
    Ok(serde_json::from_value(value)?)
}
