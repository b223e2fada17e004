//! Tamper-evident decision artifacts.
//!
//! Every terminal verdict produces exactly one artifact. The artifact hash
//! is a SHA-256 digest of the canonical JSON form of all fields except the
//! hash and signature themselves; the signature covers the hash. Auditors
//! can recompute both offline.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::digest::{compute_digest, sha256_hex};
use crate::domain::error::{Result, TribunalError};
use crate::domain::session::{EvaluationSession, Verdict};

/// Artifact schema identifier, bumped on any field change.
pub const SCHEMA_VERSION: &str = "tribunal.artifact.v1";

/// Signed, hash-addressed record of one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionArtifact {
    pub decision_id: Uuid,
    pub schema_version: String,
    pub session_id: Uuid,
    /// SHA-256 of the objective text.
    pub objective_hash: String,
    /// The AI-generated output that was validated.
    pub output: String,
    /// Composite confidence of the last scored level.
    pub composite_confidence: f64,
    pub threshold_applied: f64,
    pub final_verdict: Verdict,
    pub escalation_path: Vec<u32>,
    pub timestamp: DateTime<Utc>,
    /// SHA-256 of the canonical JSON of every field above.
    pub artifact_hash: String,
    /// Ed25519 signature over `artifact_hash`, hex-encoded.
    pub signature: String,
}

impl DecisionArtifact {
    /// Build an unsigned artifact from a terminated session.
    ///
    /// The caller signs `artifact_hash` and attaches the signature before
    /// the artifact leaves the engine.
    pub fn build(session: &EvaluationSession, output: &str, now: DateTime<Utc>) -> Result<Self> {
        let final_verdict = session.verdict().ok_or(TribunalError::InvalidTransition {
            from: session.status.name().to_string(),
            to: "artifact".to_string(),
        })?;
        let mut artifact = Self {
            decision_id: Uuid::new_v4(),
            schema_version: SCHEMA_VERSION.to_string(),
            session_id: session.session_id,
            objective_hash: sha256_hex(session.objective.text.as_bytes()),
            output: output.to_string(),
            composite_confidence: session.final_confidence,
            threshold_applied: session.tier.confidence_threshold,
            final_verdict,
            escalation_path: session.escalation_path.clone(),
            timestamp: now,
            artifact_hash: String::new(),
            signature: String::new(),
        };
        artifact.artifact_hash = artifact.compute_hash()?;
        Ok(artifact)
    }

    /// Canonical hash of the artifact content, excluding hash and signature.
    ///
    /// The preimage lists fields explicitly so that unrelated struct changes
    /// can never silently alter existing hashes.
    pub fn compute_hash(&self) -> Result<String> {
        let preimage = serde_json::json!({
            "decision_id": self.decision_id.to_string(),
            "schema_version": self.schema_version,
            "session_id": self.session_id.to_string(),
            "objective_hash": self.objective_hash,
            "output": self.output,
            "composite_confidence": self.composite_confidence,
            "threshold_applied": self.threshold_applied,
            "final_verdict": self.final_verdict.as_str(),
            "escalation_path": self.escalation_path,
            "timestamp": self.timestamp.to_rfc3339(),
        });
        compute_digest(&preimage)
    }

    /// Recompute the content hash and compare against the stored one.
    pub fn verify_integrity(&self) -> Result<()> {
        let actual = self.compute_hash()?;
        if actual != self.artifact_hash {
            return Err(TribunalError::HashMismatch {
                expected: self.artifact_hash.clone(),
                actual,
            });
        }
        Ok(())
    }
}

/// Write a decision artifact to disk as pretty JSON.
pub fn write_artifact(artifact: &DecisionArtifact, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(artifact)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a decision artifact from disk.
pub fn read_artifact(path: &Path) -> Result<DecisionArtifact> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::objective::{Objective, RiskLevel};
    use crate::domain::run::ValidatorRun;
    use crate::domain::tier::TierPolicy;

    fn accepted_session(composite: f64) -> EvaluationSession {
        let now = Utc::now();
        let objective = Objective::new("is the sky blue", RiskLevel::Balanced, now).unwrap();
        let tier = TierPolicy::standard()
            .resolve(RiskLevel::Balanced)
            .unwrap()
            .clone();
        let mut session = EvaluationSession::new(objective, tier, now);
        session.start_level(0, 3).unwrap();
        let batch = vec![ValidatorRun::new(3, "validator-a", true, 0.9, 0.9, "h", now); 3];
        session.record_batch(batch, composite).unwrap();
        session.accept().unwrap();
        session
    }

    #[test]
    fn test_build_sets_canonical_hash() {
        let session = accepted_session(0.92);
        let artifact = DecisionArtifact::build(&session, "the sky is blue", Utc::now()).unwrap();
        assert_eq!(artifact.artifact_hash.len(), 64);
        assert!(artifact.artifact_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(artifact.schema_version, SCHEMA_VERSION);
        assert_eq!(artifact.final_verdict, Verdict::Accept);
        assert!(artifact.signature.is_empty());
    }

    #[test]
    fn test_build_rejects_non_terminal_session() {
        let now = Utc::now();
        let objective = Objective::new("q", RiskLevel::Low, now).unwrap();
        let tier = TierPolicy::standard().resolve(RiskLevel::Low).unwrap().clone();
        let session = EvaluationSession::new(objective, tier, now);
        let err = DecisionArtifact::build(&session, "out", now).unwrap_err();
        assert!(matches!(err, TribunalError::InvalidTransition { .. }));
    }

    #[test]
    fn test_verify_integrity_ok() {
        let session = accepted_session(0.92);
        let artifact = DecisionArtifact::build(&session, "the sky is blue", Utc::now()).unwrap();
        artifact.verify_integrity().unwrap();
    }

    #[test]
    fn test_verify_integrity_survives_json_roundtrip() {
        // A perfect composite exercises the integer-valued float path in
        // canonical JSON; the hash must come out identical after parsing.
        let session = accepted_session(1.0);
        let artifact = DecisionArtifact::build(&session, "the sky is blue", Utc::now()).unwrap();
        let json = serde_json::to_string(&artifact).unwrap();
        let parsed: DecisionArtifact = serde_json::from_str(&json).unwrap();
        parsed.verify_integrity().unwrap();
        assert_eq!(parsed.artifact_hash, artifact.artifact_hash);
    }

    #[test]
    fn test_tampered_fields_break_the_hash() {
        let session = accepted_session(0.92);
        let artifact = DecisionArtifact::build(&session, "the sky is blue", Utc::now()).unwrap();

        let mut tampered = artifact.clone();
        tampered.output = "the sky is green".to_string();
        assert!(matches!(
            tampered.verify_integrity(),
            Err(TribunalError::HashMismatch { .. })
        ));

        let mut tampered = artifact.clone();
        tampered.composite_confidence = 0.99;
        assert!(tampered.verify_integrity().is_err());

        let mut tampered = artifact;
        tampered.final_verdict = Verdict::Fail;
        assert!(tampered.verify_integrity().is_err());
    }

    #[test]
    fn test_signature_does_not_affect_the_hash() {
        let session = accepted_session(0.92);
        let mut artifact = DecisionArtifact::build(&session, "the sky is blue", Utc::now()).unwrap();
        let before = artifact.artifact_hash.clone();
        artifact.signature = "ab".repeat(64);
        artifact.verify_integrity().unwrap();
        assert_eq!(artifact.artifact_hash, before);
    }

    #[test]
    fn test_write_and_read_artifact() {
        let session = accepted_session(0.92);
        let artifact = DecisionArtifact::build(&session, "the sky is blue", Utc::now()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decision.json");
        write_artifact(&artifact, &path).unwrap();
        let loaded = read_artifact(&path).unwrap();
        assert_eq!(artifact, loaded);
        loaded.verify_integrity().unwrap();
    }
}
