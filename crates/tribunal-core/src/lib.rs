//! Tribunal Core Library
//!
//! Domain types, trust arithmetic, and signed artifacts for the
//! composite-trust escalation engine. Everything here is deterministic:
//! identical validator responses always produce identical scores, verdicts,
//! and artifact hashes.

pub mod api;
pub mod domain;
pub mod obs;
pub mod signing;
pub mod telemetry;

pub use api::{EvaluateRequest, EvaluateResponse};

pub use domain::{
    read_artifact, write_artifact, DecisionArtifact, EvaluationSession, Objective, Result,
    RiskLevel, SessionStatus, SignatureError, Tier, TierPolicy, TribunalError, ValidatorRun,
    Verdict, MAX_OBJECTIVE_CHARS, SCHEMA_VERSION, UNKNOWN,
};

pub use domain::digest::{canonical_json, compute_digest, sha256_hex};

pub use domain::trust::{
    average_confidence, composite_confidence, has_sufficient_responses, weighted_agreement,
    ConfidenceBand,
};

pub use obs::{
    emit_artifact_signed, emit_decision_persisted, emit_level_degraded, emit_level_scored,
    emit_level_started, emit_persist_failed, emit_session_aborted, emit_session_decided,
    emit_session_started, SessionSpan,
};

pub use signing::{
    verify_artifact, verify_signature, ArtifactSigner, Ed25519Signer, FailingSigner,
    SIGNATURE_ALGORITHM,
};

pub use telemetry::init_tracing;

/// Tribunal version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
