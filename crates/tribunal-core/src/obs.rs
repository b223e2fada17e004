//! Structured observability hooks for the evaluation lifecycle.
//!
//! This module provides:
//! - Session-scoped tracing spans via the `SessionSpan` RAII guard
//! - Emission functions for lifecycle events: session start, level scoring,
//!   degradation, verdict, artifact signing, persistence
//!
//! Events are emitted at `info!` level with a structured `event` field so
//! that JSON log pipelines can filter on `event = "session.decided"` etc.

use tracing::{info, warn};

/// RAII guard that enters a session-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = SessionSpan::enter("4b51…", "balanced");
/// // All tracing calls now carry session_id and risk_level fields.
/// ```
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    /// Create and enter a span tagged with the session id and risk level.
    pub fn enter(session_id: &str, risk_level: &str) -> Self {
        let span =
            tracing::info_span!("tribunal.session", session_id = %session_id, risk_level = %risk_level);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: evaluation session started.
pub fn emit_session_started(session_id: &str, risk_level: &str, threshold: f64) {
    info!(
        event = "session.started",
        session_id = %session_id,
        risk_level = %risk_level,
        threshold = threshold,
    );
}

/// Emit event: a ladder level began with the given redundancy.
pub fn emit_level_started(session_id: &str, level_index: usize, redundancy_level: u32) {
    info!(
        event = "level.started",
        session_id = %session_id,
        level_index = level_index,
        redundancy_level = redundancy_level,
    );
}

/// Emit event: a batch came back short and was padded (warning level).
pub fn emit_level_degraded(session_id: &str, redundancy_level: u32, received: usize) {
    warn!(
        event = "level.degraded",
        session_id = %session_id,
        redundancy_level = redundancy_level,
        received = received,
    );
}

/// Emit event: a level's batch was scored.
pub fn emit_level_scored(
    session_id: &str,
    redundancy_level: u32,
    composite: f64,
    threshold: f64,
    band: &str,
) {
    info!(
        event = "level.scored",
        session_id = %session_id,
        redundancy_level = redundancy_level,
        composite = composite,
        threshold = threshold,
        band = %band,
    );
}

/// Emit event: session reached a terminal verdict.
pub fn emit_session_decided(
    session_id: &str,
    verdict: &str,
    confidence: f64,
    total_attempts: usize,
    duration_ms: u64,
) {
    info!(
        event = "session.decided",
        session_id = %session_id,
        verdict = %verdict,
        confidence = confidence,
        total_attempts = total_attempts,
        duration_ms = duration_ms,
    );
}

/// Emit event: session aborted before any verdict (warning level).
pub fn emit_session_aborted(session_id: &str, error: &dyn std::fmt::Display) {
    warn!(event = "session.aborted", session_id = %session_id, error = %error);
}

/// Emit event: artifact hash signed.
pub fn emit_artifact_signed(session_id: &str, decision_id: &str, artifact_hash: &str) {
    info!(
        event = "artifact.signed",
        session_id = %session_id,
        decision_id = %decision_id,
        artifact_hash = %artifact_hash,
    );
}

/// Emit event: decision durably recorded.
pub fn emit_decision_persisted(session_id: &str, decision_id: &str) {
    info!(event = "decision.persisted", session_id = %session_id, decision_id = %decision_id);
}

/// Emit event: persistence failed (warning level; best-effort mode only).
pub fn emit_persist_failed(session_id: &str, decision_id: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "decision.persist_failed",
        session_id = %session_id,
        decision_id = %decision_id,
        error = %error,
    );
}
