//! Evaluation API request and response contracts.
//!
//! These are the wire shapes callers program against. Field names are part
//! of the public contract; renaming any of them is a breaking change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::objective::RiskLevel;
use crate::domain::run::ValidatorRun;
use crate::domain::session::Verdict;

/// One evaluation request.
///
/// An absent `risk_level` falls back to the engine's configured default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub objective: String,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

impl EvaluateRequest {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            risk_level: None,
        }
    }

    /// Pin the risk level instead of using the engine default (builder pattern).
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }
}

/// The full result of one evaluation, audit fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub final_verdict: Verdict,
    /// Composite confidence of the last scored level, 3 decimals.
    pub confidence: f64,
    /// Confidence threshold the tier applied.
    pub threshold: f64,
    /// Redundancy levels actually attempted, in order.
    pub escalation_path: Vec<u32>,
    /// Number of escalation levels attempted (`escalation_path.len()`).
    pub total_attempts: usize,
    pub decision_reason: String,
    pub total_latency_ms: u64,
    pub decision_id: Uuid,
    pub artifact_hash: String,
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    /// The AI-generated output that was validated.
    pub output: String,
    /// Every validator run from every attempted level, in order.
    pub validator_runs: Vec<ValidatorRun>,
}
