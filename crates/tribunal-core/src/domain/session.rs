//! Escalation sessions and the verdict state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{Result, TribunalError};
use crate::domain::objective::Objective;
use crate::domain::run::ValidatorRun;
use crate::domain::tier::Tier;

/// Final outcome of an evaluation. Wire form is the uppercase literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accept,
    ManualReview,
    Fail,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::ManualReview => "MANUAL_REVIEW",
            Self::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a session currently stands.
///
/// `Pending → Running(0) → Running(1) → … → Accepted | ManualReview | Failed`.
/// Terminal states are absorbing; every transition out of them is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Running { level_index: usize },
    Accepted,
    ManualReview,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::ManualReview | Self::Failed)
    }

    pub fn verdict(self) -> Option<Verdict> {
        match self {
            Self::Accepted => Some(Verdict::Accept),
            Self::ManualReview => Some(Verdict::ManualReview),
            Self::Failed => Some(Verdict::Fail),
            Self::Pending | Self::Running { .. } => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running { .. } => "running",
            Self::Accepted => "accepted",
            Self::ManualReview => "manual_review",
            Self::Failed => "failed",
        }
    }
}

/// One evaluation from submission to verdict.
///
/// The session snapshots its tier at creation; later policy changes never
/// reach a running session. `escalation_path` records the ladder prefix
/// actually attempted, and `runs` keeps every validator result across all
/// attempted levels for the audit record. Scoring itself only ever sees one
/// level's fresh batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSession {
    pub session_id: Uuid,
    pub objective: Objective,
    pub tier: Tier,
    pub status: SessionStatus,
    pub escalation_path: Vec<u32>,
    pub runs: Vec<ValidatorRun>,
    /// Composite confidence of the most recently scored level.
    pub final_confidence: f64,
    pub started_at: DateTime<Utc>,
}

impl EvaluationSession {
    pub fn new(objective: Objective, tier: Tier, now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            objective,
            tier,
            status: SessionStatus::Pending,
            escalation_path: Vec::new(),
            runs: Vec::new(),
            final_confidence: 0.0,
            started_at: now,
        }
    }

    /// Begin the next ladder level.
    ///
    /// Legal only from `Pending` (first level) or from the immediately
    /// preceding `Running` index; levels cannot be skipped or repeated.
    pub fn start_level(&mut self, level_index: usize, redundancy_level: u32) -> Result<()> {
        let legal = match self.status {
            SessionStatus::Pending => level_index == 0,
            SessionStatus::Running { level_index: current } => level_index == current + 1,
            _ => false,
        };
        if !legal {
            return Err(self.illegal_transition("running"));
        }
        self.escalation_path.push(redundancy_level);
        self.status = SessionStatus::Running { level_index };
        Ok(())
    }

    /// Record a scored batch for the current level.
    pub fn record_batch(&mut self, batch: Vec<ValidatorRun>, composite: f64) -> Result<()> {
        if !matches!(self.status, SessionStatus::Running { .. }) {
            return Err(self.illegal_transition("running"));
        }
        self.runs.extend(batch);
        self.final_confidence = composite;
        Ok(())
    }

    pub fn accept(&mut self) -> Result<()> {
        self.finish(SessionStatus::Accepted)
    }

    pub fn manual_review(&mut self) -> Result<()> {
        self.finish(SessionStatus::ManualReview)
    }

    pub fn fail(&mut self) -> Result<()> {
        self.finish(SessionStatus::Failed)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.status.verdict()
    }

    fn finish(&mut self, terminal: SessionStatus) -> Result<()> {
        if !matches!(self.status, SessionStatus::Running { .. }) {
            return Err(self.illegal_transition(terminal.name()));
        }
        self.status = terminal;
        Ok(())
    }

    fn illegal_transition(&self, to: &str) -> TribunalError {
        TribunalError::InvalidTransition {
            from: self.status.name().to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::objective::RiskLevel;
    use crate::domain::tier::TierPolicy;

    fn make_session() -> EvaluationSession {
        let now = Utc::now();
        let objective = Objective::new("is the sky blue", RiskLevel::Low, now).unwrap();
        let tier = TierPolicy::standard()
            .resolve(RiskLevel::Low)
            .unwrap()
            .clone();
        EvaluationSession::new(objective, tier, now)
    }

    fn make_run(level: u32) -> ValidatorRun {
        ValidatorRun::new(level, "validator-a", true, 0.9, 0.9, "hash", Utc::now())
    }

    #[test]
    fn test_happy_path_accept() {
        let mut session = make_session();
        assert_eq!(session.status, SessionStatus::Pending);

        session.start_level(0, 1).unwrap();
        session.record_batch(vec![make_run(1)], 0.94).unwrap();
        session.accept().unwrap();

        assert_eq!(session.status, SessionStatus::Accepted);
        assert_eq!(session.verdict(), Some(Verdict::Accept));
        assert_eq!(session.escalation_path, vec![1]);
        assert_eq!(session.final_confidence, 0.94);
    }

    #[test]
    fn test_escalation_records_ladder_prefix() {
        let mut session = make_session();
        session.start_level(0, 1).unwrap();
        session.record_batch(vec![make_run(1)], 0.2).unwrap();
        session.start_level(1, 3).unwrap();
        session.record_batch(vec![make_run(3); 3], 0.3).unwrap();
        session.fail().unwrap();

        assert_eq!(session.escalation_path, vec![1, 3]);
        assert_eq!(session.runs.len(), 4);
        // Last scored level wins.
        assert_eq!(session.final_confidence, 0.3);
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut session = make_session();
        session.start_level(0, 1).unwrap();
        session.accept().unwrap();

        assert!(session.start_level(1, 3).is_err());
        assert!(session.fail().is_err());
        assert!(session.manual_review().is_err());
        assert!(session.record_batch(vec![make_run(3)], 0.5).is_err());
        assert_eq!(session.status, SessionStatus::Accepted);
    }

    #[test]
    fn test_levels_cannot_be_skipped_or_repeated() {
        let mut session = make_session();
        assert!(session.start_level(1, 3).is_err());

        session.start_level(0, 1).unwrap();
        assert!(session.start_level(0, 1).is_err());
        assert!(session.start_level(2, 5).is_err());
    }

    #[test]
    fn test_cannot_finish_from_pending() {
        let mut session = make_session();
        let err = session.manual_review().unwrap_err();
        assert!(matches!(err, TribunalError::InvalidTransition { .. }));
        assert!(err.to_string().contains("pending -> manual_review"));
    }

    #[test]
    fn test_verdict_wire_literals() {
        assert_eq!(
            serde_json::to_string(&Verdict::ManualReview).unwrap(),
            r#""MANUAL_REVIEW""#
        );
        assert_eq!(Verdict::Accept.to_string(), "ACCEPT");
        assert_eq!(Verdict::Fail.as_str(), "FAIL");
    }

    #[test]
    fn test_tier_snapshot_is_isolated() {
        let session = make_session();
        // Mutating a fresh policy after session creation must not matter;
        // the session owns its tier copy.
        let _changed = TierPolicy::standard()
            .with_tier(
                crate::domain::tier::Tier::new(RiskLevel::Low, 0.99, vec![7], false).unwrap(),
            )
            .unwrap();
        assert_eq!(session.tier.confidence_threshold, 0.50);
        assert_eq!(session.tier.escalation_ladder, vec![1, 3, 5]);
    }
}
