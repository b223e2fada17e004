//! Engine configuration.

use std::time::Duration;

use tribunal_core::RiskLevel;

/// How the engine treats persistence failures after a decision is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityPolicy {
    /// Persistence failure fails the evaluation.
    Blocking,
    /// Persistence failure is logged; the signed decision is still returned.
    BestEffort,
}

/// Tunable knobs for the escalation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock budget for one whole session, completion included.
    pub session_deadline: Duration,
    /// Persistence failure handling.
    pub durability: DurabilityPolicy,
    /// Risk level applied when a request does not name one.
    pub default_risk: RiskLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_deadline: Duration::from_secs(300),
            durability: DurabilityPolicy::Blocking,
            default_risk: RiskLevel::Balanced,
        }
    }
}

impl EngineConfig {
    /// Set the session deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.session_deadline = deadline;
        self
    }

    /// Set the durability policy
    pub fn with_durability(mut self, durability: DurabilityPolicy) -> Self {
        self.durability = durability;
        self
    }

    /// Set the default risk level
    pub fn with_default_risk(mut self, risk: RiskLevel) -> Self {
        self.default_risk = risk;
        self
    }
}
