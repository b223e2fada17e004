//! Tier policy: risk level → threshold, escalation ladder, auto-fail permission.

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TribunalError};
use crate::domain::objective::RiskLevel;

/// One row of escalation policy, keyed by risk level.
///
/// A session snapshots its tier at creation; policy changes never affect
/// sessions already running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Risk level this tier applies to.
    pub risk_level: RiskLevel,
    /// Composite confidence required to accept (inclusive).
    pub confidence_threshold: f64,
    /// Redundancy levels to climb, in order. Non-empty, strictly increasing.
    pub escalation_ladder: Vec<u32>,
    /// Whether exhausting the ladder may yield FAIL instead of MANUAL_REVIEW.
    pub allow_auto_fail: bool,
}

impl Tier {
    /// Create a tier and check its invariants.
    pub fn new(
        risk_level: RiskLevel,
        confidence_threshold: f64,
        escalation_ladder: Vec<u32>,
        allow_auto_fail: bool,
    ) -> Result<Self> {
        let tier = Self {
            risk_level,
            confidence_threshold,
            escalation_ladder,
            allow_auto_fail,
        };
        tier.validate()?;
        Ok(tier)
    }

    /// Check ladder and threshold invariants.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(TribunalError::InvalidTier(format!(
                "confidence threshold {} outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if self.escalation_ladder.is_empty() {
            return Err(TribunalError::InvalidTier(
                "escalation ladder must not be empty".to_string(),
            ));
        }
        if self.escalation_ladder.iter().any(|&level| level == 0) {
            return Err(TribunalError::InvalidTier(
                "redundancy levels must be positive".to_string(),
            ));
        }
        if self.escalation_ladder.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TribunalError::InvalidTier(format!(
                "escalation ladder {:?} must be strictly increasing",
                self.escalation_ladder
            )));
        }
        Ok(())
    }
}

/// Deterministic mapping from risk levels to tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub tiers: Vec<Tier>,
}

impl TierPolicy {
    /// An empty policy; every resolution fails until tiers are added.
    pub fn empty() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Add or replace the tier for a risk level (builder pattern).
    ///
    /// The tier is validated before it is installed.
    pub fn with_tier(mut self, tier: Tier) -> Result<Self> {
        tier.validate()?;
        self.tiers.retain(|t| t.risk_level != tier.risk_level);
        self.tiers.push(tier);
        Ok(self)
    }

    /// Look up the tier for a risk level.
    ///
    /// Resolution never falls back to a default: an unmapped risk level is
    /// an error, not a guess.
    pub fn resolve(&self, risk_level: RiskLevel) -> Result<&Tier> {
        self.tiers
            .iter()
            .find(|t| t.risk_level == risk_level)
            .ok_or_else(|| TribunalError::UnknownRiskLevel(risk_level.to_string()))
    }

    /// Reference policy table.
    ///
    /// | Risk level | Threshold | Ladder    | Auto-fail |
    /// |------------|-----------|-----------|-----------|
    /// | low        | 0.50      | [1, 3, 5] | yes       |
    /// | balanced   | 0.65      | [3, 5]    | no        |
    /// | oracle     | 0.85      | [3, 5]    | no        |
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                Tier {
                    risk_level: RiskLevel::Low,
                    confidence_threshold: 0.50,
                    escalation_ladder: vec![1, 3, 5],
                    allow_auto_fail: true,
                },
                Tier {
                    risk_level: RiskLevel::Balanced,
                    confidence_threshold: 0.65,
                    escalation_ladder: vec![3, 5],
                    allow_auto_fail: false,
                },
                Tier {
                    risk_level: RiskLevel::Oracle,
                    confidence_threshold: 0.85,
                    escalation_ladder: vec![3, 5],
                    allow_auto_fail: false,
                },
            ],
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
