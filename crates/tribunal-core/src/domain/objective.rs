//! Objectives and the risk levels that route them into tiers.

use crate::domain::error::{Result, TribunalError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on objective text length, in characters.
pub const MAX_OBJECTIVE_CHARS: usize = 10_000;

/// Risk level declared for an objective.
///
/// Higher risk demands a higher confidence threshold and removes the
/// engine's permission to auto-fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine content: low threshold, short ladder, may auto-fail.
    Low,
    /// Default grade: moderate threshold, escalation before any verdict.
    Balanced,
    /// High-stakes content: oracle-grade threshold, never auto-fails.
    Oracle,
}

impl RiskLevel {
    /// All known risk levels, in ascending order of stringency.
    pub fn all() -> [RiskLevel; 3] {
        [Self::Low, Self::Balanced, Self::Oracle]
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Balanced => write!(f, "balanced"),
            Self::Oracle => write!(f, "oracle"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = TribunalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "balanced" => Ok(Self::Balanced),
            "oracle" => Ok(Self::Oracle),
            other => Err(TribunalError::UnknownRiskLevel(other.to_string())),
        }
    }
}

/// The text whose trustworthiness is being judged, plus its declared risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub text: String,
    pub risk_level: RiskLevel,
    pub submitted_at: DateTime<Utc>,
}

impl Objective {
    /// Create a validated objective. Text must be non-empty after trimming
    /// and at most [`MAX_OBJECTIVE_CHARS`] characters.
    pub fn new(text: impl Into<String>, risk_level: RiskLevel, now: DateTime<Utc>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TribunalError::InvalidObjective(
                "text must not be empty".to_string(),
            ));
        }
        let chars = text.chars().count();
        if chars > MAX_OBJECTIVE_CHARS {
            return Err(TribunalError::InvalidObjective(format!(
                "text is {chars} characters, maximum is {MAX_OBJECTIVE_CHARS}"
            )));
        }
        Ok(Self {
            text,
            risk_level,
            submitted_at: now,
        })
    }
}
