//! Domain models for Tribunal.
//!
//! Canonical definitions for the core entities:
//! - `Objective`: The text under judgement and its declared risk
//! - `Tier` / `TierPolicy`: Risk-keyed escalation policy
//! - `ValidatorRun`: One validator's result within a batch
//! - `EvaluationSession`: The escalation state machine
//! - `DecisionArtifact`: Signed, hash-addressed decision record

pub mod artifact;
pub mod digest;
pub mod error;
pub mod objective;
pub mod run;
pub mod session;
pub mod tier;
pub mod trust;

// Re-export main types and errors
pub use artifact::{read_artifact, write_artifact, DecisionArtifact, SCHEMA_VERSION};
pub use error::{Result, SignatureError, TribunalError};
pub use objective::{Objective, RiskLevel, MAX_OBJECTIVE_CHARS};
pub use run::{ValidatorRun, UNKNOWN};
pub use session::{EvaluationSession, SessionStatus, Verdict};
pub use tier::{Tier, TierPolicy};
