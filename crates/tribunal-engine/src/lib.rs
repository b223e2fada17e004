//! Tribunal Engine - Risk-Tiered Escalation Orchestration
//!
//! Turns one objective into one signed, persisted verdict:
//! - Resolves the objective's risk level to a tier (threshold + ladder)
//! - Collects validator batches level by level through the gateway
//! - Accepts early when weighted consensus clears the tier threshold
//! - Escalates, then fails or routes to manual review per tier policy
//! - Signs the decision artifact and records it in the decision store

pub mod config;
pub mod error;
pub mod escalation;
pub mod recording;

// Re-export key types
pub use config::{DurabilityPolicy, EngineConfig};
pub use error::{EvaluationError, Result};
pub use escalation::EscalationEngine;
pub use recording::{decision_to_record, record_to_artifact, runs_to_records};
