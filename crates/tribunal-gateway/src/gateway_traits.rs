//! Gateway trait definition for validator fleet access
//!
//! The escalation engine talks to the model fleet exclusively through
//! [`ValidatorGateway`]: once to produce the candidate output, then once
//! per escalation level to collect independent validator evaluations.
//!
//! Implementations:
//! - [`crate::http::HttpValidatorGateway`] - HTTP fleet client (production)
//! - [`crate::fakes::ScriptedGateway`] - scripted fake (tests)

use std::time::Duration;

use async_trait::async_trait;

use tribunal_core::{Objective, ValidatorRun};

use crate::error::GatewayError;

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Completion and validation access to the model fleet.
///
/// Guarantees:
/// - `complete` returns a non-empty candidate output or fails.
/// - `invoke` returns at most `redundancy_level` runs. Short batches are
///   legal: individual validator failures are dropped, not surfaced, and
///   the caller pads the batch back to full size.
/// - An `Err` from either operation means the gateway itself was
///   unreachable or misconfigured, never that a single validator failed.
/// - `budget` caps how long one call may take; neither operation retries.
#[async_trait]
pub trait ValidatorGateway: Send + Sync {
    /// Produce the candidate output for an objective.
    async fn complete(&self, objective: &Objective, budget: Duration) -> GatewayResult<String>;

    /// Fan out one evaluation round at the given redundancy level.
    async fn invoke(
        &self,
        objective: &Objective,
        output: &str,
        redundancy_level: u32,
        budget: Duration,
    ) -> GatewayResult<Vec<ValidatorRun>>;
}
