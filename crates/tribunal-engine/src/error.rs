//! Error types for the escalation engine

use thiserror::Error;

use tribunal_core::TribunalError;
use tribunal_gateway::GatewayError;
use tribunal_store::StoreError;

/// Errors surfaced by an evaluation.
///
/// Gateway and deadline failures abort the session before any artifact
/// exists; signing and blocking-persistence failures abort after the
/// verdict but before the caller sees it.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Objective or tier was rejected, or the session state machine refused
    /// a transition
    #[error(transparent)]
    Domain(#[from] TribunalError),

    /// Validator gateway unreachable
    #[error("Validator gateway unavailable: {0}")]
    Gateway(#[from] GatewayError),

    /// Session exceeded its wall-clock budget
    #[error("Session deadline exceeded after {elapsed_ms}ms")]
    DeadlineExceeded { elapsed_ms: u64 },

    /// Artifact signing failed
    #[error("Artifact signing failed: {0}")]
    Signing(String),

    /// Blocking persistence failed after the decision was signed
    #[error("Decision persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EvaluationError>;
