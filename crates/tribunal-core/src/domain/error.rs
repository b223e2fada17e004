//! Domain-level error taxonomy for Tribunal.

/// Errors produced by signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid public key encoding")]
    InvalidPublicKey,

    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    #[error("signature verification failed")]
    Verification,
}

/// Tribunal domain errors.
#[derive(Debug, thiserror::Error)]
pub enum TribunalError {
    #[error("invalid objective: {0}")]
    InvalidObjective(String),

    #[error("unknown risk level: {0}")]
    UnknownRiskLevel(String),

    #[error("invalid tier: {0}")]
    InvalidTier(String),

    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("artifact hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("signing failure: {0}")]
    Signing(String),

    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Tribunal domain operations.
pub type Result<T> = std::result::Result<T, TribunalError>;
