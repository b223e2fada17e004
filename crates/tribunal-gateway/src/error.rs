//! Error types for tribunal-gateway

use thiserror::Error;

/// Errors that can occur when talking to the validator gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Gateway endpoints are missing from the environment
    #[error("Gateway is not configured: {0}")]
    NotConfigured(String),

    /// Gateway could not be reached
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// Gateway answered with a non-success status
    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Gateway answered with a payload the client could not interpret
    #[error("Gateway protocol error: {0}")]
    Protocol(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Unavailable(err.to_string())
    }
}
