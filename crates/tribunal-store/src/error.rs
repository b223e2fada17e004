//! Error types for tribunal-store

use thiserror::Error;

/// Errors that can occur in the decision persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Append-only violation: the decision id is already recorded
    #[error("Decision already recorded: {decision_id}")]
    DuplicateDecision { decision_id: String },

    /// Decision not found
    #[error("Decision not found: {decision_id}")]
    DecisionNotFound { decision_id: String },

    /// Listing limit above the maximum
    #[error("Invalid listing limit {limit}, maximum is {max}")]
    InvalidLimit { limit: usize, max: usize },

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
