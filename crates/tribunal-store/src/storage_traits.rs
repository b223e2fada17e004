//! Storage trait definitions for Tribunal decision persistence
//!
//! The traits in this module define the contract between the escalation
//! engine and its durability backend. Records are deliberately plain data:
//! the engine owns the domain types and maps them into these rows before
//! handing them over, so the storage layer never depends on domain crates.
//!
//! Backends:
//! - [`crate::surreal_store::SurrealDecisionStore`] - SurrealDB (production)
//! - [`crate::fakes::MemoryDecisionStore`] - in-memory fake (tests)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StoreError>;

/// Maximum number of rows a single listing may return.
pub const MAX_LIST_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Persisted form of one signed decision.
///
/// Field values are carried verbatim from the decision artifact; the store
/// never recomputes hashes or signatures. Identifiers are plain strings so
/// the row survives schema-version changes in the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision_id: String,
    pub schema_version: String,
    pub session_id: String,
    pub objective_hash: String,
    pub output: String,
    pub composite_confidence: f64,
    pub threshold_applied: f64,
    pub final_verdict: String,
    pub escalation_path: Vec<u32>,
    pub decision_reason: String,
    pub artifact_hash: String,
    pub signature: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted form of one validator run.
///
/// `seq` is 1-indexed and orders the runs of a decision in the order the
/// escalation attempted them (level by level, slot by slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorRunRecord {
    pub decision_id: String,
    pub seq: u32,
    pub redundancy_level: u32,
    pub validator_identity: String,
    pub valid: bool,
    pub confidence_score: f64,
    pub overall_score: f64,
    pub data_hash: String,
    pub produced_at: DateTime<Utc>,
}

/// A decision together with its validator runs, as loaded from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDecision {
    pub decision: DecisionRecord,
    pub runs: Vec<ValidatorRunRecord>,
}

/// Listing row for `recent_decisions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub decision_id: String,
    pub final_verdict: String,
    pub composite_confidence: f64,
    pub threshold_applied: f64,
    pub escalation_path: Vec<u32>,
    pub decision_reason: String,
    pub created_at: DateTime<Utc>,
}

impl DecisionSummary {
    /// Projects a full record down to its listing row.
    pub fn from_record(record: &DecisionRecord) -> Self {
        Self {
            decision_id: record.decision_id.clone(),
            final_verdict: record.final_verdict.clone(),
            composite_confidence: record.composite_confidence,
            threshold_applied: record.threshold_applied,
            escalation_path: record.escalation_path.clone(),
            decision_reason: record.decision_reason.clone(),
            created_at: record.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Decision Store
// ---------------------------------------------------------------------------

/// Append-only store of decisions and their validator runs.
///
/// Guarantees:
/// - `store_decision` never overwrites: a `decision_id` that already exists
///   is rejected with [`StoreError::DuplicateDecision`] and the store is
///   left unchanged.
/// - A decision and its runs are stored together; a loaded decision always
///   carries every run that was stored with it.
/// - `load_decision` returns runs in ascending `seq` order.
/// - `recent_decisions` orders newest-first by `created_at` and rejects
///   limits above [`MAX_LIST_LIMIT`] with [`StoreError::InvalidLimit`].
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Persists a decision and its validator runs.
    async fn store_decision(
        &self,
        decision: &DecisionRecord,
        runs: &[ValidatorRunRecord],
    ) -> StorageResult<()>;

    /// Loads a decision and its runs by decision id.
    async fn load_decision(&self, decision_id: &str) -> StorageResult<StoredDecision>;

    /// Lists the most recent decisions, newest first.
    async fn recent_decisions(&self, limit: usize) -> StorageResult<Vec<DecisionSummary>>;
}
