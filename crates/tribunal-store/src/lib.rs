//! Tribunal-Store: SurrealDB Backend for Decision Persistence
//!
//! Append-only storage for signed decisions and their validator runs.
//! The escalation engine maps its domain types into the plain records
//! defined in [`storage_traits`] before persisting, so this crate stays
//! free of domain dependencies.
//!
//! Backends:
//! - [`SurrealDecisionStore`]: SurrealDB over mem://, surrealkv:// or ws://
//! - [`fakes::MemoryDecisionStore`]: in-memory fake for tests

mod error;
pub mod fakes;
mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_store;

pub use error::StoreError;
pub use fakes::{FailingDecisionStore, MemoryDecisionStore};
pub use storage_traits::{
    DecisionRecord, DecisionStore, DecisionSummary, StorageResult, StoredDecision,
    ValidatorRunRecord, MAX_LIST_LIMIT,
};
pub use surreal_store::SurrealDecisionStore;

/// Result type for tribunal-store operations
pub type Result<T> = std::result::Result<T, StoreError>;
