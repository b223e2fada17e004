//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryDecisionStore` and `FailingDecisionStore` that satisfy
//! the trait contracts without any external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryDecisionStore
// ---------------------------------------------------------------------------

/// In-memory decision store backed by a `HashMap<decision_id, StoredDecision>`.
///
/// Enforces the same contract as the SurrealDB backend: append-only writes,
/// `seq`-ordered runs, and a newest-first listing capped at
/// [`MAX_LIST_LIMIT`].
#[derive(Debug, Default)]
pub struct MemoryDecisionStore {
    decisions: Mutex<HashMap<String, StoredDecision>>,
}

impl MemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of decisions currently held.
    pub fn len(&self) -> usize {
        self.decisions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl DecisionStore for MemoryDecisionStore {
    async fn store_decision(
        &self,
        decision: &DecisionRecord,
        runs: &[ValidatorRunRecord],
    ) -> StorageResult<()> {
        let mut decisions = self.decisions.lock().unwrap();
        if decisions.contains_key(&decision.decision_id) {
            return Err(StoreError::DuplicateDecision {
                decision_id: decision.decision_id.clone(),
            });
        }
        let mut runs = runs.to_vec();
        runs.sort_by_key(|r| r.seq);
        decisions.insert(
            decision.decision_id.clone(),
            StoredDecision {
                decision: decision.clone(),
                runs,
            },
        );
        Ok(())
    }

    async fn load_decision(&self, decision_id: &str) -> StorageResult<StoredDecision> {
        let decisions = self.decisions.lock().unwrap();
        decisions
            .get(decision_id)
            .cloned()
            .ok_or_else(|| StoreError::DecisionNotFound {
                decision_id: decision_id.to_string(),
            })
    }

    async fn recent_decisions(&self, limit: usize) -> StorageResult<Vec<DecisionSummary>> {
        if limit > MAX_LIST_LIMIT {
            return Err(StoreError::InvalidLimit {
                limit,
                max: MAX_LIST_LIMIT,
            });
        }
        let decisions = self.decisions.lock().unwrap();
        let mut summaries: Vec<DecisionSummary> = decisions
            .values()
            .map(|stored| DecisionSummary::from_record(&stored.decision))
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries.truncate(limit);
        Ok(summaries)
    }
}

// ---------------------------------------------------------------------------
// FailingDecisionStore
// ---------------------------------------------------------------------------

/// Decision store whose every operation fails with a connection error.
///
/// Used to exercise durability-policy handling in the escalation engine.
#[derive(Debug, Default)]
pub struct FailingDecisionStore;

impl FailingDecisionStore {
    pub fn new() -> Self {
        Self
    }

    fn offline() -> StoreError {
        StoreError::Connection("decision store offline".to_string())
    }
}

#[async_trait]
impl DecisionStore for FailingDecisionStore {
    async fn store_decision(
        &self,
        _decision: &DecisionRecord,
        _runs: &[ValidatorRunRecord],
    ) -> StorageResult<()> {
        Err(Self::offline())
    }

    async fn load_decision(&self, _decision_id: &str) -> StorageResult<StoredDecision> {
        Err(Self::offline())
    }

    async fn recent_decisions(&self, _limit: usize) -> StorageResult<Vec<DecisionSummary>> {
        Err(Self::offline())
    }
}
