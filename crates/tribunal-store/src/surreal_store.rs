//! SurrealDB-backed DecisionStore implementation
//!
//! Uses `schema::DecisionRow` and `schema::ValidatorRunRow` for persistence,
//! converting to/from `storage_traits` types at the boundary.

use async_trait::async_trait;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::migrations;
use crate::schema::{DecisionRow, ValidatorRunRow};
use crate::storage_traits::{
    DecisionRecord, DecisionStore, DecisionSummary, StorageResult, StoredDecision,
    ValidatorRunRecord, MAX_LIST_LIMIT,
};

/// SurrealDB-backed implementation of [`DecisionStore`].
pub struct SurrealDecisionStore {
    db: Surreal<Any>,
}

impl SurrealDecisionStore {
    /// Create an in-memory instance for testing.
    ///
    /// Connects to `mem://`, selects `tribunal/main`, and runs `init_schema`.
    pub async fn in_memory() -> crate::Result<Self> {
        let db = surrealdb::engine::any::connect("mem://")
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        db.use_ns("tribunal")
            .use_db("main")
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;

        info!("SurrealDecisionStore connected (in-memory)");
        Ok(Self { db })
    }

    /// Connect to an explicit SurrealDB endpoint.
    pub async fn connect(url: &str) -> crate::Result<Self> {
        let db = surrealdb::engine::any::connect(url)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

        db.use_ns("tribunal")
            .use_db("main")
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;

        info!("SurrealDecisionStore connected ({})", url);
        Ok(Self { db })
    }

    /// Create from environment variables.
    ///
    /// Honors `SURREALDB_URL` when set; otherwise falls back to local
    /// persistence under `.tribunal/db`.
    pub async fn from_env() -> crate::Result<Self> {
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            return Self::connect(&url).await;
        }

        // Default to local persistence in .tribunal/db
        let path = ".tribunal/db";
        std::fs::create_dir_all(path).map_err(|e| {
            StoreError::Connection(format!(
                "Failed to create database directory {}: {}",
                path, e
            ))
        })?;
        let url = format!("surrealkv://{}", path);
        info!("No SURREALDB_URL found, using local persistence: {}", url);

        Self::connect(&url).await
    }

    // -- private helpers -----------------------------------------------------

    /// Fetch a decision row by id, or `None` if it was never stored.
    async fn fetch_decision(&self, decision_id: &str) -> StorageResult<Option<DecisionRow>> {
        let mut res = self
            .db
            .query("SELECT * FROM decisions WHERE decision_id = $id")
            .bind(("id", decision_id.to_string()))
            .await?;

        let rows: Vec<DecisionRow> = res.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Fetch the validator runs of a decision in `seq` order.
    async fn fetch_runs(&self, decision_id: &str) -> StorageResult<Vec<ValidatorRunRow>> {
        let mut res = self
            .db
            .query("SELECT * FROM validator_runs WHERE decision_id = $id ORDER BY seq ASC")
            .bind(("id", decision_id.to_string()))
            .await?;

        let rows: Vec<ValidatorRunRow> = res.take(0)?;
        Ok(rows)
    }
}

#[async_trait]
impl DecisionStore for SurrealDecisionStore {
    async fn store_decision(
        &self,
        decision: &DecisionRecord,
        runs: &[ValidatorRunRecord],
    ) -> StorageResult<()> {
        if self.fetch_decision(&decision.decision_id).await?.is_some() {
            return Err(StoreError::DuplicateDecision {
                decision_id: decision.decision_id.clone(),
            });
        }

        debug!(decision_id = %decision.decision_id, runs = runs.len(), "storing decision");

        let row = DecisionRow::from(decision);
        let _created: Option<DecisionRow> = self.db.create("decisions").content(row).await?;

        for run in runs {
            let run_row = ValidatorRunRow::from(run);
            let _created: Option<ValidatorRunRow> =
                self.db.create("validator_runs").content(run_row).await?;
        }

        Ok(())
    }

    async fn load_decision(&self, decision_id: &str) -> StorageResult<StoredDecision> {
        let row = self.fetch_decision(decision_id).await?.ok_or_else(|| {
            StoreError::DecisionNotFound {
                decision_id: decision_id.to_string(),
            }
        })?;

        let runs = self
            .fetch_runs(decision_id)
            .await?
            .into_iter()
            .map(ValidatorRunRecord::from)
            .collect();

        Ok(StoredDecision {
            decision: DecisionRecord::from(row),
            runs,
        })
    }

    async fn recent_decisions(&self, limit: usize) -> StorageResult<Vec<DecisionSummary>> {
        if limit > MAX_LIST_LIMIT {
            return Err(StoreError::InvalidLimit {
                limit,
                max: MAX_LIST_LIMIT,
            });
        }

        let mut res = self
            .db
            .query(format!(
                "SELECT * FROM decisions ORDER BY created_at DESC LIMIT {limit}"
            ))
            .await?;

        let rows: Vec<DecisionRow> = res.take(0)?;
        Ok(rows
            .into_iter()
            .map(|row| DecisionSummary::from_record(&DecisionRecord::from(row)))
            .collect())
    }
}
