//! Database migrations and schema setup for the decision store

use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::info;

use crate::error::StoreError;
use crate::storage_traits::StorageResult;

/// Initialize all Tribunal tables
///
/// Safe to call on every startup: `DEFINE` statements are idempotent.
pub async fn init_schema(db: &Surreal<Any>) -> StorageResult<()> {
    init_decisions_table(db).await?;
    init_validator_runs_table(db).await?;
    Ok(())
}

/// Initialize the decisions table
///
/// | field                | type     | notes                         |
/// |----------------------|----------|-------------------------------|
/// | decision_id          | string   | unique                        |
/// | schema_version       | string   | artifact schema tag           |
/// | session_id           | string   | evaluation session            |
/// | objective_hash       | string   | sha256 of objective text      |
/// | output               | string   | candidate output              |
/// | composite_confidence | float    | final composite               |
/// | threshold_applied    | float    | tier threshold                |
/// | final_verdict        | string   | ACCEPT/MANUAL_REVIEW/FAIL     |
/// | escalation_path      | array    | redundancy levels attempted   |
/// | decision_reason      | string   | human-readable reason         |
/// | artifact_hash        | string   | canonical content hash        |
/// | signature            | string   | ed25519 over the hash         |
/// | created_at           | datetime | artifact timestamp            |
///
/// Rows are append-only: updates and deletes are denied at the table level.
async fn init_decisions_table(db: &Surreal<Any>) -> StorageResult<()> {
    let sql = r#"
        DEFINE TABLE decisions SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update NONE
                FOR delete NONE;
        DEFINE INDEX idx_decision_id ON TABLE decisions COLUMNS decision_id UNIQUE;
        DEFINE INDEX idx_decision_created ON TABLE decisions COLUMNS created_at;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StoreError::SchemaSetup(e.to_string()))?;
    info!("✓ decisions table initialized");
    Ok(())
}

/// Initialize the validator_runs table
///
/// | field              | type     | notes                      |
/// |--------------------|----------|----------------------------|
/// | decision_id        | string   | owning decision            |
/// | seq                | int      | 1-indexed position         |
/// | redundancy_level   | int      | slots requested at level   |
/// | validator_identity | string   | "unknown" for placeholders |
/// | valid              | bool     | validator's pass flag      |
/// | confidence_score   | float    | [0, 1]                     |
/// | overall_score      | float    | [0, 1]                     |
/// | data_hash          | string   | validator evidence hash    |
/// | produced_at        | datetime | run timestamp              |
///
/// `(decision_id, seq)` is unique; rows are append-only like decisions.
async fn init_validator_runs_table(db: &Surreal<Any>) -> StorageResult<()> {
    let sql = r#"
        DEFINE TABLE validator_runs SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update NONE
                FOR delete NONE;
        DEFINE INDEX idx_run_decision_seq ON TABLE validator_runs COLUMNS decision_id, seq UNIQUE;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StoreError::SchemaSetup(e.to_string()))?;
    info!("✓ validator_runs table initialized");
    Ok(())
}
