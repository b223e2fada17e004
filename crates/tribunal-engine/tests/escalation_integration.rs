//! Integration tests for the escalation engine with scripted gateways,
//! in-memory stores, and deterministic signers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use tribunal_core::{
    verify_artifact, ArtifactSigner, Ed25519Signer, EvaluateRequest, FailingSigner, RiskLevel,
    TierPolicy, TribunalError, ValidatorRun, Verdict,
};
use tribunal_engine::{
    record_to_artifact, DurabilityPolicy, EngineConfig, EscalationEngine, EvaluationError,
};
use tribunal_gateway::{FailingGateway, ScriptedGateway, SlowGateway, ValidatorGateway};
use tribunal_store::{DecisionStore, FailingDecisionStore, MemoryDecisionStore};

fn run(level: u32, valid: bool, confidence: f64) -> ValidatorRun {
    ValidatorRun::new(
        level,
        format!("validator-{level}"),
        valid,
        confidence,
        confidence,
        "evidence-hash",
        Utc::now(),
    )
}

/// Unanimous pass at 0.9 confidence: composite 0.96.
fn strong_batch(level: u32) -> Vec<ValidatorRun> {
    (0..level).map(|_| run(level, true, 0.9)).collect()
}

/// Unanimous reject at 0.5 confidence: composite 0.2.
fn weak_batch(level: u32) -> Vec<ValidatorRun> {
    (0..level).map(|_| run(level, false, 0.5)).collect()
}

fn signer() -> Ed25519Signer {
    Ed25519Signer::from_bytes(&[7u8; 32])
}

fn engine(gateway: Arc<dyn ValidatorGateway>, store: Arc<dyn DecisionStore>) -> EscalationEngine {
    EscalationEngine::new(gateway, Arc::new(signer()), store)
}

/// Test: first-level consensus accepts without touching later levels
#[tokio::test]
async fn test_accepts_at_first_level_without_escalating() {
    let gateway = Arc::new(ScriptedGateway::new("the fix").with_batch(3, strong_batch(3)));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway.clone(), store.clone());

    let response = engine
        .evaluate(EvaluateRequest::new("harden the parser").with_risk_level(RiskLevel::Balanced))
        .await
        .expect("evaluation failed");

    assert_eq!(response.final_verdict, Verdict::Accept);
    assert_eq!(response.confidence, 0.96);
    assert_eq!(response.threshold, 0.65);
    assert_eq!(response.escalation_path, vec![3]);
    assert_eq!(response.total_attempts, 1);
    assert_eq!(response.validator_runs.len(), 3);
    assert_eq!(response.decision_reason, "Confidence 0.96 ≥ threshold 0.65");
    assert_eq!(response.output, "the fix");
    assert_eq!(gateway.invocations(), vec![3], "level 5 must not run");
    assert_eq!(store.len(), 1, "decision should be persisted");
}

/// Test: weak first level escalates, strong second level accepts
#[tokio::test]
async fn test_escalates_once_then_accepts() {
    let gateway = Arc::new(
        ScriptedGateway::new("candidate")
            .with_batch(3, weak_batch(3))
            .with_batch(5, strong_batch(5)),
    );
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway.clone(), store.clone());

    let response = engine
        .evaluate(EvaluateRequest::new("refactor the cache").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::Accept);
    assert_eq!(response.escalation_path, vec![3, 5]);
    assert_eq!(response.total_attempts, 2);
    assert_eq!(response.validator_runs.len(), 8, "both levels' runs are kept");
    assert_eq!(response.confidence, 0.96, "confidence is the last batch's");
    assert_eq!(gateway.invocations(), vec![3, 5]);
    assert_eq!(gateway.completions(), 1, "one completion per session");
}

/// Test: balanced tier exhaustion routes to manual review
#[tokio::test]
async fn test_balanced_exhaustion_goes_to_manual_review() {
    let gateway = Arc::new(
        ScriptedGateway::new("candidate")
            .with_batch(3, weak_batch(3))
            .with_batch(5, weak_batch(5)),
    );
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store.clone());

    let response = engine
        .evaluate(EvaluateRequest::new("migrate the schema").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::ManualReview);
    assert_eq!(response.decision_reason, "Balanced-tier threshold not satisfied.");
    assert_eq!(response.escalation_path, vec![3, 5]);
    assert_eq!(response.total_attempts, 2);
    assert_eq!(store.len(), 1, "manual review still persists an artifact");
}

/// Test: low tier exhaustion auto-fails
#[tokio::test]
async fn test_low_tier_exhaustion_fails() {
    let gateway = Arc::new(
        ScriptedGateway::new("candidate")
            .with_batch(1, weak_batch(1))
            .with_batch(3, weak_batch(3))
            .with_batch(5, weak_batch(5)),
    );
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store.clone());

    let response = engine
        .evaluate(EvaluateRequest::new("rename a local variable").with_risk_level(RiskLevel::Low))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::Fail);
    assert_eq!(response.decision_reason, "Low-tier validation failed all levels.");
    assert_eq!(response.escalation_path, vec![1, 3, 5]);
    assert_eq!(response.total_attempts, 3);
    assert_eq!(response.validator_runs.len(), 9);
    assert_eq!(store.len(), 1, "failed verdicts are persisted too");
}

/// Test: low tier accepts at its first, single-validator level
#[tokio::test]
async fn test_low_tier_accepts_at_level_one() {
    // One valid run at 0.5: agreement 1.0, average 0.5, composite 0.8,
    // well above the 0.5 low threshold.
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(1, vec![run(1, true, 0.5)]));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway.clone(), store);

    let response = engine
        .evaluate(EvaluateRequest::new("fix a typo").with_risk_level(RiskLevel::Low))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::Accept);
    assert_eq!(response.confidence, 0.8);
    assert_eq!(response.threshold, 0.5);
    assert_eq!(response.escalation_path, vec![1]);
    assert_eq!(gateway.invocations(), vec![1]);
}

/// Test: oracle tier exhaustion names the oracle reason
#[tokio::test]
async fn test_oracle_exhaustion_names_oracle_reason() {
    let gateway = Arc::new(
        ScriptedGateway::new("candidate")
            .with_batch(3, weak_batch(3))
            .with_batch(5, weak_batch(5)),
    );
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store);

    let response = engine
        .evaluate(EvaluateRequest::new("rotate signing keys").with_risk_level(RiskLevel::Oracle))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::ManualReview);
    assert_eq!(response.decision_reason, "Oracle-grade threshold not satisfied.");
    assert_eq!(response.threshold, 0.85);
}

/// Test: composite exactly at the threshold accepts (inclusive comparison)
#[tokio::test]
async fn test_accepts_at_exact_threshold() {
    // Three unanimous passes at 0.125: agreement 1.0, average 0.125,
    // composite 0.6 + 0.05 = 0.65, exactly the balanced threshold.
    let batch: Vec<ValidatorRun> = (0..3).map(|_| run(3, true, 0.125)).collect();
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, batch));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store);

    let response = engine
        .evaluate(EvaluateRequest::new("tune the retry budget").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::Accept);
    assert_eq!(response.confidence, 0.65);
    assert_eq!(response.decision_reason, "Confidence 0.65 ≥ threshold 0.65");
}

/// Test: a request without a risk level falls back to the balanced tier
#[tokio::test]
async fn test_default_risk_is_balanced() {
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, strong_batch(3)));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store);

    let response = engine
        .evaluate(EvaluateRequest::new("update the changelog"))
        .await
        .unwrap();

    assert_eq!(response.threshold, 0.65);
    assert_eq!(response.escalation_path, vec![3]);
}

/// Test: short batches are padded with zero-confidence placeholders
#[tokio::test]
async fn test_degraded_batch_is_padded_with_placeholders() {
    // One real validator out of three: agreement 1.0 (placeholders carry
    // no weight), average 0.3, composite 0.72.
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, vec![run(3, true, 0.9)]));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store);

    let response = engine
        .evaluate(EvaluateRequest::new("patch the allocator").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap();

    assert_eq!(response.final_verdict, Verdict::Accept);
    assert_eq!(response.confidence, 0.72);
    assert_eq!(response.validator_runs.len(), 3, "padded slots stay in the record");
    let placeholders = response
        .validator_runs
        .iter()
        .filter(|r| r.validator_identity == "unknown")
        .count();
    assert_eq!(placeholders, 2);
}

/// Test: surplus runs beyond the requested redundancy are dropped
#[tokio::test]
async fn test_surplus_batch_is_truncated() {
    let mut surplus = strong_batch(3);
    surplus.push(run(3, false, 0.0));
    surplus.push(run(3, false, 0.0));
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, surplus));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store);

    let response = engine
        .evaluate(EvaluateRequest::new("bump a dependency").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap();

    assert_eq!(response.total_attempts, 1);
    assert_eq!(response.validator_runs.len(), 3);
    assert_eq!(response.confidence, 0.96, "extra runs must not dilute the batch");
}

/// Test: unreachable gateway aborts with nothing persisted
#[tokio::test]
async fn test_gateway_unavailable_aborts_without_persisting() {
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(Arc::new(FailingGateway::new()), store.clone());

    let err = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluationError::Gateway(_)));
    assert_eq!(store.len(), 0, "no artifact may exist for an aborted session");
}

/// Test: a session that overruns its deadline during completion aborts
#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded_aborts() {
    let slow = SlowGateway::new(Duration::from_secs(400), ScriptedGateway::new("late"));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(Arc::new(slow), store.clone());

    let err = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluationError::DeadlineExceeded { .. }));
    assert_eq!(store.len(), 0);
}

/// Test: a deadline that expires mid-escalation also aborts cleanly
#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded_mid_escalation_aborts() {
    // Completion returns immediately; the level-3 invocation sleeps past
    // the whole 300s deadline and is cut off by the level timeout.
    let slow = SlowGateway::with_delays(
        Duration::ZERO,
        Duration::from_secs(400),
        ScriptedGateway::new("slow"),
    );
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(Arc::new(slow), store.clone());

    let err = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluationError::DeadlineExceeded { .. }));
    assert_eq!(store.len(), 0, "aborted sessions persist nothing");
}

/// Test: signing failure aborts before anything reaches the store
#[tokio::test]
async fn test_signing_failure_aborts_without_persisting() {
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, strong_batch(3)));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = EscalationEngine::new(gateway, Arc::new(FailingSigner), store.clone());

    let err = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluationError::Signing(_)));
    assert_eq!(store.len(), 0);
}

/// Test: blocking durability propagates store failures
#[tokio::test]
async fn test_blocking_persistence_failure_fails_evaluation() {
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, strong_batch(3)));
    let engine = engine(gateway, Arc::new(FailingDecisionStore::new()));

    let err = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluationError::Persistence(_)));
}

/// Test: best-effort durability still returns the signed decision
#[tokio::test]
async fn test_best_effort_persistence_failure_still_decides() {
    let gateway = Arc::new(ScriptedGateway::new("candidate").with_batch(3, strong_batch(3)));
    let engine = engine(gateway, Arc::new(FailingDecisionStore::new())).with_config(
        EngineConfig::default().with_durability(DurabilityPolicy::BestEffort),
    );

    let response = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Balanced))
        .await
        .expect("best-effort persistence must not fail the evaluation");

    assert_eq!(response.final_verdict, Verdict::Accept);
    assert!(!response.signature.is_empty());
}

/// Test: blank objectives are rejected before any validator runs
#[tokio::test]
async fn test_blank_objective_rejected() {
    let gateway = Arc::new(ScriptedGateway::new("candidate"));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway.clone(), store);

    let err = engine
        .evaluate(EvaluateRequest::new("   ").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EvaluationError::Domain(TribunalError::InvalidObjective(_))
    ));
    assert_eq!(gateway.completions(), 0, "gateway must not be called");
}

/// Test: a risk level missing from the policy is rejected
#[tokio::test]
async fn test_unconfigured_risk_level_rejected() {
    let gateway = Arc::new(ScriptedGateway::new("candidate"));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = engine(gateway, store).with_policy(TierPolicy::empty());

    let err = engine
        .evaluate(EvaluateRequest::new("anything").with_risk_level(RiskLevel::Oracle))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EvaluationError::Domain(TribunalError::UnknownRiskLevel(_))
    ));
}

/// Test: a persisted decision reloads into an artifact that verifies offline
#[tokio::test]
async fn test_persisted_decision_round_trips_and_verifies() {
    let signing = signer();
    let public_key = signing.public_key_hex();
    let gateway = Arc::new(ScriptedGateway::new("the answer").with_batch(3, strong_batch(3)));
    let store = Arc::new(MemoryDecisionStore::new());
    let engine = EscalationEngine::new(gateway, Arc::new(signing), store.clone());

    let response = engine
        .evaluate(EvaluateRequest::new("audit the ledger").with_risk_level(RiskLevel::Balanced))
        .await
        .unwrap();

    let stored = store
        .load_decision(&response.decision_id.to_string())
        .await
        .expect("decision was not persisted");
    assert_eq!(stored.runs.len(), 3);
    assert_eq!(stored.decision.decision_reason, response.decision_reason);

    let artifact = record_to_artifact(&stored.decision).unwrap();
    assert_eq!(artifact.artifact_hash, response.artifact_hash);
    verify_artifact(&artifact, &public_key).expect("stored artifact must verify");
}
