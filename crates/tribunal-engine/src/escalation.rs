//! Escalation orchestration: levels, consensus, decision, artifact.
//!
//! One [`EscalationEngine::evaluate`] call drives a whole session:
//!
//! 1. Validate the objective and snapshot its tier.
//! 2. Ask the gateway for one candidate output.
//! 3. Walk the tier's escalation ladder. Each level fans out a fresh
//!    validator batch, pads it back to full size if the gateway came up
//!    short, scores it, and accepts early when the composite clears the
//!    tier threshold.
//! 4. Exhausted ladders fail (low tier) or go to manual review.
//! 5. Build, sign, and persist the decision artifact.
//!
//! Gateway and deadline failures abort with no artifact and no persisted
//! decision. Padding never counts as a gateway failure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::warn;

use tribunal_core::{
    composite_confidence, has_sufficient_responses, obs, ArtifactSigner, ConfidenceBand,
    DecisionArtifact, EvaluateRequest, EvaluateResponse, EvaluationSession, Objective, RiskLevel,
    TierPolicy, ValidatorRun, Verdict,
};
use tribunal_gateway::ValidatorGateway;
use tribunal_store::DecisionStore;

use crate::config::{DurabilityPolicy, EngineConfig};
use crate::error::{EvaluationError, Result};
use crate::recording::{decision_to_record, runs_to_records};

/// Risk-tiered escalation engine.
///
/// Holds its collaborators behind trait objects so tests can swap in
/// scripted gateways, failing stores, and deterministic signers.
pub struct EscalationEngine {
    gateway: Arc<dyn ValidatorGateway>,
    signer: Arc<dyn ArtifactSigner>,
    store: Arc<dyn DecisionStore>,
    policy: TierPolicy,
    config: EngineConfig,
}

impl EscalationEngine {
    /// Create an engine with the standard tier policy and default config.
    pub fn new(
        gateway: Arc<dyn ValidatorGateway>,
        signer: Arc<dyn ArtifactSigner>,
        store: Arc<dyn DecisionStore>,
    ) -> Self {
        Self {
            gateway,
            signer,
            store,
            policy: TierPolicy::standard(),
            config: EngineConfig::default(),
        }
    }

    /// Replace the tier policy
    pub fn with_policy(mut self, policy: TierPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the engine config
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate one objective end to end.
    pub async fn evaluate(&self, request: EvaluateRequest) -> Result<EvaluateResponse> {
        let start = Instant::now();

        let risk = request.risk_level.unwrap_or(self.config.default_risk);
        let objective = Objective::new(&request.objective, risk, Utc::now())?;
        let tier = self.policy.resolve(risk)?.clone();

        let mut session = EvaluationSession::new(objective, tier, Utc::now());
        let session_id = session.session_id.to_string();
        let risk_name = risk.to_string();

        let _span = obs::SessionSpan::enter(&session_id, &risk_name);
        obs::emit_session_started(&session_id, &risk_name, session.tier.confidence_threshold);

        match self.drive(&mut session, start, &session_id).await {
            Ok(response) => Ok(response),
            Err(e) => {
                obs::emit_session_aborted(&session_id, &e);
                Err(e)
            }
        }
    }

    /// Budget left before the session deadline.
    fn remaining(&self, start: Instant) -> Result<Duration> {
        let elapsed = start.elapsed();
        if elapsed >= self.config.session_deadline {
            return Err(Self::deadline(start));
        }
        Ok(self.config.session_deadline - elapsed)
    }

    fn deadline(start: Instant) -> EvaluationError {
        EvaluationError::DeadlineExceeded {
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn drive(
        &self,
        session: &mut EvaluationSession,
        start: Instant,
        session_id: &str,
    ) -> Result<EvaluateResponse> {
        // One completion per session; every level judges the same output.
        let budget = self.remaining(start)?;
        let output = match tokio::time::timeout(
            budget,
            self.gateway.complete(&session.objective, budget),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(Self::deadline(start)),
        };

        let threshold = session.tier.confidence_threshold;
        let ladder = session.tier.escalation_ladder.clone();
        let mut accepted = false;

        for (level_index, redundancy_level) in ladder.iter().copied().enumerate() {
            session.start_level(level_index, redundancy_level)?;
            obs::emit_level_started(session_id, level_index, redundancy_level);

            let budget = self.remaining(start)?;
            let mut batch = match tokio::time::timeout(
                budget,
                self.gateway
                    .invoke(&session.objective, &output, redundancy_level, budget),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => return Err(Self::deadline(start)),
            };

            // A short batch is padded with zero-confidence placeholders so
            // missing validators drag the composite down instead of
            // disappearing from the math.
            let requested = redundancy_level as usize;
            if batch.len() < requested {
                obs::emit_level_degraded(session_id, redundancy_level, batch.len());
                while batch.len() < requested {
                    batch.push(ValidatorRun::missing(redundancy_level, Utc::now()));
                }
            } else if batch.len() > requested {
                warn!(
                    requested,
                    received = batch.len(),
                    "gateway returned surplus validator runs, truncating"
                );
                batch.truncate(requested);
            }
            if !has_sufficient_responses(&batch, 1) {
                warn!(redundancy_level, "no usable validator responses at this level");
            }

            let composite = composite_confidence(&batch);
            let band = ConfidenceBand::from_score(composite);
            obs::emit_level_scored(
                session_id,
                redundancy_level,
                composite,
                threshold,
                &band.to_string(),
            );
            session.record_batch(batch, composite)?;

            if composite >= threshold {
                accepted = true;
                break;
            }
        }

        let (verdict, reason) = if accepted {
            session.accept()?;
            (
                Verdict::Accept,
                format!(
                    "Confidence {} ≥ threshold {}",
                    session.final_confidence, threshold
                ),
            )
        } else if session.tier.allow_auto_fail {
            session.fail()?;
            (
                Verdict::Fail,
                "Low-tier validation failed all levels.".to_string(),
            )
        } else {
            session.manual_review()?;
            let reason = match session.objective.risk_level {
                RiskLevel::Oracle => "Oracle-grade threshold not satisfied.",
                _ => "Balanced-tier threshold not satisfied.",
            };
            (Verdict::ManualReview, reason.to_string())
        };

        let mut artifact = DecisionArtifact::build(session, &output, Utc::now())?;
        let signature = self
            .signer
            .sign(&artifact.artifact_hash)
            .await
            .map_err(|e| EvaluationError::Signing(e.to_string()))?;
        artifact.signature = signature;

        let decision_id = artifact.decision_id.to_string();
        obs::emit_artifact_signed(session_id, &decision_id, &artifact.artifact_hash);

        let record = decision_to_record(&artifact, &reason);
        let run_records = runs_to_records(&decision_id, &session.runs);
        match self.config.durability {
            DurabilityPolicy::Blocking => {
                self.store.store_decision(&record, &run_records).await?;
                obs::emit_decision_persisted(session_id, &decision_id);
            }
            DurabilityPolicy::BestEffort => {
                match self.store.store_decision(&record, &run_records).await {
                    Ok(()) => obs::emit_decision_persisted(session_id, &decision_id),
                    Err(e) => obs::emit_persist_failed(session_id, &decision_id, &e),
                }
            }
        }

        let total_latency_ms = start.elapsed().as_millis() as u64;
        obs::emit_session_decided(
            session_id,
            verdict.as_str(),
            session.final_confidence,
            session.escalation_path.len(),
            total_latency_ms,
        );

        Ok(EvaluateResponse {
            final_verdict: verdict,
            confidence: session.final_confidence,
            threshold,
            escalation_path: session.escalation_path.clone(),
            total_attempts: session.escalation_path.len(),
            decision_reason: reason,
            total_latency_ms,
            decision_id: artifact.decision_id,
            artifact_hash: artifact.artifact_hash,
            signature: artifact.signature,
            timestamp: artifact.timestamp,
            output,
            validator_runs: session.runs.clone(),
        })
    }
}
