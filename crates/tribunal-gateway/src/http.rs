//! HTTP client for the validator gateway
//!
//! Speaks a small JSON protocol to a completion endpoint and a pool of
//! validator endpoints. Validation requests for one level are fanned out
//! concurrently, one task per redundancy slot, and joined before returning;
//! a failed slot is logged and dropped so the caller sees a short batch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use tribunal_core::{Objective, ValidatorRun, UNKNOWN};

use crate::error::GatewayError;
use crate::gateway_traits::{GatewayResult, ValidatorGateway};

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Completion endpoint URL
    pub completion_url: String,
    /// Validator endpoint URLs, assigned to slots round-robin
    pub validator_urls: Vec<String>,
    /// Bearer token (optional for unauthenticated fleets)
    pub token: Option<String>,
}

impl GatewayConfig {
    /// Create config for explicit endpoints
    pub fn new(completion_url: &str, validator_urls: Vec<String>) -> Self {
        GatewayConfig {
            completion_url: completion_url.to_string(),
            validator_urls,
            token: None,
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Create a new config from environment variables
    ///
    /// Requires `TRIBUNAL_COMPLETION_URL` and `TRIBUNAL_VALIDATORS`
    /// (comma-separated endpoint list); `TRIBUNAL_GATEWAY_TOKEN` is
    /// optional.
    pub fn from_env() -> GatewayResult<Self> {
        let completion_url = std::env::var("TRIBUNAL_COMPLETION_URL").map_err(|_| {
            GatewayError::NotConfigured("TRIBUNAL_COMPLETION_URL is not set".to_string())
        })?;

        let validators = std::env::var("TRIBUNAL_VALIDATORS").map_err(|_| {
            GatewayError::NotConfigured("TRIBUNAL_VALIDATORS is not set".to_string())
        })?;
        let validator_urls: Vec<String> = validators
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if validator_urls.is_empty() {
            return Err(GatewayError::NotConfigured(
                "TRIBUNAL_VALIDATORS contains no endpoints".to_string(),
            ));
        }

        let token = std::env::var("TRIBUNAL_GATEWAY_TOKEN").ok();

        Ok(GatewayConfig {
            completion_url,
            validator_urls,
            token,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest {
    objective: String,
    risk_level: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    output: String,
}

#[derive(Debug, Serialize)]
struct ValidationRequest {
    objective: String,
    output: String,
    redundancy_level: u32,
    slot: u32,
}

/// One validator's answer. Missing identity or evidence fields are
/// tolerated and replaced with `"unknown"`.
#[derive(Debug, Deserialize)]
struct ValidationResponse {
    #[serde(default)]
    validator_identity: Option<String>,
    valid: bool,
    #[serde(default)]
    confidence_score: f64,
    #[serde(default)]
    overall_score: f64,
    #[serde(default)]
    data_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// HttpValidatorGateway
// ---------------------------------------------------------------------------

/// HTTP-backed implementation of [`ValidatorGateway`].
pub struct HttpValidatorGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl HttpValidatorGateway {
    /// Create a new gateway client
    pub fn new(config: GatewayConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("tribunal-gateway/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        HttpValidatorGateway {
            config,
            http_client,
        }
    }

    /// Create client from environment variables
    pub fn from_env() -> GatewayResult<Self> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    /// Validator endpoint for a 1-indexed slot, round-robin over the pool.
    fn validator_url(&self, slot: u32) -> &str {
        let idx = ((slot - 1) as usize) % self.config.validator_urls.len();
        &self.config.validator_urls[idx]
    }
}

#[async_trait]
impl ValidatorGateway for HttpValidatorGateway {
    async fn complete(&self, objective: &Objective, budget: Duration) -> GatewayResult<String> {
        debug!(risk_level = %objective.risk_level, "requesting completion");

        let request = CompletionRequest {
            objective: objective.text.clone(),
            risk_level: objective.risk_level.to_string(),
        };

        let mut builder = self
            .http_client
            .post(&self.config.completion_url)
            .timeout(budget)
            .json(&request);
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;
        if completion.output.trim().is_empty() {
            return Err(GatewayError::Protocol(
                "completion output is empty".to_string(),
            ));
        }

        Ok(completion.output)
    }

    async fn invoke(
        &self,
        objective: &Objective,
        output: &str,
        redundancy_level: u32,
        budget: Duration,
    ) -> GatewayResult<Vec<ValidatorRun>> {
        if self.config.validator_urls.is_empty() {
            return Err(GatewayError::NotConfigured(
                "no validator endpoints configured".to_string(),
            ));
        }

        debug!(redundancy_level, "fanning out validation requests");

        let mut tasks: Vec<JoinHandle<GatewayResult<ValidatorRun>>> = Vec::new();

        for slot in 1..=redundancy_level {
            let client = self.http_client.clone();
            let url = self.validator_url(slot).to_string();
            let token = self.config.token.clone();
            let request = ValidationRequest {
                objective: objective.text.clone(),
                output: output.to_string(),
                redundancy_level,
                slot,
            };

            let task = tokio::spawn(async move {
                let mut builder = client.post(&url).timeout(budget).json(&request);
                if let Some(token) = &token {
                    builder = builder.bearer_auth(token);
                }

                let response = builder.send().await?;
                if !response.status().is_success() {
                    return Err(GatewayError::Status {
                        status: response.status().as_u16(),
                        body: response.text().await.unwrap_or_default(),
                    });
                }

                let answer: ValidationResponse = response
                    .json()
                    .await
                    .map_err(|e| GatewayError::Protocol(e.to_string()))?;

                Ok(ValidatorRun::new(
                    redundancy_level,
                    answer
                        .validator_identity
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    answer.valid,
                    answer.confidence_score,
                    answer.overall_score,
                    answer.data_hash.unwrap_or_else(|| UNKNOWN.to_string()),
                    Utc::now(),
                ))
            });

            tasks.push(task);
        }

        // Join all slots; failures shrink the batch instead of aborting it.
        let mut runs = Vec::new();
        for task in tasks {
            match task.await {
                Ok(Ok(run)) => runs.push(run),
                Ok(Err(e)) => warn!(error = %e, "validator request dropped"),
                Err(e) => warn!(error = %e, "validator task failed"),
            }
        }

        Ok(runs)
    }
}
