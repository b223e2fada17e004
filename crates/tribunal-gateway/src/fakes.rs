//! In-memory fakes for the validator gateway (testing only)
//!
//! Provides `ScriptedGateway`, `FailingGateway`, and `SlowGateway` that
//! satisfy the trait contract without any network access.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tribunal_core::{Objective, ValidatorRun};

use crate::error::GatewayError;
use crate::gateway_traits::{GatewayResult, ValidatorGateway};

// ---------------------------------------------------------------------------
// ScriptedGateway
// ---------------------------------------------------------------------------

/// Gateway that replays pre-scripted batches, keyed by redundancy level.
///
/// A level with no script yields an empty batch, which the escalation
/// engine treats as a fully degraded round. Invocations and completion
/// calls are recorded for assertions.
#[derive(Debug)]
pub struct ScriptedGateway {
    output: String,
    batches: Mutex<HashMap<u32, Vec<ValidatorRun>>>,
    invocations: Mutex<Vec<u32>>,
    completions: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            batches: Mutex::new(HashMap::new()),
            invocations: Mutex::new(Vec::new()),
            completions: Mutex::new(Vec::new()),
        }
    }

    /// Script the batch returned for one redundancy level.
    pub fn with_batch(self, redundancy_level: u32, batch: Vec<ValidatorRun>) -> Self {
        self.batches.lock().unwrap().insert(redundancy_level, batch);
        self
    }

    /// Redundancy levels invoked so far, in order.
    pub fn invocations(&self) -> Vec<u32> {
        self.invocations.lock().unwrap().clone()
    }

    /// Number of completion calls so far.
    pub fn completions(&self) -> usize {
        self.completions.lock().unwrap().len()
    }
}

#[async_trait]
impl ValidatorGateway for ScriptedGateway {
    async fn complete(&self, objective: &Objective, _budget: Duration) -> GatewayResult<String> {
        self.completions.lock().unwrap().push(objective.text.clone());
        Ok(self.output.clone())
    }

    async fn invoke(
        &self,
        _objective: &Objective,
        _output: &str,
        redundancy_level: u32,
        _budget: Duration,
    ) -> GatewayResult<Vec<ValidatorRun>> {
        self.invocations.lock().unwrap().push(redundancy_level);
        let batches = self.batches.lock().unwrap();
        Ok(batches.get(&redundancy_level).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// FailingGateway
// ---------------------------------------------------------------------------

/// Gateway whose every operation fails as unreachable.
#[derive(Debug, Default)]
pub struct FailingGateway;

impl FailingGateway {
    pub fn new() -> Self {
        Self
    }

    fn offline() -> GatewayError {
        GatewayError::Unavailable("gateway offline".to_string())
    }
}

#[async_trait]
impl ValidatorGateway for FailingGateway {
    async fn complete(&self, _objective: &Objective, _budget: Duration) -> GatewayResult<String> {
        Err(Self::offline())
    }

    async fn invoke(
        &self,
        _objective: &Objective,
        _output: &str,
        _redundancy_level: u32,
        _budget: Duration,
    ) -> GatewayResult<Vec<ValidatorRun>> {
        Err(Self::offline())
    }
}

// ---------------------------------------------------------------------------
// SlowGateway
// ---------------------------------------------------------------------------

/// Gateway that sleeps before delegating to an inner [`ScriptedGateway`].
///
/// Used to exercise session deadlines with `tokio::time::pause`.
#[derive(Debug)]
pub struct SlowGateway {
    complete_delay: Duration,
    invoke_delay: Duration,
    inner: ScriptedGateway,
}

impl SlowGateway {
    /// Delay both operations by the same amount.
    pub fn new(delay: Duration, inner: ScriptedGateway) -> Self {
        Self::with_delays(delay, delay, inner)
    }

    /// Delay completion and validation independently.
    pub fn with_delays(
        complete_delay: Duration,
        invoke_delay: Duration,
        inner: ScriptedGateway,
    ) -> Self {
        Self {
            complete_delay,
            invoke_delay,
            inner,
        }
    }
}

#[async_trait]
impl ValidatorGateway for SlowGateway {
    async fn complete(&self, objective: &Objective, budget: Duration) -> GatewayResult<String> {
        tokio::time::sleep(self.complete_delay).await;
        self.inner.complete(objective, budget).await
    }

    async fn invoke(
        &self,
        objective: &Objective,
        output: &str,
        redundancy_level: u32,
        budget: Duration,
    ) -> GatewayResult<Vec<ValidatorRun>> {
        tokio::time::sleep(self.invoke_delay).await;
        self.inner
            .invoke(objective, output, redundancy_level, budget)
            .await
    }
}
