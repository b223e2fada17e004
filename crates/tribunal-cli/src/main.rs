//! Tribunal - Deterministic Composite-Trust Escalation CLI
//!
//! The `tribunal` command evaluates objectives through risk-tiered
//! validator consensus and manages the resulting signed decisions.
//!
//! ## Commands
//!
//! - `evaluate`: Run one objective through its tier's escalation ladder
//! - `decisions`: List or inspect persisted decisions
//! - `verify`: Re-check an artifact's hash and signature offline
//! - `tiers`: Show the standard tier policy

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use tribunal_core::{
    read_artifact, verify_artifact, Ed25519Signer, EvaluateRequest, RiskLevel, TierPolicy,
};
use tribunal_engine::{
    record_to_artifact, DurabilityPolicy, EngineConfig, EscalationEngine,
};
use tribunal_gateway::HttpValidatorGateway;
use tribunal_store::{DecisionStore, SurrealDecisionStore, MAX_LIST_LIMIT};

#[derive(Parser)]
#[command(name = "tribunal")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic composite-trust escalation engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one objective through validator consensus
    Evaluate {
        /// Objective text to evaluate
        objective: String,

        /// Risk level: low, balanced, or oracle (default: balanced)
        #[arg(short, long)]
        risk: Option<String>,

        /// Session deadline in seconds (default: 300)
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Return the decision even when persistence fails
        #[arg(long)]
        best_effort: bool,
    },

    /// Inspect persisted decisions
    Decisions {
        #[command(subcommand)]
        action: DecisionsAction,
    },

    /// Verify an artifact's hash and signature offline
    Verify {
        /// Path to an artifact JSON file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Decision id to load from the store
        #[arg(long)]
        id: Option<String>,

        /// Hex-encoded Ed25519 public key
        #[arg(long)]
        public_key: String,
    },

    /// Show the standard tier policy
    Tiers,
}

#[derive(Subcommand)]
enum DecisionsAction {
    /// List recent decisions, newest first
    List {
        /// Maximum rows to show (capped at 100)
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show one decision with its validator runs
    Show {
        /// Decision id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tribunal_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Evaluate {
            objective,
            risk,
            deadline_secs,
            best_effort,
        } => {
            let engine = build_engine(deadline_secs, best_effort).await?;
            cmd_evaluate(&engine, &objective, risk.as_deref()).await
        }
        Commands::Decisions { action } => {
            let store = SurrealDecisionStore::from_env()
                .await
                .context("Failed to connect to the decision store")?;
            match action {
                DecisionsAction::List { limit } => cmd_decisions_list(&store, limit).await,
                DecisionsAction::Show { id } => cmd_decisions_show(&store, &id).await,
            }
        }
        Commands::Verify {
            file,
            id,
            public_key,
        } => match (file, id) {
            (Some(path), None) => cmd_verify_file(&path, &public_key),
            (None, Some(id)) => {
                let store = SurrealDecisionStore::from_env()
                    .await
                    .context("Failed to connect to the decision store")?;
                cmd_verify_stored(&store, &id, &public_key).await
            }
            _ => anyhow::bail!("pass exactly one of --file or --id"),
        },
        Commands::Tiers => cmd_tiers(),
    }
}

/// Wire the engine to its HTTP gateway, env signer, and SurrealDB store.
async fn build_engine(deadline_secs: Option<u64>, best_effort: bool) -> Result<EscalationEngine> {
    let gateway = HttpValidatorGateway::from_env()
        .context("Failed to configure the validator gateway")?;
    let signer = load_signer()?;
    let store = SurrealDecisionStore::from_env()
        .await
        .context("Failed to connect to the decision store")?;

    let mut config = EngineConfig::default();
    if let Some(secs) = deadline_secs {
        config = config.with_deadline(Duration::from_secs(secs));
    }
    if best_effort {
        config = config.with_durability(DurabilityPolicy::BestEffort);
    }

    Ok(
        EscalationEngine::new(Arc::new(gateway), Arc::new(signer), Arc::new(store))
            .with_config(config),
    )
}

fn load_signer() -> Result<Ed25519Signer> {
    let seed = std::env::var("TRIBUNAL_SIGNING_KEY")
        .context("TRIBUNAL_SIGNING_KEY is not set")?;
    Ed25519Signer::from_seed_hex(&seed).context("Invalid TRIBUNAL_SIGNING_KEY")
}

/// Evaluate one objective and print the decision
async fn cmd_evaluate(
    engine: &EscalationEngine,
    objective: &str,
    risk: Option<&str>,
) -> Result<()> {
    let mut request = EvaluateRequest::new(objective);
    if let Some(risk) = risk {
        request = request.with_risk_level(risk.parse::<RiskLevel>()?);
    }

    let response = engine.evaluate(request).await?;

    println!("Verdict:     {}", response.final_verdict);
    println!(
        "Confidence:  {} (threshold {})",
        response.confidence, response.threshold
    );
    println!("Escalation:  {:?}", response.escalation_path);
    println!("Attempts:    {}", response.total_attempts);
    println!("Reason:      {}", response.decision_reason);
    println!("Decision:    {}", response.decision_id);
    println!("Artifact:    {}", response.artifact_hash);
    println!("Latency:     {}ms", response.total_latency_ms);

    Ok(())
}

/// List recent decisions
async fn cmd_decisions_list(store: &dyn DecisionStore, limit: usize) -> Result<()> {
    let decisions = store.recent_decisions(limit.min(MAX_LIST_LIMIT)).await?;

    if decisions.is_empty() {
        println!("No decisions recorded");
        return Ok(());
    }

    println!(
        "{:<38} {:<14} {:>10} {:>10}  {}",
        "DECISION", "VERDICT", "CONFIDENCE", "THRESHOLD", "PATH"
    );
    for decision in decisions {
        println!(
            "{:<38} {:<14} {:>10} {:>10}  {:?}",
            decision.decision_id,
            decision.final_verdict,
            decision.composite_confidence,
            decision.threshold_applied,
            decision.escalation_path,
        );
    }

    Ok(())
}

/// Show one decision and its validator runs
async fn cmd_decisions_show(store: &dyn DecisionStore, id: &str) -> Result<()> {
    let stored = store.load_decision(id).await?;
    let decision = &stored.decision;

    println!("Decision:    {}", decision.decision_id);
    println!("Session:     {}", decision.session_id);
    println!("Verdict:     {}", decision.final_verdict);
    println!(
        "Confidence:  {} (threshold {})",
        decision.composite_confidence, decision.threshold_applied
    );
    println!("Escalation:  {:?}", decision.escalation_path);
    println!("Reason:      {}", decision.decision_reason);
    println!("Artifact:    {}", decision.artifact_hash);
    println!("Decided at:  {}", decision.created_at.to_rfc3339());
    println!();
    println!(
        "{:>4} {:>6} {:<24} {:>6} {:>11} {:>8}",
        "SEQ", "LEVEL", "VALIDATOR", "VALID", "CONFIDENCE", "OVERALL"
    );
    for run in &stored.runs {
        println!(
            "{:>4} {:>6} {:<24} {:>6} {:>11} {:>8}",
            run.seq,
            run.redundancy_level,
            run.validator_identity,
            run.valid,
            run.confidence_score,
            run.overall_score,
        );
    }

    Ok(())
}

/// Verify an artifact file offline
fn cmd_verify_file(path: &Path, public_key: &str) -> Result<()> {
    let artifact = read_artifact(path)
        .with_context(|| format!("Failed to read artifact from {}", path.display()))?;
    verify_artifact(&artifact, public_key)?;
    print_verified(&artifact);
    Ok(())
}

/// Verify a stored decision by id
async fn cmd_verify_stored(store: &dyn DecisionStore, id: &str, public_key: &str) -> Result<()> {
    let stored = store.load_decision(id).await?;
    let artifact = record_to_artifact(&stored.decision)?;
    verify_artifact(&artifact, public_key)?;
    print_verified(&artifact);
    Ok(())
}

fn print_verified(artifact: &tribunal_core::DecisionArtifact) {
    println!("✓ artifact {} verified", artifact.decision_id);
    println!("  verdict:   {}", artifact.final_verdict);
    println!("  hash:      {}", artifact.artifact_hash);
    println!("  signed at: {}", artifact.timestamp.to_rfc3339());
}

/// Print the standard tier policy
fn cmd_tiers() -> Result<()> {
    let policy = TierPolicy::standard();

    println!(
        "{:<10} {:>9}  {:<12} {}",
        "RISK", "THRESHOLD", "LADDER", "ON EXHAUSTION"
    );
    for risk in RiskLevel::all() {
        let tier = policy.resolve(risk)?;
        let ladder = tier
            .escalation_ladder
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let exhaustion = if tier.allow_auto_fail {
            "fail"
        } else {
            "manual review"
        };
        println!(
            "{:<10} {:>9.2}  {:<12} {}",
            risk.to_string(),
            tier.confidence_threshold,
            format!("[{ladder}]"),
            exhaustion,
        );
    }

    Ok(())
}
