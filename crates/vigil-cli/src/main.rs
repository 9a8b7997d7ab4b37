//! Operator CLI for the Vigil gateway.
//!
//! Wraps the approval workflow and query surface over the store described by
//! `vigil.yaml`. Intended for reviewers working the pending queue and for
//! spot checks against the audit trail; output is JSON so it pipes cleanly
//! into `jq`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vigil_core::{ActionType, AuditLogEntry, GatewayConfig, StoreBackend};
use vigil_store::{AuditStore, FileStore, MemoryStore};
use vigil_workflow::{ApprovalWorkflow, QuerySurface};

#[derive(Parser, Debug)]
#[command(name = "vigil", version, about = "Vigil double-check gateway operator CLI")]
struct Cli {
    /// Path to the gateway configuration file.
    #[arg(long, default_value = "vigil.yaml", env = "VIGIL_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List entries waiting for human review, newest first.
    Pending {
        /// Maximum number of entries to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a single audit entry by correlation id.
    Show { entry_id: String },

    /// Approve a pending entry.
    Approve {
        entry_id: String,
        /// Reviewer identity recorded on the entry.
        #[arg(long = "as")]
        approver: String,
    },

    /// Reject a pending entry.
    Reject {
        entry_id: String,
        /// Reviewer identity recorded on the entry.
        #[arg(long = "as")]
        rejecter: String,
        /// Optional reason stored with the rejection.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show an actor's audit history.
    History {
        actor_id: String,
        /// Restrict to one action type, e.g. WALLET_PAYOUT.
        #[arg(long)]
        action: Option<ActionType>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Count an actor's recent entries for one action type.
    Count {
        actor_id: String,
        /// Action type, e.g. WALLET_PAYOUT.
        #[arg(long)]
        action: ActionType,
        /// Trailing window in hours (defaults to the configured window).
        #[arg(long)]
        hours: Option<i64>,
    },

    /// Print gateway health and the config summary.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let store: Arc<dyn AuditStore> = match config.store.backend {
        StoreBackend::File => Arc::new(
            FileStore::open(&config.store.directory).with_context(|| {
                format!("opening audit store in {}", config.store.directory.display())
            })?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("memory store configured; entries will not survive this process");
            Arc::new(MemoryStore::new())
        }
    };

    let workflow = ApprovalWorkflow::new(store.clone());
    let surface = QuerySurface::new(store, config);

    match cli.cmd {
        Command::Pending { limit } => {
            let entries = surface.pending(limit).await?;
            print_entries(&entries)?;
        }
        Command::Show { entry_id } => {
            let entry = surface.entry(&entry_id).await?;
            print_json(&entry)?;
        }
        Command::Approve { entry_id, approver } => {
            let entry = workflow.approve(&entry_id, &approver).await?;
            eprintln!("approved {} as {}", entry.correlation_id, approver);
            print_json(&entry)?;
        }
        Command::Reject {
            entry_id,
            rejecter,
            reason,
        } => {
            let entry = workflow
                .reject(&entry_id, &rejecter, reason.as_deref())
                .await?;
            eprintln!("rejected {} as {}", entry.correlation_id, rejecter);
            print_json(&entry)?;
        }
        Command::History {
            actor_id,
            action,
            limit,
        } => {
            let entries = surface.actor_history(&actor_id, action, limit).await?;
            print_entries(&entries)?;
        }
        Command::Count {
            actor_id,
            action,
            hours,
        } => {
            let window = hours.map(chrono::Duration::hours);
            let count = surface.recent_count(&actor_id, action, window).await?;
            println!("{}", count);
        }
        Command::Health => {
            print_json(&surface.health_status())?;
        }
    }

    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist.
fn load_config(path: &PathBuf) -> anyhow::Result<GatewayConfig> {
    if path.exists() {
        GatewayConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        Ok(GatewayConfig::default())
    }
}

fn print_entries(entries: &[AuditLogEntry]) -> anyhow::Result<()> {
    if entries.is_empty() {
        eprintln!("no entries");
        return Ok(());
    }
    for entry in entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
