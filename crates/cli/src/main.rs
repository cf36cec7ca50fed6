// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! opscal - operations calendar CLI

mod commands;
mod config;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{calendar, environment, event, job, project, repo, search, App};
use config::Config;
use opscal_adapters::{GitAdapter, TracedRepoAdapter, TracedSecretStore, VaultSecretStore};
use opscal_core::SystemClock;
use opscal_engine::{Runtime, RuntimeDeps};
use opscal_storage::Store;
use output::OutputFormat;
use std::path::{Path, PathBuf};

/// Write-ahead log of every mutation, inside the state directory
const STORE_FILE: &str = "opscal.wal";

#[derive(Parser)]
#[command(
    name = "opscal",
    version,
    about = "opscal - plan, schedule and run operations jobs"
)]
struct Cli {
    /// Configuration file (default: <config dir>/opscal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project management
    Project(project::ProjectArgs),
    /// Git repositories attached to projects
    Repo(repo::RepoArgs),
    /// Deployment environments of a project
    Env(environment::EnvArgs),
    /// Job planning and execution
    Job(job::JobArgs),
    /// Manual calendar entries
    Event(event::EventArgs),
    /// Show the calendar with conflict markers
    Calendar(calendar::CalendarArgs),
    /// Recompute and list a project's conflicting events
    Conflicts(calendar::ConflictsArgs),
    /// Find projects, jobs and events by text
    Search(search::SearchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = config::state_dir()?;
    let _log_guard = logging::setup_logging(&state_dir)?;
    let config = Config::load(cli.config.as_deref())?;
    let app = build_app(&config, &state_dir)?;

    match cli.command {
        Commands::Project(args) => project::handle(args, &app, cli.format).await,
        Commands::Repo(args) => repo::handle(args, &app, cli.format).await,
        Commands::Env(args) => environment::handle(args, &app, cli.format).await,
        Commands::Job(args) => job::handle(args, &app, cli.format).await,
        Commands::Event(args) => event::handle(args, &app, cli.format).await,
        Commands::Calendar(args) => calendar::calendar(args, &app, cli.format).await,
        Commands::Conflicts(args) => calendar::conflicts(args, &app, cli.format).await,
        Commands::Search(args) => search::handle(args, &app, cli.format).await,
    }
}

fn build_app(config: &Config, state_dir: &Path) -> Result<App> {
    let store_path = state_dir.join(STORE_FILE);
    let store = Store::open(&store_path)
        .with_context(|| format!("opening store {}", store_path.display()))?;

    let vault = config
        .vault
        .clone()
        .into_vault_config(std::env::var(config::VAULT_TOKEN_ENV).ok());
    let secrets = TracedSecretStore::new(VaultSecretStore::new(vault)?);
    let repos = TracedRepoAdapter::new(
        GitAdapter::new(config.repos_root(state_dir)).with_timeout(config.execution.git_timeout),
    );

    tracing::debug!(state_dir = %state_dir.display(), "runtime ready");
    Ok(Runtime::new(
        RuntimeDeps {
            store,
            secrets,
            repos,
        },
        SystemClock,
        config.runtime_config(state_dir),
    ))
}
