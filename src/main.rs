use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use entity_engine::logging::init_tracing;
use entity_engine::rest::RestClient;
use entity_engine::{EngineConfig, EntityGroup, GroupFile, GroupState, Store, WireAction};

#[derive(Parser)]
#[command(name = "entity-engine")]
#[command(about = "Inspect and drive declarative entity groups")]
#[command(version)]
struct Cli {
    /// Engine config file (default: ~/.config/entity-engine/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default state of a group
    State {
        /// Group definition (TOML)
        group: PathBuf,
    },

    /// Fold recorded actions through a group's reducer and print the result
    Replay {
        /// Group definition (TOML)
        group: PathBuf,
        /// One wire action per line: {"type": "...", "payload": ...}
        actions: PathBuf,
    },

    /// Run one action against its endpoint
    Invoke {
        /// Group definition (TOML)
        group: PathBuf,
        /// Action name, e.g. LIST
        action: String,
        /// Session token sent with the request
        #[arg(long)]
        token: Option<String>,
        /// Invocation arguments, each a JSON value
        args: Vec<String>,
    },
}

/// Printed by `invoke`.
#[derive(Serialize)]
struct InvokeReport {
    actions: Vec<WireAction>,
    state: GroupState,
    rejected: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
    .context("Failed to load engine config")?;

    match cli.command {
        Commands::State { group } => cmd_state(&config, &group),
        Commands::Replay { group, actions } => cmd_replay(&config, &group, &actions),
        Commands::Invoke {
            group,
            action,
            token,
            args,
        } => cmd_invoke(&config, &group, &action, token, &args).await,
    }
}

fn load_group(config: &EngineConfig, path: &Path, client: Option<&RestClient>) -> Result<EntityGroup> {
    let file = GroupFile::load(path)?;
    file.build(config, client)
        .with_context(|| format!("Invalid group definition '{}'", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_state(config: &EngineConfig, path: &Path) -> Result<()> {
    let group = load_group(config, path, None)?;
    print_json(&group.default_state())
}

fn cmd_replay(config: &EngineConfig, path: &Path, actions: &Path) -> Result<()> {
    let group = load_group(config, path, None)?;
    let reducer = group.build_reducer();
    let text = std::fs::read_to_string(actions)
        .with_context(|| format!("Failed to read actions '{}'", actions.display()))?;

    let mut state = group.default_state();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let wire: WireAction = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid action", actions.display(), index + 1))?;
        state = reducer.reduce_wire(&state, &wire);
    }

    print_json(&state)
}

async fn cmd_invoke(
    config: &EngineConfig,
    path: &Path,
    action: &str,
    token: Option<String>,
    args: &[String],
) -> Result<()> {
    let client = RestClient::new(config.rest.clone())?;
    if let Some(token) = token {
        client.save_token(token);
    }

    let group = load_group(config, path, Some(&client))?;
    let args = args
        .iter()
        .map(|arg| {
            serde_json::from_str::<Value>(arg)
                .with_context(|| format!("Argument is not valid JSON: {}", arg))
        })
        .collect::<Result<Vec<_>>>()?;

    let store = Arc::new(Store::new(group.build_reducer(), group.default_state()));
    let actions = group.build_actions().bind(store.clone());
    let outcome = actions.invoke(action, args).await?;

    print_json(&InvokeReport {
        actions: store.actions().iter().map(|a| a.to_wire()).collect(),
        state: store.state(),
        rejected: outcome.is_rejected(),
    })
}
