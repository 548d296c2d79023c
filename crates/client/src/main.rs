//! Headless GOAP simulation.
//!
//! Spawns a number of enemy agents, each on its own worker task with its own
//! toy world, and drives them through a scripted scenario.
//!
//! # Examples
//!
//! ```bash
//! # Three agents, 200 ticks of 100ms
//! cargo run -p goap-sim
//!
//! # Custom content and a log file
//! cargo run -p goap-sim -- --agents 1 --content-dir ./my-agent --log-dir ./logs
//! ```

mod logging;
mod scenario;
mod world;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use goap_content::{AgentPreset, presets};
use runtime::{Agent, AgentHandle, AgentRuntime, RuntimeConfig, TracingListener};
use scenario::Scenario;
use tokio::task::JoinSet;
use world::World;

/// Headless GOAP agent simulation
#[derive(Parser, Debug)]
#[command(name = "goap-sim")]
#[command(about = "Run GOAP agents through a scripted scenario", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of agents to spawn
    #[arg(long, default_value_t = 3)]
    agents: usize,

    /// Number of updates each agent receives
    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// Seconds per update
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Directory with actions.ron, goals.ron, facts.ron and config.toml.
    /// Defaults to the embedded enemy preset.
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Also write logs to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.log_dir.as_deref())?;

    let preset = match &cli.content_dir {
        Some(dir) => AgentPreset::load_dir(dir)
            .with_context(|| format!("Failed to load content from {}", dir.display()))?,
        None => presets::enemy()?,
    };
    let config = preset.config.clone().with_env_overrides();

    tracing::info!("Starting simulation");
    tracing::info!(
        "Agents: {}, ticks: {}, dt: {}s",
        cli.agents,
        cli.ticks,
        cli.dt
    );
    tracing::debug!("Agent config: {:?}", config);

    let scenario = Arc::new(Scenario::standard());
    let mut runtimes = Vec::with_capacity(cli.agents);
    let mut drivers = JoinSet::new();

    for index in 0..cli.agents {
        let agent = Agent::from_specs(
            format!("enemy-{index}"),
            preset.facts.clone(),
            preset.actions.clone(),
            preset.goals.clone(),
        )?
        .with_planner(config.planner)
        .with_movement(config.movement)
        .with_chase(config.chase.clone())
        .with_listener(TracingListener);

        let runtime = AgentRuntime::spawn(agent, World::patrolling(index), RuntimeConfig::default());
        drivers.spawn(drive(runtime.handle(), Arc::clone(&scenario), cli.ticks, cli.dt));
        runtimes.push(runtime);
    }

    while let Some(result) = drivers.join_next().await {
        result.context("Agent driver panicked")??;
    }

    for runtime in runtimes {
        let (agent, world) = runtime.shutdown().await?;
        let status = agent.status();
        tracing::info!(
            agent = %status.name,
            phase = %status.phase,
            goal = ?status.goal.as_ref().map(ToString::to_string),
            patrols = world.patrols_completed(),
            items = world.items_collected(),
            position = ?world.agent(),
            "final state"
        );
    }

    tracing::info!("Simulation complete");
    Ok(())
}

/// Feeds scripted events to one agent and steps it `ticks` times.
async fn drive(
    handle: AgentHandle,
    scenario: Arc<Scenario>,
    ticks: u32,
    dt: f32,
) -> runtime::Result<()> {
    for tick in 0..ticks {
        for event in scenario.events_at(tick) {
            event.apply(&handle).await?;
        }
        let phase = handle.tick(dt).await?;
        tracing::trace!(agent = handle.name(), tick, %phase, "tick");
    }
    Ok(())
}
