use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use avalon_game_engine::engine::bot_profiles::{load_default_profiles, load_profiles};
use avalon_game_engine::engine::models::{GameConfig, StepResult};
use avalon_game_engine::engine::plugin::GamePlugin;
use avalon_game_engine::engine::simulator::play_game;
use avalon_game_engine::games::avalon::agents::TableStrategy;
use avalon_game_engine::games::avalon::{AvalonAction, AvalonPlugin, Observation};

#[derive(Parser)]
#[command(name = "avalon-game-engine", about = "Play one Avalon game between random agents")]
struct Cli {
    /// Random seed (default: drawn from OS entropy)
    #[arg(long, env = "AVALON_SEED")]
    seed: Option<u64>,

    /// Agent profile name (from agent_profiles.toml)
    #[arg(long)]
    profile: Option<String>,

    /// Path to agent_profiles.toml (default: auto-discover)
    #[arg(long, env = "AVALON_AGENT_PROFILES")]
    profiles: Option<PathBuf>,

    /// Give up after this many steps
    #[arg(long, default_value = "10000")]
    max_steps: usize,

    /// Print the final observation and result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let profiles = match cli.profiles {
        Some(ref path) => load_profiles(path)?,
        None => load_default_profiles(),
    };
    let (profile_name, params) = profiles.resolve(cli.profile.as_deref())?;
    tracing::info!(profile = %profile_name, ?params, "agent profile selected");

    let plugin = AvalonPlugin;
    let strategy = TableStrategy::random(params);
    let config = GameConfig {
        random_seed: cli.seed,
    };

    let log_step = |i: usize, action: &AvalonAction, step: &StepResult<Observation>| {
        let obs = &step.observation;
        tracing::info!(
            step = i,
            ?action,
            phase = %obs.phase,
            round = obs.current_round,
            leader = obs.leader,
            team = %obs.proposed_team,
            successes = obs.successful_missions,
            failures = obs.failed_missions,
            done = step.done,
            "step"
        );
    };

    let record = play_game(&plugin, &strategy, &config, cli.max_steps, Some(&log_step))?;
    tracing::info!(
        game = plugin.game_id(),
        seed = record.seed,
        steps = record.steps,
        truncated = record.truncated,
        roles = ?record.final_state.assignment.roles(),
        "game finished"
    );

    if cli.json {
        let out = json!({
            "seed": record.seed,
            "steps": record.steps,
            "truncated": record.truncated,
            "roles": record.final_state.assignment,
            "observation": record.final_observation,
            "result": record.result,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if let Some(result) = &record.result {
        println!(
            "{} wins ({}) after {} steps, seed {}",
            result.winning_team, result.reason, record.steps, record.seed
        );
    } else {
        println!("no result after {} steps, seed {}", record.steps, record.seed);
    }

    Ok(())
}
