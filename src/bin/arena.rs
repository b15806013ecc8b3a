//! Arena CLI: run many seeded Avalon games and report win rates.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 10000 --seed 42
//!   cargo run --release --bin arena -- --games 1000 --profile saboteur

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use avalon_game_engine::engine::arena::run_arena;
use avalon_game_engine::engine::bot_profiles::{load_default_profiles, load_profiles};
use avalon_game_engine::games::avalon::agents::TableStrategy;
use avalon_game_engine::games::avalon::AvalonPlugin;

#[derive(Parser)]
#[command(name = "arena", about = "Run random-agent arena experiments for Avalon")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "1000")]
    games: usize,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Agent profile name (from agent_profiles.toml)
    #[arg(long)]
    profile: Option<String>,

    /// Path to agent_profiles.toml
    #[arg(long, env = "AVALON_AGENT_PROFILES")]
    profiles: Option<PathBuf>,

    /// Per-game step limit
    #[arg(long, default_value = "10000")]
    max_steps: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path).unwrap_or_else(|e| {
            eprintln!("Error loading profiles: {}", e);
            process::exit(1);
        }),
        None => load_default_profiles(),
    };
    let (profile_name, params) = profiles.resolve(cli.profile.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    eprintln!("Arena: {} games, seed={}, profile={}", cli.games, cli.seed, profile_name);
    eprintln!("  {:?}", params);
    eprintln!();

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        if done % 100 == 0 || done == total {
            eprint!("\r  [{}/{}] games completed", done, total);
        }
    };

    let plugin = AvalonPlugin;
    let strategy = TableStrategy::random(params);
    let result = run_arena(&plugin, &strategy, cli.games, cli.seed, cli.max_steps, Some(&progress_cb))
        .unwrap_or_else(|e| {
            eprintln!("\nError: {}", e);
            process::exit(1);
        });

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
}
