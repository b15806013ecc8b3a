//! Bot-vs-bot arena runner.
//!
//! Plays many seeded games in parallel and tallies which team won and why.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::GameConfig;
use crate::engine::plugin::GamePlugin;
use crate::engine::simulator::play_game;

/// Aggregated results from an arena run.
#[derive(Debug, Clone, Default)]
pub struct ArenaResult {
    pub num_games: usize,
    /// Games won, keyed by winning team name.
    pub wins: BTreeMap<String, usize>,
    /// Games finished, keyed by end reason.
    pub reasons: BTreeMap<String, usize>,
    /// Games cut off by the step limit.
    pub truncated: usize,
    pub step_counts: Vec<usize>,
    pub game_durations_ms: Vec<f64>,
}

/// Outcome of a single arena game.
struct GameSummary {
    winning_team: Option<String>,
    reason: Option<String>,
    truncated: bool,
    steps: usize,
    elapsed_ms: f64,
}

impl ArenaResult {
    pub fn win_rate(&self, team: &str) -> f64 {
        *self.wins.get(team).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    /// Wilson score interval for the win rate of `team`.
    pub fn confidence_interval_95(&self, team: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(team);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn avg_steps(&self) -> f64 {
        if self.step_counts.is_empty() {
            return 0.0;
        }
        self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        for (team, wins) in &self.wins {
            let (ci_lo, ci_hi) = self.confidence_interval_95(team);
            lines.push(format!(
                "  {:>12}: {:4} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
                team,
                wins,
                self.win_rate(team) * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
            ));
        }
        lines.push("  End reasons:".to_string());
        for (reason, count) in &self.reasons {
            lines.push(format!("  {:>24}: {}", reason, count));
        }
        lines.push(format!("  {:>12}: {}", "Truncated", self.truncated));
        lines.push(format!("  Avg steps: {:.1}", self.avg_steps()));
        if !self.game_durations_ms.is_empty() {
            let total_ms = self.game_durations_ms.iter().sum::<f64>();
            let avg_ms = total_ms / self.game_durations_ms.len() as f64;
            lines.push(format!("  Avg game: {:.3}ms  |  Total: {:.2}s", avg_ms, total_ms / 1000.0));
        }
        lines.join("\n")
    }

    fn record(&mut self, game: GameSummary) {
        if let Some(team) = game.winning_team {
            *self.wins.entry(team).or_default() += 1;
        }
        if let Some(reason) = game.reason {
            *self.reasons.entry(reason).or_default() += 1;
        }
        if game.truncated {
            self.truncated += 1;
        }
        self.step_counts.push(game.steps);
        self.game_durations_ms.push(game.elapsed_ms);
    }
}

/// Run `num_games` games seeded `base_seed`, `base_seed + 1`, ... in parallel.
///
/// `progress` is called with `(completed, total)` after each game, from
/// whichever worker thread finished it.
pub fn run_arena<P, S>(
    plugin: &P,
    strategy: &S,
    num_games: usize,
    base_seed: u64,
    max_steps: usize,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<ArenaResult, P::Error>
where
    P: GamePlugin,
    S: BotStrategy<P> + ?Sized,
{
    let completed = AtomicUsize::new(0);

    let games: Vec<GameSummary> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let config = GameConfig::seeded(base_seed.wrapping_add(game_idx as u64));
            let t0 = Instant::now();
            let record = play_game(plugin, strategy, &config, max_steps, None)?;
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress {
                cb(done, num_games);
            }

            Ok(GameSummary {
                winning_team: record.result.as_ref().map(|r| r.winning_team.clone()),
                reason: record.result.map(|r| r.reason),
                truncated: record.truncated,
                steps: record.steps,
                elapsed_ms,
            })
        })
        .collect::<Result<_, P::Error>>()?;

    let mut result = ArenaResult {
        num_games,
        ..Default::default()
    };
    for game in games {
        result.record(game);
    }
    tracing::info!(
        games = num_games,
        truncated = result.truncated,
        avg_steps = result.avg_steps(),
        "arena finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::avalon::agents::{AgentParams, TableStrategy};
    use crate::games::avalon::plugin::AvalonPlugin;

    #[test]
    fn test_arena_random_tables() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let result = run_arena(&plugin, &strategy, 20, 42, 10_000, None).unwrap();

        assert_eq!(result.num_games, 20);
        assert_eq!(result.truncated, 0);
        assert_eq!(result.wins.values().sum::<usize>(), 20);
        assert_eq!(result.reasons.values().sum::<usize>(), 20);
        assert_eq!(result.step_counts.len(), 20);
        assert!(result.avg_steps() > 0.0);
        for team in result.wins.keys() {
            assert!(team == "good" || team == "evil");
        }
    }

    #[test]
    fn test_arena_is_reproducible() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let a = run_arena(&plugin, &strategy, 16, 7, 10_000, None).unwrap();
        let b = run_arena(&plugin, &strategy, 16, 7, 10_000, None).unwrap();
        assert_eq!(a.wins, b.wins);
        assert_eq!(a.reasons, b.reasons);

        let mut sa = a.step_counts.clone();
        let mut sb = b.step_counts.clone();
        sa.sort_unstable();
        sb.sort_unstable();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_arena_progress_reaches_total() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let max_seen = AtomicUsize::new(0);
        let cb = |done: usize, total: usize| {
            assert_eq!(total, 8);
            max_seen.fetch_max(done, Ordering::Relaxed);
        };
        run_arena(&plugin, &strategy, 8, 0, 10_000, Some(&cb)).unwrap();
        assert_eq!(max_seen.load(Ordering::Relaxed), 8);
    }

    #[test]
    fn test_truncated_games_have_no_winner() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let result = run_arena(&plugin, &strategy, 4, 0, 1, None).unwrap();
        assert_eq!(result.truncated, 4);
        assert!(result.wins.is_empty());
        assert_eq!(result.win_rate("good"), 0.0);
    }

    #[test]
    fn test_confidence_interval_bounds() {
        let mut result = ArenaResult {
            num_games: 100,
            ..Default::default()
        };
        result.wins.insert("good".into(), 50);
        let (lo, hi) = result.confidence_interval_95("good");
        assert!(lo < 0.5 && 0.5 < hi);
        assert!(lo > 0.39 && hi < 0.61);
        assert_eq!(ArenaResult::default().confidence_interval_95("good"), (0.0, 0.0));
    }
}
