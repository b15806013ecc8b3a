//! Synchronous game driver. Resets a plugin and feeds it strategy actions
//! until the game reports `done`. Used by the CLI and the arena.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::*;
use crate::engine::plugin::GamePlugin;

/// Called after every successful step with the step index, the action applied
/// and what the plugin returned.
pub type StepObserver<'a, P> = &'a dyn Fn(
    usize,
    &<P as GamePlugin>::Action,
    &StepResult<<P as GamePlugin>::Observation>,
);

/// Everything left over once a game stops.
pub struct GameRecord<P: GamePlugin> {
    pub seed: u64,
    pub final_state: P::State,
    pub final_observation: P::Observation,
    pub result: Option<GameResult>,
    pub steps: usize,
    pub truncated: bool,
}

/// Strategy randomness runs on its own stream so it never replays the
/// plugin's setup draws.
fn strategy_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0x5EED)
}

/// Play one game to completion (or until `max_steps` calls have been made).
pub fn play_game<P, S>(
    plugin: &P,
    strategy: &S,
    config: &GameConfig,
    max_steps: usize,
    observer: Option<StepObserver<'_, P>>,
) -> Result<GameRecord<P>, P::Error>
where
    P: GamePlugin,
    S: BotStrategy<P> + ?Sized,
{
    let seed = config.random_seed.unwrap_or_else(rand::random);
    let (mut state, mut observation, _info) = plugin.reset(&GameConfig::seeded(seed));
    let mut rng = strategy_rng(seed);

    tracing::debug!(game = plugin.game_id(), seed, "game started");

    let mut steps = 0;
    while steps < max_steps {
        let action = strategy.choose_action(plugin, &state, &observation, &mut rng)?;
        let result = plugin.step(&mut state, &action)?;
        if let Some(cb) = observer {
            cb(steps, &action, &result);
        }
        steps += 1;
        observation = result.observation;

        if result.done {
            let outcome = plugin.game_result(&state);
            tracing::debug!(game = plugin.game_id(), seed, steps, "game finished");
            return Ok(GameRecord {
                seed,
                final_state: state,
                final_observation: observation,
                result: outcome,
                steps,
                truncated: false,
            });
        }
    }

    tracing::warn!(game = plugin.game_id(), seed, max_steps, "game truncated");
    let result = plugin.game_result(&state);
    Ok(GameRecord {
        seed,
        final_state: state,
        final_observation: observation,
        result,
        steps,
        truncated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::avalon::agents::{AgentParams, TableStrategy};
    use crate::games::avalon::plugin::AvalonPlugin;
    use crate::games::avalon::error::AvalonError;
    use crate::games::avalon::state::GameState;
    use crate::games::avalon::types::{AvalonAction, Observation, Phase};
    use std::cell::Cell;

    /// Fails on the first call, as a strategy reading an inconsistent state would.
    struct BrokenTable;

    impl BotStrategy<AvalonPlugin> for BrokenTable {
        fn choose_action(
            &self,
            _plugin: &AvalonPlugin,
            _state: &GameState,
            _observation: &Observation,
            _rng: &mut StdRng,
        ) -> Result<AvalonAction, AvalonError> {
            Err(AvalonError::InvariantViolation("no assassin at the table".into()))
        }
    }

    #[test]
    fn test_random_game_finishes() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let record = play_game(&plugin, &strategy, &GameConfig::seeded(7), 10_000, None).unwrap();

        assert!(!record.truncated);
        assert_eq!(record.seed, 7);
        assert_eq!(record.final_observation.phase, Phase::GameOver);
        let result = record.result.expect("finished game has a result");
        assert_eq!(result.rewards.len(), 8);
    }

    #[test]
    fn test_same_seed_same_game() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let a = play_game(&plugin, &strategy, &GameConfig::seeded(99), 10_000, None).unwrap();
        let b = play_game(&plugin, &strategy, &GameConfig::seeded(99), 10_000, None).unwrap();

        assert_eq!(a.steps, b.steps);
        assert_eq!(a.final_state, b.final_state);
    }

    #[test]
    fn test_max_steps_truncates() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let record = play_game(&plugin, &strategy, &GameConfig::seeded(1), 2, None).unwrap();

        assert!(record.truncated);
        assert_eq!(record.steps, 2);
        assert!(record.result.is_none());
    }

    #[test]
    fn test_observer_sees_every_step() {
        let plugin = AvalonPlugin;
        let strategy = TableStrategy::random(AgentParams::default());
        let seen = Cell::new(0usize);
        let cb = |i: usize, _: &AvalonAction, _: &StepResult<Observation>| {
            assert_eq!(i, seen.get());
            seen.set(i + 1);
        };
        let record = play_game(&plugin, &strategy, &GameConfig::seeded(3), 10_000, Some(&cb)).unwrap();
        assert_eq!(seen.get(), record.steps);
    }

    #[test]
    fn test_strategy_error_stops_the_game() {
        let result = play_game(&AvalonPlugin, &BrokenTable, &GameConfig::seeded(5), 10_000, None);
        assert!(matches!(result, Err(AvalonError::InvariantViolation(_))));
    }
}
