//! GamePlugin trait: the interface every game must implement.
//!
//! A plugin is a pure, synchronous transition function over an explicit state.
//! The caller owns the state value and hands it to every call; plugins keep no
//! per-game data of their own.

use serde::Serialize;

use crate::engine::models::*;

pub trait GamePlugin: Send + Sync {
    type State: Clone + Send;
    type Action: Clone + Send + std::fmt::Debug;
    type Observation: Clone + Send + Serialize + std::fmt::Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    fn game_id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn description(&self) -> &str;
    fn num_players(&self) -> usize;

    /// Build a fresh game. Replaces any previous state wholesale.
    fn reset(&self, config: &GameConfig) -> (Self::State, Self::Observation, Info);

    /// Validate and apply one phase action. Must leave `state` untouched on error.
    fn step(
        &self,
        state: &mut Self::State,
        action: &Self::Action,
    ) -> Result<StepResult<Self::Observation>, Self::Error>;

    /// Public observation of the current state.
    fn observe(&self, state: &Self::State) -> Self::Observation;

    /// True once the game has reached its final phase.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Outcome summary, available once `is_terminal` holds.
    fn game_result(&self, state: &Self::State) -> Option<GameResult>;
}
