//! Core engine data types shared by every game plugin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type SeatIndex = usize;

/// Terminal payoff per seat. Empty until the game is over.
pub type Rewards = BTreeMap<SeatIndex, i32>;

/// Free-form diagnostic data returned alongside observations (always a JSON object).
pub type Info = serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for role assignment and strategy randomness. `None` draws from OS entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { random_seed: Some(seed) }
    }
}

/// Result of a single `step` call: `(observation, rewards, done, truncated, info)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult<O> {
    pub observation: O,
    #[serde(default)]
    pub rewards: Rewards,
    pub done: bool,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default = "empty_info")]
    pub info: Info,
}

pub fn empty_info() -> Info {
    serde_json::json!({})
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub winning_team: String,
    #[serde(default = "default_reason")]
    pub reason: String,
    pub rewards: Rewards,
}

fn default_reason() -> String {
    "normal".to_string()
}

impl GameResult {
    /// Seats that received a positive payoff.
    pub fn winners(&self) -> Vec<SeatIndex> {
        self.rewards
            .iter()
            .filter(|(_, &r)| r > 0)
            .map(|(&seat, _)| seat)
            .collect()
    }
}
