//! AvalonPlugin: the GamePlugin implementation for Avalon.
//!
//! One transition per phase:
//!
//! ```text
//! Proposal ─▶ Voting ─┬─ reject ─▶ Proposal (leader + 1)
//!                     └─ accept ─▶ Mission ─┬─▶ Proposal (next round, leader + 1)
//!                                           ├─▶ Assassination (3 successes)
//!                                           └─▶ GameOver (3 failures)
//! Assassination ─▶ GameOver
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::models::*;
use crate::engine::plugin::GamePlugin;

use super::error::AvalonError;
use super::roles::{SeatAssignment, SecretKnowledge};
use super::scoring::calculate_rewards;
use super::state::GameState;
use super::types::*;

pub struct AvalonPlugin;

impl GamePlugin for AvalonPlugin {
    type State = GameState;
    type Action = AvalonAction;
    type Observation = Observation;
    type Error = AvalonError;

    fn game_id(&self) -> &str {
        "avalon"
    }
    fn display_name(&self) -> &str {
        "The Resistance: Avalon"
    }
    fn description(&self) -> &str {
        "Eight-player hidden-role game: propose teams, vote, run five missions, \
         and give the Assassin one shot at Merlin if good completes three."
    }
    fn num_players(&self) -> usize {
        NUM_PLAYERS
    }

    fn reset(&self, config: &GameConfig) -> (GameState, Observation, Info) {
        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let assignment = SeatAssignment::random(&mut rng);
        let (state, observation, mut info) = self.reset_with_assignment(assignment);
        info["seed"] = serde_json::json!(config.random_seed);
        (state, observation, info)
    }

    fn step(
        &self,
        state: &mut GameState,
        action: &AvalonAction,
    ) -> Result<StepResult<Observation>, AvalonError> {
        // A call made once the game is over is the driver acknowledging the
        // end; it reports `done` and leaves the state alone.
        let done = state.phase == Phase::GameOver;
        match (state.phase, *action) {
            (Phase::GameOver, _) => {}
            (Phase::Proposal, AvalonAction::Propose(team)) => self.apply_proposal(state, team)?,
            (Phase::Voting, AvalonAction::Vote(approvals)) => self.apply_vote(state, approvals)?,
            (Phase::Mission, AvalonAction::Mission(fails)) => self.apply_mission(state, fails)?,
            (Phase::Assassination, AvalonAction::Assassinate(target)) => {
                self.apply_assassination(state, target)?
            }
            (phase, other) => {
                return Err(AvalonError::PhaseMismatch {
                    phase,
                    action: other.phase(),
                })
            }
        }

        Ok(StepResult {
            observation: state.observation(),
            rewards: state.rewards.clone(),
            done,
            truncated: false,
            info: game_over_info(state),
        })
    }

    fn observe(&self, state: &GameState) -> Observation {
        state.observation()
    }

    fn is_terminal(&self, state: &GameState) -> bool {
        state.phase == Phase::GameOver
    }

    fn game_result(&self, state: &GameState) -> Option<GameResult> {
        let reason = state.end_reason?;
        Some(GameResult {
            winning_team: reason.winner().to_string(),
            reason: reason.name().to_string(),
            rewards: state.rewards.clone(),
        })
    }
}

impl AvalonPlugin {
    /// Start a game with a known seating, e.g. to replay a recorded game.
    pub fn reset_with_assignment(&self, assignment: SeatAssignment) -> (GameState, Observation, Info) {
        let state = GameState::new(assignment);
        let observation = state.observation();
        tracing::debug!(roles = ?state.assignment.roles(), "roles assigned");
        (state, observation, empty_info())
    }

    /// Seat → role pairs a holder of `role` knows. Fixed for the whole game.
    pub fn secret_knowledge(&self, state: &GameState, role: Role) -> Result<SecretKnowledge, AvalonError> {
        state.assignment.secret_knowledge_for_role(role)
    }
}

// ── Private helpers ──

fn game_over_info(state: &GameState) -> Info {
    match state.end_reason {
        Some(reason) => serde_json::json!({
            "winner": reason.winner(),
            "reason": reason,
            "assassin_kill": state.assassin_kill,
        }),
        None => empty_info(),
    }
}

fn next_seat(seat: SeatIndex) -> SeatIndex {
    (seat + 1) % NUM_PLAYERS
}

impl AvalonPlugin {
    fn apply_proposal(&self, state: &mut GameState, team: SeatMask) -> Result<(), AvalonError> {
        let expected = state.mission_size()?;
        if team.len() != expected {
            return Err(AvalonError::InvalidTeamSize {
                round: state.current_round,
                expected,
                actual: team.len(),
            });
        }

        state.proposed_team = team;
        state.phase = Phase::Voting;
        tracing::debug!(round = state.current_round, leader = state.leader, team = %team, "team proposed");
        Ok(())
    }

    fn apply_vote(&self, state: &mut GameState, approvals: SeatMask) -> Result<(), AvalonError> {
        let round = state.current_round;
        let slot = state.votes_history.get_mut(round).ok_or_else(|| {
            AvalonError::InvariantViolation(format!("vote recorded for round {round} past the table"))
        })?;
        *slot = approvals;
        state.votes = approvals;

        // Strict majority; a 4-4 tie rejects.
        if approvals.len() > NUM_PLAYERS / 2 {
            state.phase = Phase::Mission;
            tracing::debug!(round, leader = state.leader, approvals = approvals.len(), "team approved");
        } else {
            state.leader = next_seat(state.leader);
            state.phase = Phase::Proposal;
            tracing::debug!(round, next_leader = state.leader, approvals = approvals.len(), "team rejected");
        }
        Ok(())
    }

    fn apply_mission(&self, state: &mut GameState, fails: SeatMask) -> Result<(), AvalonError> {
        let round = state.current_round;
        let fail_votes = fails.intersection(state.proposed_team).len();
        let threshold = if round == DOUBLE_FAIL_ROUND { 2 } else { 1 };
        let outcome = if fail_votes >= threshold {
            MissionOutcome::Fail
        } else {
            MissionOutcome::Success
        };

        let slot = state.missions_resolved();
        if slot >= NUM_ROUNDS {
            return Err(AvalonError::InvariantViolation(format!(
                "mission {} resolved after the track is full",
                slot + 1
            )));
        }

        let (mut successes, mut failures) = (state.successful_missions, state.failed_missions);
        match outcome {
            MissionOutcome::Success => successes += 1,
            MissionOutcome::Fail => failures += 1,
        }

        let mut next_round = round + 1;
        // At 2-2 the deciding mission is still played under round index 3.
        if successes == 2 && failures == 2 {
            next_round -= 1;
            if next_round != DOUBLE_FAIL_ROUND {
                return Err(AvalonError::InvariantViolation(format!(
                    "2-2 tie reached with round index {next_round}, expected {DOUBLE_FAIL_ROUND}"
                )));
            }
        }
        if next_round >= NUM_ROUNDS {
            return Err(AvalonError::InvariantViolation(format!(
                "round index {next_round} overruns the mission table after {successes}-{failures}"
            )));
        }

        state.mission_history[slot] = Some(outcome);
        state.successful_missions = successes;
        state.failed_missions = failures;
        state.current_round = next_round;
        state.leader = next_seat(state.leader);

        tracing::debug!(
            round,
            fail_votes,
            outcome = ?outcome,
            successes,
            failures,
            "mission resolved"
        );

        if successes >= WINS_NEEDED {
            state.phase = Phase::Assassination;
        } else if failures >= WINS_NEEDED {
            finish(state, EndReason::MissionsFailed);
        } else {
            state.phase = Phase::Proposal;
        }
        Ok(())
    }

    fn apply_assassination(&self, state: &mut GameState, target: SeatMask) -> Result<(), AvalonError> {
        if target.len() > 1 {
            return Err(AvalonError::InvalidAssassinationTarget { selected: target });
        }
        let Some(accused) = target.seats().next() else {
            tracing::debug!("assassin passed");
            return Ok(());
        };

        let merlin = state.assignment.seat_of(Role::Merlin)?;
        if accused == merlin {
            state.assassin_kill = true;
            finish(state, EndReason::MerlinAssassinated);
        } else {
            state.assassin_kill = false;
            finish(state, EndReason::AssassinMissed);
        }
        tracing::debug!(accused, merlin, "assassination resolved");
        Ok(())
    }
}

fn finish(state: &mut GameState, reason: EndReason) {
    let winner = reason.winner();
    state.phase = Phase::GameOver;
    state.end_reason = Some(reason);
    state.rewards = calculate_rewards(&state.assignment, winner);
    tracing::info!(
        winner = %winner,
        reason = reason.name(),
        successes = state.successful_missions,
        failures = state.failed_missions,
        "game over"
    );
}
