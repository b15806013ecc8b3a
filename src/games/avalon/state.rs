//! The authoritative game record for one Avalon game.

use serde::{Deserialize, Serialize};

use crate::engine::models::{Rewards, SeatIndex};

use super::error::AvalonError;
use super::roles::SeatAssignment;
use super::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub assignment: SeatAssignment,
    pub phase: Phase,
    pub current_round: usize,
    pub leader: SeatIndex,
    pub proposed_team: SeatMask,
    /// Approve bits from the latest vote.
    pub votes: SeatMask,
    /// Latest vote of each round.
    pub votes_history: [SeatMask; NUM_ROUNDS],
    /// Outcome of the n-th resolved mission at index n.
    pub mission_history: [Option<MissionOutcome>; NUM_ROUNDS],
    pub successful_missions: u8,
    pub failed_missions: u8,
    pub assassin_kill: bool,
    pub end_reason: Option<EndReason>,
    pub rewards: Rewards,
}

impl GameState {
    /// Round 0, leader at seat 0, empty histories, Proposal phase.
    pub fn new(assignment: SeatAssignment) -> Self {
        Self {
            assignment,
            phase: Phase::Proposal,
            current_round: 0,
            leader: 0,
            proposed_team: SeatMask::EMPTY,
            votes: SeatMask::EMPTY,
            votes_history: [SeatMask::EMPTY; NUM_ROUNDS],
            mission_history: [None; NUM_ROUNDS],
            successful_missions: 0,
            failed_missions: 0,
            assassin_kill: false,
            end_reason: None,
            rewards: Rewards::new(),
        }
    }

    /// Team size required this round.
    pub fn mission_size(&self) -> Result<usize, AvalonError> {
        MISSION_SIZES.get(self.current_round).copied().ok_or_else(|| {
            AvalonError::InvariantViolation(format!(
                "round {} is past the mission table",
                self.current_round
            ))
        })
    }

    pub fn missions_resolved(&self) -> usize {
        (self.successful_missions + self.failed_missions) as usize
    }

    pub fn winner(&self) -> Option<Alignment> {
        self.end_reason.map(EndReason::winner)
    }

    /// Public observation of this state.
    ///
    /// `current_round` is kept inside the mission table by the transitions.
    /// Release builds fall back to the last entry if that is ever broken.
    pub fn observation(&self) -> Observation {
        debug_assert!(
            self.current_round < NUM_ROUNDS,
            "round index {} overruns the mission table",
            self.current_round
        );
        let mission_size = MISSION_SIZES
            .get(self.current_round)
            .copied()
            .unwrap_or(MISSION_SIZES[NUM_ROUNDS - 1]);
        Observation {
            phase: self.phase,
            current_round: self.current_round,
            leader: self.leader,
            proposed_team: self.proposed_team,
            votes: self.votes,
            votes_history: self.votes_history,
            mission_history: self.mission_history,
            successful_missions: self.successful_missions,
            failed_missions: self.failed_missions,
            num_players: NUM_PLAYERS,
            mission_size,
        }
    }
}
