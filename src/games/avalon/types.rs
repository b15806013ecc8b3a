//! Domain types for Avalon.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::models::SeatIndex;

pub const NUM_PLAYERS: usize = 8;
pub const NUM_ROUNDS: usize = 5;

/// Team size per round for eight players.
pub const MISSION_SIZES: [usize; NUM_ROUNDS] = [3, 4, 4, 5, 5];

/// The fourth mission (zero-indexed round 3) needs two fail votes to fail.
pub const DOUBLE_FAIL_ROUND: usize = 3;

/// Successes (or failures) needed to decide the mission track.
pub const WINS_NEEDED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Good,
    Evil,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Good => f.write_str("good"),
            Alignment::Evil => f.write_str("evil"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Merlin,
    Percival,
    LoyalServant,
    Assassin,
    Mordred,
    Minion,
}

impl Role {
    pub const fn alignment(self) -> Alignment {
        match self {
            Role::Merlin | Role::Percival | Role::LoyalServant => Alignment::Good,
            Role::Assassin | Role::Mordred | Role::Minion => Alignment::Evil,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Merlin => "Merlin",
            Role::Percival => "Percival",
            Role::LoyalServant => "Loyal Servant",
            Role::Assassin => "Assassin",
            Role::Mordred => "Mordred",
            Role::Minion => "Minion",
        }
    }

    /// Roles this role is entitled to locate. Not transitive, not symmetric.
    pub const fn sees(self) -> &'static [Role] {
        match self {
            Role::Merlin => &[Role::Assassin, Role::Minion],
            Role::Percival => &[Role::Merlin],
            Role::Assassin => &[Role::Minion],
            Role::Minion => &[Role::Assassin],
            Role::Mordred | Role::LoyalServant => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Proposal,
    Voting,
    Mission,
    Assassination,
    GameOver,
}

impl Phase {
    /// Stable integer encoding, used for flat observation vectors.
    pub const fn index(self) -> u8 {
        match self {
            Phase::Proposal => 0,
            Phase::Voting => 1,
            Phase::Mission => 2,
            Phase::Assassination => 3,
            Phase::GameOver => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Phase::Proposal => "proposal",
            Phase::Voting => "voting",
            Phase::Mission => "mission",
            Phase::Assassination => "assassination",
            Phase::GameOver => "game_over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of seats packed into one bit per seat (bit `i` = seat `i`).
///
/// Used for every per-seat vector in the game: proposed teams, approve votes,
/// mission fail votes and assassination targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMask(u8);

impl SeatMask {
    pub const EMPTY: SeatMask = SeatMask(0);
    pub const ALL: SeatMask = SeatMask(u8::MAX);

    pub fn from_seats(seats: &[SeatIndex]) -> Self {
        seats.iter().fold(Self::EMPTY, |mask, &seat| mask.with(seat))
    }

    pub fn from_bools(bits: [bool; NUM_PLAYERS]) -> Self {
        let mut mask = Self::EMPTY;
        for (seat, &set) in bits.iter().enumerate() {
            if set {
                mask.insert(seat);
            }
        }
        mask
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn with(mut self, seat: SeatIndex) -> Self {
        self.insert(seat);
        self
    }

    /// Seats past the table are ignored.
    pub fn insert(&mut self, seat: SeatIndex) {
        if seat < NUM_PLAYERS {
            self.0 |= 1 << seat;
        }
    }

    pub fn contains(self, seat: SeatIndex) -> bool {
        seat < NUM_PLAYERS && self.0 & (1 << seat) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersection(self, other: SeatMask) -> SeatMask {
        SeatMask(self.0 & other.0)
    }

    pub fn seats(self) -> impl Iterator<Item = SeatIndex> {
        (0..NUM_PLAYERS).filter(move |&seat| self.contains(seat))
    }

    pub fn to_bools(self) -> [bool; NUM_PLAYERS] {
        std::array::from_fn(|seat| self.contains(seat))
    }
}

impl fmt::Display for SeatMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.to_bools() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionOutcome {
    Success,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Evil failed three missions.
    MissionsFailed,
    /// Good completed three missions and the assassin missed Merlin.
    AssassinMissed,
    /// Good completed three missions but the assassin found Merlin.
    MerlinAssassinated,
}

impl EndReason {
    pub const fn winner(self) -> Alignment {
        match self {
            EndReason::MissionsFailed | EndReason::MerlinAssassinated => Alignment::Evil,
            EndReason::AssassinMissed => Alignment::Good,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EndReason::MissionsFailed => "missions_failed",
            EndReason::AssassinMissed => "assassin_missed",
            EndReason::MerlinAssassinated => "merlin_assassinated",
        }
    }
}

/// One action per phase. Every payload is a seat vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "seats", rename_all = "snake_case")]
pub enum AvalonAction {
    /// Proposal: the seats on the team.
    Propose(SeatMask),
    /// Voting: seats that approve the team.
    Vote(SeatMask),
    /// Mission: team seats that play a fail card. Non-team seats are ignored.
    Mission(SeatMask),
    /// Assassination: zero seats (pass) or the single seat being accused.
    Assassinate(SeatMask),
    /// Acknowledge the end of the game.
    Acknowledge,
}

impl AvalonAction {
    pub const fn phase(self) -> Phase {
        match self {
            AvalonAction::Propose(_) => Phase::Proposal,
            AvalonAction::Vote(_) => Phase::Voting,
            AvalonAction::Mission(_) => Phase::Mission,
            AvalonAction::Assassinate(_) => Phase::Assassination,
            AvalonAction::Acknowledge => Phase::GameOver,
        }
    }
}

/// Public view of the table, identical for every seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub phase: Phase,
    pub current_round: usize,
    pub leader: SeatIndex,
    pub proposed_team: SeatMask,
    pub votes: SeatMask,
    pub votes_history: [SeatMask; NUM_ROUNDS],
    pub mission_history: [Option<MissionOutcome>; NUM_ROUNDS],
    pub successful_missions: u8,
    pub failed_missions: u8,
    pub num_players: usize,
    pub mission_size: usize,
}
