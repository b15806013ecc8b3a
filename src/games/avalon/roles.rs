//! Role assignment and the secret knowledge each role starts with.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::models::SeatIndex;

use super::error::AvalonError;
use super::types::{Alignment, Role, NUM_PLAYERS};

/// The fixed eight-player roster dealt every game.
pub const ROSTER: [Role; NUM_PLAYERS] = [
    Role::Merlin,
    Role::Percival,
    Role::LoyalServant,
    Role::LoyalServant,
    Role::LoyalServant,
    Role::Assassin,
    Role::Mordred,
    Role::Minion,
];

/// Seat → role for one game. Always a permutation of [`ROSTER`], including
/// when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Role; NUM_PLAYERS]")]
pub struct SeatAssignment([Role; NUM_PLAYERS]);

impl TryFrom<[Role; NUM_PLAYERS]> for SeatAssignment {
    type Error = AvalonError;

    fn try_from(roles: [Role; NUM_PLAYERS]) -> Result<Self, AvalonError> {
        Self::from_roles(roles)
    }
}

/// Seats (other than the viewer's own) whose role the viewer knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKnowledge(BTreeMap<SeatIndex, Role>);

impl SecretKnowledge {
    pub fn get(&self, seat: SeatIndex) -> Option<Role> {
        self.0.get(&seat).copied()
    }

    pub fn contains_seat(&self, seat: SeatIndex) -> bool {
        self.0.contains_key(&seat)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeatIndex, Role)> + '_ {
        self.0.iter().map(|(&seat, &role)| (seat, role))
    }

    pub fn seats(&self) -> impl Iterator<Item = SeatIndex> + '_ {
        self.0.keys().copied()
    }
}

impl SeatAssignment {
    /// Uniformly random permutation of the roster onto the seats.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut roles = ROSTER;
        roles.shuffle(rng);
        Self(roles)
    }

    /// Fixed assignment, e.g. for replays. Rejects anything that is not the roster.
    pub fn from_roles(roles: [Role; NUM_PLAYERS]) -> Result<Self, AvalonError> {
        let mut given = roles;
        let mut expected = ROSTER;
        given.sort();
        expected.sort();
        if given != expected {
            return Err(AvalonError::InvariantViolation(format!(
                "role list {:?} is not a permutation of the roster",
                roles
            )));
        }
        Ok(Self(roles))
    }

    /// Skips the roster check so tests can build broken seatings.
    #[cfg(test)]
    pub(crate) fn from_roles_unchecked(roles: [Role; NUM_PLAYERS]) -> Self {
        Self(roles)
    }

    pub fn roles(&self) -> &[Role; NUM_PLAYERS] {
        &self.0
    }

    pub fn role_of(&self, seat: SeatIndex) -> Option<Role> {
        self.0.get(seat).copied()
    }

    pub fn alignment_of(&self, seat: SeatIndex) -> Option<Alignment> {
        self.role_of(seat).map(Role::alignment)
    }

    /// Seat holding a unique role. Loyal Servants are never located this way.
    pub fn seat_of(&self, role: Role) -> Result<SeatIndex, AvalonError> {
        let mut found = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, &r)| r == role)
            .map(|(seat, _)| seat);
        match (found.next(), found.next()) {
            (Some(seat), None) => Ok(seat),
            (None, _) => Err(AvalonError::InvariantViolation(format!(
                "no seat holds {role}"
            ))),
            (Some(_), Some(_)) => Err(AvalonError::InvariantViolation(format!(
                "{role} is held by more than one seat"
            ))),
        }
    }

    pub fn seats_with(&self, alignment: Alignment) -> impl Iterator<Item = SeatIndex> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(move |(_, role)| role.alignment() == alignment)
            .map(|(seat, _)| seat)
    }

    /// What a holder of `role` is told at the start of the game.
    pub fn secret_knowledge_for_role(&self, role: Role) -> Result<SecretKnowledge, AvalonError> {
        let mut known = BTreeMap::new();
        for &target in role.sees() {
            let seat = self.seat_of(target)?;
            known.insert(seat, target);
        }
        Ok(SecretKnowledge(known))
    }

    /// What the player in `seat` is told at the start of the game.
    pub fn secret_knowledge_for_seat(&self, seat: SeatIndex) -> Result<SecretKnowledge, AvalonError> {
        let role = self.role_of(seat).ok_or_else(|| {
            AvalonError::InvariantViolation(format!("seat {seat} is not at the table"))
        })?;
        let knowledge = self.secret_knowledge_for_role(role)?;
        if knowledge.contains_seat(seat) {
            return Err(AvalonError::InvariantViolation(format!(
                "seat {seat} ({role}) would be shown its own identity"
            )));
        }
        Ok(knowledge)
    }
}
