//! Terminal payoffs. Every seat is paid by its role's alignment.

use crate::engine::models::Rewards;

use super::roles::SeatAssignment;
use super::types::Alignment;

/// +1 for every seat on the winning side, -1 for every other seat.
pub fn calculate_rewards(assignment: &SeatAssignment, winner: Alignment) -> Rewards {
    assignment
        .roles()
        .iter()
        .enumerate()
        .map(|(seat, role)| (seat, if role.alignment() == winner { 1 } else { -1 }))
        .collect()
}
