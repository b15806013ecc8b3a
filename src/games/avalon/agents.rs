//! Seat policies and the table strategy that turns them into phase actions.
//!
//! The state machine consumes exactly one action per phase. Which seats get a
//! say depends on the phase: the leader proposes, everyone votes, only team
//! members play mission cards, and only the Assassin names a target. The
//! table strategy polls those seats one after another and joins their
//! answers before the plugin is called.

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::SeatIndex;

use super::error::AvalonError;
use super::plugin::AvalonPlugin;
use super::roles::SecretKnowledge;
use super::state::GameState;
use super::types::*;

/// Tuning knobs for [`RandomSeatPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct AgentParams {
    /// Chance of approving any proposed team.
    pub approve_probability: f64,
    /// Chance an evil team member plays a fail card.
    pub evil_fail_probability: f64,
    /// Chance a good team member plays a fail card. Zero in normal play.
    pub good_fail_probability: f64,
    /// Assassin skips seats it already knows to be evil.
    pub assassin_uses_knowledge: bool,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            approve_probability: 0.5,
            evil_fail_probability: 0.5,
            good_fail_probability: 0.0,
            assassin_uses_knowledge: false,
        }
    }
}

/// What one seat may base its decision on: the public observation plus its
/// own role and secret knowledge.
pub struct SeatView<'a> {
    pub seat: SeatIndex,
    pub role: Role,
    pub knowledge: SecretKnowledge,
    pub observation: &'a Observation,
}

pub trait SeatPolicy: Send + Sync {
    /// Seats to put on the team. Called for the leader only.
    fn propose(&self, view: &SeatView<'_>, rng: &mut StdRng) -> SeatMask;

    /// `true` approves the proposed team.
    fn vote(&self, view: &SeatView<'_>, rng: &mut StdRng) -> bool;

    /// `true` plays a fail card. Called for team members only.
    fn play_mission(&self, view: &SeatView<'_>, rng: &mut StdRng) -> bool;

    /// Seat to accuse, or `None` to pass. Called for the Assassin only.
    fn assassinate(&self, view: &SeatView<'_>, rng: &mut StdRng) -> Option<SeatIndex>;
}

/// Random play with role-aware mission cards.
#[derive(Debug, Clone, Default)]
pub struct RandomSeatPolicy {
    pub params: AgentParams,
}

impl RandomSeatPolicy {
    pub fn new(params: AgentParams) -> Self {
        Self { params }
    }
}

impl SeatPolicy for RandomSeatPolicy {
    fn propose(&self, view: &SeatView<'_>, rng: &mut StdRng) -> SeatMask {
        let size = view.observation.mission_size.min(NUM_PLAYERS);
        SeatMask::from_seats(&index::sample(rng, NUM_PLAYERS, size).into_vec())
    }

    fn vote(&self, _view: &SeatView<'_>, rng: &mut StdRng) -> bool {
        rng.gen::<f64>() < self.params.approve_probability
    }

    fn play_mission(&self, view: &SeatView<'_>, rng: &mut StdRng) -> bool {
        let p = match view.role.alignment() {
            Alignment::Good => self.params.good_fail_probability,
            Alignment::Evil => self.params.evil_fail_probability,
        };
        rng.gen::<f64>() < p
    }

    fn assassinate(&self, view: &SeatView<'_>, rng: &mut StdRng) -> Option<SeatIndex> {
        let candidates: Vec<SeatIndex> = (0..NUM_PLAYERS)
            .filter(|&seat| seat != view.seat)
            .filter(|&seat| !(self.params.assassin_uses_knowledge && view.knowledge.contains_seat(seat)))
            .collect();
        candidates.choose(rng).copied()
    }
}

/// One policy per seat, combined into a single action per phase.
pub struct TableStrategy {
    policies: Vec<Box<dyn SeatPolicy>>,
}

impl TableStrategy {
    pub fn new(policies: [Box<dyn SeatPolicy>; NUM_PLAYERS]) -> Self {
        Self {
            policies: policies.into(),
        }
    }

    /// Every seat plays [`RandomSeatPolicy`] with the same parameters.
    pub fn random(params: AgentParams) -> Self {
        Self::new(std::array::from_fn(|_| {
            Box::new(RandomSeatPolicy::new(params.clone())) as Box<dyn SeatPolicy>
        }))
    }

    fn view<'a>(
        state: &GameState,
        observation: &'a Observation,
        seat: SeatIndex,
    ) -> Result<SeatView<'a>, AvalonError> {
        let role = state.assignment.role_of(seat).ok_or_else(|| {
            AvalonError::InvariantViolation(format!("seat {seat} is not at the table"))
        })?;
        Ok(SeatView {
            seat,
            role,
            knowledge: state.assignment.secret_knowledge_for_seat(seat)?,
            observation,
        })
    }

    /// The seats in `seats`, each paired with its policy.
    fn views<'a>(
        &'a self,
        state: &GameState,
        observation: &'a Observation,
        seats: SeatMask,
    ) -> Result<Vec<(&'a dyn SeatPolicy, SeatView<'a>)>, AvalonError> {
        self.policies
            .iter()
            .enumerate()
            .filter(|(seat, _)| seats.contains(*seat))
            .map(|(seat, policy)| Ok((&**policy, Self::view(state, observation, seat)?)))
            .collect()
    }
}

impl BotStrategy<AvalonPlugin> for TableStrategy {
    fn choose_action(
        &self,
        _plugin: &AvalonPlugin,
        state: &GameState,
        observation: &Observation,
        rng: &mut StdRng,
    ) -> Result<AvalonAction, AvalonError> {
        let action = match observation.phase {
            Phase::Proposal => {
                let leader = observation.leader;
                let view = Self::view(state, observation, leader)?;
                AvalonAction::Propose(self.policies[leader].propose(&view, rng))
            }
            Phase::Voting => {
                let mut approvals = SeatMask::EMPTY;
                for (policy, view) in self.views(state, observation, SeatMask::ALL)? {
                    if policy.vote(&view, rng) {
                        approvals.insert(view.seat);
                    }
                }
                AvalonAction::Vote(approvals)
            }
            Phase::Mission => {
                let mut fails = SeatMask::EMPTY;
                for (policy, view) in self.views(state, observation, observation.proposed_team)? {
                    if policy.play_mission(&view, rng) {
                        fails.insert(view.seat);
                    }
                }
                AvalonAction::Mission(fails)
            }
            Phase::Assassination => {
                let seat = state.assignment.seat_of(Role::Assassin)?;
                let view = Self::view(state, observation, seat)?;
                let target = self.policies[seat].assassinate(&view, rng);
                AvalonAction::Assassinate(target.map(|t| SeatMask::EMPTY.with(t)).unwrap_or_default())
            }
            Phase::GameOver => AvalonAction::Acknowledge,
        };
        Ok(action)
    }
}
