//! Eight-player Avalon: role assignment, the phase state machine and the
//! seat policies that drive it.

pub mod agents;
pub mod error;
pub mod plugin;
pub mod roles;
pub mod scoring;
pub mod state;
pub mod types;

pub use error::AvalonError;
pub use plugin::AvalonPlugin;
pub use roles::{SeatAssignment, SecretKnowledge};
pub use state::GameState;
pub use types::{AvalonAction, Observation, Phase, Role, SeatMask};
