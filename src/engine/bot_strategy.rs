//! Bot strategy trait: where phase actions come from.

use rand::rngs::StdRng;

use crate::engine::plugin::GamePlugin;

/// A strategy speaks for the whole table. Games that need several seats to act
/// in one phase poll them inside `choose_action` and return the combined action;
/// the plugin only ever sees one action per call.
///
/// Errors are the plugin's own: a strategy fails only when the state it reads
/// is inconsistent, and the driver stops the game on it.
pub trait BotStrategy<P: GamePlugin>: Send + Sync {
    fn choose_action(
        &self,
        plugin: &P,
        state: &P::State,
        observation: &P::Observation,
        rng: &mut StdRng,
    ) -> Result<P::Action, P::Error>;
}
