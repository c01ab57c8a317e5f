//! Role definitions and the ability plugin contract.
//!
//! A role gives a player a team, a place in the night order, starting
//! effects, and optionally a night `Ability`. Abilities never mutate
//! state themselves: they return an `AbilityOutput` holding a batch and
//! at most one intent for the pipeline.

mod ability;
mod definition;
mod registry;

pub use ability::{Ability, AbilityContext, AbilityOutput};
pub use definition::RoleDefinition;
pub use registry::RoleRegistry;
