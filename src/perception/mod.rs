//! Perception engine: how one player is seen by another.
//!
//! A player's apparent identity depends on who is looking and what they
//! ask about. Effects attach `PerceptionModifier`s that rewrite the
//! answer; `perceive` folds every matching modifier over the true
//! identity.
//!
//! ## Key Components
//!
//! - [`perceive`]: total query, defaults to the true identity
//! - [`can_register_as_team`] / [`can_register_as_alignment`]: static
//!   capability checks for narrator setup screens
//! - [`ambiguous_players`]: players whose identity the narrator may bend
//! - [`apply_perception_overrides`]: "what if" states with committed overrides
//! - [`PerceiveAs`]: modifier applying an instance's committed override

mod engine;
mod modifier;

pub use engine::{
    ambiguous_players, apply_perception_overrides, can_register_as_alignment,
    can_register_as_team, perceive, true_identity,
};
pub use modifier::{PerceiveAs, Perception, PerceptionContext, PerceptionModifier, PerceptionQuery};
