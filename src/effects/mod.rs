//! Effect registry and capability model.
//!
//! Effects are the unit of special behavior. A player holds
//! `EffectInstance`s (in `core`); each instance names an
//! `EffectDefinition` registered here:
//! - `EffectDefinition`: flags, handlers, perception modifiers, win conditions
//! - `EffectRegistry`: lookup by `EffectId`, iteration in registration order
//! - `builtin`: definitions every ruleset carries (the death marker)
//!
//! ## Design Philosophy
//!
//! The registry is a plain value built once at startup and passed by
//! reference. Content packs register their own definitions; the engine
//! never hardcodes a content effect.

mod definition;
mod registry;
pub mod builtin;

pub use definition::{BehaviorFlags, DayAction, EffectDefinition, RegisterAs};
pub use registry::EffectRegistry;
