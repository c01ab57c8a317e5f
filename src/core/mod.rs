//! Core engine types: identifiers, players, effects, state, history, configuration.
//!
//! Everything here is a plain value. Nothing in `core` knows about
//! handlers, perception, or win conditions; those live in the modules
//! that consume these types.

pub mod ids;
pub mod team;
pub mod payload;
pub mod player;
pub mod state;
pub mod history;
pub mod game;
pub mod config;

pub use ids::{EffectId, PlayerId, RoleId};
pub use team::{Alignment, Team};
pub use payload::{Payload, PayloadValue};
pub use player::{EffectInstance, Expiry, PerceptionOverride, Player};
pub use state::{GameState, Phase};
pub use history::{HistoryEntry, HistoryEvent, HistoryKind, Message};
pub use game::Game;
pub use config::EngineConfig;
