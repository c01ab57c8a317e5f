//! # grimoire
//!
//! Rules-resolution core for turn-structured social-deduction games.
//!
//! Given a proposed action (a kill, an execution, a nomination), the
//! engine works out what actually happens once every active ability has
//! had a chance to intercept, block, or redirect it, then folds the
//! result into game state and history.
//!
//! ## Design Principles
//!
//! 1. **Explicit Registries**: Effects and roles live in a `Ruleset`
//!    value built at startup and borrowed by every call. No globals.
//!
//! 2. **Declared Mutations**: Handlers and abilities never touch state.
//!    They return `StateChanges` batches; the applier commits each batch
//!    atomically.
//!
//! 3. **Suspension as a Value**: A handler that needs the narrator's
//!    decision produces a `SuspendedResolution`, a plain serializable
//!    value that `resume` consumes exactly once.
//!
//! 4. **Silent Degradation**: Unknown effect and role IDs contribute
//!    nothing. Old saved games keep working after content is removed.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` collections make every state
//!   snapshot O(1), so each history entry keeps its before/after states.
//!
//! - **History as Source of Truth**: `Game::state()` always equals the
//!   latest entry's `state_after`; the scheduler derives the next step
//!   from history alone.
//!
//! ## Modules
//!
//! - `core`: IDs, players, effect instances, state, history, configuration
//! - `changes`: state change batches and the applier
//! - `effects`: effect definitions and the effect registry
//! - `roles`: role definitions and the ability contract
//! - `perception`: how players appear to each other
//! - `pipeline`: intent resolution with suspension
//! - `rules`: rulesets and win conditions
//! - `turn`: phases, night order, and action flows
//! - `games`: sample content

pub mod core;
pub mod error;
pub mod changes;
pub mod effects;
pub mod roles;
pub mod perception;
pub mod pipeline;
pub mod rules;
pub mod turn;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Alignment, EffectId, EffectInstance, EngineConfig, Expiry, Game, GameState, HistoryEntry,
    HistoryEvent, HistoryKind, Message, Payload, PayloadValue, PerceptionOverride, Phase, Player,
    PlayerId, RoleId, Team,
};

pub use crate::error::{RuleError, RuleResult};

pub use crate::changes::{apply_changes, StateChanges};

pub use crate::effects::{BehaviorFlags, DayAction, EffectDefinition, EffectRegistry, RegisterAs};

pub use crate::roles::{Ability, AbilityContext, AbilityOutput, RoleDefinition, RoleRegistry};

pub use crate::perception::{
    ambiguous_players, apply_perception_overrides, can_register_as_alignment, can_register_as_team,
    perceive, PerceiveAs, Perception, PerceptionContext, PerceptionModifier, PerceptionQuery,
};

pub use crate::pipeline::{
    resolve_intent, Cause, Choice, HandlerContext, HandlerOutcome, InputOptions, InputRequest, Intent,
    IntentHandler, PreventReason, Resolution, SuspendedResolution,
};

pub use crate::rules::{
    check_end_of_day_win_conditions, check_win_condition, Ruleset, WinCondition, WinContext, WinTiming,
};

pub use crate::turn::{next_step, ActionFlow, PendingAction, Step};
