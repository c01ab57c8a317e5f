//! Effect definitions - static effect capabilities.
//!
//! An `EffectDefinition` describes everything an effect can do while a
//! player holds it:
//!
//! - Behavior flags (cannot vote, does not wake, cannot nominate)
//! - Intent handlers that intercept proposed actions
//! - Perception modifiers that change how the holder is seen
//! - Win conditions checked after each transition
//! - A static "may register as" capability for narrator setup screens
//! - An optional day action
//!
//! Definitions are immutable once registered. Per-player state lives on
//! the `EffectInstance`, never here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Alignment, EffectId, Message, RoleId, Team};
use crate::perception::{PerceptionContext, PerceptionModifier};
use crate::pipeline::IntentHandler;
use crate::rules::WinCondition;

/// Simple on/off behavior restrictions imposed on the holder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorFlags {
    pub blocks_voting: bool,
    pub blocks_waking: bool,
    pub blocks_nomination: bool,
}

impl BehaviorFlags {
    /// No restrictions.
    pub const NONE: BehaviorFlags = BehaviorFlags {
        blocks_voting: false,
        blocks_waking: false,
        blocks_nomination: false,
    };

    /// Combine two flag sets; a restriction in either applies.
    #[must_use]
    pub const fn union(self, other: BehaviorFlags) -> BehaviorFlags {
        BehaviorFlags {
            blocks_voting: self.blocks_voting || other.blocks_voting,
            blocks_waking: self.blocks_waking || other.blocks_waking,
            blocks_nomination: self.blocks_nomination || other.blocks_nomination,
        }
    }
}

/// Identities an effect's holder may register as.
///
/// This is a static capability: it says the narrator *may* choose to
/// have the holder register as one of these. The committed choice is the
/// instance's `perceive_as` override.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAs {
    pub teams: SmallVec<[Team; 4]>,
    pub alignments: SmallVec<[Alignment; 2]>,
    pub roles: Vec<RoleId>,
}

impl RegisterAs {
    /// Create an empty capability.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow registering as these teams (builder pattern).
    #[must_use]
    pub fn teams(mut self, teams: impl IntoIterator<Item = Team>) -> Self {
        self.teams.extend(teams);
        self
    }

    /// Allow registering as these alignments (builder pattern).
    #[must_use]
    pub fn alignments(mut self, alignments: impl IntoIterator<Item = Alignment>) -> Self {
        self.alignments.extend(alignments);
        self
    }

    /// Allow registering as these roles (builder pattern).
    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Check whether this capability makes the holder ambiguous in a context.
    #[must_use]
    pub fn covers(&self, context: PerceptionContext) -> bool {
        match context {
            PerceptionContext::Alignment => !self.alignments.is_empty(),
            PerceptionContext::Team => !self.teams.is_empty(),
            PerceptionContext::Role => !self.roles.is_empty() || !self.teams.is_empty(),
        }
    }
}

/// A daytime action an effect lets its holder take.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAction {
    /// Action identifier.
    pub id: String,
    /// Button label.
    pub label: Message,
    /// Number of players the action targets.
    pub targets: usize,
}

/// Static description of an effect.
#[derive(Clone)]
pub struct EffectDefinition {
    /// Unique identifier.
    pub id: EffectId,

    /// Human-readable name (for debugging).
    pub name: String,

    /// Behavior restrictions on the holder.
    pub flags: BehaviorFlags,

    /// Static "may register as" capability.
    pub register_as: Option<RegisterAs>,

    /// Optional day action.
    pub day_action: Option<DayAction>,

    handlers: Vec<Arc<dyn IntentHandler>>,
    modifiers: Vec<Arc<dyn PerceptionModifier>>,
    win_conditions: Vec<Arc<dyn WinCondition>>,
}

impl EffectDefinition {
    /// Create a definition with no behavior.
    pub fn new(id: EffectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            flags: BehaviorFlags::NONE,
            register_as: None,
            day_action: None,
            handlers: Vec::new(),
            modifiers: Vec::new(),
            win_conditions: Vec::new(),
        }
    }

    /// Set behavior flags (builder pattern).
    #[must_use]
    pub fn with_flags(mut self, flags: BehaviorFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Add an intent handler (builder pattern).
    #[must_use]
    pub fn with_handler(mut self, handler: impl IntentHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Add a perception modifier (builder pattern).
    #[must_use]
    pub fn with_modifier(mut self, modifier: impl PerceptionModifier + 'static) -> Self {
        self.modifiers.push(Arc::new(modifier));
        self
    }

    /// Add a win condition (builder pattern).
    #[must_use]
    pub fn with_win_condition(mut self, condition: impl WinCondition + 'static) -> Self {
        self.win_conditions.push(Arc::new(condition));
        self
    }

    /// Set the "may register as" capability (builder pattern).
    #[must_use]
    pub fn with_register_as(mut self, register_as: RegisterAs) -> Self {
        self.register_as = Some(register_as);
        self
    }

    /// Set the day action (builder pattern).
    #[must_use]
    pub fn with_day_action(mut self, action: DayAction) -> Self {
        self.day_action = Some(action);
        self
    }

    /// Intent handlers in declaration order.
    #[must_use]
    pub fn handlers(&self) -> &[Arc<dyn IntentHandler>] {
        &self.handlers
    }

    /// Perception modifiers in declaration order.
    #[must_use]
    pub fn modifiers(&self) -> &[Arc<dyn PerceptionModifier>] {
        &self.modifiers
    }

    /// Win conditions in declaration order.
    #[must_use]
    pub fn win_conditions(&self) -> &[Arc<dyn WinCondition>] {
        &self.win_conditions
    }
}

impl std::fmt::Debug for EffectDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("register_as", &self.register_as)
            .field("day_action", &self.day_action)
            .field("handlers", &self.handlers.len())
            .field("modifiers", &self.modifiers.len())
            .field("win_conditions", &self.win_conditions.len())
            .finish()
    }
}
