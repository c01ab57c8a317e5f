//! Perception values and the modifier plugin contract.

use serde::{Deserialize, Serialize};

use crate::core::{Alignment, EffectInstance, GameState, Player, RoleId, Team};

/// What aspect of identity an observer is asking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerceptionContext {
    Alignment,
    Team,
    Role,
}

impl PerceptionContext {
    /// All contexts.
    pub const ALL: [PerceptionContext; 3] = [
        PerceptionContext::Alignment,
        PerceptionContext::Team,
        PerceptionContext::Role,
    ];
}

/// The apparent identity of a player as seen by one observer.
///
/// Computed fresh per query; never stored in state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perception {
    pub role: RoleId,
    pub team: Team,
    pub alignment: Alignment,
}

/// Everything a modifier may inspect while transforming a perception.
#[derive(Clone, Copy, Debug)]
pub struct PerceptionQuery<'a> {
    /// The player being observed.
    pub target: &'a Player,
    /// The player doing the observing.
    pub observer: &'a Player,
    /// The effect instance that owns the modifier.
    pub instance: &'a EffectInstance,
    /// The aspect being asked about.
    pub context: PerceptionContext,
    /// The state the query runs against.
    pub state: &'a GameState,
}

/// Effect-attached rule that changes how its holder is seen.
///
/// Modifiers are pure: `apply` receives the perception produced by every
/// earlier modifier and returns the next one.
pub trait PerceptionModifier: Send + Sync {
    /// Contexts this modifier participates in.
    fn contexts(&self) -> &[PerceptionContext];

    /// Restrict the modifier to observers holding one of these roles.
    ///
    /// `None` means every observer.
    fn observer_roles(&self) -> Option<&[RoleId]> {
        None
    }

    /// Transform the accumulated perception.
    fn apply(&self, perception: Perception, query: &PerceptionQuery<'_>) -> Perception;

    /// Check whether this modifier fires for a context and observer.
    fn matches(&self, context: PerceptionContext, observer: &Player) -> bool {
        self.contexts().contains(&context)
            && self
                .observer_roles()
                .map_or(true, |roles| roles.contains(&observer.role))
    }
}

/// Applies the narrator's committed `perceive_as` override, if any.
///
/// Fields the override leaves unset keep their incoming value.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerceiveAs;

impl PerceptionModifier for PerceiveAs {
    fn contexts(&self) -> &[PerceptionContext] {
        &PerceptionContext::ALL
    }

    fn apply(&self, mut perception: Perception, query: &PerceptionQuery<'_>) -> Perception {
        let Some(over) = &query.instance.perceive_as else {
            return perception;
        };
        if let Some(role) = &over.role {
            perception.role = role.clone();
        }
        if let Some(team) = over.team {
            perception.team = team;
        }
        if let Some(alignment) = over.alignment {
            perception.alignment = alignment;
        }
        perception
    }
}
