//! Role ability plugin contract.

use crate::changes::StateChanges;
use crate::core::{Game, GameState, Player};
use crate::pipeline::{Choice, InputRequest, Intent};
use crate::rules::Ruleset;

/// What an ability sees while acting.
#[derive(Clone, Copy)]
pub struct AbilityContext<'a> {
    /// The player whose role is acting.
    pub actor: &'a Player,
    pub state: &'a GameState,
    pub game: &'a Game,
    pub ruleset: &'a Ruleset,
}

/// What an ability produces when it acts.
///
/// `changes` is committed as-is. `intent`, if any, goes through the
/// pipeline afterwards so other effects can intercept it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityOutput {
    pub changes: StateChanges,
    pub intent: Option<Intent>,
}

impl AbilityOutput {
    /// An ability that did nothing.
    #[must_use]
    pub fn nothing() -> Self {
        Self::default()
    }

    /// Emit an intent with no direct changes.
    #[must_use]
    pub fn intent(intent: Intent) -> Self {
        Self {
            changes: StateChanges::new(),
            intent: Some(intent),
        }
    }

    /// Commit changes with no intent.
    #[must_use]
    pub fn changes(changes: StateChanges) -> Self {
        Self {
            changes,
            intent: None,
        }
    }
}

/// A role's night ability.
pub trait Ability: Send + Sync {
    /// Check whether the actor wakes tonight.
    ///
    /// By default a player wakes when alive and no effect they hold
    /// blocks waking.
    fn should_wake(&self, ctx: &AbilityContext<'_>) -> bool {
        ctx.actor.is_alive() && !ctx.ruleset.effects().flags_for(ctx.actor).blocks_waking
    }

    /// The decision the narrator collects before `perform`, if any.
    fn prompt(&self, _ctx: &AbilityContext<'_>) -> Option<InputRequest> {
        None
    }

    /// Act on the narrator's choice.
    fn perform(&self, ctx: &AbilityContext<'_>, choice: &Choice) -> AbilityOutput;
}
