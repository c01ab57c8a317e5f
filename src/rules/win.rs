//! Win-condition evaluation.
//!
//! ## Evaluation Order
//!
//! 1. Built-in global conditions (when enabled in `EngineConfig`)
//! 2. Per-effect conditions, players in seat order, effects in order,
//!    conditions in declaration order
//!
//! The first condition to name a winner decides. A condition that
//! returns an error is logged and skipped; the rest still run.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Alignment, EffectInstance, Game, GameState, HistoryEntry, Player, Team};
use crate::error::RuleResult;

use super::ruleset::Ruleset;

/// When a condition is checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTiming {
    /// After every committed transition.
    #[default]
    AfterChange,
    /// Once, when the narrator ends the day.
    EndOfDay,
}

/// What a win condition sees.
#[derive(Clone, Copy)]
pub struct WinContext<'a> {
    /// The player holding the effect.
    pub owner: &'a Player,
    /// The effect instance the condition belongs to.
    pub instance: &'a EffectInstance,
    pub state: &'a GameState,
    pub game: &'a Game,
    /// The most recent history entry.
    pub latest: Option<&'a HistoryEntry>,
    pub ruleset: &'a Ruleset,
}

/// Effect-attached victory check.
pub trait WinCondition: Send + Sync {
    /// When this condition is checked.
    fn timing(&self) -> WinTiming {
        WinTiming::AfterChange
    }

    /// The winning side, if this condition ends the game now.
    fn check(&self, ctx: &WinContext<'_>) -> RuleResult<Option<Alignment>>;
}

/// Conditions every game checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinCondition {
    /// Good wins once every demon-team player is dead.
    DemonsDead,
    /// Evil wins once few enough players remain with a demon alive.
    EvilParity,
}

impl BuiltinCondition {
    /// All built-ins in evaluation order.
    pub const ALL: [BuiltinCondition; 2] = [BuiltinCondition::DemonsDead, BuiltinCondition::EvilParity];

    /// Evaluate against a state.
    #[must_use]
    pub fn check(self, state: &GameState, ruleset: &Ruleset) -> Option<Alignment> {
        let roles = ruleset.roles();
        let is_demon = |p: &&Player| roles.team_of(&p.role) == Team::Demon;

        match self {
            BuiltinCondition::DemonsDead => {
                let mut demons = state.players().filter(is_demon).peekable();
                let any_demon = demons.peek().is_some();
                let all_dead = demons.all(|p| !p.is_alive());
                (any_demon && all_dead).then_some(Alignment::Good)
            }
            BuiltinCondition::EvilParity => {
                let living = state
                    .living_players()
                    .filter(|p| roles.team_of(&p.role) != Team::Traveller)
                    .count();
                let demon_alive = state.living_players().any(|p| is_demon(&p));
                (demon_alive && living <= ruleset.config().parity_threshold).then_some(Alignment::Evil)
            }
        }
    }
}

/// Check every after-change condition.
#[must_use]
pub fn check_win_condition(state: &GameState, game: &Game, ruleset: &Ruleset) -> Option<Alignment> {
    if ruleset.config().builtin_win_conditions {
        if let Some(winner) = BuiltinCondition::ALL
            .iter()
            .find_map(|builtin| builtin.check(state, ruleset))
        {
            return Some(winner);
        }
    }
    check_effects(WinTiming::AfterChange, state, game, ruleset)
}

/// Check the conditions that only fire when the day ends.
#[must_use]
pub fn check_end_of_day_win_conditions(
    state: &GameState,
    game: &Game,
    ruleset: &Ruleset,
) -> Option<Alignment> {
    check_effects(WinTiming::EndOfDay, state, game, ruleset)
}

fn check_effects(timing: WinTiming, state: &GameState, game: &Game, ruleset: &Ruleset) -> Option<Alignment> {
    let latest = game.latest();

    for owner in state.players() {
        for (instance, def) in ruleset.effects().active_on(owner) {
            for condition in def.win_conditions().iter().filter(|c| c.timing() == timing) {
                let ctx = WinContext {
                    owner,
                    instance,
                    state,
                    game,
                    latest,
                    ruleset,
                };
                match condition.check(&ctx) {
                    Ok(Some(winner)) => return Some(winner),
                    Ok(None) => {}
                    Err(error) => {
                        warn!(effect = %def.id, owner = %owner.id, %error, "win condition failed");
                    }
                }
            }
        }
    }

    None
}
