//! Perception queries.

use std::collections::BTreeMap;

use crate::core::{Alignment, GameState, PerceptionOverride, Player, PlayerId, Team};
use crate::effects::EffectRegistry;
use crate::rules::Ruleset;

use super::modifier::{Perception, PerceptionContext, PerceptionQuery};

/// A player's actual role, team, and alignment.
///
/// Alignment is the player's explicit alignment if set, otherwise the
/// default for the role's team. Unknown roles count as townsfolk.
#[must_use]
pub fn true_identity(player: &Player, ruleset: &Ruleset) -> Perception {
    let team = ruleset.roles().team_of(&player.role);
    Perception {
        role: player.role.clone(),
        team,
        alignment: player.alignment.unwrap_or_else(|| team.default_alignment()),
    }
}

/// How `target` appears to `observer` in a context.
///
/// Starts from the true identity and threads it through every matching
/// modifier on the target's effects, in effect order then declaration
/// order. Dead targets are not special: their modifiers still apply.
#[must_use]
pub fn perceive(
    target: &Player,
    observer: &Player,
    context: PerceptionContext,
    state: &GameState,
    ruleset: &Ruleset,
) -> Perception {
    let mut perception = true_identity(target, ruleset);

    for (instance, def) in ruleset.effects().active_on(target) {
        for modifier in def.modifiers() {
            if !modifier.matches(context, observer) {
                continue;
            }
            let query = PerceptionQuery {
                target,
                observer,
                instance,
                context,
                state,
            };
            perception = modifier.apply(perception, &query);
        }
    }

    perception
}

/// Check whether some effect on the player may register it as a team.
#[must_use]
pub fn can_register_as_team(player: &Player, team: Team, effects: &EffectRegistry) -> bool {
    effects.active_on(player).any(|(_, def)| {
        def.register_as
            .as_ref()
            .is_some_and(|cap| cap.teams.contains(&team))
    })
}

/// Check whether some effect on the player may register it as an alignment.
#[must_use]
pub fn can_register_as_alignment(
    player: &Player,
    alignment: Alignment,
    effects: &EffectRegistry,
) -> bool {
    effects.active_on(player).any(|(_, def)| {
        def.register_as
            .as_ref()
            .is_some_and(|cap| cap.alignments.contains(&alignment))
    })
}

/// Filter players to those whose identity is ambiguous in a context.
pub fn ambiguous_players<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    context: PerceptionContext,
    effects: &EffectRegistry,
) -> Vec<&'a Player> {
    players
        .into_iter()
        .filter(|player| {
            effects.active_on(player).any(|(_, def)| {
                def.register_as
                    .as_ref()
                    .is_some_and(|cap| cap.covers(context))
            })
        })
        .collect()
}

/// Derive a state with concrete overrides injected.
///
/// For each named player, every effect instance whose definition declares
/// a "may register as" capability gets the override as its `perceive_as`.
/// The input state is untouched and no history is recorded.
#[must_use]
pub fn apply_perception_overrides(
    state: &GameState,
    overrides: &BTreeMap<PlayerId, PerceptionOverride>,
    effects: &EffectRegistry,
) -> GameState {
    let mut derived = state.clone();

    for (&player_id, over) in overrides {
        let Some(player) = derived.player_mut(player_id) else {
            continue;
        };
        for instance in player.effects_mut() {
            let declares = effects
                .get(&instance.effect)
                .is_some_and(|def| def.register_as.is_some());
            if declares {
                instance.perceive_as = Some(over.clone());
            }
        }
    }

    derived
}
