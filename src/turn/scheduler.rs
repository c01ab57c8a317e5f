//! Night-order scheduling.
//!
//! `next_step` is recomputed from the game on every call. It stores
//! nothing, so calling it speculatively is always safe.

use serde::{Deserialize, Serialize};

use crate::core::{Alignment, Game, HistoryKind, Phase, PlayerId, RoleId};
use crate::roles::AbilityContext;
use crate::rules::Ruleset;

/// What the narrator should do next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Roles have not been revealed yet.
    RoleReveal,
    /// Wake a player and run their ability.
    NightAction { player: PlayerId, role: RoleId },
    /// A player is due in the night order but does not wake.
    NightActionSkip { player: PlayerId, role: RoleId },
    /// Every scheduled player has acted; waiting to start the day.
    NightWaiting,
    /// Open discussion and nominations.
    Day,
    /// A nomination is waiting for its vote.
    Voting { nominator: PlayerId, nominee: PlayerId },
    /// The game has ended.
    GameOver { winner: Alignment },
}

/// A player due to act tonight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledAction {
    pub player: PlayerId,
    pub role: RoleId,
    pub order: u32,
}

/// Players due to act in a night round, in night order.
///
/// Ties in order go by seat. Players whose role is unknown or has no
/// order for the round are left out.
#[must_use]
pub fn night_order(game: &Game, round: u32, ruleset: &Ruleset) -> Vec<ScheduledAction> {
    let mut scheduled: Vec<ScheduledAction> = game
        .state()
        .players()
        .filter_map(|player| {
            let order = ruleset.roles().get(&player.role)?.night_order(round)?;
            Some(ScheduledAction {
                player: player.id,
                role: player.role.clone(),
                order,
            })
        })
        .collect();

    scheduled.sort_by_key(|s| s.order);
    scheduled
}

/// Check if a player's night action was resolved or skipped this phase.
#[must_use]
pub fn has_acted(game: &Game, player: PlayerId) -> bool {
    game.entries_this_phase().any(|entry| {
        entry.is(&HistoryKind::NightActionResolved, player)
            || entry.is(&HistoryKind::NightActionSkipped, player)
    })
}

/// The nomination still waiting for a vote today, as `(nominator, nominee)`.
#[must_use]
pub fn pending_nomination(game: &Game) -> Option<(PlayerId, PlayerId)> {
    let mut pending = None;
    for entry in game.entries_this_phase() {
        match entry.kind() {
            HistoryKind::Nomination => {
                pending = entry
                    .subject()
                    .zip(entry.event.data.player("nominator"))
                    .map(|(nominee, nominator)| (nominator, nominee));
            }
            HistoryKind::VoteTallied => pending = None,
            _ => {}
        }
    }
    pending
}

/// Decide the next step of the turn sequence.
#[must_use]
pub fn next_step(game: &Game, ruleset: &Ruleset) -> Step {
    match game.state().phase {
        Phase::Setup => Step::RoleReveal,
        Phase::Over { winner } => Step::GameOver { winner },
        Phase::Day { .. } => match pending_nomination(game) {
            Some((nominator, nominee)) => Step::Voting { nominator, nominee },
            None => Step::Day,
        },
        Phase::Night { round } => night_step(game, round, ruleset),
    }
}

fn night_step(game: &Game, round: u32, ruleset: &Ruleset) -> Step {
    let state = game.state();

    for scheduled in night_order(game, round, ruleset) {
        if has_acted(game, scheduled.player) {
            continue;
        }
        let Some(actor) = state.player(scheduled.player) else {
            continue;
        };

        let wakes = ruleset
            .roles()
            .get(&scheduled.role)
            .and_then(|role| role.ability())
            .is_some_and(|ability| {
                ability.should_wake(&AbilityContext {
                    actor,
                    state,
                    game,
                    ruleset,
                })
            });

        return if wakes {
            Step::NightAction {
                player: scheduled.player,
                role: scheduled.role,
            }
        } else {
            Step::NightActionSkip {
                player: scheduled.player,
                role: scheduled.role,
            }
        };
    }

    Step::NightWaiting
}
