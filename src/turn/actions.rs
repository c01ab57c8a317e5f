//! Driving actions through the pipeline and committing them.
//!
//! These functions glue the pieces together for a narrator front end:
//! resolve an intent, commit the batch, check for a winner. A suspended
//! resolution comes back as `ActionFlow::AwaitingInput`; the caller
//! stores the `PendingAction` and hands it to `resume_action` once the
//! narrator has answered.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::changes::StateChanges;
use crate::core::{Alignment, Game, GameState, HistoryEvent, HistoryKind, Message, Phase, PlayerId};
use crate::effects::DayAction;
use crate::pipeline::{resolve_intent, Choice, Intent, Resolution, SuspendedResolution};
use crate::roles::AbilityContext;
use crate::rules::{check_win_condition, Ruleset};

use super::phase::declare_winner;

/// A resolution waiting for the narrator.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub suspended: SuspendedResolution,
    /// The night actor to mark resolved once the action completes.
    pub actor: Option<PlayerId>,
}

/// The result of driving an action.
#[derive(Debug, PartialEq, Eq)]
pub enum ActionFlow {
    /// Changes were committed. `winner` is set if the game ended.
    Committed {
        game: Game,
        winner: Option<Alignment>,
    },
    /// Resolution is suspended. `game` holds whatever was committed first.
    AwaitingInput { game: Game, pending: PendingAction },
}

impl ActionFlow {
    /// The game as it stands after this flow.
    #[must_use]
    pub fn game(&self) -> &Game {
        match self {
            ActionFlow::Committed { game, .. } | ActionFlow::AwaitingInput { game, .. } => game,
        }
    }

    /// Take the game, dropping any pending action.
    #[must_use]
    pub fn into_game(self) -> Game {
        match self {
            ActionFlow::Committed { game, .. } | ActionFlow::AwaitingInput { game, .. } => game,
        }
    }
}

/// Resolve an intent against the current state and commit the outcome.
#[must_use]
pub fn submit_intent(game: &Game, intent: Intent, ruleset: &Ruleset) -> ActionFlow {
    let resolution = resolve_intent(intent, game.state(), game, ruleset);
    settle(game.clone(), resolution, None, ruleset)
}

/// Continue a suspended action with the narrator's answer.
#[must_use]
pub fn resume_action(game: &Game, pending: PendingAction, choice: Choice, ruleset: &Ruleset) -> ActionFlow {
    let PendingAction { suspended, actor } = pending;
    let resolution = suspended.resume(choice, game.state(), game, ruleset);
    settle(game.clone(), resolution, actor, ruleset)
}

/// Run a player's night ability with the narrator's choice.
///
/// The ability's direct changes commit first; its intent, if any, then
/// goes through the pipeline. The player is marked as having acted once
/// everything has resolved. A player with no ability is marked skipped.
#[must_use]
pub fn perform_night_action(game: &Game, player: PlayerId, choice: Choice, ruleset: &Ruleset) -> ActionFlow {
    let state = game.state();
    let ability = state
        .player(player)
        .and_then(|actor| ruleset.roles().get(&actor.role).map(|role| (actor, role)))
        .and_then(|(actor, role)| role.ability().map(|ability| (actor, ability)));

    let Some((actor, ability)) = ability else {
        debug!(%player, "no ability to perform");
        return commit(skip_night_action(game, player), StateChanges::new(), ruleset);
    };

    let ctx = AbilityContext {
        actor,
        state,
        game,
        ruleset,
    };
    let output = ability.perform(&ctx, &choice);
    debug!(%player, intent = ?output.intent, "night ability performed");

    match output.intent {
        None => {
            let mut changes = output.changes;
            changes.record(resolved_marker(player));
            commit(game.clone(), changes, ruleset)
        }
        Some(intent) => {
            let game = game.apply(output.changes);
            let resolution = resolve_intent(intent, game.state(), &game, ruleset);
            settle(game, resolution, Some(player), ruleset)
        }
    }
}

/// Mark a scheduled player as not acting tonight.
#[must_use]
pub fn skip_night_action(game: &Game, player: PlayerId) -> Game {
    game.apply(
        StateChanges::new().with_event(
            HistoryEvent::new(HistoryKind::NightActionSkipped, "night_action_skipped").about(player),
        ),
    )
}

/// Record the vote on the pending nomination.
#[must_use]
pub fn record_vote(game: &Game, nominee: PlayerId, votes: u32) -> Game {
    game.apply(
        StateChanges::new().with_event(
            HistoryEvent::new(HistoryKind::VoteTallied, "vote_tallied")
                .about(nominee)
                .with_message(
                    Message::new("vote_tallied")
                        .arg("nominee", nominee)
                        .arg("votes", i64::from(votes)),
                )
                .with_data("votes", i64::from(votes)),
        ),
    )
}

/// Players who may vote: seated, with no effect that blocks voting.
#[must_use]
pub fn eligible_voters(state: &GameState, ruleset: &Ruleset) -> Vec<PlayerId> {
    state
        .players()
        .filter(|p| !ruleset.effects().flags_for(p).blocks_voting)
        .map(|p| p.id)
        .collect()
}

/// Day actions living players can take, in seat then effect order.
#[must_use]
pub fn day_actions<'a>(state: &'a GameState, ruleset: &'a Ruleset) -> Vec<(PlayerId, &'a DayAction)> {
    state
        .living_players()
        .flat_map(move |player| {
            ruleset
                .effects()
                .active_on(player)
                .filter_map(move |(_, def)| def.day_action.as_ref().map(|action| (player.id, action)))
        })
        .collect()
}

fn settle(game: Game, resolution: Resolution, actor: Option<PlayerId>, ruleset: &Ruleset) -> ActionFlow {
    debug!(outcome = resolution.label(), "resolution settled");

    let mut changes = match resolution {
        Resolution::AwaitInput(suspended) => {
            return ActionFlow::AwaitingInput {
                game,
                pending: PendingAction { suspended, actor },
            };
        }
        Resolution::Allow { changes, .. }
        | Resolution::Prevent { changes, .. }
        | Resolution::Redirect { changes, .. } => changes,
    };

    if let Some(actor) = actor {
        changes.record(resolved_marker(actor));
    }
    commit(game, changes, ruleset)
}

fn commit(game: Game, changes: StateChanges, ruleset: &Ruleset) -> ActionFlow {
    let game = game.apply(changes);
    if matches!(game.state().phase, Phase::Over { .. }) {
        return ActionFlow::Committed { game, winner: None };
    }
    match check_win_condition(game.state(), &game, ruleset) {
        Some(winner) => ActionFlow::Committed {
            game: declare_winner(&game, winner),
            winner: Some(winner),
        },
        None => ActionFlow::Committed { game, winner: None },
    }
}

fn resolved_marker(player: PlayerId) -> HistoryEvent {
    HistoryEvent::new(HistoryKind::NightActionResolved, "night_action_resolved").about(player)
}
