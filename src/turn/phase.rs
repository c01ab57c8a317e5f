//! Phase transitions.
//!
//! Every transition is a single batch: the phase change, any expiring
//! effects, and the history entry marking the boundary commit together.

use tracing::info;

use crate::changes::{expiring_effects, StateChanges};
use crate::core::{Alignment, Expiry, Game, GameState, HistoryEvent, HistoryKind, Message, Phase, Player};
use crate::error::{RuleError, RuleResult};
use crate::rules::{check_end_of_day_win_conditions, Ruleset};

/// Seat players and start a game in the setup phase.
///
/// Each player receives their role's starting effects.
pub fn setup_game(players: impl IntoIterator<Item = Player>, ruleset: &Ruleset) -> RuleResult<Game> {
    let seated = players.into_iter().map(|mut player| {
        if let Some(role) = ruleset.roles().get(&player.role) {
            for instance in &role.starting_effects {
                player = player.with_effect(instance.clone());
            }
        }
        player
    });

    let state = GameState::new(seated)?;
    info!(players = state.player_count(), "game set up");
    Ok(Game::new(state))
}

/// Reveal roles and begin the first night.
pub fn reveal_roles(game: &Game) -> RuleResult<Game> {
    let phase = game.state().phase;
    if phase != Phase::Setup {
        return Err(RuleError::InvalidTransition {
            action: "reveal roles",
            phase,
        });
    }

    let changes = StateChanges::new()
        .with_phase(Phase::Night { round: 1 })
        .with_event(HistoryEvent::new(HistoryKind::RolesRevealed, "roles_revealed"))
        .with_event(night_started(1));
    Ok(game.apply(changes))
}

/// Begin the night after the current day.
///
/// Purges effects that expire at the end of a night.
pub fn start_night(game: &Game) -> RuleResult<Game> {
    let phase = game.state().phase;
    let Phase::Day { round } = phase else {
        return Err(RuleError::InvalidTransition {
            action: "start the night",
            phase,
        });
    };

    let round = round + 1;
    let mut changes = expiring_effects(game.state(), Expiry::EndOfNight);
    changes.set_phase(Phase::Night { round });
    changes.record(night_started(round));
    Ok(game.apply(changes))
}

/// Begin the day after the current night.
///
/// Purges effects that expire at the end of a day.
pub fn start_day(game: &Game) -> RuleResult<Game> {
    let phase = game.state().phase;
    let Phase::Night { round } = phase else {
        return Err(RuleError::InvalidTransition {
            action: "start the day",
            phase,
        });
    };

    let mut changes = expiring_effects(game.state(), Expiry::EndOfDay);
    changes.set_phase(Phase::Day { round });
    changes.record(
        HistoryEvent::new(HistoryKind::DayStarted, "day_started")
            .with_message(Message::new("day_started").arg("round", i64::from(round))),
    );
    Ok(game.apply(changes))
}

/// End the day and run end-of-day win conditions.
///
/// If one names a winner the game is over when this returns.
pub fn end_day(game: &Game, ruleset: &Ruleset) -> RuleResult<Game> {
    let phase = game.state().phase;
    let Phase::Day { round } = phase else {
        return Err(RuleError::InvalidTransition {
            action: "end the day",
            phase,
        });
    };

    let ended = game.apply(
        StateChanges::new().with_event(
            HistoryEvent::new(HistoryKind::DayEnded, "day_ended")
                .with_message(Message::new("day_ended").arg("round", i64::from(round))),
        ),
    );

    match check_end_of_day_win_conditions(ended.state(), &ended, ruleset) {
        Some(winner) => Ok(declare_winner(&ended, winner)),
        None => Ok(ended),
    }
}

/// End the game with a winner.
#[must_use]
pub fn declare_winner(game: &Game, winner: Alignment) -> Game {
    info!(%winner, "game over");
    game.apply(
        StateChanges::new()
            .with_phase(Phase::Over { winner })
            .with_event(
                HistoryEvent::new(HistoryKind::GameOver, "game_over")
                    .with_message(Message::new("game_over").arg("winner", winner))
                    .with_data("winner", winner),
            ),
    )
}

fn night_started(round: u32) -> HistoryEvent {
    HistoryEvent::new(HistoryKind::NightStarted, "night_started")
        .with_message(Message::new("night_started").arg("round", i64::from(round)))
}
