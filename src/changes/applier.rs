//! Applying state change batches to a game.
//!
//! `apply_changes` is a pure function: it takes a `Game` by reference and
//! returns a new one. Within a batch, mutations apply in a fixed order:
//!
//! 1. Effect removals, per player
//! 2. Effect additions, per player (a duplicate type replaces in place)
//! 3. Role reassignments
//! 4. Phase change
//!
//! Removals run before additions so a batch can refresh an effect by
//! removing and re-adding it. Role reassignment never touches effects.
//! Every history event in the batch is then stamped with the pre- and
//! post-batch states.

use tracing::{debug, trace};

use crate::core::{Expiry, Game, GameState, HistoryEntry, HistoryEvent, HistoryKind};

use super::StateChanges;

/// Apply a batch to a game, producing the next game value.
///
/// An empty batch returns an unchanged copy. A batch with mutations but
/// no history events records a single `state_changed` entry so the state
/// stays derivable from history.
#[must_use]
pub fn apply_changes(game: &Game, changes: StateChanges) -> Game {
    if changes.is_empty() {
        return game.clone();
    }

    let before = game.state().clone();
    let mut after = before.clone();
    let mutated = changes.has_mutations();

    let StateChanges {
        add_effects,
        remove_effects,
        change_roles,
        phase,
        mut history,
    } = changes;

    for (player_id, effects) in remove_effects {
        let Some(player) = after.player_mut(player_id) else {
            trace!(%player_id, "skipping removals for unseated player");
            continue;
        };
        for effect in effects {
            player.remove_effect(&effect);
        }
    }

    for (player_id, instances) in add_effects {
        let Some(player) = after.player_mut(player_id) else {
            trace!(%player_id, "skipping additions for unseated player");
            continue;
        };
        for instance in instances {
            player.upsert_effect(instance);
        }
    }

    for (player_id, role) in change_roles {
        match after.player_mut(player_id) {
            Some(player) => player.role = role,
            None => trace!(%player_id, "skipping role change for unseated player"),
        }
    }

    if let Some(phase) = phase {
        after.phase = phase;
    }

    if mutated && history.is_empty() {
        history.push(HistoryEvent::new(HistoryKind::StateChanged, "state_changed"));
    }

    debug!(entries = history.len(), mutated, "applying state changes");

    let mut entries = game.history_vector().clone();
    let mut next_id = game.next_entry_id();
    for event in history {
        entries.push_back(HistoryEntry {
            id: next_id,
            event,
            state_before: before.clone(),
            state_after: after.clone(),
        });
        next_id += 1;
    }

    Game::from_parts(after, entries)
}

/// Purge every effect instance with the given expiry.
///
/// Returns the batch that removes them; callers merge it into their
/// phase-transition batch.
#[must_use]
pub fn expiring_effects(state: &GameState, expiry: Expiry) -> StateChanges {
    let mut changes = StateChanges::new();
    for player in state.players() {
        for instance in player.effects().filter(|e| e.expiry == expiry) {
            changes.remove_effect(player.id, instance.effect.clone());
        }
    }
    changes
}

impl Game {
    /// Apply a batch. See [`apply_changes`].
    #[must_use]
    pub fn apply(&self, changes: StateChanges) -> Game {
        apply_changes(self, changes)
    }
}
