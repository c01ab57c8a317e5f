//! The top-level game value: current state plus history.
//!
//! `current_state` is cached for speed but is always equal to the
//! `state_after` snapshot of the latest history entry. Every constructor
//! keeps that invariant; decoding a snapshot checks it.
//!
//! ## Snapshots
//!
//! Storage collaborators persist the full `Game`. Two codecs are offered:
//! JSON (`to_json`/`from_json`) for inspection, bincode
//! (`to_bytes`/`from_bytes`) for compact storage. Both round-trip
//! losslessly.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::history::{HistoryEntry, HistoryEvent, HistoryKind};
use super::state::GameState;
use crate::error::{RuleError, RuleResult};

/// A game in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    current_state: GameState,
    history: Vector<HistoryEntry>,
}

impl Game {
    /// Start a game from an initial state.
    ///
    /// Records a `game_started` entry so the state is derivable from
    /// history from the very first transition.
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        let entry = HistoryEntry {
            id: 0,
            event: HistoryEvent::new(HistoryKind::GameStarted, "game_started"),
            state_before: initial.clone(),
            state_after: initial.clone(),
        };

        Self {
            current_state: initial,
            history: Vector::unit(entry),
        }
    }

    /// Build a game from parts produced by the applier.
    pub(crate) fn from_parts(current_state: GameState, history: Vector<HistoryEntry>) -> Self {
        Self {
            current_state,
            history,
        }
    }

    /// The cached current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.current_state
    }

    /// Iterate over history, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Number of history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The most recent history entry.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// The next history entry ID.
    #[must_use]
    pub fn next_entry_id(&self) -> u64 {
        self.history.last().map_or(0, |e| e.id + 1)
    }

    /// Entries recorded since the current night or day began, oldest first.
    ///
    /// During setup this is every entry.
    pub fn entries_this_phase(&self) -> impl Iterator<Item = &HistoryEntry> {
        let start = self
            .history
            .iter()
            .rposition(|e| {
                matches!(e.kind(), HistoryKind::NightStarted | HistoryKind::DayStarted)
            })
            .unwrap_or(0);
        self.history.iter().skip(start)
    }

    /// The current state as derived purely from history.
    #[must_use]
    pub fn derived_state(&self) -> Option<&GameState> {
        self.history.last().map(|e| &e.state_after)
    }

    /// Check that the cached state agrees with history.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.derived_state() == Some(&self.current_state)
    }

    /// Shared handle to the history vector for the applier.
    pub(crate) fn history_vector(&self) -> &Vector<HistoryEntry> {
        &self.history
    }

    // === Snapshot Codecs ===

    /// Encode as JSON.
    pub fn to_json(&self) -> RuleResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON, rejecting inconsistent snapshots.
    pub fn from_json(json: &str) -> RuleResult<Self> {
        let game: Self = serde_json::from_str(json)?;
        game.checked()
    }

    /// Encode as bincode.
    pub fn to_bytes(&self) -> RuleResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode, rejecting inconsistent snapshots.
    pub fn from_bytes(bytes: &[u8]) -> RuleResult<Self> {
        let game: Self = bincode::deserialize(bytes)?;
        game.checked()
    }

    fn checked(self) -> RuleResult<Self> {
        if self.is_consistent() {
            Ok(self)
        } else {
            Err(RuleError::InconsistentSnapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Phase, Player, PlayerId, RoleId};

    fn game() -> Game {
        let state = GameState::new(
            (0..4).map(|i| Player::new(PlayerId::new(i), format!("P{}", i), RoleId::from_static("villager"))),
        )
        .unwrap();
        Game::new(state)
    }

    #[test]
    fn test_new_game_is_consistent() {
        let game = game();
        assert_eq!(game.history_len(), 1);
        assert_eq!(game.latest().unwrap().kind(), &HistoryKind::GameStarted);
        assert_eq!(game.next_entry_id(), 1);
        assert!(game.is_consistent());
    }

    #[test]
    fn test_json_round_trip() {
        let game = game();
        let json = game.to_json().unwrap();
        let back = Game::from_json(&json).unwrap();
        assert_eq!(game, back);
        assert_eq!(json, back.to_json().unwrap());
    }

    #[test]
    fn test_bytes_round_trip() {
        let game = game();
        let bytes = game.to_bytes().unwrap();
        let back = Game::from_bytes(&bytes).unwrap();
        assert_eq!(game, back);
        assert_eq!(bytes, back.to_bytes().unwrap());
    }

    #[test]
    fn test_inconsistent_snapshot_rejected() {
        let mut game = game();
        game.current_state.phase = Phase::Night { round: 1 };

        let json = game.to_json().unwrap();
        assert!(matches!(Game::from_json(&json), Err(RuleError::InconsistentSnapshot)));
    }

    #[test]
    fn test_entries_this_phase_during_setup() {
        let game = game();
        assert_eq!(game.entries_this_phase().count(), 1);
    }
}
