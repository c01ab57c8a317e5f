//! Game state: phase and seated players.
//!
//! `GameState` is an immutable value. Every transition produces a new
//! state through the applier; persistent `im` collections make the copy
//! O(1), which is what lets every history entry keep its own snapshot.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use super::player::Player;
use super::team::Alignment;
use crate::error::{RuleError, RuleResult};

/// Where in the turn structure the game is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Players seated, roles not yet revealed.
    #[default]
    Setup,
    /// Night `round` (the first night is round 1).
    Night { round: u32 },
    /// Day following night `round`.
    Day { round: u32 },
    /// The game has ended.
    Over { winner: Alignment },
}

impl Phase {
    /// The current round, or 0 during setup.
    #[must_use]
    pub const fn round(self) -> u32 {
        match self {
            Phase::Night { round } | Phase::Day { round } => round,
            Phase::Setup | Phase::Over { .. } => 0,
        }
    }

    /// Check if this is a night phase.
    #[must_use]
    pub const fn is_night(self) -> bool {
        matches!(self, Phase::Night { .. })
    }

    /// Check if this is a day phase.
    #[must_use]
    pub const fn is_day(self) -> bool {
        matches!(self, Phase::Day { .. })
    }
}

/// The current state of a game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    pub phase: Phase,

    /// Seated players in seating order.
    players: Vector<Player>,
}

impl GameState {
    /// Create a state in the setup phase.
    ///
    /// Fails if two players share an ID.
    pub fn new(players: impl IntoIterator<Item = Player>) -> RuleResult<Self> {
        let mut seated: Vector<Player> = Vector::new();
        for player in players {
            if seated.iter().any(|p| p.id == player.id) {
                return Err(RuleError::DuplicatePlayer(player.id));
            }
            seated.push_back(player);
        }

        Ok(Self {
            phase: Phase::Setup,
            players: seated,
        })
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Iterate over players in seating order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Iterate over living players in seating order.
    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Check if a player is seated and alive.
    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).is_some_and(Player::is_alive)
    }

    /// Get a seat index by player ID.
    #[must_use]
    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Get a mutable player by ID.
    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        let idx = self.seat_of(id)?;
        self.players.get_mut(idx)
    }

    /// Mutable iteration over all players.
    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }
}
