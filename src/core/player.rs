//! Seated players and the effect instances they carry.
//!
//! ## Player
//!
//! A player has an identity, a display name, a current role, and an
//! ordered list of active `EffectInstance`s. Players are owned by
//! `GameState` and only change through the state change applier.
//!
//! ## EffectInstance
//!
//! A live status on a player: which effect, optional payload, when it
//! expires, and who applied it. A player holds at most one instance per
//! effect type; adding a second replaces the first in place.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::ids::{EffectId, PlayerId, RoleId};
use super::payload::Payload;
use super::team::{Alignment, Team};

/// When an effect instance is purged automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// Persists until explicitly removed.
    #[default]
    Never,
    /// Purged when the next night starts.
    EndOfNight,
    /// Purged when the next day starts.
    EndOfDay,
}

/// A concrete "register as" choice committed by the narrator.
///
/// Fields left as `None` keep the underlying value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionOverride {
    pub role: Option<RoleId>,
    pub team: Option<Team>,
    pub alignment: Option<Alignment>,
}

impl PerceptionOverride {
    /// Create an empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register as a role (builder pattern).
    #[must_use]
    pub fn role(mut self, role: RoleId) -> Self {
        self.role = Some(role);
        self
    }

    /// Register as a team (builder pattern).
    #[must_use]
    pub fn team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    /// Register as an alignment (builder pattern).
    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// A live effect on a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectInstance {
    /// Which effect definition this instance refers to.
    pub effect: EffectId,

    /// Handler-defined payload.
    #[serde(default)]
    pub data: Payload,

    /// Concrete perception override injected by the narrator.
    #[serde(default)]
    pub perceive_as: Option<PerceptionOverride>,

    /// When this instance is purged.
    #[serde(default)]
    pub expiry: Expiry,

    /// The player whose ability created this instance.
    #[serde(default)]
    pub source: Option<PlayerId>,
}

impl EffectInstance {
    /// Create a permanent instance with no payload.
    pub fn new(effect: EffectId) -> Self {
        Self {
            effect,
            data: Payload::new(),
            perceive_as: None,
            expiry: Expiry::Never,
            source: None,
        }
    }

    /// Set the payload (builder pattern).
    #[must_use]
    pub fn with_data(mut self, data: Payload) -> Self {
        self.data = data;
        self
    }

    /// Set the expiry (builder pattern).
    #[must_use]
    pub fn with_expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// Set the source player (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: PlayerId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set a perception override (builder pattern).
    #[must_use]
    pub fn with_perceive_as(mut self, perceive_as: PerceptionOverride) -> Self {
        self.perceive_as = Some(perceive_as);
        self
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,

    /// Display name.
    pub name: String,

    /// Current role.
    pub role: RoleId,

    /// Explicit alignment. `None` means "whatever the role's team implies".
    #[serde(default)]
    pub alignment: Option<Alignment>,

    /// Active effects in the order they were applied.
    effects: Vector<EffectInstance>,
}

impl Player {
    /// Create a player with no effects.
    pub fn new(id: PlayerId, name: impl Into<String>, role: RoleId) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            alignment: None,
            effects: Vector::new(),
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, instance: EffectInstance) -> Self {
        self.upsert_effect(instance);
        self
    }

    /// Set an explicit alignment (builder pattern).
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Iterate over active effects in application order.
    pub fn effects(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter()
    }

    /// Get the active instance of an effect, if any.
    #[must_use]
    pub fn effect(&self, effect: &EffectId) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| &e.effect == effect)
    }

    /// Check if the player holds an effect.
    #[must_use]
    pub fn has_effect(&self, effect: &EffectId) -> bool {
        self.effect(effect).is_some()
    }

    /// Check if the player is alive (does not hold the death marker).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.has_effect(&EffectId::DEAD)
    }

    /// Number of active effects.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    // === Mutation (applier only) ===

    /// Add an effect, replacing an existing instance of the same type in place.
    pub(crate) fn upsert_effect(&mut self, instance: EffectInstance) {
        match self.effects.iter().position(|e| e.effect == instance.effect) {
            Some(idx) => {
                self.effects.set(idx, instance);
            }
            None => self.effects.push_back(instance),
        }
    }

    /// Remove an effect. Returns true if it was present.
    pub(crate) fn remove_effect(&mut self, effect: &EffectId) -> bool {
        match self.effects.iter().position(|e| &e.effect == effect) {
            Some(idx) => {
                self.effects.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Mutable access to active effects.
    pub(crate) fn effects_mut(&mut self) -> impl Iterator<Item = &mut EffectInstance> {
        self.effects.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn villager(id: u32) -> Player {
        Player::new(PlayerId::new(id), format!("P{}", id), RoleId::from_static("villager"))
    }

    #[test]
    fn test_new_player_is_alive() {
        let player = villager(0);
        assert!(player.is_alive());
        assert_eq!(player.effect_count(), 0);
    }

    #[test]
    fn test_dead_marker() {
        let player = villager(0).with_effect(EffectInstance::new(EffectId::DEAD));
        assert!(!player.is_alive());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let safe = EffectId::from_static("safe");
        let mut player = villager(0)
            .with_effect(EffectInstance::new(safe.clone()))
            .with_effect(EffectInstance::new(EffectId::from_static("other")));

        player.upsert_effect(
            EffectInstance::new(safe.clone()).with_source(PlayerId::new(3)),
        );

        assert_eq!(player.effect_count(), 2);
        let first = player.effects().next().unwrap();
        assert_eq!(first.effect, safe);
        assert_eq!(first.source, Some(PlayerId::new(3)));
    }

    #[test]
    fn test_remove_effect() {
        let safe = EffectId::from_static("safe");
        let mut player = villager(0).with_effect(EffectInstance::new(safe.clone()));

        assert!(player.remove_effect(&safe));
        assert!(!player.remove_effect(&safe));
        assert!(!player.has_effect(&safe));
    }

    #[test]
    fn test_player_serialization() {
        let player = villager(2)
            .with_alignment(Alignment::Evil)
            .with_effect(
                EffectInstance::new(EffectId::from_static("misregister"))
                    .with_expiry(Expiry::EndOfDay)
                    .with_perceive_as(PerceptionOverride::new().team(Team::Demon)),
            );

        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, back);
    }
}
