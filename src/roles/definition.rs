//! Role definitions.

use std::sync::Arc;

use crate::core::{EffectInstance, RoleId, Team};

use super::ability::Ability;

/// Static description of a role.
#[derive(Clone)]
pub struct RoleDefinition {
    /// Unique identifier.
    pub id: RoleId,

    /// Human-readable name.
    pub name: String,

    /// The team the role belongs to.
    pub team: Team,

    /// Position in the first night's order, if the role wakes then.
    pub first_night: Option<u32>,

    /// Position in later nights' order, if the role wakes then.
    pub other_nights: Option<u32>,

    /// Effects a player with this role starts the game with.
    pub starting_effects: Vec<EffectInstance>,

    ability: Option<Arc<dyn Ability>>,
}

impl RoleDefinition {
    /// Create a role that never wakes.
    pub fn new(id: RoleId, name: impl Into<String>, team: Team) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            first_night: None,
            other_nights: None,
            starting_effects: Vec::new(),
            ability: None,
        }
    }

    /// Set the first-night order (builder pattern).
    #[must_use]
    pub fn first_night(mut self, order: u32) -> Self {
        self.first_night = Some(order);
        self
    }

    /// Set the order for every later night (builder pattern).
    #[must_use]
    pub fn other_nights(mut self, order: u32) -> Self {
        self.other_nights = Some(order);
        self
    }

    /// Add a starting effect (builder pattern).
    #[must_use]
    pub fn with_starting_effect(mut self, instance: EffectInstance) -> Self {
        self.starting_effects.push(instance);
        self
    }

    /// Set the night ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: impl Ability + 'static) -> Self {
        self.ability = Some(Arc::new(ability));
        self
    }

    /// The night ability, if any.
    #[must_use]
    pub fn ability(&self) -> Option<&dyn Ability> {
        self.ability.as_deref()
    }

    /// Night order for a round. Round 1 is the first night.
    #[must_use]
    pub fn night_order(&self, round: u32) -> Option<u32> {
        if round <= 1 {
            self.first_night
        } else {
            self.other_nights
        }
    }
}

impl std::fmt::Debug for RoleDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("team", &self.team)
            .field("first_night", &self.first_night)
            .field("other_nights", &self.other_nights)
            .field("starting_effects", &self.starting_effects)
            .field("ability", &self.ability.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_order() {
        let role = RoleDefinition::new(RoleId::from_static("seer"), "Seer", Team::Townsfolk)
            .first_night(10)
            .other_nights(20);

        assert_eq!(role.night_order(1), Some(10));
        assert_eq!(role.night_order(2), Some(20));
        assert_eq!(role.night_order(7), Some(20));
    }

    #[test]
    fn test_first_night_only() {
        let role = RoleDefinition::new(RoleId::from_static("scout"), "Scout", Team::Townsfolk)
            .first_night(5);

        assert_eq!(role.night_order(1), Some(5));
        assert_eq!(role.night_order(2), None);
        assert!(role.ability().is_none());
    }
}
