//! Role registry for definition lookup.
//!
//! Unknown role IDs are not errors. They fall back to a townsfolk team
//! with no night order and no ability.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::core::{RoleId, Team};
use crate::error::{RuleError, RuleResult};

use super::definition::RoleDefinition;

/// Registry of role definitions.
#[derive(Clone, Debug, Default)]
pub struct RoleRegistry {
    roles: Vec<RoleDefinition>,
    index: FxHashMap<RoleId, usize>,
}

impl RoleRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role definition.
    ///
    /// Fails if a role with the same ID already exists.
    pub fn register(&mut self, role: RoleDefinition) -> RuleResult<()> {
        if self.index.contains_key(&role.id) {
            return Err(RuleError::DuplicateRole(role.id));
        }
        self.index.insert(role.id.clone(), self.roles.len());
        self.roles.push(role);
        Ok(())
    }

    /// Get a role definition by ID.
    #[must_use]
    pub fn get(&self, id: &RoleId) -> Option<&RoleDefinition> {
        let found = self.index.get(id).map(|&idx| &self.roles[idx]);
        if found.is_none() {
            trace!(role = %id, "unknown role");
        }
        found
    }

    /// The team of a role, or townsfolk if the role is unknown.
    #[must_use]
    pub fn team_of(&self, id: &RoleId) -> Team {
        self.get(id).map_or(Team::Townsfolk, |r| r.team)
    }

    /// Check if a role ID is registered.
    #[must_use]
    pub fn contains(&self, id: &RoleId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over all roles in registration order.
    pub fn all(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.iter()
    }

    /// Find roles on a team.
    pub fn find_by_team(&self, team: Team) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.iter().filter(move |r| r.team == team)
    }

    /// Get the number of registered roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
