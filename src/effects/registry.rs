//! Effect registry for definition lookup.
//!
//! The `EffectRegistry` stores every effect definition a ruleset knows.
//! Lookup by `EffectId` returns `Option`: an unknown id (stale saved data,
//! removed content) means "this effect contributes nothing", never an error.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::core::{EffectId, EffectInstance, Player};
use crate::error::{RuleError, RuleResult};

use super::builtin;
use super::definition::{BehaviorFlags, EffectDefinition};

/// Registry of effect definitions.
///
/// Iteration follows registration order, so every scan built on it is
/// deterministic.
///
/// ## Example
///
/// ```
/// use grimoire::core::EffectId;
/// use grimoire::effects::{EffectDefinition, EffectRegistry};
///
/// let mut registry = EffectRegistry::new();
/// registry
///     .register(EffectDefinition::new(EffectId::from_static("safe"), "Safe"))
///     .unwrap();
///
/// assert!(registry.get(&EffectId::from_static("safe")).is_some());
/// assert!(registry.get(&EffectId::from_static("gone")).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct EffectRegistry {
    definitions: Vec<EffectDefinition>,
    index: FxHashMap<EffectId, usize>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create a registry holding only the built-in `dead` effect.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.insert(builtin::dead());
        registry
    }

    /// Create a registry with no definitions at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Register an effect definition.
    ///
    /// Fails if an effect with the same ID already exists.
    pub fn register(&mut self, definition: EffectDefinition) -> RuleResult<()> {
        if self.index.contains_key(&definition.id) {
            return Err(RuleError::DuplicateEffect(definition.id));
        }
        self.insert(definition);
        Ok(())
    }

    fn insert(&mut self, definition: EffectDefinition) {
        self.index.insert(definition.id.clone(), self.definitions.len());
        self.definitions.push(definition);
    }

    /// Get an effect definition by ID.
    #[must_use]
    pub fn get(&self, id: &EffectId) -> Option<&EffectDefinition> {
        let found = self.index.get(id).map(|&idx| &self.definitions[idx]);
        if found.is_none() {
            trace!(effect = %id, "unknown effect");
        }
        found
    }

    /// Check if an effect ID is registered.
    #[must_use]
    pub fn contains(&self, id: &EffectId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over all definitions in registration order.
    pub fn all(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.definitions.iter()
    }

    /// Get the number of registered effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Pair each of a player's effect instances with its definition.
    ///
    /// Instances with unknown effect IDs are skipped.
    pub fn active_on<'a>(
        &'a self,
        player: &'a Player,
    ) -> impl Iterator<Item = (&'a EffectInstance, &'a EffectDefinition)> + 'a {
        player
            .effects()
            .filter_map(move |instance| self.get(&instance.effect).map(|def| (instance, def)))
    }

    /// Combined behavior flags of every effect a player holds.
    #[must_use]
    pub fn flags_for(&self, player: &Player) -> BehaviorFlags {
        self.active_on(player)
            .fold(BehaviorFlags::NONE, |acc, (_, def)| acc.union(def.flags))
    }
}
