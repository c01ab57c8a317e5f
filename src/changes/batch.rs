//! State change batches.
//!
//! A `StateChanges` value declares every mutation a resolution wants to
//! make: effects to add and remove per player, role reassignments, an
//! optional phase change, and history events. The applier commits a batch
//! atomically; nothing else mutates game state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{EffectId, EffectInstance, HistoryEvent, Phase, PlayerId, RoleId};

/// A batch of declared state mutations.
///
/// Per-player maps are ordered by `PlayerId`, so applying the same batch
/// always touches players in the same order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChanges {
    /// Effects to add, per player.
    pub add_effects: BTreeMap<PlayerId, Vec<EffectInstance>>,

    /// Effects to remove, per player.
    pub remove_effects: BTreeMap<PlayerId, Vec<EffectId>>,

    /// Role reassignments.
    pub change_roles: BTreeMap<PlayerId, RoleId>,

    /// Phase transition, if any.
    pub phase: Option<Phase>,

    /// History events, committed in order.
    pub history: Vec<HistoryEvent>,
}

impl StateChanges {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Mutating API ===

    /// Add an effect to a player.
    pub fn add_effect(&mut self, player: PlayerId, instance: EffectInstance) {
        self.add_effects.entry(player).or_default().push(instance);
    }

    /// Remove an effect from a player.
    pub fn remove_effect(&mut self, player: PlayerId, effect: EffectId) {
        self.remove_effects.entry(player).or_default().push(effect);
    }

    /// Reassign a player's role. A later reassignment of the same player wins.
    pub fn change_role(&mut self, player: PlayerId, role: RoleId) {
        self.change_roles.insert(player, role);
    }

    /// Set the phase.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = Some(phase);
    }

    /// Append a history event.
    pub fn record(&mut self, event: HistoryEvent) {
        self.history.push(event);
    }

    /// Append another batch after this one.
    ///
    /// Applying the merged batch has the same effect as applying the two
    /// in sequence. A removal in `other` cancels additions of the same
    /// effect already queued here and still removes any existing
    /// instance. Later role and phase changes win, and history keeps
    /// execution order.
    pub fn merge(&mut self, other: StateChanges) {
        for (player, effects) in other.remove_effects {
            if let Some(pending) = self.add_effects.get_mut(&player) {
                pending.retain(|instance| !effects.contains(&instance.effect));
                if pending.is_empty() {
                    self.add_effects.remove(&player);
                }
            }
            self.remove_effects.entry(player).or_default().extend(effects);
        }
        for (player, instances) in other.add_effects {
            self.add_effects.entry(player).or_default().extend(instances);
        }
        self.change_roles.extend(other.change_roles);
        if other.phase.is_some() {
            self.phase = other.phase;
        }
        self.history.extend(other.history);
    }

    // === Builder API ===

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, player: PlayerId, instance: EffectInstance) -> Self {
        self.add_effect(player, instance);
        self
    }

    /// Remove an effect (builder pattern).
    #[must_use]
    pub fn without_effect(mut self, player: PlayerId, effect: EffectId) -> Self {
        self.remove_effect(player, effect);
        self
    }

    /// Reassign a role (builder pattern).
    #[must_use]
    pub fn with_role(mut self, player: PlayerId, role: RoleId) -> Self {
        self.change_role(player, role);
        self
    }

    /// Set the phase (builder pattern).
    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.set_phase(phase);
        self
    }

    /// Append a history event (builder pattern).
    #[must_use]
    pub fn with_event(mut self, event: HistoryEvent) -> Self {
        self.record(event);
        self
    }

    // === Queries ===

    /// Check if the batch mutates state (ignoring history).
    #[must_use]
    pub fn has_mutations(&self) -> bool {
        self.add_effects.values().any(|v| !v.is_empty())
            || self.remove_effects.values().any(|v| !v.is_empty())
            || !self.change_roles.is_empty()
            || self.phase.is_some()
    }

    /// Check if the batch does nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_mutations() && self.history.is_empty()
    }

    /// Iterate over history events in order.
    pub fn events(&self) -> impl Iterator<Item = &HistoryEvent> {
        self.history.iter()
    }

    /// Effects this batch adds to a player.
    #[must_use]
    pub fn added_for(&self, player: PlayerId) -> &[EffectInstance] {
        self.add_effects.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Effects this batch removes from a player.
    #[must_use]
    pub fn removed_for(&self, player: PlayerId) -> &[EffectId] {
        self.remove_effects.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }
}
