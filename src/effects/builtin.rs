//! Effects every ruleset carries.

use crate::core::EffectId;

use super::definition::{BehaviorFlags, EffectDefinition};

/// The death marker.
///
/// Dead players do not wake at night and cannot nominate. They keep
/// their other effects, so misregistration persists after death.
#[must_use]
pub fn dead() -> EffectDefinition {
    EffectDefinition::new(EffectId::DEAD, "Dead").with_flags(BehaviorFlags {
        blocks_waking: true,
        blocks_nomination: true,
        ..BehaviorFlags::NONE
    })
}
