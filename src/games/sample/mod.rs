//! A small sample script for exercising the engine.
//!
//! Seven roles and six effects, enough to cover every engine contract:
//! - `guardian` grants `safe`, which prevents demon kills
//! - `mayor` starts with `bounce`, which lets the narrator move a kill
//! - `martyr` starts with `martyrdom`, an execution win condition
//! - `outcast` starts with `misregister` and may register as evil
//! - `heir` starts with `successor` and takes over if the demon self-kills
//! - `demon` kills each night after the first
//!
//! This is a template for content authors, not a complete script.

pub mod effects;
pub mod roles;

use crate::core::EngineConfig;
use crate::effects::EffectRegistry;
use crate::error::RuleResult;
use crate::roles::RoleRegistry;
use crate::rules::Ruleset;

/// Build the sample ruleset with default settings.
pub fn ruleset() -> RuleResult<Ruleset> {
    ruleset_with(EngineConfig::default())
}

/// Build the sample ruleset with custom settings.
pub fn ruleset_with(config: EngineConfig) -> RuleResult<Ruleset> {
    let mut effect_registry = EffectRegistry::new();
    for definition in effects::definitions() {
        effect_registry.register(definition)?;
    }

    let mut role_registry = RoleRegistry::new();
    for definition in roles::definitions() {
        role_registry.register(definition)?;
    }

    Ruleset::new(effect_registry, role_registry, config)
}
