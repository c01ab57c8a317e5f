//! The registry value threaded through every engine call.

use crate::core::EngineConfig;
use crate::effects::EffectRegistry;
use crate::error::{RuleError, RuleResult};
use crate::roles::RoleRegistry;

/// Everything the engine knows about a script: effects, roles, settings.
///
/// Built once at startup and passed by reference. There is no global
/// registry.
#[derive(Clone, Debug)]
pub struct Ruleset {
    effects: EffectRegistry,
    roles: RoleRegistry,
    config: EngineConfig,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            effects: EffectRegistry::new(),
            roles: RoleRegistry::new(),
            config: EngineConfig::default(),
        }
    }
}

impl Ruleset {
    /// Assemble a ruleset.
    ///
    /// Fails if the configuration is invalid or a role starts with an
    /// effect that is not registered.
    pub fn new(effects: EffectRegistry, roles: RoleRegistry, config: EngineConfig) -> RuleResult<Self> {
        config.validate()?;

        for role in roles.all() {
            if let Some(missing) = role
                .starting_effects
                .iter()
                .find(|instance| !effects.contains(&instance.effect))
            {
                return Err(RuleError::config(format!(
                    "role {} starts with unregistered effect {}",
                    role.id.as_str(),
                    missing.effect.as_str()
                )));
            }
        }

        Ok(Self {
            effects,
            roles,
            config,
        })
    }

    /// The effect registry.
    #[must_use]
    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    /// The role registry.
    #[must_use]
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Engine settings.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EffectId, EffectInstance, RoleId, Team};
    use crate::roles::RoleDefinition;

    #[test]
    fn test_default_has_dead_effect() {
        let ruleset = Ruleset::default();
        assert!(ruleset.effects().contains(&EffectId::DEAD));
        assert!(ruleset.roles().is_empty());
        assert_eq!(ruleset.config().max_redirects, 8);
    }

    #[test]
    fn test_invalid_config_fails() {
        let result = Ruleset::new(
            EffectRegistry::new(),
            RoleRegistry::new(),
            EngineConfig::new().with_max_redirects(0),
        );
        assert!(matches!(result, Err(RuleError::Config(_))));
    }

    #[test]
    fn test_unregistered_starting_effect_fails() {
        let mut roles = RoleRegistry::new();
        roles
            .register(
                RoleDefinition::new(RoleId::from_static("martyr"), "Martyr", Team::Townsfolk)
                    .with_starting_effect(EffectInstance::new(EffectId::from_static("martyrdom"))),
            )
            .unwrap();

        let result = Ruleset::new(EffectRegistry::new(), roles, EngineConfig::new());
        let Err(RuleError::Config(msg)) = result else {
            panic!("expected config error");
        };
        assert!(msg.contains("martyrdom"));
    }
}
