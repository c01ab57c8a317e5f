//! Role content for the sample script.

use crate::changes::StateChanges;
use crate::core::{EffectInstance, Expiry, HistoryEvent, HistoryKind, Message, RoleId, Team};
use crate::pipeline::{Cause, Choice, InputRequest, Intent};
use crate::roles::{Ability, AbilityContext, AbilityOutput, RoleDefinition};

use super::effects::{BOUNCE, MARTYRDOM, MISREGISTER, SAFE, SUCCESSOR};

pub const VILLAGER: RoleId = RoleId::from_static("villager");
pub const GUARDIAN: RoleId = RoleId::from_static("guardian");
pub const MAYOR: RoleId = RoleId::from_static("mayor");
pub const MARTYR: RoleId = RoleId::from_static("martyr");
pub const OUTCAST: RoleId = RoleId::from_static("outcast");
pub const HEIR: RoleId = RoleId::from_static("heir");
pub const DEMON: RoleId = RoleId::from_static("demon");

/// All sample role definitions.
pub fn definitions() -> Vec<RoleDefinition> {
    vec![
        RoleDefinition::new(VILLAGER, "Villager", Team::Townsfolk),
        RoleDefinition::new(GUARDIAN, "Guardian", Team::Townsfolk)
            .other_nights(20)
            .with_ability(Guard),
        RoleDefinition::new(MAYOR, "Mayor", Team::Townsfolk)
            .with_starting_effect(EffectInstance::new(BOUNCE)),
        RoleDefinition::new(MARTYR, "Martyr", Team::Outsider)
            .with_starting_effect(EffectInstance::new(MARTYRDOM)),
        RoleDefinition::new(OUTCAST, "Outcast", Team::Outsider)
            .with_starting_effect(EffectInstance::new(MISREGISTER)),
        RoleDefinition::new(HEIR, "Heir", Team::Minion)
            .with_starting_effect(EffectInstance::new(SUCCESSOR)),
        RoleDefinition::new(DEMON, "Demon", Team::Demon)
            .other_nights(30)
            .with_ability(DemonKill),
    ]
}

/// Protects another player from the demon until the next night.
struct Guard;

impl Ability for Guard {
    fn prompt(&self, ctx: &AbilityContext<'_>) -> Option<InputRequest> {
        let candidates = ctx
            .state
            .living_players()
            .filter(|p| p.id != ctx.actor.id)
            .map(|p| p.id)
            .collect();
        Some(InputRequest::choose_player("guard_target", Message::new("prompt.guard"), candidates))
    }

    fn perform(&self, ctx: &AbilityContext<'_>, choice: &Choice) -> AbilityOutput {
        let Some(target) = choice.as_player().filter(|&p| ctx.state.is_alive(p)) else {
            return AbilityOutput::nothing();
        };

        AbilityOutput::changes(
            StateChanges::new()
                .with_effect(
                    target,
                    EffectInstance::new(SAFE)
                        .with_expiry(Expiry::EndOfNight)
                        .with_source(ctx.actor.id),
                )
                .with_event(
                    HistoryEvent::new(HistoryKind::EffectApplied, "guarded")
                        .about(target)
                        .with_data("effect", SAFE.as_str()),
                ),
        )
    }
}

/// Kills one player each night after the first. Choosing itself is a self-kill.
struct DemonKill;

impl Ability for DemonKill {
    fn prompt(&self, ctx: &AbilityContext<'_>) -> Option<InputRequest> {
        let candidates = ctx.state.living_players().map(|p| p.id).collect();
        Some(InputRequest::choose_player("demon_target", Message::new("prompt.demon"), candidates))
    }

    fn perform(&self, ctx: &AbilityContext<'_>, choice: &Choice) -> AbilityOutput {
        let Some(target) = choice.as_player() else {
            return AbilityOutput::nothing();
        };
        let cause = if target == ctx.actor.id {
            Cause::SelfKill
        } else {
            Cause::Demon
        };
        AbilityOutput::intent(Intent::kill(ctx.actor.id, target, cause))
    }
}
