//! Effect content for the sample script.

use crate::changes::StateChanges;
use crate::core::{
    Alignment, EffectId, EffectInstance, HistoryEvent, HistoryKind, Message, Team,
};
use crate::effects::{EffectDefinition, RegisterAs};
use crate::error::RuleResult;
use crate::perception::{true_identity, PerceiveAs};
use crate::pipeline::{
    Cause, Choice, HandlerContext, HandlerOutcome, InputRequest, Intent, IntentHandler, PreventReason,
};
use crate::rules::{WinCondition, WinContext};

/// Protected from the demon's kill.
pub const SAFE: EffectId = EffectId::from_static("safe");
/// A kill on the holder may land on someone else.
pub const BOUNCE: EffectId = EffectId::from_static("bounce");
/// Executing the holder hands victory to the other side.
pub const MARTYRDOM: EffectId = EffectId::from_static("martyrdom");
/// The holder may register as evil.
pub const MISREGISTER: EffectId = EffectId::from_static("misregister");
/// The holder becomes the demon if the demon kills itself.
pub const SUCCESSOR: EffectId = EffectId::from_static("successor");
/// The holder must be shown their new role.
pub const PENDING_REVEAL: EffectId = EffectId::from_static("pending_reveal");

/// All sample effect definitions.
pub fn definitions() -> Vec<EffectDefinition> {
    vec![
        EffectDefinition::new(SAFE, "Safe").with_handler(SafeFromDemon),
        EffectDefinition::new(BOUNCE, "Bounce").with_handler(Bounce),
        EffectDefinition::new(MARTYRDOM, "Martyrdom").with_win_condition(Martyrdom),
        EffectDefinition::new(MISREGISTER, "Misregister")
            .with_register_as(
                RegisterAs::new()
                    .teams([Team::Minion, Team::Demon])
                    .alignments([Alignment::Evil]),
            )
            .with_modifier(PerceiveAs),
        EffectDefinition::new(SUCCESSOR, "Successor").with_handler(Successor),
        EffectDefinition::new(PENDING_REVEAL, "Pending Reveal"),
    ]
}

/// Prevents demon kills on the holder.
struct SafeFromDemon;

impl IntentHandler for SafeFromDemon {
    fn priority(&self) -> i32 {
        10
    }

    fn applies_to(&self, ctx: &HandlerContext<'_>) -> bool {
        matches!(ctx.intent, Intent::Kill { cause: Cause::Demon, .. }) && ctx.targets_owner()
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> HandlerOutcome {
        let reason = PreventReason::Protected;
        let changes = StateChanges::new().with_event(
            HistoryEvent::new(HistoryKind::KillPrevented, "kill_prevented")
                .about(ctx.owner.id)
                .with_message(Message::new("kill_prevented").arg("player", ctx.owner.id))
                .with_data("reason", reason.as_str()),
        );
        HandlerOutcome::Prevent { reason, changes }
    }
}

/// Lets the narrator move a kill off the holder.
///
/// Runs before protections so the new target's own protections apply.
struct Bounce;

impl IntentHandler for Bounce {
    fn priority(&self) -> i32 {
        5
    }

    fn applies_to(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.is_kill() && ctx.targets_owner() && ctx.owner.is_alive()
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> HandlerOutcome {
        let candidates = ctx.state.living_players().map(|p| p.id).collect();
        HandlerOutcome::RequestInput(InputRequest::choose_player(
            "bounce_target",
            Message::new("prompt.bounce_target").arg("player", ctx.owner.id),
            candidates,
        ))
    }

    fn resume(&self, ctx: &HandlerContext<'_>, choice: &Choice) -> HandlerOutcome {
        let original = ctx.intent.target();
        match choice.as_player() {
            Some(new_target) if new_target != original => HandlerOutcome::Redirect {
                intent: ctx.intent.retarget(new_target),
                changes: StateChanges::new().with_event(
                    HistoryEvent::new(HistoryKind::KillRedirected, "kill_redirected")
                        .about(ctx.owner.id)
                        .with_message(
                            Message::new("kill_redirected")
                                .arg("from", original)
                                .arg("to", new_target),
                        )
                        .with_data("original_target", original)
                        .with_data("new_target", new_target),
                ),
            },
            _ => HandlerOutcome::allow(),
        }
    }
}

/// The other side wins when the holder is executed.
struct Martyrdom;

impl WinCondition for Martyrdom {
    fn check(&self, ctx: &WinContext<'_>) -> RuleResult<Option<Alignment>> {
        let executed = ctx
            .latest
            .is_some_and(|entry| entry.is(&HistoryKind::Execution, ctx.owner.id));
        if !executed {
            return Ok(None);
        }
        let side = true_identity(ctx.owner, ctx.ruleset).alignment;
        Ok(Some(side.opposite()))
    }
}

/// Takes over the demon role when a demon kills itself.
struct Successor;

impl IntentHandler for Successor {
    fn applies_to(&self, ctx: &HandlerContext<'_>) -> bool {
        let Intent::Kill {
            target,
            cause: Cause::SelfKill,
            ..
        } = ctx.intent
        else {
            return false;
        };
        let Some(demon) = ctx.state.player(*target) else {
            return false;
        };
        *target != ctx.owner.id
            && ctx.owner.is_alive()
            && ctx.ruleset.roles().team_of(&demon.role) == Team::Demon
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> HandlerOutcome {
        let target = ctx.intent.target();
        let candidates = ctx
            .state
            .living_players()
            .filter(|p| p.id != target)
            .map(|p| p.id)
            .collect();
        HandlerOutcome::RequestInput(InputRequest::choose_player(
            "successor",
            Message::new("prompt.successor"),
            candidates,
        ))
    }

    fn resume(&self, ctx: &HandlerContext<'_>, choice: &Choice) -> HandlerOutcome {
        let Some(demon) = ctx.state.player(ctx.intent.target()) else {
            return HandlerOutcome::allow();
        };
        // Only a living player other than the dying demon can inherit.
        let Some(heir) = choice
            .as_player()
            .filter(|&p| p != demon.id && ctx.state.is_alive(p))
        else {
            return HandlerOutcome::allow();
        };
        let Some(previous) = ctx.state.player(heir).map(|p| p.role.clone()) else {
            return HandlerOutcome::allow();
        };

        let changes = StateChanges::new()
            .with_role(heir, demon.role.clone())
            .without_effect(ctx.owner.id, SUCCESSOR)
            .with_effect(heir, EffectInstance::new(PENDING_REVEAL).with_source(demon.id))
            .with_event(
                HistoryEvent::new(HistoryKind::RoleChanged, "role_changed")
                    .about(heir)
                    .with_message(
                        Message::new("role_changed")
                            .arg("player", heir)
                            .arg("role", demon.role.clone()),
                    )
                    .with_data("previous_role", previous)
                    .with_data("new_role", demon.role.clone()),
            );
        HandlerOutcome::Allow(changes)
    }
}
