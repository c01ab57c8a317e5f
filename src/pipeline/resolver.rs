//! The intent resolution loop.
//!
//! ## Algorithm
//!
//! 1. Collect applicable handlers: players in seat order, each player's
//!    effects in order, each definition's handlers in order. Skip handlers
//!    already consumed in this resolution.
//! 2. Stable-sort by ascending priority.
//! 3. Run them one at a time and fold each outcome:
//!    - `Allow` merges its changes and moves on with the same intent
//!    - `Prevent` merges its changes and stops
//!    - `Redirect` merges its changes, swaps the intent, and goes back to 1
//!    - `RequestInput` suspends; `resume` folds the handler's next outcome
//!      the same way and carries on with the remaining queue
//! 4. When the queue drains, append the final intent's own consequences.
//!    The result is `Redirect` if any handler redirected, even when the
//!    final intent equals the submitted one.

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::changes::StateChanges;
use crate::core::{EffectInstance, Game, GameState, HistoryEvent, HistoryKind, Message, Player};
use crate::rules::Ruleset;

use super::handler::{Choice, HandlerContext, HandlerOutcome, IntentHandler, PreventReason};
use super::intent::Intent;
use super::resolution::{HandlerRef, Pipeline, Resolution, SuspendedResolution};

/// Run an intent through every applicable handler.
///
/// `state` is the state handlers observe; `game` gives them history.
/// They are normally `game.state()` and `game`.
#[must_use]
pub fn resolve_intent(intent: Intent, state: &GameState, game: &Game, ruleset: &Ruleset) -> Resolution {
    if let Some(blocked) = nomination_blocked(&intent, state, ruleset) {
        return blocked;
    }

    let queue = collect_candidates(&intent, &[], state, game, ruleset);
    debug!(?intent, handlers = queue.len(), "resolving intent");

    let pipeline = Pipeline {
        original: intent.clone(),
        intent,
        queue,
        consumed: Vec::new(),
        changes: StateChanges::new(),
        redirects: 0,
    };
    run(pipeline, state, game, ruleset)
}

impl SuspendedResolution {
    /// Continue with the narrator's answer.
    ///
    /// Consumes the suspension. If the pending handler's effect is gone
    /// from the state, the answer is dropped and the remaining queue runs.
    #[must_use]
    pub fn resume(self, choice: Choice, state: &GameState, game: &Game, ruleset: &Ruleset) -> Resolution {
        let SuspendedResolution {
            pipeline, pending, ..
        } = self;

        let Some((owner, instance, handler)) = lookup(&pending, state, ruleset) else {
            trace!(effect = %pending.effect, owner = %pending.owner, "pending handler vanished");
            return run(pipeline, state, game, ruleset);
        };

        let ctx = HandlerContext {
            intent: &pipeline.intent,
            owner,
            instance,
            state,
            game,
            ruleset,
        };
        let outcome = handler.resume(&ctx, &choice);
        debug!(effect = %pending.effect, owner = %pending.owner, outcome = outcome.label(), "handler resumed");

        match pipeline.fold(pending, outcome, state, game, ruleset) {
            ControlFlow::Continue(pipeline) => run(pipeline, state, game, ruleset),
            ControlFlow::Break(resolution) => resolution,
        }
    }
}

fn run(mut pipeline: Pipeline, state: &GameState, game: &Game, ruleset: &Ruleset) -> Resolution {
    while let Some(handler_ref) = pipeline.queue.pop_front() {
        let Some((owner, instance, handler)) = lookup(&handler_ref, state, ruleset) else {
            trace!(effect = %handler_ref.effect, owner = %handler_ref.owner, "skipping missing handler");
            continue;
        };

        let ctx = HandlerContext {
            intent: &pipeline.intent,
            owner,
            instance,
            state,
            game,
            ruleset,
        };
        let outcome = handler.handle(&ctx);
        debug!(
            effect = %handler_ref.effect,
            owner = %handler_ref.owner,
            priority = handler_ref.priority,
            outcome = outcome.label(),
            "handler ran"
        );

        pipeline = match pipeline.fold(handler_ref, outcome, state, game, ruleset) {
            ControlFlow::Continue(pipeline) => pipeline,
            ControlFlow::Break(resolution) => return resolution,
        };
    }

    pipeline.finish(state)
}

impl Pipeline {
    fn fold(
        mut self,
        handler: HandlerRef,
        outcome: HandlerOutcome,
        state: &GameState,
        game: &Game,
        ruleset: &Ruleset,
    ) -> ControlFlow<Resolution, Self> {
        match outcome {
            HandlerOutcome::Allow(changes) => {
                self.changes.merge(changes);
                self.consumed.push(handler);
                ControlFlow::Continue(self)
            }
            HandlerOutcome::Prevent { reason, changes } => {
                self.changes.merge(changes);
                ControlFlow::Break(Resolution::Prevent {
                    intent: self.intent,
                    reason,
                    changes: self.changes,
                })
            }
            HandlerOutcome::Redirect { intent, changes } => {
                self.changes.merge(changes);
                self.consumed.push(handler);
                self.redirects += 1;

                let limit = ruleset.config().max_redirects;
                if self.redirects > limit {
                    warn!(limit, intent = ?self.intent, "redirect limit exceeded");
                    self.changes.record(
                        HistoryEvent::new(HistoryKind::ActionPrevented, "redirect_limit")
                            .about(intent.target())
                            .with_message(Message::new("redirect_limit").arg("limit", i64::from(limit)))
                            .with_data("reason", PreventReason::RedirectLimit.as_str()),
                    );
                    return ControlFlow::Break(Resolution::Prevent {
                        intent,
                        reason: PreventReason::RedirectLimit,
                        changes: self.changes,
                    });
                }

                self.intent = intent;
                self.queue = collect_candidates(&self.intent, &self.consumed, state, game, ruleset);
                ControlFlow::Continue(self)
            }
            HandlerOutcome::RequestInput(request) => {
                debug!(key = %request.key, "resolution suspended");
                ControlFlow::Break(Resolution::AwaitInput(SuspendedResolution {
                    pipeline: self,
                    pending: handler,
                    request,
                }))
            }
        }
    }

    fn finish(mut self, state: &GameState) -> Resolution {
        self.changes.merge(self.intent.consequences(state));

        // A chain that comes back to the original target still redirected.
        if self.redirects == 0 {
            Resolution::Allow {
                intent: self.intent,
                changes: self.changes,
            }
        } else {
            Resolution::Redirect {
                from: self.original,
                to: self.intent,
                changes: self.changes,
            }
        }
    }
}

fn nomination_blocked(intent: &Intent, state: &GameState, ruleset: &Ruleset) -> Option<Resolution> {
    let Intent::Nominate { nominator, .. } = intent else {
        return None;
    };
    let player = state.player(*nominator)?;
    if !ruleset.effects().flags_for(player).blocks_nomination {
        return None;
    }

    debug!(%nominator, "nomination blocked");
    let reason = PreventReason::NominationBlocked;
    let mut changes = StateChanges::new();
    changes.record(
        HistoryEvent::new(HistoryKind::ActionPrevented, "nomination_blocked")
            .about(*nominator)
            .with_message(Message::new("nomination_blocked").arg("player", *nominator))
            .with_data("reason", reason.as_str()),
    );
    Some(Resolution::Prevent {
        intent: intent.clone(),
        reason,
        changes,
    })
}

fn collect_candidates(
    intent: &Intent,
    consumed: &[HandlerRef],
    state: &GameState,
    game: &Game,
    ruleset: &Ruleset,
) -> VecDeque<HandlerRef> {
    let mut candidates = Vec::new();

    for owner in state.players() {
        for (instance, def) in ruleset.effects().active_on(owner) {
            for (index, handler) in def.handlers().iter().enumerate() {
                let handler_ref = HandlerRef {
                    owner: owner.id,
                    effect: def.id.clone(),
                    index,
                    priority: handler.priority(),
                };
                if consumed.iter().any(|c| c.same_handler(&handler_ref)) {
                    continue;
                }

                let ctx = HandlerContext {
                    intent,
                    owner,
                    instance,
                    state,
                    game,
                    ruleset,
                };
                if handler.applies_to(&ctx) {
                    candidates.push(handler_ref);
                }
            }
        }
    }

    candidates.sort_by_key(|h| h.priority);
    candidates.into()
}

fn lookup<'a>(
    handler_ref: &HandlerRef,
    state: &'a GameState,
    ruleset: &'a Ruleset,
) -> Option<(&'a Player, &'a EffectInstance, &'a Arc<dyn IntentHandler>)> {
    let owner = state.player(handler_ref.owner)?;
    let instance = owner.effect(&handler_ref.effect)?;
    let handler = ruleset
        .effects()
        .get(&handler_ref.effect)?
        .handlers()
        .get(handler_ref.index)?;
    Some((owner, instance, handler))
}
