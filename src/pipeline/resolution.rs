//! Resolution outcomes and suspended resolutions.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::changes::StateChanges;
use crate::core::{EffectId, PlayerId};

use super::handler::{InputRequest, PreventReason};
use super::intent::Intent;

/// The outcome of running an intent through the pipeline.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Every applicable handler allowed the submitted intent unchanged.
    Allow { intent: Intent, changes: StateChanges },
    /// A handler stopped the intent.
    Prevent {
        intent: Intent,
        reason: PreventReason,
        changes: StateChanges,
    },
    /// At least one handler redirected and the final intent was allowed.
    ///
    /// `to` may equal `from` when the chain came back to its start.
    Redirect {
        from: Intent,
        to: Intent,
        changes: StateChanges,
    },
    /// A handler needs a narrator decision before resolution can continue.
    AwaitInput(SuspendedResolution),
}

impl Resolution {
    /// The batch to commit, or `None` while awaiting input.
    #[must_use]
    pub fn changes(&self) -> Option<&StateChanges> {
        match self {
            Resolution::Allow { changes, .. }
            | Resolution::Prevent { changes, .. }
            | Resolution::Redirect { changes, .. } => Some(changes),
            Resolution::AwaitInput(_) => None,
        }
    }

    /// Take the batch to commit, or `None` while awaiting input.
    #[must_use]
    pub fn into_changes(self) -> Option<StateChanges> {
        match self {
            Resolution::Allow { changes, .. }
            | Resolution::Prevent { changes, .. }
            | Resolution::Redirect { changes, .. } => Some(changes),
            Resolution::AwaitInput(_) => None,
        }
    }

    /// Check if resolution finished with the intent going through.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Resolution::Allow { .. } | Resolution::Redirect { .. })
    }

    /// Check if resolution was prevented.
    #[must_use]
    pub fn is_prevented(&self) -> bool {
        matches!(self, Resolution::Prevent { .. })
    }

    /// Check if resolution is suspended.
    #[must_use]
    pub fn is_awaiting_input(&self) -> bool {
        matches!(self, Resolution::AwaitInput(_))
    }

    /// Short label for logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Allow { .. } => "allow",
            Resolution::Prevent { .. } => "prevent",
            Resolution::Redirect { .. } => "redirect",
            Resolution::AwaitInput(_) => "await_input",
        }
    }
}

/// A reference to one handler on one player's effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerRef {
    pub owner: PlayerId,
    pub effect: EffectId,
    /// Index into the effect definition's handler list.
    pub index: usize,
    pub priority: i32,
}

impl HandlerRef {
    /// Check if two refs name the same handler on the same player.
    #[must_use]
    pub fn same_handler(&self, other: &HandlerRef) -> bool {
        self.owner == other.owner && self.effect == other.effect && self.index == other.index
    }
}

/// Pipeline state between handler invocations.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Pipeline {
    /// The intent as submitted.
    pub(crate) original: Intent,
    /// The intent after redirects.
    pub(crate) intent: Intent,
    /// Handlers still to run, in order.
    pub(crate) queue: VecDeque<HandlerRef>,
    /// Handlers that have fully run.
    pub(crate) consumed: Vec<HandlerRef>,
    /// Changes attached so far, in execution order.
    pub(crate) changes: StateChanges,
    /// Redirects followed so far.
    pub(crate) redirects: u32,
}

/// A resolution paused on a narrator decision.
///
/// Holds everything needed to continue: the current intent, the handler
/// queue, consumed handlers, and attached changes. It is a plain value
/// that can be stored and inspected. It is not `Clone`, and `resume`
/// consumes it, so each suspension resumes at most once.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspendedResolution {
    pub(crate) pipeline: Pipeline,
    pub(crate) pending: HandlerRef,
    pub(crate) request: InputRequest,
}

impl SuspendedResolution {
    /// What the narrator is being asked.
    #[must_use]
    pub fn request(&self) -> &InputRequest {
        &self.request
    }

    /// The handler waiting for the answer.
    #[must_use]
    pub fn pending(&self) -> &HandlerRef {
        &self.pending
    }

    /// The intent as it currently stands.
    #[must_use]
    pub fn intent(&self) -> &Intent {
        &self.pipeline.intent
    }

    /// The intent as originally submitted.
    #[must_use]
    pub fn original_intent(&self) -> &Intent {
        &self.pipeline.original
    }

    /// Changes attached so far.
    #[must_use]
    pub fn changes(&self) -> &StateChanges {
        &self.pipeline.changes
    }

    /// Handlers that will run after the pending one.
    pub fn remaining(&self) -> impl Iterator<Item = &HandlerRef> {
        self.pipeline.queue.iter()
    }
}
