//! Intent handler plugin contract.
//!
//! Effects attach `IntentHandler`s. The pipeline asks each handler whether
//! it applies to the current intent, then runs the applicable ones in
//! priority order. A handler answers with a `HandlerOutcome`; asking the
//! narrator for a decision is just another outcome.

use serde::{Deserialize, Serialize};

use crate::changes::StateChanges;
use crate::core::{EffectInstance, Game, GameState, Message, Player, PlayerId, RoleId};
use crate::rules::Ruleset;

use super::intent::Intent;

/// What a handler sees while deciding.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// The intent as it currently stands (after any redirects).
    pub intent: &'a Intent,
    /// The player holding the effect.
    pub owner: &'a Player,
    /// The effect instance the handler belongs to.
    pub instance: &'a EffectInstance,
    pub state: &'a GameState,
    pub game: &'a Game,
    pub ruleset: &'a Ruleset,
}

impl HandlerContext<'_> {
    /// Check if the intent is aimed at the handler's owner.
    #[must_use]
    pub fn targets_owner(&self) -> bool {
        self.intent.target() == self.owner.id
    }
}

/// Why an intent was prevented.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreventReason {
    /// A protection effect absorbed it.
    Protected,
    /// The nominator may not nominate.
    NominationBlocked,
    /// Too many redirects in one resolution.
    RedirectLimit,
    /// Content-defined reason.
    Custom(String),
}

impl PreventReason {
    /// Stable string form, used in history payloads.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PreventReason::Protected => "protected",
            PreventReason::NominationBlocked => "nomination_blocked",
            PreventReason::RedirectLimit => "redirect_limit",
            PreventReason::Custom(reason) => reason,
        }
    }
}

/// The shape of answer a handler wants from the narrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOptions {
    /// Pick one of these players.
    Player { candidates: Vec<PlayerId> },
    /// Yes or no.
    Confirm,
    /// Pick one of these roles.
    Role { candidates: Vec<RoleId> },
}

/// A description of the decision the narrator must make.
///
/// The presentation layer renders it; the engine only stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    /// Handler-defined key identifying the question.
    pub key: String,
    pub prompt: Message,
    pub options: InputOptions,
}

impl InputRequest {
    /// Ask the narrator to pick a player.
    pub fn choose_player(key: impl Into<String>, prompt: Message, candidates: Vec<PlayerId>) -> Self {
        Self {
            key: key.into(),
            prompt,
            options: InputOptions::Player { candidates },
        }
    }

    /// Ask the narrator a yes/no question.
    pub fn confirm(key: impl Into<String>, prompt: Message) -> Self {
        Self {
            key: key.into(),
            prompt,
            options: InputOptions::Confirm,
        }
    }
}

/// The narrator's answer to an `InputRequest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Player(PlayerId),
    Confirm(bool),
    Role(RoleId),
    /// The narrator declined to choose.
    None,
}

impl Choice {
    /// The chosen player, if the answer was a player.
    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            Choice::Player(p) => Some(*p),
            _ => None,
        }
    }
}

/// A handler's decision about the current intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Let the intent through, attaching these changes.
    Allow(StateChanges),
    /// Stop the intent.
    Prevent {
        reason: PreventReason,
        changes: StateChanges,
    },
    /// Replace the intent and search for handlers again.
    Redirect { intent: Intent, changes: StateChanges },
    /// Suspend until the narrator answers.
    RequestInput(InputRequest),
}

impl HandlerOutcome {
    /// Allow with no attached changes.
    #[must_use]
    pub fn allow() -> Self {
        HandlerOutcome::Allow(StateChanges::new())
    }

    /// Short label for logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            HandlerOutcome::Allow(_) => "allow",
            HandlerOutcome::Prevent { .. } => "prevent",
            HandlerOutcome::Redirect { .. } => "redirect",
            HandlerOutcome::RequestInput(_) => "request_input",
        }
    }
}

/// Effect-attached logic that may intercept intents.
///
/// ## Contract
///
/// - `applies_to` must return false (not panic) for intents naming
///   players that are not seated.
/// - A handler that redirects must return `Allow` rather than `Redirect`
///   when the chosen target is the current one. The pipeline performs no
///   cycle detection beyond the configured redirect limit.
pub trait IntentHandler: Send + Sync {
    /// Lower runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Check whether this handler wants to see the current intent.
    fn applies_to(&self, ctx: &HandlerContext<'_>) -> bool;

    /// Decide on the intent.
    fn handle(&self, ctx: &HandlerContext<'_>) -> HandlerOutcome;

    /// Decide again once the narrator has answered a `RequestInput`.
    fn resume(&self, _ctx: &HandlerContext<'_>, _choice: &Choice) -> HandlerOutcome {
        HandlerOutcome::allow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(PreventReason::Protected.as_str(), "protected");
        assert_eq!(PreventReason::Custom("drunk".into()).as_str(), "drunk");
    }

    #[test]
    fn test_choice_as_player() {
        assert_eq!(Choice::Player(PlayerId::new(3)).as_player(), Some(PlayerId::new(3)));
        assert_eq!(Choice::Confirm(true).as_player(), None);
        assert_eq!(Choice::None.as_player(), None);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(HandlerOutcome::allow().label(), "allow");
        let request = InputRequest::confirm("sure", Message::new("prompt.sure"));
        assert_eq!(HandlerOutcome::RequestInput(request).label(), "request_input");
    }
}
