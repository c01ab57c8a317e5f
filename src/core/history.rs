//! Append-only game history.
//!
//! Handlers describe what happened as `HistoryEvent`s attached to a state
//! change batch. When the batch is applied, each event is stamped into a
//! `HistoryEntry` with an ID and the state before and after the batch.
//! Entries are never mutated afterwards; they are the sole record of what
//! happened and are what informational abilities and win checks read.

use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use super::payload::{Payload, PayloadValue};
use super::state::GameState;

/// What kind of thing a history entry records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    GameStarted,
    RolesRevealed,
    NightStarted,
    DayStarted,
    DayEnded,
    NightActionResolved,
    NightActionSkipped,
    PlayerDied,
    Execution,
    Nomination,
    VoteTallied,
    KillPrevented,
    ActionPrevented,
    KillRedirected,
    RoleChanged,
    EffectApplied,
    StateChanged,
    GameOver,
    /// Content-defined entry kinds.
    Custom(String),
}

/// A localizable message: a translation key plus named arguments.
///
/// The engine never renders messages; the presentation layer looks the
/// key up and substitutes the arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub key: String,
    #[serde(default)]
    pub args: Payload,
}

impl Message {
    /// Create a message with no arguments.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: Payload::new(),
        }
    }

    /// Add an argument (builder pattern).
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.args.set(name, value);
        self
    }
}

/// A history record as produced by a handler, before it is committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// What happened.
    pub kind: HistoryKind,

    /// The player this event is about, if any.
    #[serde(default)]
    pub subject: Option<PlayerId>,

    /// Display message.
    pub message: Message,

    /// Structured data for informational abilities.
    #[serde(default)]
    pub data: Payload,
}

impl HistoryEvent {
    /// Create an event whose message key mirrors its kind.
    pub fn new(kind: HistoryKind, message_key: impl Into<String>) -> Self {
        Self {
            kind,
            subject: None,
            message: Message::new(message_key),
            data: Payload::new(),
        }
    }

    /// Set the subject player (builder pattern).
    #[must_use]
    pub fn about(mut self, player: PlayerId) -> Self {
        self.subject = Some(player);
        self
    }

    /// Replace the message (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = message;
        self
    }

    /// Add a data value (builder pattern).
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.data.set(key, value);
        self
    }
}

/// A committed, immutable history record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Sequential ID (0 for the game start entry).
    pub id: u64,

    /// What happened.
    pub event: HistoryEvent,

    /// State before the batch that produced this entry.
    pub state_before: GameState,

    /// State after the batch that produced this entry.
    pub state_after: GameState,
}

impl HistoryEntry {
    /// Shorthand for `event.kind`.
    #[must_use]
    pub fn kind(&self) -> &HistoryKind {
        &self.event.kind
    }

    /// Shorthand for `event.subject`.
    #[must_use]
    pub fn subject(&self) -> Option<PlayerId> {
        self.event.subject
    }

    /// Check if this entry is of `kind` and about `player`.
    #[must_use]
    pub fn is(&self, kind: &HistoryKind, player: PlayerId) -> bool {
        &self.event.kind == kind && self.event.subject == Some(player)
    }
}
