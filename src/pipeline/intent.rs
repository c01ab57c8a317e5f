//! Proposed game actions.
//!
//! An `Intent` is a value, not an event: it only becomes history once the
//! pipeline resolves it and the applier commits the resulting batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::changes::StateChanges;
use crate::core::{EffectId, EffectInstance, GameState, HistoryEvent, HistoryKind, Message, PlayerId};

/// Why a kill or execution happened.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    /// The demon's nightly kill.
    Demon,
    /// A demon targeting itself.
    SelfKill,
    /// Some other ability.
    Ability,
    /// Execution after a vote.
    Vote,
    /// Narrator fiat.
    Storyteller,
    /// Content-defined cause.
    Custom(String),
}

impl Cause {
    /// Stable string form, used in history payloads.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Cause::Demon => "demon",
            Cause::SelfKill => "self_kill",
            Cause::Ability => "ability",
            Cause::Vote => "vote",
            Cause::Storyteller => "storyteller",
            Cause::Custom(name) => name,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed action awaiting resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Kill {
        source: Option<PlayerId>,
        target: PlayerId,
        cause: Cause,
    },
    Execute {
        target: PlayerId,
        cause: Cause,
    },
    Nominate {
        nominator: PlayerId,
        nominee: PlayerId,
    },
}

impl Intent {
    /// A kill from a player.
    #[must_use]
    pub fn kill(source: PlayerId, target: PlayerId, cause: Cause) -> Self {
        Intent::Kill {
            source: Some(source),
            target,
            cause,
        }
    }

    /// An execution after a vote.
    #[must_use]
    pub fn execute(target: PlayerId) -> Self {
        Intent::Execute {
            target,
            cause: Cause::Vote,
        }
    }

    /// A nomination.
    #[must_use]
    pub fn nominate(nominator: PlayerId, nominee: PlayerId) -> Self {
        Intent::Nominate { nominator, nominee }
    }

    /// The player the intent acts on.
    #[must_use]
    pub fn target(&self) -> PlayerId {
        match self {
            Intent::Kill { target, .. } | Intent::Execute { target, .. } => *target,
            Intent::Nominate { nominee, .. } => *nominee,
        }
    }

    /// The player who proposed the intent, if any.
    #[must_use]
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            Intent::Kill { source, .. } => *source,
            Intent::Execute { .. } => None,
            Intent::Nominate { nominator, .. } => Some(*nominator),
        }
    }

    /// The same intent aimed at a different player.
    #[must_use]
    pub fn retarget(&self, new_target: PlayerId) -> Self {
        let mut next = self.clone();
        match &mut next {
            Intent::Kill { target, .. } | Intent::Execute { target, .. } => *target = new_target,
            Intent::Nominate { nominee, .. } => *nominee = new_target,
        }
        next
    }

    /// The cause, for kills and executions.
    #[must_use]
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Intent::Kill { cause, .. } | Intent::Execute { cause, .. } => Some(cause),
            Intent::Nominate { .. } => None,
        }
    }

    /// Check if this is a kill.
    #[must_use]
    pub fn is_kill(&self) -> bool {
        matches!(self, Intent::Kill { .. })
    }

    /// The intent's own effect once allowed.
    ///
    /// Kills and executions mark the target dead and record the death.
    /// Killing or executing a player who is already dead (or not seated)
    /// does nothing. Nominations only record themselves.
    #[must_use]
    pub fn consequences(&self, state: &GameState) -> StateChanges {
        let mut changes = StateChanges::new();

        match self {
            Intent::Kill {
                source,
                target,
                cause,
            } => {
                if !state.is_alive(*target) {
                    return changes;
                }
                let mut dead = EffectInstance::new(EffectId::DEAD);
                if let Some(source) = source {
                    dead = dead.with_source(*source);
                }
                changes.add_effect(*target, dead);
                changes.record(
                    HistoryEvent::new(HistoryKind::PlayerDied, "player_died")
                        .about(*target)
                        .with_message(Message::new("player_died").arg("player", *target))
                        .with_data("cause", cause.as_str()),
                );
            }
            Intent::Execute { target, cause } => {
                if !state.is_alive(*target) {
                    return changes;
                }
                changes.add_effect(*target, EffectInstance::new(EffectId::DEAD));
                changes.record(
                    HistoryEvent::new(HistoryKind::Execution, "execution")
                        .about(*target)
                        .with_message(Message::new("execution").arg("player", *target))
                        .with_data("cause", cause.as_str()),
                );
            }
            Intent::Nominate { nominator, nominee } => {
                changes.record(
                    HistoryEvent::new(HistoryKind::Nomination, "nomination")
                        .about(*nominee)
                        .with_message(
                            Message::new("nomination")
                                .arg("nominator", *nominator)
                                .arg("nominee", *nominee),
                        )
                        .with_data("nominator", *nominator),
                );
            }
        }

        changes
    }
}
