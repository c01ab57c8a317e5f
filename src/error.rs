//! Error types.
//!
//! Expected game outcomes (a kill prevented, a redirect, a pending
//! narrator decision) are never errors; they are variants of
//! `Resolution`. `RuleError` covers programmer mistakes (duplicate
//! registration, invalid configuration), snapshot codec failures, and
//! faults reported by individual win-condition checks.

use thiserror::Error;

use crate::core::{EffectId, Phase, PlayerId, RoleId};

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Two effect definitions share an ID.
    #[error("effect {0} is already registered")]
    DuplicateEffect(EffectId),

    /// Two role definitions share an ID.
    #[error("role {0} is already registered")]
    DuplicateRole(RoleId),

    /// Two seated players share an ID.
    #[error("{0} is seated more than once")]
    DuplicatePlayer(PlayerId),

    /// Engine configuration failed validation.
    #[error("invalid engine configuration: {0}")]
    Config(String),

    /// A turn transition was requested in a phase that does not allow it.
    #[error("cannot {action} during {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },

    /// A win-condition check could not be evaluated.
    #[error("win condition on {effect} failed: {reason}")]
    WinCheck { effect: EffectId, reason: String },

    /// JSON snapshot codec failure.
    #[error("json snapshot codec failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary snapshot codec failure.
    #[error("binary snapshot codec failed: {0}")]
    Binary(#[from] bincode::Error),

    /// A decoded snapshot's cached state disagrees with its history.
    #[error("snapshot is inconsistent: current state does not match history")]
    InconsistentSnapshot,
}

impl RuleError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a win-check error for an effect.
    pub fn win_check(effect: EffectId, reason: impl Into<String>) -> Self {
        Self::WinCheck {
            effect,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type RuleResult<T> = Result<T, RuleError>;
