//! Opaque structured payloads for effect data and history records.
//!
//! Effects and history entries carry small bags of named values. The
//! engine never interprets them; handlers and informational abilities do.
//!
//! ## PayloadValue Types
//!
//! - `Int`, `Bool`, `Text`: plain values
//! - `Player`, `Players`: references to seated players
//! - `Role`, `Team`, `Alignment`: identity values
//!
//! Keys are kept in a `BTreeMap` so that serialized snapshots are
//! byte-for-byte stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{PlayerId, RoleId};
use super::team::{Alignment, Team};

/// A single payload value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Player(PlayerId),
    Players(Vec<PlayerId>),
    Role(RoleId),
    Team(Team),
    Alignment(Alignment),
}

impl PayloadValue {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PayloadValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PayloadValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PayloadValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as player if this is a Player value.
    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            PayloadValue::Player(p) => Some(*p),
            _ => None,
        }
    }

    /// Get as player list if this is a Players value.
    #[must_use]
    pub fn as_players(&self) -> Option<&[PlayerId]> {
        match self {
            PayloadValue::Players(ps) => Some(ps),
            _ => None,
        }
    }

    /// Get as role if this is a Role value.
    #[must_use]
    pub fn as_role(&self) -> Option<&RoleId> {
        match self {
            PayloadValue::Role(r) => Some(r),
            _ => None,
        }
    }
}

impl From<i64> for PayloadValue {
    fn from(v: i64) -> Self {
        PayloadValue::Int(v)
    }
}

impl From<u32> for PayloadValue {
    fn from(v: u32) -> Self {
        PayloadValue::Int(i64::from(v))
    }
}

impl From<bool> for PayloadValue {
    fn from(v: bool) -> Self {
        PayloadValue::Bool(v)
    }
}

impl From<&str> for PayloadValue {
    fn from(v: &str) -> Self {
        PayloadValue::Text(v.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(v: String) -> Self {
        PayloadValue::Text(v)
    }
}

impl From<PlayerId> for PayloadValue {
    fn from(v: PlayerId) -> Self {
        PayloadValue::Player(v)
    }
}

impl From<Vec<PlayerId>> for PayloadValue {
    fn from(v: Vec<PlayerId>) -> Self {
        PayloadValue::Players(v)
    }
}

impl From<RoleId> for PayloadValue {
    fn from(v: RoleId) -> Self {
        PayloadValue::Role(v)
    }
}

impl From<Team> for PayloadValue {
    fn from(v: Team) -> Self {
        PayloadValue::Team(v)
    }
}

impl From<Alignment> for PayloadValue {
    fn from(v: Alignment) -> Self {
        PayloadValue::Alignment(v)
    }
}

/// An ordered bag of named payload values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, PayloadValue>);

impl Payload {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PayloadValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.0.get(key)
    }

    /// Get a player reference by key.
    #[must_use]
    pub fn player(&self, key: &str) -> Option<PlayerId> {
        self.get(key).and_then(PayloadValue::as_player)
    }

    /// Get an integer by key with default.
    #[must_use]
    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(PayloadValue::as_int).unwrap_or(default)
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
