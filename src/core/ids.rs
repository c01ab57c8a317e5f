//! Identifiers for players, roles, and effects.
//!
//! Players are addressed by a dense seat-independent `PlayerId`.
//! Roles and effects are addressed by string identifiers so content
//! packs can add new ones without touching the engine.
//!
//! ## Usage
//!
//! ```
//! use grimoire::core::{EffectId, PlayerId, RoleId};
//!
//! let player = PlayerId::new(3);
//! assert_eq!(player.raw(), 3);
//!
//! // Static ids cost nothing to construct...
//! const SAFE: EffectId = EffectId::from_static("safe");
//!
//! // ...and compare equal to ids loaded from saved data.
//! assert_eq!(SAFE, EffectId::new("safe"));
//! assert_eq!(RoleId::new("demon").as_str(), "demon");
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Unique identifier for a seated player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for PlayerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

/// Identifier of a role (character) definition.
///
/// Saved games may reference roles that no longer exist; lookups
/// return `None` for those rather than failing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Cow<'static, str>);

impl RoleId {
    /// Create a role ID from a static string without allocating.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Create a role ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Role({})", self.0)
    }
}

/// Identifier of an effect definition.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(Cow<'static, str>);

impl EffectId {
    /// The built-in death marker.
    pub const DEAD: EffectId = EffectId::from_static("dead");

    /// Create an effect ID from a static string without allocating.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Create an effect ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}
