//! Engine configuration.
//!
//! Scripts tune the engine at startup through `EngineConfig`. The
//! defaults match the standard rules; `validate` rejects settings the
//! engine cannot run with, and `Ruleset::new` refuses to build with an
//! invalid config.

use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};

/// Tunable engine settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum redirects a single resolution may follow before it is
    /// prevented outright.
    pub max_redirects: u32,

    /// Evil wins once this many (or fewer) non-traveller players are
    /// alive and a demon is among them.
    pub parity_threshold: usize,

    /// Run the built-in global win conditions.
    pub builtin_win_conditions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_redirects: 8,
            parity_threshold: 2,
            builtin_win_conditions: true,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the redirect limit.
    #[must_use]
    pub fn with_max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the parity threshold.
    #[must_use]
    pub fn with_parity_threshold(mut self, threshold: usize) -> Self {
        self.parity_threshold = threshold;
        self
    }

    /// Disable the built-in global win conditions.
    #[must_use]
    pub fn without_builtin_win_conditions(mut self) -> Self {
        self.builtin_win_conditions = false;
        self
    }

    /// Check that the engine can run with these settings.
    pub fn validate(&self) -> RuleResult<()> {
        if self.max_redirects == 0 {
            return Err(RuleError::config("max_redirects must be at least 1"));
        }
        if self.parity_threshold == 0 {
            return Err(RuleError::config("parity_threshold must be at least 1"));
        }
        Ok(())
    }
}
