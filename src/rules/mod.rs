//! Rulesets and win-condition evaluation.
//!
//! - [`Ruleset`]: effect registry, role registry, and engine settings
//!   bundled into one value that every engine call borrows
//! - [`WinCondition`]: effect-attached victory checks
//! - [`check_win_condition`]: run after every committed transition
//! - [`check_end_of_day_win_conditions`]: run once when the day ends
//!
//! The engine never interprets a content effect directly; it calls into
//! whatever the ruleset registered.

mod ruleset;
mod win;

pub use ruleset::Ruleset;
pub use win::{
    check_end_of_day_win_conditions, check_win_condition, BuiltinCondition, WinCondition,
    WinContext, WinTiming,
};
