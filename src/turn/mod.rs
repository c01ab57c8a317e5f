//! Turn structure: phases, the night order, and action flows.
//!
//! ## Key Components
//!
//! - [`next_step`]: what the narrator should do next, derived from history
//! - Phase transitions: [`reveal_roles`], [`start_night`], [`start_day`],
//!   [`end_day`], [`declare_winner`]
//! - Action flows: [`submit_intent`], [`perform_night_action`],
//!   [`resume_action`], [`skip_night_action`], [`record_vote`]
//!
//! Every function takes a `Game` by reference and returns a new one.
//! Nothing here holds state between calls.

mod actions;
mod phase;
mod scheduler;

pub use actions::{
    day_actions, eligible_voters, perform_night_action, record_vote, resume_action, skip_night_action,
    submit_intent, ActionFlow, PendingAction,
};
pub use phase::{declare_winner, end_day, reveal_roles, setup_game, start_day, start_night};
pub use scheduler::{has_acted, next_step, night_order, pending_nomination, ScheduledAction, Step};
