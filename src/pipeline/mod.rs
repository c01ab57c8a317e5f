//! Intent resolution pipeline.
//!
//! Turns a proposed action into an outcome after every active effect has
//! had its say:
//! - `Intent`: the proposed action (kill, execute, nominate)
//! - `IntentHandler`: effect-attached interceptor plugin contract
//! - `resolve_intent`: runs applicable handlers in priority order
//! - `Resolution`: allow, prevent, redirect, or await narrator input
//! - `SuspendedResolution`: an explicit, serializable continuation
//!
//! The pipeline never mutates state. It returns a `StateChanges` batch
//! that the caller commits with `Game::apply`.

mod handler;
mod intent;
mod resolution;
mod resolver;

pub use handler::{
    Choice, HandlerContext, HandlerOutcome, InputOptions, InputRequest, IntentHandler, PreventReason,
};
pub use intent::{Cause, Intent};
pub use resolution::{HandlerRef, Resolution, SuspendedResolution};
pub use resolver::resolve_intent;
