//! State change batches and the applier that commits them.
//!
//! - `StateChanges`: a declared batch of mutations plus history events
//! - `apply_changes`: the only way game state moves forward
//!
//! Handlers never touch state directly. They describe what should happen
//! as a batch; the pipeline gathers batches in execution order; the
//! applier commits the result as one atomic transition.

mod batch;
mod applier;

pub use batch::StateChanges;
pub use applier::{apply_changes, expiring_effects};
