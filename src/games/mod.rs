//! Script content built on the engine.
//!
//! Games supply effect and role definitions; the engine supplies
//! resolution. `sample` is the reference script used by tests and
//! benchmarks.

pub mod sample;
