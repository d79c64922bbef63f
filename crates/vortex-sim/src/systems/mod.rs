//! Per-tick systems.
//!
//! Systems are free functions over `&mut SimContext`. They keep no state of
//! their own; everything lives in components or the context.

pub mod abilities;
pub mod ai;
pub mod collision;
pub mod deferred;
pub mod force_fields;
pub mod input;
pub mod physics;
pub mod snapshot;
