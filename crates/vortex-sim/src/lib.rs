//! Simulation for VORTEX.
//!
//! Owns the entity store, runs the systems at a fixed tick rate and produces
//! `FrameSnapshot`s for a host.

pub mod ability;
pub mod context;
pub mod engine;
pub mod faction;
pub mod fields;
pub mod links;
pub mod mission;
pub mod scheduler;
pub mod spawn;
pub mod store;
pub mod systems;

pub use vortex_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
