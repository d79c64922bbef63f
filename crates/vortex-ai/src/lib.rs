//! Autonomous behaviour for VORTEX.
//!
//! Per-kind parameter tables, asteroid movement strategies and the UFO
//! behaviour state machine. Everything here is pure and ECS-free.

pub mod fsm;
pub mod mover;
pub mod profiles;

pub use vortex_core as core;

#[cfg(test)]
mod tests;
