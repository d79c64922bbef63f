//! Core types and definitions for the VORTEX arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, the toroidal field, settings, components, commands, input,
//! events and render snapshots. It has no dependency on the ECS or on any
//! host runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod field;
pub mod input;
pub mod settings;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
