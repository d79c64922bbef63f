//! VORTEX host runtime.
//!
//! Drives a `SimulationEngine` on its own thread at the fixed tick rate.
//! Callers talk to it through `HostState`: commands go in over a channel,
//! the latest snapshot comes back through shared state and game events are
//! logged as they are drained.

pub mod game_loop;
pub mod state;

pub use vortex_core as core;
pub use state::{HostError, HostState, LoopCommand};
