//! Commands sent from the host to the simulation.

use serde::{Deserialize, Serialize};

use crate::input::InputState;

/// Host → simulation commands. Applied at the start of the next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    /// Replace a player's input snapshot.
    Input { player: usize, state: InputState },
    Pause,
    Resume,
    /// Stop the current mission and start the next one.
    NextMission,
    /// Change field bounds. Entities re-wrap on the next physics pass.
    Resize { width: f64, height: f64 },
}
