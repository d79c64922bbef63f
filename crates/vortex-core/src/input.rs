//! Per-player input snapshot handed over by the host each frame.

use serde::{Deserialize, Serialize};

/// Discrete intents for one player. No device events cross into the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    /// One volley, independent of holding `fire`.
    pub fire_once: bool,
    pub ability: bool,
    /// Tick of the most recent `left` press.
    pub left_pressed_at: u64,
    /// Tick of the most recent `right` press.
    pub right_pressed_at: u64,
}

impl InputState {
    /// Turn direction: -1 left, +1 right, 0 when neither or both are held.
    pub fn turn_sign(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Press tick of the active turn key.
    pub fn turn_pressed_at(&self) -> Option<u64> {
        match (self.left, self.right) {
            (true, false) => Some(self.left_pressed_at),
            (false, true) => Some(self.right_pressed_at),
            _ => None,
        }
    }
}
