//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D vector in field space (pixels, pixels per tick).
pub type Vec2 = glam::DVec2;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }

    /// Ticks elapsed since an earlier tick stamp (saturating).
    pub fn since(&self, earlier: u64) -> u64 {
        self.tick.saturating_sub(earlier)
    }
}

/// Unit vector pointing along `direction` (radians, 0 = +x, clockwise on screen).
pub fn heading(direction: f64) -> Vec2 {
    Vec2::new(direction.cos(), direction.sin())
}

/// Rotate a vector by `angle` radians.
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalize an angle into [0, TAU).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(std::f64::consts::TAU);
    if a >= std::f64::consts::TAU {
        0.0
    } else {
        a
    }
}
