//! Asteroid movement strategies.
//!
//! Pure functions: given the current velocity and situation, return the
//! velocity for the next tick.

use vortex_core::components::Mover;
use vortex_core::types::{rotate, Vec2};

/// Situation of one asteroid for its mover.
pub struct MoverContext {
    pub velocity: Vec2,
    pub age_ticks: u64,
    /// Wraparound-aware offset to the nearest rocket, if any.
    pub to_target: Option<Vec2>,
}

pub fn steer(mover: &Mover, ctx: &MoverContext) -> Vec2 {
    match *mover {
        Mover::Drift => ctx.velocity,
        Mover::Spiral { turn_rate } => rotate(ctx.velocity, turn_rate),
        Mover::Wobble {
            amplitude,
            period_ticks,
        } => {
            // Heading follows amplitude * sin(phase); rotate by its derivative.
            let omega = std::f64::consts::TAU / period_ticks.max(1.0);
            let turn = amplitude * omega * (omega * ctx.age_ticks as f64).cos();
            rotate(ctx.velocity, turn)
        }
        Mover::Homing {
            strength,
            max_speed,
        } => {
            let Some(to_target) = ctx.to_target else {
                return ctx.velocity;
            };
            let v = ctx.velocity + to_target.normalize_or_zero() * strength;
            let speed = v.length();
            if speed > max_speed {
                v * (max_speed / speed)
            } else {
                v
            }
        }
    }
}
