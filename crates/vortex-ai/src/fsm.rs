//! UFO behaviour finite state machine.
//!
//! Pure functions that compute phase transitions and desired velocity for a
//! UFO from its class, current phase and situation. No ECS dependency.

use vortex_core::enums::{UfoClass, UfoPhase};
use vortex_core::types::{heading, Vec2};

use crate::profiles::ufo_profile;

/// Base tuning, copied from settings by the caller.
#[derive(Debug, Clone, Copy)]
pub struct UfoTuning {
    pub speed: f64,
    pub acquire_range: f64,
    pub strafe_range: f64,
    pub strafe_ticks: u32,
    pub retreat_ticks: u32,
}

/// Input to the UFO FSM for a single entity.
pub struct UfoContext {
    pub class: UfoClass,
    pub phase: UfoPhase,
    pub phase_ticks: u32,
    pub velocity: Vec2,
    /// Wraparound-aware offset to the nearest rocket, if any.
    pub to_target: Option<Vec2>,
    /// Hostile faction escalation; aggressive UFOs ignore acquire range.
    pub aggressive: bool,
    pub wander_heading: f64,
    pub tuning: UfoTuning,
}

/// Output from the UFO FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UfoUpdate {
    pub new_phase: UfoPhase,
    pub phase_changed: bool,
    pub desired_velocity: Vec2,
    /// Facing for the gun, when there is something to aim at.
    pub aim: Option<f64>,
    pub fire: bool,
    pub use_ability: bool,
}

/// Evaluate the FSM for one UFO.
pub fn evaluate(ctx: &UfoContext) -> UfoUpdate {
    let profile = ufo_profile(ctx.class);
    let speed = ctx.tuning.speed * profile.speed_factor;

    let target = ctx.to_target.filter(|d| {
        ctx.aggressive || d.length() <= ctx.tuning.acquire_range
    });

    let (new_phase, desired_velocity, fire) = match (ctx.phase, target) {
        (UfoPhase::Approach, None) => (UfoPhase::Approach, heading(ctx.wander_heading) * speed, false),
        (UfoPhase::Approach, Some(to)) => {
            if to.length() <= ctx.tuning.strafe_range {
                (UfoPhase::Strafe, orbit(to, speed, profile.orbit_tightness, ctx.tuning.strafe_range), true)
            } else {
                (UfoPhase::Approach, to.normalize_or_zero() * speed, false)
            }
        }
        (UfoPhase::Strafe, None) => (UfoPhase::Approach, heading(ctx.wander_heading) * speed, false),
        (UfoPhase::Strafe, Some(to)) => {
            if ctx.phase_ticks >= ctx.tuning.strafe_ticks {
                (UfoPhase::Retreat, -to.normalize_or_zero() * speed * 1.2, false)
            } else {
                (UfoPhase::Strafe, orbit(to, speed, profile.orbit_tightness, ctx.tuning.strafe_range), true)
            }
        }
        (UfoPhase::Retreat, to) => {
            if ctx.phase_ticks >= ctx.tuning.retreat_ticks {
                (UfoPhase::Approach, heading(ctx.wander_heading) * speed, false)
            } else {
                let away = to.map(|d| -d.normalize_or_zero()).unwrap_or_else(|| heading(ctx.wander_heading));
                (UfoPhase::Retreat, away * speed * 1.2, false)
            }
        }
    };

    UfoUpdate {
        new_phase,
        phase_changed: new_phase != ctx.phase,
        desired_velocity,
        aim: target.map(|d| d.y.atan2(d.x)),
        fire,
        use_ability: new_phase == profile.ability_phase && target.is_some(),
    }
}

/// Circle the target, drifting in or out toward the preferred radius.
fn orbit(to_target: Vec2, speed: f64, tightness: f64, strafe_range: f64) -> Vec2 {
    let distance = to_target.length();
    let radial = to_target.normalize_or_zero();
    let tangent = radial.perp();
    let preferred = strafe_range * tightness;
    let correction = ((distance - preferred) / strafe_range.max(1.0)).clamp(-1.0, 1.0);
    (tangent + radial * correction).normalize_or_zero() * speed
}
