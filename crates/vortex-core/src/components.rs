//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods. Entity behaviour is
//! composed from capabilities (a rocket is a `Body` + `Motion` + `Engine` +
//! `Gun` + `Ship` + `KineticShield` + ability), and per-kind differences are
//! data. Game logic lives in systems, not components.
//!
//! Components that link entities together (owner, children, attachment)
//! live in the sim crate next to the store that resolves them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec2;

/// Spatial state shared by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Wrapped position in field space.
    pub position: Vec2,
    /// Position at the start of the last integration step. Collision
    /// sub-stepping interpolates from here.
    pub prev_position: Vec2,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Nominal hit radius.
    pub radius: f64,
    /// In hyperspace the entity neither collides nor feels fields.
    pub hyperspace: bool,
    /// Lazy removal marker. Set once, never cleared.
    pub dead: bool,
    /// Multiplier in (0, 1]; 1 means no field nearby.
    pub potential: f64,
}

/// Mass and rotation for physical objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub mass: f64,
    /// Facing in radians.
    pub direction: f64,
    /// Steering rotation set by input or AI (rad/tick).
    pub turn: f64,
    /// Externally induced spin (rad/tick), decays with `spin_resistance`.
    pub angular_velocity: f64,
    /// Per-tick velocity retention.
    pub resistance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    pub on: bool,
    /// Base acceleration (px/tick²).
    pub thrust: f64,
    /// Multiplier applied by abilities (hyperspace).
    pub mobility: f64,
    /// Consecutive ticks the engine has been burning.
    pub burn_ticks: u32,
    /// 0 = off, 1 = main stage, 2 = boost stage.
    pub stage: u8,
    pub stage2_after_ticks: u32,
    pub stage2_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gun {
    pub layout: TurretLayout,
    /// Held trigger (player) or target acquired (AI).
    pub trigger: bool,
    /// Single volley request, cleared once handled.
    pub fire_once: bool,
    pub reload_ticks: u32,
    pub reload_remaining: u32,
    pub bullet_speed: f64,
    pub bullet_range_ticks: f64,
    pub energy_per_shot: f64,
    pub high_energy: bool,
    /// Support guns (satellites) never hit their own side's rockets.
    pub support: bool,
}

/// Energy economy shared by ships.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub energy: f64,
    pub energy_max: f64,
    pub energy_regen: f64,
    pub engine_regen_bonus: f64,
    /// Speed at the end of the previous tick.
    pub prev_speed: f64,
    pub dir_cos: f64,
    pub dir_sin: f64,
}

/// Secondary regenerating pool that absorbs impacts before the hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticShield {
    pub energy: f64,
    pub energy_max: f64,
    pub regen: f64,
    pub radius: f64,
    pub large_radius: f64,
    /// Large mode, driven by the kinetic boost ability.
    pub large: bool,
}

/// Autonomous drift pattern for asteroids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mover {
    Drift,
    /// Velocity rotates by `turn_rate` rad/tick.
    Spiral { turn_rate: f64 },
    /// Heading oscillates with the given amplitude (rad) and period.
    Wobble { amplitude: f64, period_ticks: f64 },
    /// Accelerates toward the nearest rocket, capped at `max_speed`.
    Homing { strength: f64, max_speed: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub kind: AsteroidKind,
    /// Normalized size in (0, 1].
    pub size: f64,
    /// Children produced on split.
    pub splits: u32,
    pub hits: u32,
    /// The hit after this many always splits.
    pub hits_max: u32,
    pub child_ratio: f64,
    /// Size removed by a non-splitting hit.
    pub erosion: f64,
    pub mover: Mover,
    pub age_ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub faction: Faction,
    /// Remaining range in potential-scaled ticks.
    pub range: f64,
    pub range_max: f64,
    pub damage: f64,
    /// Survives one hit.
    pub high_energy: bool,
    pub support: bool,
    /// Ticks until the bullet may bounce again.
    pub bounce_lock: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub mass: f64,
    pub ttl: f64,
    pub ttl_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityWell {
    pub mass: f64,
    pub critical_mass: f64,
    pub reach: f64,
    pub core_radius: f64,
    pub strength: f64,
    pub potential_strength: f64,
    pub accretion_radius: f64,
    pub consume_radius_max: f64,
    pub ergosphere_radius: f64,
    pub ergosphere_torque: f64,
    pub collapse_radius: f64,
    pub collapse_impulse: f64,
    /// Set when the collapse fires; guards against a second one.
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disruptor {
    pub reach: f64,
    pub damping: f64,
    pub shield_push: f64,
    pub potential_strength: f64,
}

/// Renderer-facing descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub effect: VisualEffect,
    pub scale: f64,
    pub rotation: f64,
    /// 0xRRGGBB.
    pub palette: u32,
}

/// Marks a rocket controlled by a player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub player: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UfoBrain {
    pub class: UfoClass,
    pub phase: UfoPhase,
    pub phase_ticks: u32,
    /// Heading used while no target is known.
    pub wander_heading: f64,
}

/// Points awarded to whoever destroys the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub points: u64,
}
