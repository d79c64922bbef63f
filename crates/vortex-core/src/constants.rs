//! Simulation constants and default tuning parameters.
//!
//! Everything below `DISTANCE_EPSILON` is a default for a [`Settings`]
//! field; the simulation itself only reads the injected settings.
//!
//! [`Settings`]: crate::settings::Settings

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Squared per-tick displacement (px²) above which collision checks are
/// sub-stepped.
pub const FAST_MOVER_SPEED_SQ: f64 = 25.0;

/// Added to computed distances before they are used as divisors.
pub const DISTANCE_EPSILON: f64 = 1e-3;

/// Tolerance for mass threshold comparisons.
pub const MASS_EPSILON: f64 = 1e-9;

// --- Field ---

pub const FIELD_WIDTH: f64 = 1280.0;
pub const FIELD_HEIGHT: f64 = 720.0;

// --- Physics ---

/// Per-tick velocity retention for ships.
pub const SHIP_RESISTANCE: f64 = 0.985;

/// Per-tick retention for externally induced spin.
pub const SPIN_RESISTANCE: f64 = 0.92;

/// Per-tick velocity retention for particles.
pub const PARTICLE_RESISTANCE: f64 = 0.97;

/// Ship speed clamp (px/tick).
pub const MAX_SHIP_SPEED: f64 = 10.0;

// --- Rocket ---

pub const ROCKET_RADIUS: f64 = 12.0;
pub const ROCKET_MASS: f64 = 1.0;
pub const ROCKET_ENERGY_MAX: f64 = 100.0;
/// Energy regained per tick.
pub const ROCKET_ENERGY_REGEN: f64 = 0.12;
/// Extra regen per tick while the engine burns.
pub const ROCKET_ENGINE_REGEN_BONUS: f64 = 0.08;
/// Engine acceleration (px/tick²).
pub const ROCKET_THRUST: f64 = 0.14;
/// Sustained burn after which the engine enters stage 2.
pub const ROCKET_STAGE2_AFTER_TICKS: u32 = 40;
pub const ROCKET_STAGE2_MULTIPLIER: f64 = 1.5;
/// Rotation speed right after a turn key press (rad/tick).
pub const ROCKET_TURN_RATE_MIN: f64 = 0.035;
/// Rotation speed once the key has been held for the full ramp.
pub const ROCKET_TURN_RATE_MAX: f64 = 0.085;
pub const ROCKET_TURN_RAMP_TICKS: u32 = 15;
pub const ROCKET_LIVES: u32 = 3;
pub const ROCKET_RESPAWN_DELAY_TICKS: u32 = 120;
pub const ROCKET_RELOAD_TICKS: u32 = 9;
pub const ROCKET_ENERGY_PER_SHOT: f64 = 1.5;
pub const KINETIC_SHIELD_MAX: f64 = 100.0;
pub const KINETIC_SHIELD_REGEN: f64 = 0.04;
pub const KINETIC_SHIELD_RADIUS: f64 = 18.0;
pub const KINETIC_SHIELD_LARGE_RADIUS: f64 = 30.0;
/// Velocity kick (px/tick) applied when the kinetic shield absorbs an impact.
pub const KINETIC_SHIELD_NUDGE: f64 = 1.5;
/// Spin (rad/tick) applied when the kinetic shield absorbs an impact.
pub const KINETIC_SHIELD_SPIN: f64 = 0.05;

// --- UFO ---

pub const UFO_RADIUS: f64 = 14.0;
pub const UFO_MASS: f64 = 1.4;
pub const UFO_ENERGY_MAX: f64 = 60.0;
pub const UFO_ENERGY_REGEN: f64 = 0.1;
/// Cruise speed (px/tick) before class scaling.
pub const UFO_SPEED: f64 = 2.2;
/// Fraction of the velocity error corrected per tick.
pub const UFO_STEERING: f64 = 0.06;
pub const UFO_RELOAD_TICKS: u32 = 50;
pub const UFO_ENERGY_PER_SHOT: f64 = 3.0;
pub const UFO_ACQUIRE_RANGE: f64 = 420.0;
pub const UFO_STRAFE_RANGE: f64 = 200.0;
pub const UFO_STRAFE_TICKS: u32 = 150;
pub const UFO_RETREAT_TICKS: u32 = 90;
pub const UFO_SCORE: u64 = 200;
pub const UFO_MAX_LIVE: usize = 8;

// --- Satellite ---

pub const SATELLITE_RADIUS: f64 = 6.0;
pub const SATELLITE_MASS: f64 = 0.3;
pub const SATELLITE_ORBIT_RADIUS: f64 = 42.0;
/// Orbit angular speed (rad/tick).
pub const SATELLITE_ORBIT_SPEED: f64 = 0.045;
pub const SATELLITE_RELOAD_TICKS: u32 = 30;
pub const SATELLITE_ENERGY_MAX: f64 = 40.0;
pub const SATELLITE_ENERGY_REGEN: f64 = 0.2;
pub const SATELLITE_ENERGY_PER_SHOT: f64 = 2.0;
pub const SATELLITE_RANGE: f64 = 320.0;
pub const SATELLITES_PER_ROCKET: usize = 2;

// --- Bullet ---

/// Muzzle speed relative to the shooter (px/tick).
pub const BULLET_SPEED: f64 = 8.5;
/// Lifetime in ticks at unit gravitational potential.
pub const BULLET_RANGE_TICKS: f64 = 75.0;
pub const BULLET_RADIUS: f64 = 1.5;
pub const BULLET_MASS: f64 = 0.05;
/// Kinetic shield energy removed by a bullet hit.
pub const BULLET_DAMAGE: f64 = 12.0;
/// Ticks during which a bounced bullet cannot bounce again.
pub const BULLET_BOUNCE_LOCK_TICKS: u8 = 2;

// --- Particles ---

pub const PARTICLE_TTL_TICKS: f64 = 45.0;
pub const PARTICLE_MASS: f64 = 0.1;
pub const PARTICLE_RADIUS: f64 = 1.0;
pub const PARTICLE_SPEED: f64 = 2.5;
pub const PARTICLE_BURST: u32 = 8;

// --- Asteroids ---

/// Hit radius of a size-1.0 asteroid.
pub const ASTEROID_BASE_RADIUS: f64 = 46.0;
pub const ASTEROID_MASS_PER_SIZE: f64 = 24.0;
/// Kinetic-shield energy equivalent of a size-1.0 impact.
pub const ASTEROID_IMPACT_PER_SIZE: f64 = 60.0;
/// Speed (px/tick) added to split children, away from the parent center.
pub const ASTEROID_SPLIT_SPEED: f64 = 1.1;
pub const ASTEROID_SPAWN_SPEED_MIN: f64 = 0.4;
pub const ASTEROID_SPAWN_SPEED_MAX: f64 = 1.4;
/// Children smaller than this never split again.
pub const ASTEROID_MIN_SPLIT_SIZE: f64 = 0.12;
pub const ASTEROID_SCORE_PER_SIZE: f64 = 100.0;

// --- Gravity wells ---

pub const WELL_INITIAL_MASS: f64 = 10.0;
pub const WELL_CRITICAL_MASS: f64 = 14.0;
pub const WELL_RADIUS: f64 = 10.0;
pub const WELL_REACH: f64 = 260.0;
/// Softening radius of the falloff curve.
pub const WELL_CORE_RADIUS: f64 = 24.0;
pub const WELL_STRENGTH: f64 = 0.05;
/// Potential reduction at the well center.
pub const WELL_POTENTIAL_STRENGTH: f64 = 0.6;
pub const WELL_ACCRETION_RADIUS: f64 = 28.0;
/// Bodies at or below this radius are consumed on contact.
pub const WELL_CONSUME_RADIUS_MAX: f64 = 2.0;
pub const WELL_ERGOSPHERE_RADIUS: f64 = 90.0;
pub const WELL_ERGOSPHERE_TORQUE: f64 = 0.003;
pub const WELL_COLLAPSE_RADIUS: f64 = 220.0;
pub const WELL_COLLAPSE_IMPULSE: f64 = 5.0;

// --- Disruptor ---

pub const DISRUPTOR_REACH: f64 = 150.0;
/// Velocity fraction removed per tick at the disruptor center.
pub const DISRUPTOR_DAMPING: f64 = 0.08;
/// Outward push (px/tick) on shielded ships at the center.
pub const DISRUPTOR_SHIELD_PUSH: f64 = 0.05;
pub const DISRUPTOR_POTENTIAL_STRENGTH: f64 = 0.3;

// --- Abilities ---

/// Ticks of drain that must be affordable on top of the activation cost.
pub const ABILITY_MARGIN_TICKS: f64 = 10.0;
/// Ship energy removed each time an active shield is hit.
pub const SHIELD_HIT_COST: f64 = 6.0;
/// Shield bubble radius relative to the hull radius.
pub const SHIELD_RADIUS_FACTOR: f64 = 1.6;
/// Engine mobility multiplier while in hyperspace.
pub const HYPERSPACE_MOBILITY: f64 = 1.8;

// --- Factions ---

pub const FIRST_HOSTILE_SPAWN_TICKS: u32 = 600;
pub const UFO_SINGLE_INTERVAL_TICKS: u32 = 900;
pub const UFO_SQUADRON_INTERVAL_TICKS: u32 = 2400;
pub const UFO_SWARM_INTERVAL_TICKS: u32 = 3000;
pub const UFO_SQUADRON_SIZE: u32 = 3;
pub const UFO_SWARM_SIZE: u32 = 6;
/// Hostile losses that switch aggression on.
pub const AGGRESSION_LOSS_THRESHOLD: u32 = 4;
/// Ticks without a hostile loss that switch aggression off again.
pub const AGGRESSION_CALM_TICKS: u32 = 1800;
/// Spawn interval multiplier while aggressive.
pub const AGGRESSIVE_INTERVAL_FACTOR: f64 = 0.5;
pub const SATELLITE_INTERVAL_TICKS: u32 = 1800;
pub const SATELLITE_DELAY_TICKS: u32 = 60;

// --- Missions ---

pub const MISSION_INITIAL_ASTEROIDS: u32 = 4;
pub const MISSION_SPAWN_INTERVAL_TICKS: u32 = 420;
pub const MISSION_MAX_LIVE_ASTEROIDS: usize = 12;
/// Asteroids a mission spawns before it can be cleared.
pub const MISSION_QUOTA: u32 = 8;
pub const MISSION_ADVANCE_DELAY_TICKS: u32 = 180;
