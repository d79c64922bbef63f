//! Kind- and class-specific parameter tables.
//!
//! Behaviour differences between asteroid kinds and UFO classes are data;
//! the systems read these tables instead of branching on kind.

use rand::Rng;

use vortex_core::components::Mover;
use vortex_core::enums::{AbilityKind, AsteroidKind, TurretLayout, UfoClass, UfoPhase, VisualEffect};

/// Split and durability parameters for an asteroid kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidProfile {
    /// Children produced when the asteroid splits.
    pub splits: u32,
    /// Child size relative to the parent.
    pub child_ratio: f64,
    /// Hits absorbed before the next one forces a split.
    pub hits_max: u32,
    /// Size lost on a hit that does not split.
    pub erosion: f64,
    pub radius_scale: f64,
    pub mass_scale: f64,
    pub score_scale: f64,
    pub effect: VisualEffect,
}

pub fn asteroid_profile(kind: AsteroidKind) -> AsteroidProfile {
    match kind {
        AsteroidKind::Rock => AsteroidProfile {
            splits: 2,
            child_ratio: 0.5,
            hits_max: 0,
            erosion: 0.0,
            radius_scale: 1.0,
            mass_scale: 1.0,
            score_scale: 1.0,
            effect: VisualEffect::Rock,
        },
        AsteroidKind::Ice => AsteroidProfile {
            splits: 3,
            child_ratio: 0.45,
            hits_max: 1,
            erosion: 0.08,
            radius_scale: 1.0,
            mass_scale: 0.7,
            score_scale: 1.2,
            effect: VisualEffect::Rock,
        },
        AsteroidKind::Iron => AsteroidProfile {
            splits: 2,
            child_ratio: 0.55,
            hits_max: 3,
            erosion: 0.0,
            radius_scale: 0.9,
            mass_scale: 1.8,
            score_scale: 1.5,
            effect: VisualEffect::Rock,
        },
        AsteroidKind::Planetoid => AsteroidProfile {
            splits: 4,
            child_ratio: 0.4,
            hits_max: 6,
            erosion: 0.0,
            radius_scale: 1.4,
            mass_scale: 3.0,
            score_scale: 3.0,
            effect: VisualEffect::Rock,
        },
    }
}

/// Movement pattern for a freshly spawned asteroid of the given kind.
pub fn pick_mover<R: Rng>(kind: AsteroidKind, rng: &mut R) -> Mover {
    match kind {
        AsteroidKind::Rock => {
            if rng.gen_bool(0.3) {
                Mover::Wobble {
                    amplitude: rng.gen_range(0.1..0.35),
                    period_ticks: rng.gen_range(90.0..240.0),
                }
            } else {
                Mover::Drift
            }
        }
        AsteroidKind::Ice => Mover::Spiral {
            turn_rate: rng.gen_range(-0.004..0.004),
        },
        AsteroidKind::Iron => Mover::Homing {
            strength: 0.01,
            max_speed: rng.gen_range(1.0..1.8),
        },
        AsteroidKind::Planetoid => Mover::Drift,
    }
}

/// Parameters for a UFO class, relative to the base UFO settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UfoProfile {
    pub speed_factor: f64,
    pub radius_factor: f64,
    pub reload_factor: f64,
    pub score_factor: f64,
    pub turrets: TurretLayout,
    pub ability: AbilityKind,
    /// Phase during which the ability is requested.
    pub ability_phase: UfoPhase,
    /// Fraction of strafe range kept while circling.
    pub orbit_tightness: f64,
    /// Bullets survive their first hit.
    pub high_energy: bool,
}

pub fn ufo_profile(class: UfoClass) -> UfoProfile {
    match class {
        UfoClass::Scout => UfoProfile {
            speed_factor: 1.3,
            radius_factor: 0.8,
            reload_factor: 1.4,
            score_factor: 0.75,
            turrets: TurretLayout::Single,
            ability: AbilityKind::Hyperspace,
            ability_phase: UfoPhase::Retreat,
            orbit_tightness: 1.0,
            high_energy: false,
        },
        UfoClass::Fighter => UfoProfile {
            speed_factor: 1.0,
            radius_factor: 1.0,
            reload_factor: 1.0,
            score_factor: 1.0,
            turrets: TurretLayout::Twin,
            ability: AbilityKind::Shield,
            ability_phase: UfoPhase::Strafe,
            orbit_tightness: 0.8,
            high_energy: true,
        },
        UfoClass::Swarmer => UfoProfile {
            speed_factor: 1.5,
            radius_factor: 0.6,
            reload_factor: 1.8,
            score_factor: 0.5,
            turrets: TurretLayout::Single,
            ability: AbilityKind::Disruptor,
            ability_phase: UfoPhase::Approach,
            orbit_tightness: 0.6,
            high_energy: false,
        },
    }
}

/// Weighted class pick for single spawns. Swarmers only come in swarms.
pub fn pick_single_class<R: Rng>(rng: &mut R) -> UfoClass {
    if rng.gen_bool(0.6) {
        UfoClass::Scout
    } else {
        UfoClass::Fighter
    }
}
