//! Injectable tuning structure.
//!
//! The engine is constructed from a [`Settings`] value; nothing inside the
//! tick reads a global. Loading settings from disk is the host's business,
//! the struct only needs to be serde-compatible.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::{AbilityKind, TriggerMode, TurretLayout};

/// Malformed configuration. Raised once, at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must lie in (0, 1], got {value}")]
    NotAFactor { name: &'static str, value: f64 },

    #[error("{name} must be at least 1")]
    Zero { name: &'static str },

    #[error("gravity well critical mass {critical} must exceed initial mass {initial}")]
    WellMass { initial: f64, critical: f64 },

    #[error("turn rate ramp is inverted: min {min} > max {max}")]
    TurnRamp { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldSettings,
    pub physics: PhysicsSettings,
    pub rocket: RocketSettings,
    pub ufo: UfoSettings,
    pub satellite: SatelliteSettings,
    pub bullet: BulletSettings,
    pub particle: ParticleSettings,
    pub asteroid: AsteroidSettings,
    pub gravity_well: GravityWellSettings,
    pub disruptor: DisruptorSettings,
    pub abilities: AbilitySettings,
    pub faction: FactionSettings,
    pub mission: MissionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub ship_resistance: f64,
    pub spin_resistance: f64,
    pub particle_resistance: f64,
    pub max_ship_speed: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            ship_resistance: SHIP_RESISTANCE,
            spin_resistance: SPIN_RESISTANCE,
            particle_resistance: PARTICLE_RESISTANCE,
            max_ship_speed: MAX_SHIP_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketSettings {
    pub radius: f64,
    pub mass: f64,
    pub energy_max: f64,
    pub energy_regen: f64,
    pub engine_regen_bonus: f64,
    pub thrust: f64,
    pub stage2_after_ticks: u32,
    pub stage2_multiplier: f64,
    pub turn_rate_min: f64,
    pub turn_rate_max: f64,
    pub turn_ramp_ticks: u32,
    pub lives: u32,
    pub respawn_delay_ticks: u32,
    pub reload_ticks: u32,
    pub energy_per_shot: f64,
    pub turrets: TurretLayout,
    /// Fire high-energy bullets.
    pub high_energy_gun: bool,
    pub ability: AbilityKind,
    pub kinetic_shield_max: f64,
    pub kinetic_shield_regen: f64,
    pub kinetic_shield_radius: f64,
    pub kinetic_shield_large_radius: f64,
    pub kinetic_shield_nudge: f64,
    pub kinetic_shield_spin: f64,
}

impl Default for RocketSettings {
    fn default() -> Self {
        Self {
            radius: ROCKET_RADIUS,
            mass: ROCKET_MASS,
            energy_max: ROCKET_ENERGY_MAX,
            energy_regen: ROCKET_ENERGY_REGEN,
            engine_regen_bonus: ROCKET_ENGINE_REGEN_BONUS,
            thrust: ROCKET_THRUST,
            stage2_after_ticks: ROCKET_STAGE2_AFTER_TICKS,
            stage2_multiplier: ROCKET_STAGE2_MULTIPLIER,
            turn_rate_min: ROCKET_TURN_RATE_MIN,
            turn_rate_max: ROCKET_TURN_RATE_MAX,
            turn_ramp_ticks: ROCKET_TURN_RAMP_TICKS,
            lives: ROCKET_LIVES,
            respawn_delay_ticks: ROCKET_RESPAWN_DELAY_TICKS,
            reload_ticks: ROCKET_RELOAD_TICKS,
            energy_per_shot: ROCKET_ENERGY_PER_SHOT,
            turrets: TurretLayout::Single,
            high_energy_gun: false,
            ability: AbilityKind::Shield,
            kinetic_shield_max: KINETIC_SHIELD_MAX,
            kinetic_shield_regen: KINETIC_SHIELD_REGEN,
            kinetic_shield_radius: KINETIC_SHIELD_RADIUS,
            kinetic_shield_large_radius: KINETIC_SHIELD_LARGE_RADIUS,
            kinetic_shield_nudge: KINETIC_SHIELD_NUDGE,
            kinetic_shield_spin: KINETIC_SHIELD_SPIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UfoSettings {
    pub radius: f64,
    pub mass: f64,
    pub energy_max: f64,
    pub energy_regen: f64,
    pub speed: f64,
    pub steering: f64,
    pub reload_ticks: u32,
    pub energy_per_shot: f64,
    pub acquire_range: f64,
    pub strafe_range: f64,
    pub strafe_ticks: u32,
    pub retreat_ticks: u32,
    pub score: u64,
    pub max_live: usize,
}

impl Default for UfoSettings {
    fn default() -> Self {
        Self {
            radius: UFO_RADIUS,
            mass: UFO_MASS,
            energy_max: UFO_ENERGY_MAX,
            energy_regen: UFO_ENERGY_REGEN,
            speed: UFO_SPEED,
            steering: UFO_STEERING,
            reload_ticks: UFO_RELOAD_TICKS,
            energy_per_shot: UFO_ENERGY_PER_SHOT,
            acquire_range: UFO_ACQUIRE_RANGE,
            strafe_range: UFO_STRAFE_RANGE,
            strafe_ticks: UFO_STRAFE_TICKS,
            retreat_ticks: UFO_RETREAT_TICKS,
            score: UFO_SCORE,
            max_live: UFO_MAX_LIVE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteSettings {
    pub radius: f64,
    pub mass: f64,
    pub orbit_radius: f64,
    pub orbit_speed: f64,
    pub reload_ticks: u32,
    pub energy_max: f64,
    pub energy_regen: f64,
    pub energy_per_shot: f64,
    pub range: f64,
    pub max_per_rocket: usize,
}

impl Default for SatelliteSettings {
    fn default() -> Self {
        Self {
            radius: SATELLITE_RADIUS,
            mass: SATELLITE_MASS,
            orbit_radius: SATELLITE_ORBIT_RADIUS,
            orbit_speed: SATELLITE_ORBIT_SPEED,
            reload_ticks: SATELLITE_RELOAD_TICKS,
            energy_max: SATELLITE_ENERGY_MAX,
            energy_regen: SATELLITE_ENERGY_REGEN,
            energy_per_shot: SATELLITE_ENERGY_PER_SHOT,
            range: SATELLITE_RANGE,
            max_per_rocket: SATELLITES_PER_ROCKET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletSettings {
    pub speed: f64,
    pub range_ticks: f64,
    pub radius: f64,
    pub mass: f64,
    pub damage: f64,
    pub bounce_lock_ticks: u8,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            speed: BULLET_SPEED,
            range_ticks: BULLET_RANGE_TICKS,
            radius: BULLET_RADIUS,
            mass: BULLET_MASS,
            damage: BULLET_DAMAGE,
            bounce_lock_ticks: BULLET_BOUNCE_LOCK_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub ttl_ticks: f64,
    pub mass: f64,
    pub radius: f64,
    pub speed: f64,
    pub burst: u32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            ttl_ticks: PARTICLE_TTL_TICKS,
            mass: PARTICLE_MASS,
            radius: PARTICLE_RADIUS,
            speed: PARTICLE_SPEED,
            burst: PARTICLE_BURST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidSettings {
    pub base_radius: f64,
    pub mass_per_size: f64,
    pub impact_per_size: f64,
    pub split_speed: f64,
    pub spawn_speed_min: f64,
    pub spawn_speed_max: f64,
    pub min_split_size: f64,
    pub score_per_size: f64,
}

impl Default for AsteroidSettings {
    fn default() -> Self {
        Self {
            base_radius: ASTEROID_BASE_RADIUS,
            mass_per_size: ASTEROID_MASS_PER_SIZE,
            impact_per_size: ASTEROID_IMPACT_PER_SIZE,
            split_speed: ASTEROID_SPLIT_SPEED,
            spawn_speed_min: ASTEROID_SPAWN_SPEED_MIN,
            spawn_speed_max: ASTEROID_SPAWN_SPEED_MAX,
            min_split_size: ASTEROID_MIN_SPLIT_SIZE,
            score_per_size: ASTEROID_SCORE_PER_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityWellSettings {
    pub initial_mass: f64,
    pub critical_mass: f64,
    pub radius: f64,
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
}

impl Default for GravityWellSettings {
    fn default() -> Self {
        Self {
            initial_mass: WELL_INITIAL_MASS,
            critical_mass: WELL_CRITICAL_MASS,
            radius: WELL_RADIUS,
            reach: WELL_REACH,
            core_radius: WELL_CORE_RADIUS,
            strength: WELL_STRENGTH,
            potential_strength: WELL_POTENTIAL_STRENGTH,
            accretion_radius: WELL_ACCRETION_RADIUS,
            consume_radius_max: WELL_CONSUME_RADIUS_MAX,
            ergosphere_radius: WELL_ERGOSPHERE_RADIUS,
            ergosphere_torque: WELL_ERGOSPHERE_TORQUE,
            collapse_radius: WELL_COLLAPSE_RADIUS,
            collapse_impulse: WELL_COLLAPSE_IMPULSE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisruptorSettings {
    pub reach: f64,
    pub damping: f64,
    pub shield_push: f64,
    pub potential_strength: f64,
}

impl Default for DisruptorSettings {
    fn default() -> Self {
        Self {
            reach: DISRUPTOR_REACH,
            damping: DISRUPTOR_DAMPING,
            shield_push: DISRUPTOR_SHIELD_PUSH,
            potential_strength: DISRUPTOR_POTENTIAL_STRENGTH,
        }
    }
}

/// Durations and energy economics of one ability kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityTuning {
    /// Seconds from Off to On. Zero means instantaneous.
    pub activation_secs: f64,
    /// Seconds from On to Off. Zero means instantaneous.
    pub passivation_secs: f64,
    /// Energy deducted once on entering Activating.
    pub activation_cost: f64,
    /// Energy drained every tick while fully active.
    pub drain_per_tick: f64,
    pub trigger: TriggerMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySettings {
    pub margin_ticks: f64,
    pub shield: AbilityTuning,
    pub hyperspace: AbilityTuning,
    pub disruptor: AbilityTuning,
    pub kinetic_boost: AbilityTuning,
    pub shield_hit_cost: f64,
    pub shield_radius_factor: f64,
    pub hyperspace_mobility: f64,
}

impl AbilitySettings {
    pub fn tuning(&self, kind: AbilityKind) -> &AbilityTuning {
        match kind {
            AbilityKind::Shield => &self.shield,
            AbilityKind::Hyperspace => &self.hyperspace,
            AbilityKind::Disruptor => &self.disruptor,
            AbilityKind::KineticBoost => &self.kinetic_boost,
        }
    }
}

impl Default for AbilitySettings {
    fn default() -> Self {
        Self {
            margin_ticks: ABILITY_MARGIN_TICKS,
            shield: AbilityTuning {
                activation_secs: 0.15,
                passivation_secs: 0.25,
                activation_cost: 6.0,
                drain_per_tick: 0.25,
                trigger: TriggerMode::OnHold,
            },
            hyperspace: AbilityTuning {
                activation_secs: 0.4,
                passivation_secs: 0.4,
                activation_cost: 20.0,
                drain_per_tick: 0.35,
                trigger: TriggerMode::PressToggle,
            },
            disruptor: AbilityTuning {
                activation_secs: 0.3,
                passivation_secs: 0.3,
                activation_cost: 15.0,
                drain_per_tick: 0.3,
                trigger: TriggerMode::PressToggle,
            },
            kinetic_boost: AbilityTuning {
                activation_secs: 0.2,
                passivation_secs: 0.3,
                activation_cost: 10.0,
                drain_per_tick: 0.2,
                trigger: TriggerMode::OnHold,
            },
            shield_hit_cost: SHIELD_HIT_COST,
            shield_radius_factor: SHIELD_RADIUS_FACTOR,
            hyperspace_mobility: HYPERSPACE_MOBILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionSettings {
    /// Run the faction spawners at all.
    pub enabled: bool,
    pub first_hostile_spawn_ticks: u32,
    pub ufo_single_interval_ticks: u32,
    pub squadron_interval_ticks: u32,
    pub swarm_interval_ticks: u32,
    pub squadron_size: u32,
    pub swarm_size: u32,
    pub aggression_loss_threshold: u32,
    pub aggression_calm_ticks: u32,
    pub aggressive_interval_factor: f64,
    pub satellite_interval_ticks: u32,
    pub satellite_delay_ticks: u32,
}

impl Default for FactionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            first_hostile_spawn_ticks: FIRST_HOSTILE_SPAWN_TICKS,
            ufo_single_interval_ticks: UFO_SINGLE_INTERVAL_TICKS,
            squadron_interval_ticks: UFO_SQUADRON_INTERVAL_TICKS,
            swarm_interval_ticks: UFO_SWARM_INTERVAL_TICKS,
            squadron_size: UFO_SQUADRON_SIZE,
            swarm_size: UFO_SWARM_SIZE,
            aggression_loss_threshold: AGGRESSION_LOSS_THRESHOLD,
            aggression_calm_ticks: AGGRESSION_CALM_TICKS,
            aggressive_interval_factor: AGGRESSIVE_INTERVAL_FACTOR,
            satellite_interval_ticks: SATELLITE_INTERVAL_TICKS,
            satellite_delay_ticks: SATELLITE_DELAY_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionSettings {
    /// Run missions at all. Disabled missions leave the arena empty.
    pub enabled: bool,
    pub initial_asteroids: u32,
    pub spawn_interval_ticks: u32,
    pub max_live_asteroids: usize,
    pub quota: u32,
    /// Advance without waiting for the host once a mission is cleared.
    pub auto_advance: bool,
    pub advance_delay_ticks: u32,
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_asteroids: MISSION_INITIAL_ASTEROIDS,
            spawn_interval_ticks: MISSION_SPAWN_INTERVAL_TICKS,
            max_live_asteroids: MISSION_MAX_LIVE_ASTEROIDS,
            quota: MISSION_QUOTA,
            auto_advance: false,
            advance_delay_ticks: MISSION_ADVANCE_DELAY_TICKS,
        }
    }
}

impl Settings {
    /// Arena with no missions and no faction spawns, for scripted scenarios.
    pub fn sandbox() -> Self {
        let mut settings = Settings::default();
        settings.faction.enabled = false;
        settings.mission.enabled = false;
        settings
    }

    /// Fail-fast precondition checks.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("field.width", self.field.width)?;
        positive("field.height", self.field.height)?;

        factor("physics.ship_resistance", self.physics.ship_resistance)?;
        factor("physics.spin_resistance", self.physics.spin_resistance)?;
        factor("physics.particle_resistance", self.physics.particle_resistance)?;
        positive("physics.max_ship_speed", self.physics.max_ship_speed)?;

        let r = &self.rocket;
        positive("rocket.radius", r.radius)?;
        positive("rocket.mass", r.mass)?;
        positive("rocket.energy_max", r.energy_max)?;
        non_negative("rocket.energy_regen", r.energy_regen)?;
        non_negative("rocket.engine_regen_bonus", r.engine_regen_bonus)?;
        non_negative("rocket.thrust", r.thrust)?;
        positive("rocket.stage2_multiplier", r.stage2_multiplier)?;
        non_negative("rocket.turn_rate_min", r.turn_rate_min)?;
        if r.turn_rate_min > r.turn_rate_max {
            return Err(SettingsError::TurnRamp {
                min: r.turn_rate_min,
                max: r.turn_rate_max,
            });
        }
        at_least_one("rocket.lives", r.lives)?;
        non_negative("rocket.energy_per_shot", r.energy_per_shot)?;
        non_negative("rocket.kinetic_shield_max", r.kinetic_shield_max)?;
        non_negative("rocket.kinetic_shield_regen", r.kinetic_shield_regen)?;
        positive("rocket.kinetic_shield_radius", r.kinetic_shield_radius)?;
        positive("rocket.kinetic_shield_large_radius", r.kinetic_shield_large_radius)?;

        let u = &self.ufo;
        positive("ufo.radius", u.radius)?;
        positive("ufo.mass", u.mass)?;
        positive("ufo.energy_max", u.energy_max)?;
        non_negative("ufo.speed", u.speed)?;
        factor("ufo.steering", u.steering)?;
        non_negative("ufo.energy_per_shot", u.energy_per_shot)?;

        let s = &self.satellite;
        positive("satellite.radius", s.radius)?;
        positive("satellite.mass", s.mass)?;
        positive("satellite.orbit_radius", s.orbit_radius)?;
        positive("satellite.energy_max", s.energy_max)?;
        non_negative("satellite.range", s.range)?;

        let b = &self.bullet;
        non_negative("bullet.speed", b.speed)?;
        positive("bullet.range_ticks", b.range_ticks)?;
        // Point bullets are fine.
        non_negative("bullet.radius", b.radius)?;
        positive("bullet.mass", b.mass)?;
        non_negative("bullet.damage", b.damage)?;

        let p = &self.particle;
        positive("particle.ttl_ticks", p.ttl_ticks)?;
        positive("particle.mass", p.mass)?;
        non_negative("particle.radius", p.radius)?;
        non_negative("particle.speed", p.speed)?;

        let a = &self.asteroid;
        positive("asteroid.base_radius", a.base_radius)?;
        positive("asteroid.mass_per_size", a.mass_per_size)?;
        non_negative("asteroid.impact_per_size", a.impact_per_size)?;
        non_negative("asteroid.split_speed", a.split_speed)?;
        non_negative("asteroid.spawn_speed_min", a.spawn_speed_min)?;
        non_negative("asteroid.spawn_speed_max", a.spawn_speed_max)?;
        non_negative("asteroid.min_split_size", a.min_split_size)?;

        let g = &self.gravity_well;
        positive("gravity_well.initial_mass", g.initial_mass)?;
        if g.critical_mass <= g.initial_mass {
            return Err(SettingsError::WellMass {
                initial: g.initial_mass,
                critical: g.critical_mass,
            });
        }
        positive("gravity_well.radius", g.radius)?;
        positive("gravity_well.reach", g.reach)?;
        positive("gravity_well.core_radius", g.core_radius)?;
        non_negative("gravity_well.strength", g.strength)?;
        factor_or_zero("gravity_well.potential_strength", g.potential_strength)?;
        non_negative("gravity_well.accretion_radius", g.accretion_radius)?;
        non_negative("gravity_well.consume_radius_max", g.consume_radius_max)?;
        positive("gravity_well.ergosphere_radius", g.ergosphere_radius)?;
        positive("gravity_well.collapse_radius", g.collapse_radius)?;

        let d = &self.disruptor;
        positive("disruptor.reach", d.reach)?;
        factor_or_zero("disruptor.damping", d.damping)?;
        factor_or_zero("disruptor.potential_strength", d.potential_strength)?;

        let ab = &self.abilities;
        non_negative("abilities.margin_ticks", ab.margin_ticks)?;
        for (name, t) in [
            ("abilities.shield", &ab.shield),
            ("abilities.hyperspace", &ab.hyperspace),
            ("abilities.disruptor", &ab.disruptor),
            ("abilities.kinetic_boost", &ab.kinetic_boost),
        ] {
            non_negative(name, t.activation_secs)?;
            non_negative(name, t.passivation_secs)?;
            non_negative(name, t.activation_cost)?;
            non_negative(name, t.drain_per_tick)?;
        }
        non_negative("abilities.shield_hit_cost", ab.shield_hit_cost)?;
        positive("abilities.shield_radius_factor", ab.shield_radius_factor)?;
        positive("abilities.hyperspace_mobility", ab.hyperspace_mobility)?;

        let f = &self.faction;
        at_least_one("faction.ufo_single_interval_ticks", f.ufo_single_interval_ticks)?;
        at_least_one("faction.squadron_interval_ticks", f.squadron_interval_ticks)?;
        at_least_one("faction.swarm_interval_ticks", f.swarm_interval_ticks)?;
        at_least_one("faction.satellite_interval_ticks", f.satellite_interval_ticks)?;
        at_least_one("faction.aggression_loss_threshold", f.aggression_loss_threshold)?;
        factor("faction.aggressive_interval_factor", f.aggressive_interval_factor)?;

        at_least_one("mission.spawn_interval_ticks", self.mission.spawn_interval_ticks)?;

        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Negative { name, value })
    }
}

fn factor(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SettingsError::NotAFactor { name, value })
    }
}

fn factor_or_zero(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value == 0.0 {
        Ok(())
    } else {
        factor(name, value)
    }
}

fn at_least_one(name: &'static str, value: u32) -> Result<(), SettingsError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(SettingsError::Zero { name })
    }
}
