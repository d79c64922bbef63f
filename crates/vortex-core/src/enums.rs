//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Tagged entity kind. Every entity carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Rocket,
    Ufo,
    Satellite,
    Asteroid,
    Bullet,
    Particle,
    GravityWell,
    DisruptorField,
    /// Non-physical helper (ability visuals, explosions).
    Effect,
}

impl EntityKind {
    pub const COUNT: usize = 9;

    pub const ALL: [EntityKind; EntityKind::COUNT] = [
        EntityKind::Rocket,
        EntityKind::Ufo,
        EntityKind::Satellite,
        EntityKind::Asteroid,
        EntityKind::Bullet,
        EntityKind::Particle,
        EntityKind::GravityWell,
        EntityKind::DisruptorField,
        EntityKind::Effect,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Physical kinds are integrated, feel force fields and collide.
    pub fn is_physical(self) -> bool {
        !matches!(
            self,
            EntityKind::GravityWell | EntityKind::DisruptorField | EntityKind::Effect
        )
    }

    /// Kinds that carry energy, a gun and possibly an ability.
    pub fn is_ship(self) -> bool {
        matches!(self, EntityKind::Rocket | EntityKind::Ufo | EntityKind::Satellite)
    }
}

/// Spawn-and-behaviour side an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Neutral,
    Player,
    Hostile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    Shield,
    Hyperspace,
    Disruptor,
    /// Enlarges the kinetic shield radius while active.
    KineticBoost,
}

/// Ability lifecycle. Only the cyclic edges Off → Activating → On →
/// Passivating → Off exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AbilityPhase {
    #[default]
    Off,
    Activating,
    On,
    Passivating,
}

impl AbilityPhase {
    /// The only phase reachable from `self`.
    pub fn successor(self) -> AbilityPhase {
        match self {
            AbilityPhase::Off => AbilityPhase::Activating,
            AbilityPhase::Activating => AbilityPhase::On,
            AbilityPhase::On => AbilityPhase::Passivating,
            AbilityPhase::Passivating => AbilityPhase::Off,
        }
    }
}

/// How a raw button maps onto ability intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Press activates, release passivates.
    #[default]
    OnHold,
    /// Each press flips the intent; release is ignored.
    PressToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidKind {
    Rock,
    Ice,
    Iron,
    Planetoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UfoClass {
    Scout,
    Fighter,
    Swarmer,
}

/// UFO behaviour phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UfoPhase {
    #[default]
    Approach,
    Strafe,
    Retreat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, `init()` not yet called.
    #[default]
    Created,
    /// Initialised, waiting for `start()`.
    Ready,
    Running,
    Paused,
    GameOver,
    Stopped,
    Disposed,
}

/// Visual descriptor interpreted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualEffect {
    Hull,
    Rock,
    Bolt,
    Spark,
    Debris,
    Well,
    ShieldBubble,
    HyperspaceShimmer,
    DisruptorAura,
    KineticHalo,
    Explosion,
}

/// Gun turret arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurretLayout {
    #[default]
    Single,
    Twin,
    Spread3,
    Quad,
}

impl TurretLayout {
    /// Firing angles relative to the ship's direction (radians).
    pub fn angles(self) -> &'static [f64] {
        use std::f64::consts::{FRAC_PI_2, PI};
        match self {
            TurretLayout::Single => &[0.0],
            TurretLayout::Twin => &[-0.06, 0.06],
            TurretLayout::Spread3 => &[-0.2, 0.0, 0.2],
            TurretLayout::Quad => &[0.0, FRAC_PI_2, PI, PI + FRAC_PI_2],
        }
    }

    pub fn turrets(self) -> usize {
        self.angles().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionTheme {
    DebrisBelt,
    IceField,
    PlanetoidRun,
    GravityStorm,
}
