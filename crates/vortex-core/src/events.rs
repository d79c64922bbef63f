//! Discrete named events emitted by the simulation.
//!
//! The host observes these for scoring UI and mission control, and may react
//! by calling back into the engine (e.g. `advance_mission`).

use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    AsteroidSplit {
        kind: AsteroidKind,
        size: f64,
        children: u32,
        tick: u64,
    },
    /// An asteroid left the arena without children.
    AsteroidDestroyed { kind: AsteroidKind, tick: u64 },
    PlanetoidDestroyed { tick: u64 },
    UfoDestroyed {
        class: UfoClass,
        by_player: Option<usize>,
        tick: u64,
    },
    RocketDestroyed { player: Option<usize>, tick: u64 },
    SatelliteDestroyed { tick: u64 },
    ShieldHit {
        player: Option<usize>,
        energy_left: f64,
        tick: u64,
    },
    KineticShieldAbsorbed {
        player: Option<usize>,
        amount: f64,
        energy_left: f64,
        tick: u64,
    },
    BulletBounced { tick: u64 },
    GravityWellCollapsed { x: f64, y: f64, mass: f64, tick: u64 },
    AggressionChanged { aggressive: bool, tick: u64 },
    MissionStarted {
        index: usize,
        theme: MissionTheme,
        tick: u64,
    },
    MissionStopped {
        index: usize,
        theme: MissionTheme,
        tick: u64,
    },
    AsteroidsCleared { index: usize, tick: u64 },
    /// Command for the mission controller: advance to the next mission.
    NextMissionRequested { tick: u64 },
    PlayerRespawned { player: usize, tick: u64 },
    PlayerOutOfLives { player: usize, tick: u64 },
    GameOver { tick: u64 },
}

impl GameEvent {
    /// Human-readable event name.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::AsteroidSplit { .. } => "asteroid split",
            GameEvent::AsteroidDestroyed { .. } => "asteroid destroyed",
            GameEvent::PlanetoidDestroyed { .. } => "planetoid destroyed",
            GameEvent::UfoDestroyed { .. } => "ufo destroyed",
            GameEvent::RocketDestroyed { .. } => "rocket destroyed",
            GameEvent::SatelliteDestroyed { .. } => "satellite destroyed",
            GameEvent::ShieldHit { .. } => "shield hit",
            GameEvent::KineticShieldAbsorbed { .. } => "kinetic shield absorbed",
            GameEvent::BulletBounced { .. } => "bullet bounced",
            GameEvent::GravityWellCollapsed { .. } => "gravity well collapsed",
            GameEvent::AggressionChanged { .. } => "aggression changed",
            GameEvent::MissionStarted { .. } => "mission started",
            GameEvent::MissionStopped { .. } => "mission stopped",
            GameEvent::AsteroidsCleared { .. } => "asteroids cleared",
            GameEvent::NextMissionRequested { .. } => "command: next mission",
            GameEvent::PlayerRespawned { .. } => "player respawned",
            GameEvent::PlayerOutOfLives { .. } => "player out of lives",
            GameEvent::GameOver { .. } => "game over",
        }
    }
}
