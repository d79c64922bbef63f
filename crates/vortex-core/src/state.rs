//! Render snapshot types.
//!
//! Built once per tick on request, read by the renderer and UI. Nothing in
//! here feeds back into the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::field::Field;
use crate::types::{SimTime, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub field: Field,
    pub entities: Vec<EntityView>,
    pub players: Vec<PlayerView>,
    pub mission: Option<MissionView>,
    pub aggressive: bool,
}

impl FrameSnapshot {
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

/// Read-only view of one live entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// Stable entity handle bits.
    pub id: u64,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub direction: f64,
    pub radius: f64,
    pub effect: VisualEffect,
    pub scale: f64,
    pub rotation: f64,
    pub palette: u32,
    pub hyperspace: bool,
    pub potential: f64,
    /// Ability activation, if the entity has one.
    pub activation: Option<f64>,
    pub energy: Option<f64>,
    pub shield_energy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: usize,
    pub lives: u32,
    pub score: u64,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionView {
    pub index: usize,
    pub theme: MissionTheme,
    pub name: String,
    pub palette: [u32; 3],
    pub spawned: u32,
    pub quota: u32,
    pub cleared: bool,
}
