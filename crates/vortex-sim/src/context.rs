//! The mutable simulation state passed into every system.
//!
//! One `SimContext` is owned by the engine and lent out, by `&mut`, to one
//! system at a time. There is no other shared state.

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use vortex_core::events::GameEvent;
use vortex_core::field::Field;
use vortex_core::input::InputState;
use vortex_core::settings::Settings;
use vortex_core::types::SimTime;

use crate::ability::AbilityEvent;
use crate::faction::FactionState;
use crate::mission::MissionState;
use crate::scheduler::Scheduler;
use crate::store::ObjectStore;

/// Per-player bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub input: InputState,
    /// Previous tick's input, for edge detection.
    pub prev_input: InputState,
    pub lives: u32,
    pub score: u64,
    #[serde(skip)]
    pub rocket: Option<Entity>,
    pub out_of_lives: bool,
}

pub struct SimContext {
    pub store: ObjectStore,
    pub field: Field,
    pub settings: Settings,
    pub rng: ChaCha8Rng,
    pub time: SimTime,
    pub events: Vec<GameEvent>,
    pub scheduler: Scheduler,
    pub players: Vec<PlayerSlot>,
    pub factions: FactionState,
    pub mission: Option<MissionState>,
    /// Scratch buffer reused by the abilities system.
    pub(crate) ability_events: Vec<AbilityEvent>,
}

impl SimContext {
    /// Settings are assumed validated.
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            store: ObjectStore::new(),
            field: Field::new(settings.field.width, settings.field.height),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            events: Vec::new(),
            scheduler: Scheduler::default(),
            players: Vec::new(),
            factions: FactionState::default(),
            mission: None,
            ability_events: Vec::new(),
            settings,
        }
    }

    pub fn tick(&self) -> u64 {
        self.time.tick
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drop every entity, queue and per-game state atomically.
    pub fn clear(&mut self) {
        self.store.clear();
        self.scheduler.clear();
        self.players.clear();
        self.factions = FactionState::default();
        self.mission = None;
        self.ability_events.clear();
    }
}
