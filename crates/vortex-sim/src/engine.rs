//! Simulation engine: the lifecycle surface a host drives.
//!
//! `SimulationEngine` owns the `SimContext`, drains host commands at each
//! tick boundary, runs every system in a fixed order and produces
//! `FrameSnapshot`s. Completely headless, so it is deterministic under test:
//! same seed and same commands give the same snapshots.

use std::collections::VecDeque;

use tracing::{info, warn};

use vortex_core::commands::HostCommand;
use vortex_core::enums::GamePhase;
use vortex_core::events::GameEvent;
use vortex_core::input::InputState;
use vortex_core::settings::{Settings, SettingsError};
use vortex_core::state::FrameSnapshot;
use vortex_core::types::SimTime;

use crate::context::{PlayerSlot, SimContext};
use crate::faction::{self, FactionState};
use crate::mission;
use crate::spawn;
use crate::systems;
use crate::systems::collision::CollisionTable;

/// Configuration for a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed. Same seed = same simulation.
    pub seed: u64,
    pub settings: Settings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            settings: Settings::default(),
        }
    }
}

pub struct SimulationEngine {
    ctx: SimContext,
    phase: GamePhase,
    collisions: CollisionTable,
    command_queue: VecDeque<HostCommand>,
}

impl SimulationEngine {
    /// Validates the settings; nothing else can fail later.
    pub fn new(config: SimConfig) -> Result<Self, SettingsError> {
        config.settings.validate()?;
        Ok(Self {
            ctx: SimContext::new(config.settings, config.seed),
            phase: GamePhase::Created,
            collisions: CollisionTable::new(),
            command_queue: VecDeque::new(),
        })
    }

    /// Build the collision table. Required once before `start`.
    pub fn init(&mut self) {
        if self.phase != GamePhase::Created {
            warn!(phase = ?self.phase, "init ignored");
            return;
        }
        self.collisions = CollisionTable::standard();
        self.phase = GamePhase::Ready;
        info!("simulation initialised");
    }

    /// Begin a game for `player_count` players, discarding any previous one.
    pub fn start(&mut self, player_count: usize) {
        if !matches!(
            self.phase,
            GamePhase::Ready | GamePhase::Stopped | GamePhase::GameOver
        ) {
            warn!(phase = ?self.phase, "start ignored");
            return;
        }
        let ctx = &mut self.ctx;
        ctx.clear();
        ctx.events.clear();
        ctx.time = SimTime::default();
        ctx.factions = FactionState::new(&ctx.settings.faction);

        let lives = ctx.settings.rocket.lives;
        for player in 0..player_count {
            let position = spawn::spawn_point(&ctx.field, player, player_count);
            let rocket = spawn::rocket(ctx, player, position, -std::f64::consts::FRAC_PI_2);
            ctx.players.push(PlayerSlot {
                lives,
                rocket: Some(rocket),
                ..Default::default()
            });
        }
        if ctx.settings.mission.enabled {
            mission::start(ctx, 0);
        }
        self.command_queue.clear();
        self.phase = GamePhase::Running;
        info!(player_count, "game started");
    }

    pub fn pause(&mut self, paused: bool) {
        match (paused, self.phase) {
            (true, GamePhase::Running) => self.phase = GamePhase::Paused,
            (false, GamePhase::Paused) => self.phase = GamePhase::Running,
            _ => return,
        }
        info!(paused, tick = self.ctx.tick(), "pause toggled");
    }

    /// Advance exactly one tick (no-op unless running).
    pub fn do_loop(&mut self) {
        self.process_commands();
        if self.phase != GamePhase::Running {
            return;
        }
        self.run_systems();
        self.ctx.time.advance();
        self.check_game_over();
    }

    /// `do_loop` followed by a snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.do_loop();
        self.snapshot()
    }

    /// Drop every entity, queue and per-game state in one step.
    pub fn stop(&mut self) {
        if matches!(self.phase, GamePhase::Created | GamePhase::Disposed) {
            return;
        }
        self.ctx.clear();
        self.command_queue.clear();
        self.phase = GamePhase::Stopped;
        info!(tick = self.ctx.tick(), "simulation stopped");
    }

    pub fn dispose(&mut self) {
        self.stop();
        self.ctx.events.clear();
        self.collisions = CollisionTable::new();
        self.phase = GamePhase::Disposed;
        info!("simulation disposed");
    }

    /// Queue a host command for the next tick boundary.
    pub fn queue_command(&mut self, command: HostCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        self.command_queue.extend(commands);
    }

    /// Shorthand for queueing a `HostCommand::Input`.
    pub fn set_input(&mut self, player: usize, state: InputState) {
        self.queue_command(HostCommand::Input { player, state });
    }

    /// Stop the current mission and start the next one.
    pub fn advance_mission(&mut self) {
        if matches!(self.phase, GamePhase::Running | GamePhase::Paused) {
            mission::advance(&mut self.ctx);
        }
    }

    /// Events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.ctx.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        systems::snapshot::build_snapshot(&self.ctx, self.phase)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.ctx.time
    }

    pub fn players(&self) -> &[PlayerSlot] {
        &self.ctx.players
    }

    /// Read-only access for hosts and tests.
    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Direct access for scenario setup.
    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Input { player, state } => match self.ctx.players.get_mut(player) {
                Some(slot) => slot.input = state,
                None => warn!(player, "input for unknown player"),
            },
            HostCommand::Pause => self.pause(true),
            HostCommand::Resume => self.pause(false),
            HostCommand::NextMission => self.advance_mission(),
            HostCommand::Resize { width, height } => {
                if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
                    self.ctx.field.resize(width, height);
                    info!(width, height, "field resized");
                } else {
                    warn!(width, height, "resize rejected");
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let ctx = &mut self.ctx;
        // 1. Player input and autonomous intents
        systems::input::run(ctx);
        systems::ai::run(ctx);
        // 2. Physics integration (ships' engine, gun and regen first)
        systems::physics::run(ctx);
        // 3. Force fields (potential, impulses, accretion, collapse)
        systems::force_fields::run(ctx);
        // 4. Maintenance: deferred removals, then deferred adds
        ctx.store.maintain();
        // 5. Ability state machines and their hooks
        systems::abilities::run(ctx);
        // 6. Collision detection and resolution
        self.collisions.run(ctx);
        // 7. Faction spawners, mission spawner and cleared-check
        faction::run(ctx);
        mission::run(ctx);
        // 8. Deferred actions that came due
        systems::deferred::run(ctx);
        // 9. Sweep everything killed since step 4; adds wait for next tick
        ctx.store.remove_dead();
    }

    fn check_game_over(&mut self) {
        let players = &self.ctx.players;
        if players.is_empty() || !players.iter().all(|p| p.out_of_lives) {
            return;
        }
        self.phase = GamePhase::GameOver;
        let tick = self.ctx.tick();
        info!(tick, "game over");
        self.ctx.emit(GameEvent::GameOver { tick });
    }
}
