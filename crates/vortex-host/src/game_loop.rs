//! Game loop thread: runs the simulation engine at 60 Hz and publishes
//! snapshots.
//!
//! The engine is moved into the thread whole. Commands arrive via an `mpsc`
//! channel and are applied at the next tick boundary; events drained after
//! each tick are logged, and a cleared mission is followed by the next one.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use vortex_core::constants::TICK_RATE;
use vortex_core::events::GameEvent;
use vortex_core::state::FrameSnapshot;
use vortex_sim::engine::SimulationEngine;

use crate::state::LoopCommand;

/// Duration of one simulation tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("vortex-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// Runs until `Shutdown` or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<FrameSnapshot>>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        if !drain_commands(&mut engine, &cmd_rx) {
            engine.dispose();
            return;
        }

        // 2. Advance one tick (the engine ignores it unless running)
        let snapshot = engine.tick();

        // 3. Log and react to what happened during the tick
        handle_events(&mut engine);

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Forward queued commands to the engine. False once the loop should exit.
fn drain_commands(engine: &mut SimulationEngine, cmd_rx: &mpsc::Receiver<LoopCommand>) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(LoopCommand::Host(cmd)) => engine.queue_command(cmd),
            Ok(LoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// Drain the engine's events, logging each. A mission-advance request is
/// answered here unless the engine already schedules it itself.
fn handle_events(engine: &mut SimulationEngine) {
    let auto_advance = engine.context().settings.mission.auto_advance;
    for event in engine.drain_events() {
        log_event(&event);
        if matches!(event, GameEvent::NextMissionRequested { .. }) && !auto_advance {
            engine.advance_mission();
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GameOver { .. }
        | GameEvent::MissionStarted { .. }
        | GameEvent::AsteroidsCleared { .. }
        | GameEvent::PlayerOutOfLives { .. }
        | GameEvent::GravityWellCollapsed { .. } => info!(event = event.name(), ?event, "game event"),
        _ => debug!(event = event.name(), "game event"),
    }
}
