//! Host state shared between callers and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;
use tracing::info;

use vortex_core::commands::HostCommand;
use vortex_core::settings::SettingsError;
use vortex_core::state::FrameSnapshot;
use vortex_sim::engine::{SimConfig, SimulationEngine};

use crate::game_loop;

/// Messages accepted by the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forward to the engine's command queue.
    Host(HostCommand),
    /// Stop and dispose the engine, then exit the thread.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("game loop has exited")]
    Disconnected,
    #[error("host state lock poisoned")]
    Poisoned,
}

/// Handle to a running (or not yet started) simulation.
///
/// `Sender` is not `Sync`, so it sits behind a `Mutex`; the snapshot slot is
/// shared with the loop thread, which replaces it after every tick.
#[derive(Default)]
pub struct HostState {
    command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build, init and start an engine, then hand it to a new loop thread.
    pub fn start(&self, config: SimConfig, players: usize) -> Result<(), HostError> {
        let mut tx = self.command_tx.lock().map_err(|_| HostError::Poisoned)?;
        if tx.is_some() {
            return Err(HostError::AlreadyRunning);
        }
        let seed = config.seed;
        let mut engine = SimulationEngine::new(config)?;
        engine.init();
        engine.start(players);

        let (sender, handle) = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone())?;
        *tx = Some(sender);
        *self.worker.lock().map_err(|_| HostError::Poisoned)? = Some(handle);
        info!(seed, players, "host started");
        Ok(())
    }

    pub fn send(&self, command: HostCommand) -> Result<(), HostError> {
        let tx = self.command_tx.lock().map_err(|_| HostError::Poisoned)?;
        match tx.as_ref() {
            Some(tx) => tx
                .send(LoopCommand::Host(command))
                .map_err(|_| HostError::Disconnected),
            None => Err(HostError::NotStarted),
        }
    }

    /// Latest snapshot, if the loop has produced one.
    pub fn snapshot(&self) -> Result<Option<FrameSnapshot>, HostError> {
        let lock = self.latest_snapshot.lock().map_err(|_| HostError::Poisoned)?;
        Ok(lock.clone())
    }

    pub fn is_running(&self) -> bool {
        self.command_tx.lock().map(|tx| tx.is_some()).unwrap_or(false)
    }

    /// Ask the loop to exit and wait for it.
    pub fn shutdown(&self) -> Result<(), HostError> {
        let sender = self
            .command_tx
            .lock()
            .map_err(|_| HostError::Poisoned)?
            .take()
            .ok_or(HostError::NotStarted)?;
        // The loop may already be gone; joining below covers both cases.
        let _ = sender.send(LoopCommand::Shutdown);
        if let Some(handle) = self.worker.lock().map_err(|_| HostError::Poisoned)?.take() {
            handle.join().map_err(|_| HostError::Disconnected)?;
        }
        info!("host shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vortex_core::enums::GamePhase;
    use vortex_core::settings::Settings;

    #[test]
    fn test_host_state_creation() {
        let state = HostState::new();
        assert!(!state.is_running());
        assert!(state.snapshot().unwrap().is_none());
        assert!(matches!(
            state.send(HostCommand::Pause),
            Err(HostError::NotStarted)
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let state = HostState::new();
        let mut settings = Settings::default();
        settings.field.width = 0.0;
        let err = state.start(SimConfig { seed: 1, settings }, 1).unwrap_err();
        assert!(matches!(err, HostError::Settings(_)));
        assert!(!state.is_running());
    }

    #[test]
    fn test_start_produces_snapshots_and_shuts_down() {
        let state = HostState::new();
        state.start(SimConfig::default(), 1).unwrap();
        assert!(matches!(
            state.start(SimConfig::default(), 1),
            Err(HostError::AlreadyRunning)
        ));

        let mut snapshot = None;
        for _ in 0..100 {
            snapshot = state.snapshot().unwrap();
            if snapshot.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let snapshot = snapshot.expect("loop should publish a snapshot");
        assert_eq!(snapshot.phase, GamePhase::Running);
        assert_eq!(snapshot.players.len(), 1);

        state.send(HostCommand::Pause).unwrap();
        state.shutdown().unwrap();
        assert!(!state.is_running());
        assert!(matches!(state.shutdown(), Err(HostError::NotStarted)));
    }
}
