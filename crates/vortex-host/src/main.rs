//! Headless VORTEX runner.
//!
//! Starts a simulation, feeds it a scripted input pattern and logs a summary
//! every second. `VORTEX_SEED`, `VORTEX_PLAYERS` and `VORTEX_SECONDS`
//! override the defaults; `LOG_FORMAT=json` switches to JSON logs.

use std::time::Duration;

use tracing::{error, info};

use vortex_core::commands::HostCommand;
use vortex_core::enums::{EntityKind, GamePhase};
use vortex_core::input::InputState;
use vortex_host::{HostError, HostState};
use vortex_sim::engine::SimConfig;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Alternating thrust, turn and fire so the demo does something.
fn scripted_input(second: u64) -> InputState {
    InputState {
        thrust: second % 3 == 0,
        left: second % 4 == 1,
        right: second % 4 == 3,
        fire: true,
        ability: second % 5 == 2,
        ..Default::default()
    }
}

fn run() -> Result<(), HostError> {
    let seed = env_or("VORTEX_SEED", SimConfig::default().seed);
    let players = env_or("VORTEX_PLAYERS", 1usize);
    let seconds = env_or("VORTEX_SECONDS", 10u64);

    let host = HostState::new();
    host.start(
        SimConfig {
            seed,
            ..Default::default()
        },
        players,
    )?;

    for second in 0..seconds {
        for player in 0..players {
            host.send(HostCommand::Input {
                player,
                state: scripted_input(second),
            })?;
        }
        std::thread::sleep(Duration::from_secs(1));
        let Some(snap) = host.snapshot()? else {
            continue;
        };
        let scores: Vec<u64> = snap.players.iter().map(|p| p.score).collect();
        info!(
            tick = snap.time.tick,
            asteroids = snap.count(EntityKind::Asteroid),
            ufos = snap.count(EntityKind::Ufo),
            mission = snap.mission.as_ref().map_or("-", |m| m.name.as_str()),
            ?scores,
            "status"
        );
        if snap.phase == GamePhase::GameOver {
            break;
        }
    }

    host.shutdown()
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        error!(error = %e, "vortex host failed");
        std::process::exit(1);
    }
}
