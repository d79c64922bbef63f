//! Executes "run after N frames" actions that have come due.

use std::f64::consts::TAU;

use tracing::{debug, info};

use vortex_core::events::GameEvent;

use crate::context::SimContext;
use crate::faction;
use crate::mission;
use crate::scheduler::Deferred;
use crate::spawn;

pub fn run(ctx: &mut SimContext) {
    let now = ctx.tick();
    for action in ctx.scheduler.take_due(now) {
        match action {
            Deferred::RespawnPlayer { player } => respawn(ctx, player),
            Deferred::SpawnSatellite { owner } => {
                let max = ctx.settings.satellite.max_per_rocket;
                let count = faction::satellites_of(ctx, owner);
                if count < max && !ctx.store.is_dead(owner) {
                    let angle = TAU * count as f64 / max as f64;
                    if spawn::satellite(ctx, owner, angle).is_some() {
                        debug!(?owner, "satellite joined");
                    }
                }
            }
            Deferred::SpawnUfos { class, count } => faction::spawn_ufos(ctx, class, count),
            Deferred::AdvanceMission => mission::advance(ctx),
        }
    }
}

fn respawn(ctx: &mut SimContext, player: usize) {
    let players = ctx.players.len();
    let Some(slot) = ctx.players.get(player) else {
        return;
    };
    if slot.lives == 0 || slot.rocket.is_some() {
        return;
    }
    let position = spawn::spawn_point(&ctx.field, player, players);
    let rocket = spawn::rocket(ctx, player, position, -std::f64::consts::FRAC_PI_2);
    ctx.players[player].rocket = Some(rocket);
    let tick = ctx.tick();
    info!(player, tick, "player respawned");
    ctx.emit(GameEvent::PlayerRespawned { player, tick });
}
