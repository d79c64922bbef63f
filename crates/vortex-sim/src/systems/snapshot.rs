//! Snapshot system: builds a `FrameSnapshot` of live entities, players and
//! mission state for the host. Read-only.

use vortex_core::components::{Body, KineticShield, Motion, Ship, Visual};
use vortex_core::enums::{EntityKind, GamePhase, VisualEffect};
use vortex_core::state::{EntityView, FrameSnapshot, PlayerView};

use crate::ability::Ability;
use crate::context::SimContext;

pub fn build_snapshot(ctx: &SimContext, phase: GamePhase) -> FrameSnapshot {
    let mut entities = Vec::new();
    for kind in EntityKind::ALL {
        for &e in ctx.store.live(kind) {
            let Some(body) = ctx.store.get::<Body>(e) else {
                continue;
            };
            if body.dead {
                continue;
            }
            let visual = ctx.store.get::<Visual>(e);
            entities.push(EntityView {
                id: e.to_bits().get(),
                kind,
                position: body.position,
                velocity: body.velocity,
                direction: ctx.store.get::<Motion>(e).map_or(0.0, |m| m.direction),
                radius: body.radius,
                effect: visual.map_or(VisualEffect::Hull, |v| v.effect),
                scale: visual.map_or(1.0, |v| v.scale),
                rotation: visual.map_or(0.0, |v| v.rotation),
                palette: visual.map_or(0, |v| v.palette),
                hyperspace: body.hyperspace,
                potential: body.potential,
                activation: ctx.store.get::<Ability>(e).map(|a| a.machine.activation()),
                energy: ctx.store.get::<Ship>(e).map(|s| s.energy),
                shield_energy: ctx.store.get::<KineticShield>(e).map(|k| k.energy),
            });
        }
    }

    let players = ctx
        .players
        .iter()
        .enumerate()
        .map(|(player, slot)| PlayerView {
            player,
            lives: slot.lives,
            score: slot.score,
            alive: slot.rocket.is_some_and(|r| !ctx.store.is_dead(r)),
        })
        .collect();

    FrameSnapshot {
        time: ctx.time,
        phase,
        field: ctx.field,
        entities,
        players,
        mission: ctx
            .mission
            .as_ref()
            .map(|m| m.view(ctx.settings.mission.quota)),
        aggressive: ctx.factions.hostile.aggressive,
    }
}
