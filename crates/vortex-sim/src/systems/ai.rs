//! Autonomous intents: UFO behaviour, asteroid movers, satellite targeting.
//!
//! Runs alongside player input, before physics. Only sets intents and
//! velocities; firing and movement happen in physics.

use hecs::Entity;

use vortex_ai::fsm::{self, UfoContext, UfoTuning};
use vortex_ai::mover::{self, MoverContext};
use vortex_core::components::{Asteroid, Body, Gun, Motion, Mover, UfoBrain};
use vortex_core::enums::EntityKind;
use vortex_core::types::Vec2;

use crate::ability::Ability;
use crate::context::SimContext;

pub fn run(ctx: &mut SimContext) {
    run_ufos(ctx);
    run_asteroids(ctx);
    run_satellites(ctx);
}

/// Offset to the closest live, targetable entity among `kinds`.
fn nearest(ctx: &SimContext, from: Vec2, kinds: &[EntityKind], max_range: f64) -> Option<Vec2> {
    let mut best: Option<(f64, Vec2)> = None;
    for &kind in kinds {
        for &e in ctx.store.live(kind) {
            let Some(body) = ctx.store.get::<Body>(e) else {
                continue;
            };
            if body.dead || body.hyperspace {
                continue;
            }
            let delta = ctx.field.delta(from, body.position);
            let d2 = delta.length_squared();
            if d2 <= max_range * max_range && best.map_or(true, |(b, _)| d2 < b) {
                best = Some((d2, delta));
            }
        }
    }
    best.map(|(_, delta)| delta)
}

fn run_ufos(ctx: &mut SimContext) {
    let tuning = UfoTuning {
        speed: ctx.settings.ufo.speed,
        acquire_range: ctx.settings.ufo.acquire_range,
        strafe_range: ctx.settings.ufo.strafe_range,
        strafe_ticks: ctx.settings.ufo.strafe_ticks,
        retreat_ticks: ctx.settings.ufo.retreat_ticks,
    };
    let steering = ctx.settings.ufo.steering;
    let aggressive = ctx.factions.hostile.aggressive;

    let ufos: Vec<Entity> = ctx.store.live(EntityKind::Ufo).to_vec();
    for ufo in ufos {
        let (Some(body), Some(brain)) = (ctx.store.get::<Body>(ufo), ctx.store.get::<UfoBrain>(ufo))
        else {
            continue;
        };
        if body.dead {
            continue;
        }
        let to_target = nearest(ctx, body.position, &[EntityKind::Rocket], f64::INFINITY);
        let update = fsm::evaluate(&UfoContext {
            class: brain.class,
            phase: brain.phase,
            phase_ticks: brain.phase_ticks,
            velocity: body.velocity,
            to_target,
            aggressive,
            wander_heading: brain.wander_heading,
            tuning,
        });

        ctx.store.update::<UfoBrain, _>(ufo, |b| {
            if update.phase_changed {
                b.phase = update.new_phase;
                b.phase_ticks = 0;
            } else {
                b.phase_ticks += 1;
            }
        });
        ctx.store.update::<Body, _>(ufo, |b| {
            b.velocity += (update.desired_velocity - b.velocity) * steering;
        });
        if let Some(aim) = update.aim {
            ctx.store.update::<Motion, _>(ufo, |m| m.direction = aim);
        }
        ctx.store.update::<Gun, _>(ufo, |g| g.trigger = update.fire);
        ctx.store
            .update::<Ability, _>(ufo, |a| a.machine.request(update.use_ability));
    }
}

fn run_asteroids(ctx: &mut SimContext) {
    let asteroids: Vec<Entity> = ctx.store.live(EntityKind::Asteroid).to_vec();
    for e in asteroids {
        let (Some(body), Some(asteroid)) = (ctx.store.get::<Body>(e), ctx.store.get::<Asteroid>(e))
        else {
            continue;
        };
        if body.dead {
            continue;
        }
        let to_target = match asteroid.mover {
            Mover::Homing { .. } => {
                nearest(ctx, body.position, &[EntityKind::Rocket], f64::INFINITY)
            }
            _ => None,
        };
        let velocity = mover::steer(
            &asteroid.mover,
            &MoverContext {
                velocity: body.velocity,
                age_ticks: asteroid.age_ticks,
                to_target,
            },
        );
        ctx.store.update::<Body, _>(e, |b| b.velocity = velocity);
    }
}

fn run_satellites(ctx: &mut SimContext) {
    let range = ctx.settings.satellite.range;
    let satellites: Vec<Entity> = ctx.store.live(EntityKind::Satellite).to_vec();
    for sat in satellites {
        let Some(body) = ctx.store.get::<Body>(sat) else {
            continue;
        };
        if body.dead {
            continue;
        }
        let target = nearest(ctx, body.position, &[EntityKind::Ufo, EntityKind::Asteroid], range);
        if let Some(delta) = target {
            ctx.store
                .update::<Motion, _>(sat, |m| m.direction = delta.y.atan2(delta.x));
        }
        ctx.store.update::<Gun, _>(sat, |g| g.trigger = target.is_some());
    }
}
