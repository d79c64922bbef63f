//! Physics integration.
//!
//! Ships first process their sub-objects (energy and kinetic shield regen,
//! engine staging, gun reload and fire), then every live physical object
//! applies drag, rotates, translates and wraps. Attached entities follow
//! their parent afterwards.

use hecs::Entity;

use vortex_core::components::*;
use vortex_core::enums::{EntityKind, Faction};
use vortex_core::types::{heading, normalize_angle, rotate};

use crate::context::SimContext;
use crate::links::Attached;
use crate::spawn;

/// Kinds positioned by their parent rather than by integration.
const FOLLOWERS: [EntityKind; 3] = [
    EntityKind::Satellite,
    EntityKind::DisruptorField,
    EntityKind::Effect,
];

/// Clearance between a ship's hull and a freshly fired bullet.
const MUZZLE_CLEARANCE: f64 = 2.0;

pub fn run(ctx: &mut SimContext) {
    let entities: Vec<Entity> = ctx.store.physical().to_vec();
    for e in entities {
        let Some(body) = ctx.store.get::<Body>(e) else {
            continue;
        };
        if body.dead {
            continue;
        }
        if ctx.store.has::<Ship>(e) {
            ship_step(ctx, e);
        }
        if ctx.store.has::<Attached>(e) {
            continue;
        }
        integrate(ctx, e);
    }

    // Static fields only need re-wrapping after a resize.
    let wells: Vec<Entity> = ctx.store.live(EntityKind::GravityWell).to_vec();
    for e in wells {
        let field = ctx.field;
        ctx.store
            .update::<Body, _>(e, |b| b.position = field.wrap(b.position));
    }

    follow_parents(ctx);
}

fn ship_step(ctx: &mut SimContext, e: Entity) {
    let (Some(body), Some(mut ship)) = (ctx.store.get::<Body>(e), ctx.store.get::<Ship>(e)) else {
        return;
    };
    let motion = ctx.store.get::<Motion>(e);
    let direction = motion.map_or(0.0, |m| m.direction);
    let mut velocity = body.velocity;

    ship.prev_speed = velocity.length();
    ship.dir_cos = direction.cos();
    ship.dir_sin = direction.sin();

    let mut burning = false;
    if let Some(mut engine) = ctx.store.get::<Engine>(e) {
        if engine.on {
            burning = true;
            engine.burn_ticks += 1;
            engine.stage = if engine.burn_ticks > engine.stage2_after_ticks {
                2
            } else {
                1
            };
            let boost = if engine.stage == 2 {
                engine.stage2_multiplier
            } else {
                1.0
            };
            velocity += heading(direction) * engine.thrust * engine.mobility * boost;
        } else {
            // Staging resets whenever the engine is switched off.
            engine.burn_ticks = 0;
            engine.stage = 0;
        }
        ctx.store.set(e, engine);
    }

    let regen = ship.energy_regen + if burning { ship.engine_regen_bonus } else { 0.0 };
    ship.energy = (ship.energy + regen).min(ship.energy_max);

    ctx.store.update::<KineticShield, _>(e, |ks| {
        ks.energy = (ks.energy + ks.regen).min(ks.energy_max);
    });

    if let Some(mut gun) = ctx.store.get::<Gun>(e) {
        gun.reload_remaining = gun.reload_remaining.saturating_sub(1);
        let wants = gun.trigger || gun.fire_once;
        if wants && gun.reload_remaining == 0 && !body.hyperspace {
            let cost = gun.energy_per_shot * gun.layout.turrets() as f64;
            if ship.energy >= cost {
                ship.energy -= cost;
                gun.reload_remaining = gun.reload_ticks;
                let faction = ctx.store.get::<Faction>(e).unwrap_or_default();
                for &offset in gun.layout.angles() {
                    let dir = heading(direction + offset);
                    let position = body.position + dir * (body.radius + MUZZLE_CLEARANCE);
                    spawn::bullet(ctx, e, faction, &gun, position, velocity + dir * gun.bullet_speed);
                }
            }
        }
        gun.fire_once = false;
        ctx.store.set(e, gun);
    }

    ctx.store.set(e, ship);
    ctx.store.update::<Body, _>(e, |b| b.velocity = velocity);
}

fn integrate(ctx: &mut SimContext, e: Entity) {
    let kind = ctx.store.kind(e);
    let spin_resistance = ctx.settings.physics.spin_resistance;
    let max_speed = ctx.settings.physics.max_ship_speed;
    let field = ctx.field;

    let motion = ctx.store.update::<Motion, _>(e, |m| {
        m.angular_velocity *= spin_resistance;
        m.direction = normalize_angle(m.direction + m.turn + m.angular_velocity);
        *m
    });

    let potential = ctx
        .store
        .update::<Body, _>(e, |b| {
            if let Some(m) = motion {
                b.velocity *= m.resistance;
            }
            if matches!(kind, Some(EntityKind::Rocket | EntityKind::Ufo)) {
                let speed = b.velocity.length();
                if speed > max_speed {
                    b.velocity *= max_speed / speed;
                }
            }
            b.prev_position = b.position;
            b.position = field.wrap(b.position + b.velocity);
            b.potential
        })
        .unwrap_or(1.0);

    if let Some(m) = motion {
        ctx.store.update::<Visual, _>(e, |v| v.rotation = m.direction);
    }

    match kind {
        Some(EntityKind::Bullet) => {
            let expired = ctx
                .store
                .update::<Bullet, _>(e, |b| {
                    b.bounce_lock = b.bounce_lock.saturating_sub(1);
                    b.range -= potential;
                    b.range <= 0.0
                })
                .unwrap_or(false);
            if expired {
                ctx.store.kill(e);
            }
        }
        Some(EntityKind::Particle) => {
            let remaining = ctx
                .store
                .update::<Particle, _>(e, |p| {
                    p.ttl -= potential;
                    (p.ttl / p.ttl_max).max(0.0)
                })
                .unwrap_or(0.0);
            ctx.store.update::<Visual, _>(e, |v| v.scale = remaining);
            if remaining <= 0.0 {
                ctx.store.kill(e);
            }
        }
        Some(EntityKind::Asteroid) => {
            ctx.store.update::<Asteroid, _>(e, |a| a.age_ticks += 1);
        }
        _ => {}
    }
}

fn follow_parents(ctx: &mut SimContext) {
    let field = ctx.field;
    for kind in FOLLOWERS {
        let followers: Vec<Entity> = ctx.store.live(kind).to_vec();
        for e in followers {
            let Some(attached) = ctx.store.get::<Attached>(e) else {
                continue;
            };
            if ctx.store.is_dead(e) {
                continue;
            }
            let parent = match ctx.store.get::<Body>(attached.parent) {
                Some(p) if !p.dead => p,
                _ => {
                    ctx.store.kill(e);
                    continue;
                }
            };
            let offset = rotate(attached.offset, attached.orbit_speed);
            ctx.store.update::<Attached, _>(e, |a| a.offset = offset);
            ctx.store.update::<Body, _>(e, |b| {
                b.prev_position = b.position;
                b.position = field.wrap(parent.position + offset);
                b.velocity = parent.velocity;
            });
            if kind == EntityKind::Effect {
                if let Some(m) = ctx.store.get::<Motion>(attached.parent) {
                    ctx.store.update::<Visual, _>(e, |v| v.rotation = m.direction);
                }
            }
        }
    }
}
