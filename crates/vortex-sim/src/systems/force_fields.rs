//! Force field pass.
//!
//! Resets every physical entity's gravitational potential to 1, then for
//! each active field multiplies it by `1 - contribution(distance)` and
//! applies the field's impulse. Gravity wells then accrete small bodies and
//! collapse, exactly once, when they reach critical mass.

use hecs::Entity;
use tracing::info;

use vortex_core::components::{Body, Disruptor, GravityWell, Motion, Particle};
use vortex_core::constants::{DISTANCE_EPSILON, MASS_EPSILON};
use vortex_core::enums::{EntityKind, VisualEffect};
use vortex_core::events::GameEvent;
use vortex_core::types::Vec2;

use crate::ability::Ability;
use crate::context::SimContext;
use crate::fields::{potential_factor, FieldTarget, ForceField};
use crate::links::Attached;
use crate::spawn;

/// Debris thrown out by a collapsing well.
const COLLAPSE_PARTICLES: u32 = 16;

enum Source {
    Well(GravityWell),
    Disruptor { law: Disruptor, owner: Option<Entity> },
}

struct ActiveField {
    entity: Entity,
    position: Vec2,
    source: Source,
}

pub fn run(ctx: &mut SimContext) {
    let fields = collect_fields(ctx);
    let targets: Vec<Entity> = ctx.store.physical().to_vec();

    for &e in &targets {
        let Some(body) = ctx.store.get::<Body>(e) else {
            continue;
        };
        if body.dead {
            continue;
        }
        if body.hyperspace || fields.is_empty() {
            ctx.store.update::<Body, _>(e, |b| b.potential = 1.0);
            continue;
        }
        apply_fields(ctx, e, body, &fields);
    }

    for field in &fields {
        if let Source::Well(_) = field.source {
            accrete(ctx, field.entity, &targets);
        }
    }
}

fn collect_fields(ctx: &SimContext) -> Vec<ActiveField> {
    let mut fields = Vec::new();
    for &e in ctx.store.live(EntityKind::GravityWell) {
        if let (Some(body), Some(well)) = (ctx.store.get::<Body>(e), ctx.store.get::<GravityWell>(e)) {
            if !body.dead && !well.collapsed {
                fields.push(ActiveField {
                    entity: e,
                    position: body.position,
                    source: Source::Well(well),
                });
            }
        }
    }
    for &e in ctx.store.live(EntityKind::DisruptorField) {
        if let (Some(body), Some(law)) = (ctx.store.get::<Body>(e), ctx.store.get::<Disruptor>(e)) {
            if !body.dead {
                fields.push(ActiveField {
                    entity: e,
                    position: body.position,
                    source: Source::Disruptor {
                        law,
                        owner: ctx.store.get::<Attached>(e).map(|a| a.parent),
                    },
                });
            }
        }
    }
    fields
}

fn apply_fields(ctx: &mut SimContext, e: Entity, body: Body, fields: &[ActiveField]) {
    let kind = ctx.store.kind(e).unwrap_or(EntityKind::Particle);
    let motion = ctx.store.get::<Motion>(e);
    let shielded = ctx.store.get::<Ability>(e).is_some_and(|a| {
        a.kind == vortex_core::enums::AbilityKind::Shield && a.machine.is_engaged()
    });
    let mut target = FieldTarget {
        kind,
        position: body.position,
        velocity: body.velocity,
        mass: motion.map_or(1.0, |m| m.mass),
        angular_velocity: motion.map_or(0.0, |m| m.angular_velocity),
        shielded,
        is_source: false,
    };

    let mut potential = 1.0;
    for field in fields {
        let distance = ctx.field.distance(body.position, field.position) + DISTANCE_EPSILON;
        match &field.source {
            Source::Well(law) => {
                potential *= potential_factor(law, distance);
                law.apply(&ctx.field, field.position, &mut target);
            }
            Source::Disruptor { law, owner } => {
                target.is_source = *owner == Some(e);
                if !target.is_source {
                    potential *= potential_factor(law, distance);
                }
                law.apply(&ctx.field, field.position, &mut target);
            }
        }
    }

    ctx.store.update::<Body, _>(e, |b| {
        b.velocity = target.velocity;
        b.potential = potential;
    });
    if motion.is_some() {
        ctx.store
            .update::<Motion, _>(e, |m| m.angular_velocity = target.angular_velocity);
    }
}

/// Consume small bodies inside the accretion radius, then collapse at
/// critical mass.
fn accrete(ctx: &mut SimContext, well_entity: Entity, targets: &[Entity]) {
    let Some(well_body) = ctx.store.get::<Body>(well_entity) else {
        return;
    };
    for &e in targets {
        let Some(well) = ctx.store.get::<GravityWell>(well_entity) else {
            return;
        };
        if well.collapsed || well_body.dead {
            return;
        }
        let Some(body) = ctx.store.get::<Body>(e) else {
            continue;
        };
        if body.dead || body.hyperspace || body.radius > well.consume_radius_max {
            continue;
        }
        if ctx.field.distance(body.position, well_body.position) > well.accretion_radius {
            continue;
        }
        let mass = ctx
            .store
            .get::<Particle>(e)
            .map(|p| p.mass)
            .or_else(|| ctx.store.get::<Motion>(e).map(|m| m.mass))
            .unwrap_or(ctx.settings.bullet.mass);
        ctx.store.kill(e);
        let total = ctx
            .store
            .update::<GravityWell, _>(well_entity, |w| {
                w.mass += mass;
                w.mass
            })
            .unwrap_or(0.0);
        if total + MASS_EPSILON >= well.critical_mass {
            collapse(ctx, well_entity);
            return;
        }
    }
}

/// The well's death: outward impulse to everything nearby, then removal.
/// Guarded so it fires once even if called again.
fn collapse(ctx: &mut SimContext, well_entity: Entity) {
    let Some(well) = ctx.store.get::<GravityWell>(well_entity) else {
        return;
    };
    if well.collapsed {
        return;
    }
    ctx.store.update::<GravityWell, _>(well_entity, |w| w.collapsed = true);
    let Some(center) = ctx.store.get::<Body>(well_entity).map(|b| b.position) else {
        return;
    };
    ctx.store.kill(well_entity);

    let targets: Vec<Entity> = ctx.store.physical().to_vec();
    for e in targets {
        let Some(body) = ctx.store.get::<Body>(e) else {
            continue;
        };
        if body.dead || body.hyperspace {
            continue;
        }
        let delta = ctx.field.delta(center, body.position);
        let distance = delta.length() + DISTANCE_EPSILON;
        if distance >= well.collapse_radius {
            continue;
        }
        let mass = ctx.store.get::<Motion>(e).map_or(1.0, |m| m.mass).max(0.1);
        let impulse = delta / distance * well.collapse_impulse * (1.0 - distance / well.collapse_radius)
            / mass.sqrt();
        ctx.store.update::<Body, _>(e, |b| b.velocity += impulse);
    }

    let mass = well.mass;
    spawn::burst(ctx, center, Vec2::ZERO, COLLAPSE_PARTICLES, VisualEffect::Explosion);
    info!(tick = ctx.tick(), mass, "gravity well collapsed");
    let tick = ctx.tick();
    ctx.emit(GameEvent::GravityWellCollapsed {
        x: center.x,
        y: center.y,
        mass,
        tick,
    });
}

/// Collapse a well immediately regardless of its mass (mission teardown).
pub fn force_collapse(ctx: &mut SimContext, well_entity: Entity) {
    collapse(ctx, well_entity);
}
