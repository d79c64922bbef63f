//! Entity factories.
//!
//! Every constructor enqueues its entity as pending; it joins the live lists
//! at the next maintenance pass.

use hecs::{Entity, EntityBuilder};
use rand::Rng;
use tracing::debug;

use vortex_ai::profiles::{asteroid_profile, pick_mover, ufo_profile};
use vortex_core::components::*;
use vortex_core::enums::*;
use vortex_core::field::Field;
use vortex_core::types::{heading, rotate, Vec2};

use crate::ability::Ability;
use crate::context::SimContext;
use crate::links::{Attached, Owner};

const PLAYER_PALETTES: [u32; 4] = [0x4fc3f7, 0xff8a65, 0x81c784, 0xba68c8];
const HOSTILE_PALETTE: u32 = 0xe53935;
const SUPPORT_PALETTE: u32 = 0xfff176;
const BULLET_PALETTE: u32 = 0xffffff;
const DEBRIS_PALETTE: u32 = 0x9e9e9e;
const WELL_PALETTE: u32 = 0x7e57c2;

pub fn player_palette(player: usize) -> u32 {
    PLAYER_PALETTES[player % PLAYER_PALETTES.len()]
}

fn body(position: Vec2, velocity: Vec2, radius: f64) -> Body {
    Body {
        position,
        prev_position: position,
        velocity,
        radius,
        hyperspace: false,
        dead: false,
        potential: 1.0,
    }
}

fn visual(effect: VisualEffect, palette: u32) -> Visual {
    Visual {
        effect,
        scale: 1.0,
        rotation: 0.0,
        palette,
    }
}

pub fn rocket(ctx: &mut SimContext, player: usize, position: Vec2, direction: f64) -> Entity {
    let s = &ctx.settings.rocket;
    let ability = Ability::new(
        s.ability,
        ctx.settings.abilities.tuning(s.ability),
        ctx.settings.abilities.margin_ticks,
    );
    let mut b = EntityBuilder::new();
    b.add(body(ctx.field.wrap(position), Vec2::ZERO, s.radius))
        .add(Motion {
            mass: s.mass,
            direction,
            turn: 0.0,
            angular_velocity: 0.0,
            resistance: ctx.settings.physics.ship_resistance,
        })
        .add(Engine {
            on: false,
            thrust: s.thrust,
            mobility: 1.0,
            burn_ticks: 0,
            stage: 0,
            stage2_after_ticks: s.stage2_after_ticks,
            stage2_multiplier: s.stage2_multiplier,
        })
        .add(Gun {
            layout: s.turrets,
            trigger: false,
            fire_once: false,
            reload_ticks: s.reload_ticks,
            reload_remaining: 0,
            bullet_speed: ctx.settings.bullet.speed,
            bullet_range_ticks: ctx.settings.bullet.range_ticks,
            energy_per_shot: s.energy_per_shot,
            high_energy: s.high_energy_gun,
            support: false,
        })
        .add(Ship {
            energy: s.energy_max,
            energy_max: s.energy_max,
            energy_regen: s.energy_regen,
            engine_regen_bonus: s.engine_regen_bonus,
            prev_speed: 0.0,
            dir_cos: direction.cos(),
            dir_sin: direction.sin(),
        })
        .add(KineticShield {
            energy: s.kinetic_shield_max,
            energy_max: s.kinetic_shield_max,
            regen: s.kinetic_shield_regen,
            radius: s.kinetic_shield_radius,
            large_radius: s.kinetic_shield_large_radius,
            large: false,
        })
        .add(ability)
        .add(Faction::Player)
        .add(Pilot { player })
        .add(visual(VisualEffect::Hull, player_palette(player)));
    let entity = ctx.store.spawn(EntityKind::Rocket, &mut b);
    debug!(player, ?entity, "rocket spawned");
    entity
}

pub fn ufo(ctx: &mut SimContext, class: UfoClass, position: Vec2, velocity: Vec2) -> Entity {
    let s = &ctx.settings.ufo;
    let profile = ufo_profile(class);
    let ability = Ability::new(
        profile.ability,
        ctx.settings.abilities.tuning(profile.ability),
        ctx.settings.abilities.margin_ticks,
    );
    let direction = velocity.y.atan2(velocity.x);
    let wander_heading = ctx.rng.gen_range(0.0..std::f64::consts::TAU);
    let mut b = EntityBuilder::new();
    b.add(body(
        ctx.field.wrap(position),
        velocity,
        s.radius * profile.radius_factor,
    ))
    .add(Motion {
        mass: s.mass * profile.radius_factor,
        direction,
        turn: 0.0,
        angular_velocity: 0.0,
        resistance: 1.0,
    })
    .add(Gun {
        layout: profile.turrets,
        trigger: false,
        fire_once: false,
        reload_ticks: (s.reload_ticks as f64 * profile.reload_factor).round() as u32,
        reload_remaining: s.reload_ticks,
        bullet_speed: ctx.settings.bullet.speed * 0.8,
        bullet_range_ticks: ctx.settings.bullet.range_ticks,
        energy_per_shot: s.energy_per_shot,
        high_energy: profile.high_energy,
        support: false,
    })
    .add(Ship {
        energy: s.energy_max,
        energy_max: s.energy_max,
        energy_regen: s.energy_regen,
        engine_regen_bonus: 0.0,
        prev_speed: velocity.length(),
        dir_cos: direction.cos(),
        dir_sin: direction.sin(),
    })
    .add(ability)
    .add(UfoBrain {
        class,
        phase: UfoPhase::Approach,
        phase_ticks: 0,
        wander_heading,
    })
    .add(Faction::Hostile)
    .add(Score {
        points: (s.score as f64 * profile.score_factor).round() as u64,
    })
    .add(visual(VisualEffect::Hull, HOSTILE_PALETTE));
    let entity = ctx.store.spawn(EntityKind::Ufo, &mut b);
    debug!(?class, ?entity, "ufo spawned");
    entity
}

/// Support satellite orbiting `owner`. None when the owner is gone.
pub fn satellite(ctx: &mut SimContext, owner: Entity, angle: f64) -> Option<Entity> {
    let owner_body = ctx.store.get::<Body>(owner).filter(|b| !b.dead)?;
    let s = &ctx.settings.satellite;
    let offset = rotate(Vec2::new(s.orbit_radius, 0.0), angle);
    let position = ctx.field.wrap(owner_body.position + offset);
    let mut b = EntityBuilder::new();
    b.add(body(position, owner_body.velocity, s.radius))
        .add(Motion {
            mass: s.mass,
            direction: angle,
            turn: 0.0,
            angular_velocity: 0.0,
            resistance: 1.0,
        })
        .add(Gun {
            layout: TurretLayout::Single,
            trigger: false,
            fire_once: false,
            reload_ticks: s.reload_ticks,
            reload_remaining: s.reload_ticks,
            bullet_speed: ctx.settings.bullet.speed,
            bullet_range_ticks: ctx.settings.bullet.range_ticks,
            energy_per_shot: s.energy_per_shot,
            high_energy: false,
            support: true,
        })
        .add(Ship {
            energy: s.energy_max,
            energy_max: s.energy_max,
            energy_regen: s.energy_regen,
            engine_regen_bonus: 0.0,
            prev_speed: 0.0,
            dir_cos: angle.cos(),
            dir_sin: angle.sin(),
        })
        .add(Attached {
            parent: owner,
            offset,
            orbit_speed: s.orbit_speed,
        })
        .add(Faction::Player)
        .add(visual(VisualEffect::Hull, SUPPORT_PALETTE));
    let entity = ctx.store.spawn(EntityKind::Satellite, &mut b);
    ctx.store.adopt(owner, entity);
    Some(entity)
}

/// Asteroid whose split/durability parameters come from its kind. Children
/// below the minimum split size never split again.
pub fn asteroid(
    ctx: &mut SimContext,
    kind: AsteroidKind,
    size: f64,
    position: Vec2,
    velocity: Vec2,
    palette: u32,
) -> Entity {
    let profile = asteroid_profile(kind);
    let a = &ctx.settings.asteroid;
    let splits = if size >= a.min_split_size {
        profile.splits
    } else {
        0
    };
    let radius = a.base_radius * profile.radius_scale * size;
    let mass = a.mass_per_size * profile.mass_scale * size;
    let score = (a.score_per_size * profile.score_scale * size).round() as u64;
    let mover = pick_mover(kind, &mut ctx.rng);
    let spin = ctx.rng.gen_range(-0.02..0.02);
    let mut b = EntityBuilder::new();
    b.add(body(ctx.field.wrap(position), velocity, radius))
        .add(Motion {
            mass,
            direction: 0.0,
            turn: spin,
            angular_velocity: 0.0,
            resistance: 1.0,
        })
        .add(Asteroid {
            kind,
            size,
            splits,
            hits: 0,
            hits_max: profile.hits_max,
            child_ratio: profile.child_ratio,
            erosion: profile.erosion,
            mover,
            age_ticks: 0,
        })
        .add(Faction::Neutral)
        .add(Score { points: score })
        .add(visual(profile.effect, palette));
    ctx.store.spawn(EntityKind::Asteroid, &mut b)
}

/// Asteroid with a random edge position and drift velocity.
pub fn asteroid_at_edge(ctx: &mut SimContext, kind: AsteroidKind, size: f64, palette: u32) -> Entity {
    let t = ctx.rng.gen_range(0.0..1.0);
    let position = ctx.field.edge_point(t);
    let angle = ctx.rng.gen_range(0.0..std::f64::consts::TAU);
    let (lo, hi) = (
        ctx.settings.asteroid.spawn_speed_min,
        ctx.settings.asteroid.spawn_speed_max,
    );
    let speed = if hi > lo { ctx.rng.gen_range(lo..hi) } else { lo };
    asteroid(ctx, kind, size, position, heading(angle) * speed, palette)
}

/// Bullet fired by `owner` along `direction`.
pub fn bullet(
    ctx: &mut SimContext,
    owner: Entity,
    faction: Faction,
    gun: &Gun,
    position: Vec2,
    velocity: Vec2,
) -> Entity {
    let s = &ctx.settings.bullet;
    let mut b = EntityBuilder::new();
    b.add(body(ctx.field.wrap(position), velocity, s.radius))
        .add(Bullet {
            faction,
            range: gun.bullet_range_ticks,
            range_max: gun.bullet_range_ticks,
            damage: s.damage,
            high_energy: gun.high_energy,
            support: gun.support,
            bounce_lock: 0,
        })
        .add(Owner(owner))
        .add(faction)
        .add(visual(VisualEffect::Bolt, BULLET_PALETTE));
    ctx.store.spawn(EntityKind::Bullet, &mut b)
}

/// Single debris particle.
pub fn particle(ctx: &mut SimContext, position: Vec2, velocity: Vec2, effect: VisualEffect) -> Entity {
    let s = &ctx.settings.particle;
    let mut b = EntityBuilder::new();
    b.add(body(ctx.field.wrap(position), velocity, s.radius))
        .add(Motion {
            mass: s.mass,
            direction: 0.0,
            turn: 0.0,
            angular_velocity: 0.0,
            resistance: ctx.settings.physics.particle_resistance,
        })
        .add(Particle {
            mass: s.mass,
            ttl: s.ttl_ticks,
            ttl_max: s.ttl_ticks,
        })
        .add(visual(effect, DEBRIS_PALETTE));
    ctx.store.spawn(EntityKind::Particle, &mut b)
}

/// Radial particle burst around `position`.
pub fn burst(ctx: &mut SimContext, position: Vec2, base_velocity: Vec2, count: u32, effect: VisualEffect) {
    let speed = ctx.settings.particle.speed;
    for _ in 0..count {
        let angle = ctx.rng.gen_range(0.0..std::f64::consts::TAU);
        let v = base_velocity + heading(angle) * speed * ctx.rng.gen_range(0.3..1.0);
        particle(ctx, position, v, effect);
    }
}

pub fn gravity_well(ctx: &mut SimContext, position: Vec2) -> Entity {
    let g = &ctx.settings.gravity_well;
    let mut b = EntityBuilder::new();
    b.add(body(ctx.field.wrap(position), Vec2::ZERO, g.radius))
        .add(GravityWell {
            mass: g.initial_mass,
            critical_mass: g.critical_mass,
            reach: g.reach,
            core_radius: g.core_radius,
            strength: g.strength,
            potential_strength: g.potential_strength,
            accretion_radius: g.accretion_radius,
            consume_radius_max: g.consume_radius_max,
            ergosphere_radius: g.ergosphere_radius,
            ergosphere_torque: g.ergosphere_torque,
            collapse_radius: g.collapse_radius,
            collapse_impulse: g.collapse_impulse,
            collapsed: false,
        })
        .add(visual(VisualEffect::Well, WELL_PALETTE));
    let entity = ctx.store.spawn(EntityKind::GravityWell, &mut b);
    debug!(?entity, x = position.x, y = position.y, "gravity well spawned");
    entity
}

/// Disruptor field projected by `owner` and disposed with it.
pub fn disruptor_field(ctx: &mut SimContext, owner: Entity) -> Option<Entity> {
    let owner_body = ctx.store.get::<Body>(owner).filter(|b| !b.dead)?;
    let d = &ctx.settings.disruptor;
    let mut b = EntityBuilder::new();
    b.add(body(owner_body.position, owner_body.velocity, d.reach))
        .add(Disruptor {
            reach: d.reach,
            damping: d.damping,
            shield_push: d.shield_push,
            potential_strength: d.potential_strength,
        })
        .add(Attached {
            parent: owner,
            offset: Vec2::ZERO,
            orbit_speed: 0.0,
        });
    let entity = ctx.store.spawn(EntityKind::DisruptorField, &mut b);
    ctx.store.adopt(owner, entity);
    Some(entity)
}

/// Visual helper following `parent`. Starts at scale 0; the owning ability
/// drives the scale.
pub fn effect(ctx: &mut SimContext, parent: Entity, effect: VisualEffect) -> Option<Entity> {
    let parent_body = ctx.store.get::<Body>(parent).filter(|b| !b.dead)?;
    let palette = ctx
        .store
        .get::<Visual>(parent)
        .map_or(BULLET_PALETTE, |v| v.palette);
    let mut b = EntityBuilder::new();
    b.add(body(parent_body.position, parent_body.velocity, parent_body.radius))
        .add(Attached {
            parent,
            offset: Vec2::ZERO,
            orbit_speed: 0.0,
        })
        .add(Visual {
            effect,
            scale: 0.0,
            rotation: 0.0,
            palette,
        });
    let entity = ctx.store.spawn(EntityKind::Effect, &mut b);
    ctx.store.adopt(parent, entity);
    Some(entity)
}

/// Debris burst left behind by a destroyed entity.
pub fn explosion(ctx: &mut SimContext, position: Vec2, velocity: Vec2, particles: u32) {
    burst(ctx, position, velocity * 0.5, particles, VisualEffect::Spark);
}

/// Start position for `player` out of `players`, spread on a ring around
/// the field center.
pub fn spawn_point(field: &Field, player: usize, players: usize) -> Vec2 {
    if players <= 1 {
        return field.center();
    }
    let angle = std::f64::consts::TAU * player as f64 / players as f64;
    let ring = field.width().min(field.height()) * 0.25;
    field.wrap(field.center() + heading(angle) * ring)
}
