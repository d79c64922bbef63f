//! Type-pair collision resolution and the damage helpers it shares with
//! other systems.

use hecs::Entity;
use rand::Rng;
use tracing::debug;

use vortex_core::components::*;
use vortex_core::constants::DISTANCE_EPSILON;
use vortex_core::enums::{AbilityKind, AsteroidKind, EntityKind, Faction, UfoClass, VisualEffect};
use vortex_core::events::GameEvent;
use vortex_core::types::{heading, Vec2};

use crate::ability::Ability;
use crate::context::SimContext;
use crate::faction;
use crate::links::{Attached, Owner};
use crate::scheduler::Deferred;
use crate::spawn;

/// Particles left by a destroyed ship.
const SHIP_DEBRIS: u32 = 12;

fn shielded(ctx: &SimContext, e: Entity) -> bool {
    ctx.store
        .get::<Ability>(e)
        .is_some_and(|a| a.kind == AbilityKind::Shield && a.machine.is_engaged())
}

fn player_of(ctx: &SimContext, e: Entity) -> Option<usize> {
    if let Some(pilot) = ctx.store.get::<Pilot>(e) {
        return Some(pilot.player);
    }
    // Satellites credit their owner.
    let parent = ctx.store.get::<Attached>(e)?.parent;
    ctx.store.get::<Pilot>(parent).map(|p| p.player)
}

fn award(ctx: &mut SimContext, player: Option<usize>, points: u64) {
    if let Some(slot) = player.and_then(|p| ctx.players.get_mut(p)) {
        slot.score += points;
    }
}

/// Unit normal from `from` toward `to`, falling back to +x when they coincide.
fn normal(ctx: &SimContext, from: Vec2, to: Vec2) -> Vec2 {
    let delta = ctx.field.delta(from, to);
    let len = delta.length();
    if len < DISTANCE_EPSILON {
        Vec2::X
    } else {
        delta / len
    }
}

/// Separate two overlapping bodies by exchanging their approach velocities
/// along the contact normal.
fn repel(ctx: &mut SimContext, a: Entity, b: Entity) {
    let (Some(ba), Some(bb)) = (ctx.store.get::<Body>(a), ctx.store.get::<Body>(b)) else {
        return;
    };
    let n = normal(ctx, ba.position, bb.position);
    let closing = (ba.velocity - bb.velocity).dot(n);
    if closing <= 0.0 {
        return;
    }
    ctx.store.update::<Body, _>(a, |body| body.velocity -= n * closing);
    ctx.store.update::<Body, _>(b, |body| body.velocity += n * closing);
}

/// An engaged shield absorbed a hit: costs ship energy instead of the hull.
pub fn shield_hit(ctx: &mut SimContext, ship: Entity, cost: f64) {
    let energy_left = ctx
        .store
        .update::<Ship, _>(ship, |s| {
            s.energy = (s.energy - cost).max(0.0);
            s.energy
        })
        .unwrap_or(0.0);
    let player = player_of(ctx, ship);
    let tick = ctx.tick();
    ctx.emit(GameEvent::ShieldHit {
        player,
        energy_left,
        tick,
    });
}

/// Drain the kinetic shield by `amount` if it holds more than that.
fn absorb_kinetic(ctx: &mut SimContext, ship: Entity, amount: f64) -> bool {
    let Some(ks) = ctx.store.get::<KineticShield>(ship) else {
        return false;
    };
    if ks.energy <= amount {
        return false;
    }
    let energy_left = ks.energy - amount;
    ctx.store
        .update::<KineticShield, _>(ship, |k| k.energy = energy_left);
    let player = player_of(ctx, ship);
    let tick = ctx.tick();
    ctx.emit(GameEvent::KineticShieldAbsorbed {
        player,
        amount,
        energy_left,
        tick,
    });
    true
}

/// Kill a rocket, UFO or satellite with its events, scoring and lives.
pub fn destroy_ship(ctx: &mut SimContext, ship: Entity, by: Option<Entity>) {
    let Some(body) = ctx.store.get::<Body>(ship) else {
        return;
    };
    let kind = ctx.store.kind(ship);
    if !ctx.store.kill(ship) {
        return;
    }
    spawn::explosion(ctx, body.position, body.velocity, SHIP_DEBRIS);
    let tick = ctx.tick();
    let by_player = by.and_then(|e| player_of(ctx, e));

    match kind {
        Some(EntityKind::Rocket) => {
            let player = ctx.store.get::<Pilot>(ship).map(|p| p.player);
            ctx.emit(GameEvent::RocketDestroyed { player, tick });
            if let Some(player) = player {
                lose_life(ctx, player);
            }
        }
        Some(EntityKind::Ufo) => {
            let class = ctx
                .store
                .get::<UfoBrain>(ship)
                .map_or(UfoClass::Scout, |b| b.class);
            let points = ctx.store.get::<Score>(ship).map_or(0, |s| s.points);
            award(ctx, by_player, points);
            ctx.emit(GameEvent::UfoDestroyed {
                class,
                by_player,
                tick,
            });
            faction::record_hostile_loss(ctx);
        }
        Some(EntityKind::Satellite) => {
            ctx.emit(GameEvent::SatelliteDestroyed { tick });
        }
        _ => {}
    }
}

fn lose_life(ctx: &mut SimContext, player: usize) {
    let delay = ctx.settings.rocket.respawn_delay_ticks;
    let now = ctx.tick();
    let Some(slot) = ctx.players.get_mut(player) else {
        return;
    };
    slot.rocket = None;
    slot.lives = slot.lives.saturating_sub(1);
    if slot.lives > 0 {
        ctx.scheduler
            .schedule(now, delay, Deferred::RespawnPlayer { player });
        debug!(player, delay, "respawn scheduled");
    } else if !slot.out_of_lives {
        slot.out_of_lives = true;
        ctx.emit(GameEvent::PlayerOutOfLives { player, tick: now });
    }
}

/// Register one hit on an asteroid. Splits when `decisive` or once the hit
/// counter exceeds the kind's maximum; otherwise erodes. Returns the
/// children created.
pub fn hit_asteroid(
    ctx: &mut SimContext,
    asteroid: Entity,
    by: Option<Entity>,
    decisive: bool,
) -> Vec<Entity> {
    if ctx.store.is_dead(asteroid) {
        return Vec::new();
    }
    let Some(state) = ctx.store.update::<Asteroid, _>(asteroid, |a| {
        a.hits += 1;
        *a
    }) else {
        return Vec::new();
    };
    if decisive || state.hits > state.hits_max {
        return split_asteroid(ctx, asteroid, by);
    }

    if state.erosion > 0.0 {
        let keep = 1.0 - state.erosion;
        ctx.store.update::<Asteroid, _>(asteroid, |a| a.size *= keep);
        ctx.store.update::<Body, _>(asteroid, |b| b.radius *= keep);
        ctx.store.update::<Motion, _>(asteroid, |m| m.mass *= keep);
    }
    if let Some(body) = ctx.store.get::<Body>(asteroid) {
        spawn::burst(ctx, body.position, body.velocity, 2, VisualEffect::Debris);
    }
    Vec::new()
}

/// Replace an asteroid with `splits` children of `child_ratio × size`.
/// The parent dies in the same tick; children join at the next maintenance.
fn split_asteroid(ctx: &mut SimContext, asteroid: Entity, by: Option<Entity>) -> Vec<Entity> {
    let (Some(body), Some(state)) = (ctx.store.get::<Body>(asteroid), ctx.store.get::<Asteroid>(asteroid))
    else {
        return Vec::new();
    };
    if !ctx.store.kill(asteroid) {
        return Vec::new();
    }
    let tick = ctx.tick();
    let palette = ctx.store.get::<Visual>(asteroid).map_or(0, |v| v.palette);
    let points = ctx.store.get::<Score>(asteroid).map_or(0, |s| s.points);
    let player = by.and_then(|e| player_of(ctx, e));
    award(ctx, player, points);

    let split_speed = ctx.settings.asteroid.split_speed;
    let child_size = state.size * state.child_ratio;
    let base = ctx.rng.gen_range(0.0..std::f64::consts::TAU);
    let mut children = Vec::with_capacity(state.splits as usize);
    for i in 0..state.splits {
        let angle = base + std::f64::consts::TAU * i as f64 / state.splits as f64;
        let dir = heading(angle);
        let position = body.position + dir * body.radius * 0.5;
        let velocity = body.velocity + dir * split_speed;
        children.push(spawn::asteroid(
            ctx,
            state.kind,
            child_size,
            position,
            velocity,
            palette,
        ));
    }

    if children.is_empty() {
        ctx.emit(GameEvent::AsteroidDestroyed {
            kind: state.kind,
            tick,
        });
    } else {
        ctx.emit(GameEvent::AsteroidSplit {
            kind: state.kind,
            size: state.size,
            children: state.splits,
            tick,
        });
    }
    if state.kind == AsteroidKind::Planetoid {
        ctx.emit(GameEvent::PlanetoidDestroyed { tick });
    }
    let burst = ctx.settings.particle.burst;
    spawn::burst(ctx, body.position, body.velocity, burst, VisualEffect::Debris);
    children
}

/// Rocket↔Rocket and Rocket↔UFO: shields absorb, otherwise both die.
pub fn ship_ship(ctx: &mut SimContext, a: Entity, b: Entity) {
    let (sa, sb) = (shielded(ctx, a), shielded(ctx, b));
    if sa || sb {
        let cost = ctx.settings.abilities.shield_hit_cost;
        if sa {
            shield_hit(ctx, a, cost);
        }
        if sb {
            shield_hit(ctx, b, cost);
        }
        repel(ctx, a, b);
        return;
    }
    destroy_ship(ctx, a, Some(b));
    destroy_ship(ctx, b, Some(a));
}

/// The kinetic shield absorbs the impact when it holds more than
/// `size × impact_per_size`; the rocket is nudged away and the asteroid
/// splits. Otherwise the rocket dies.
pub fn rocket_asteroid(ctx: &mut SimContext, rocket: Entity, asteroid: Entity) {
    if shielded(ctx, rocket) {
        let cost = ctx.settings.abilities.shield_hit_cost;
        shield_hit(ctx, rocket, cost);
        repel(ctx, rocket, asteroid);
        hit_asteroid(ctx, asteroid, Some(rocket), false);
        return;
    }
    let Some(state) = ctx.store.get::<Asteroid>(asteroid) else {
        return;
    };
    let impact = state.size * ctx.settings.asteroid.impact_per_size;
    if absorb_kinetic(ctx, rocket, impact) {
        if let (Some(rb), Some(ab)) = (ctx.store.get::<Body>(rocket), ctx.store.get::<Body>(asteroid)) {
            let away = normal(ctx, ab.position, rb.position);
            let nudge = ctx.settings.rocket.kinetic_shield_nudge * state.size;
            let spin = ctx.settings.rocket.kinetic_shield_spin * state.size;
            let side = away.perp_dot(rb.velocity - ab.velocity).signum();
            ctx.store
                .update::<Body, _>(rocket, |b| b.velocity += away * nudge);
            ctx.store
                .update::<Motion, _>(rocket, |m| m.angular_velocity += spin * side);
        }
        hit_asteroid(ctx, asteroid, Some(rocket), true);
        return;
    }
    destroy_ship(ctx, rocket, None);
    hit_asteroid(ctx, asteroid, Some(rocket), true);
}

pub fn ufo_asteroid(ctx: &mut SimContext, ufo: Entity, asteroid: Entity) {
    if shielded(ctx, ufo) {
        let cost = ctx.settings.abilities.shield_hit_cost;
        shield_hit(ctx, ufo, cost);
        repel(ctx, ufo, asteroid);
        return;
    }
    destroy_ship(ctx, ufo, None);
    hit_asteroid(ctx, asteroid, None, true);
}

pub fn satellite_asteroid(ctx: &mut SimContext, satellite: Entity, asteroid: Entity) {
    destroy_ship(ctx, satellite, None);
    hit_asteroid(ctx, asteroid, Some(satellite), true);
}

/// Bullet against any damageable target.
pub fn bullet_hit(ctx: &mut SimContext, bullet: Entity, target: Entity) {
    let (Some(shot), Some(owner)) = (ctx.store.get::<Bullet>(bullet), ctx.store.get::<Owner>(bullet))
    else {
        return;
    };
    if owner.0 == target || shot.bounce_lock > 0 {
        return;
    }
    let kind = ctx.store.kind(target);
    let friendly = match (shot.faction, kind) {
        (Faction::Hostile, Some(EntityKind::Ufo)) => true,
        (Faction::Player, Some(EntityKind::Satellite)) => true,
        (_, Some(EntityKind::Rocket)) => shot.support,
        _ => false,
    };
    if friendly {
        return;
    }

    if shielded(ctx, target) {
        bounce(ctx, bullet, target);
        return;
    }

    match kind {
        Some(EntityKind::Asteroid) => {
            hit_asteroid(ctx, target, Some(owner.0), false);
        }
        Some(EntityKind::Rocket | EntityKind::Ufo | EntityKind::Satellite) => {
            if !absorb_kinetic(ctx, target, shot.damage) {
                destroy_ship(ctx, target, Some(owner.0));
            }
        }
        _ => {}
    }

    if shot.high_energy {
        ctx.store
            .update::<Bullet, _>(bullet, |b| b.high_energy = false);
    } else {
        ctx.store.kill(bullet);
    }
}

/// Reflect a bullet off an engaged shield. The bullet changes sides and
/// gets a fresh range; the lock keeps it from bouncing again while it is
/// still inside the bubble.
fn bounce(ctx: &mut SimContext, bullet: Entity, ship: Entity) {
    let (Some(bb), Some(sb)) = (ctx.store.get::<Body>(bullet), ctx.store.get::<Body>(ship)) else {
        return;
    };
    let n = normal(ctx, sb.position, bb.position);
    let relative = bb.velocity - sb.velocity;
    let approach = relative.dot(n);
    let velocity = if approach < 0.0 {
        bb.velocity - n * 2.0 * approach
    } else {
        bb.velocity
    };
    let faction = ctx.store.get::<Faction>(ship).unwrap_or_default();
    let lock = ctx.settings.bullet.bounce_lock_ticks;

    ctx.store.update::<Body, _>(bullet, |b| b.velocity = velocity);
    ctx.store.update::<Bullet, _>(bullet, |b| {
        b.range = b.range_max;
        b.bounce_lock = lock;
        b.faction = faction;
    });
    ctx.store.set(bullet, Owner(ship));
    ctx.store.set(bullet, faction);

    let cost = ctx.settings.abilities.shield_hit_cost;
    shield_hit(ctx, ship, cost);
    let tick = ctx.tick();
    ctx.emit(GameEvent::BulletBounced { tick });
}
