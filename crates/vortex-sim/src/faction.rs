//! Faction spawners.
//!
//! The player side periodically reinforces each live rocket with support
//! satellites. The hostile side runs three independent UFO schedules
//! (singles, squadrons, swarms) whose intervals shorten while it is
//! aggressive. Aggression switches on once enough UFOs are lost and off again
//! after a calm spell without losses.

use hecs::Entity;
use rand::Rng;
use tracing::{debug, info};

use vortex_ai::profiles::pick_single_class;
use vortex_core::enums::{EntityKind, UfoClass};
use vortex_core::events::GameEvent;
use vortex_core::settings::FactionSettings;
use vortex_core::types::heading;

use crate::context::SimContext;
use crate::scheduler::Deferred;
use crate::spawn;

/// Delay between formation members entering the arena.
const FORMATION_STAGGER_TICKS: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerFaction {
    /// Ticks until the next reinforcement round.
    pub satellite_timer: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostileFaction {
    pub single_timer: u32,
    pub squadron_timer: u32,
    pub swarm_timer: u32,
    /// UFOs lost since the last calm spell.
    pub losses: u32,
    /// Ticks since the last loss.
    pub calm_ticks: u32,
    pub aggressive: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactionState {
    pub player: PlayerFaction,
    pub hostile: HostileFaction,
}

impl FactionState {
    pub fn new(s: &FactionSettings) -> Self {
        Self {
            player: PlayerFaction {
                satellite_timer: s.satellite_interval_ticks,
            },
            hostile: HostileFaction {
                single_timer: s.first_hostile_spawn_ticks,
                squadron_timer: s.squadron_interval_ticks,
                swarm_timer: s.swarm_interval_ticks,
                ..Default::default()
            },
        }
    }
}

/// Count a hostile loss toward aggression.
pub fn record_hostile_loss(ctx: &mut SimContext) {
    let threshold = ctx.settings.faction.aggression_loss_threshold;
    let hostile = &mut ctx.factions.hostile;
    hostile.losses += 1;
    hostile.calm_ticks = 0;
    if !hostile.aggressive && hostile.losses >= threshold {
        hostile.aggressive = true;
        let tick = ctx.tick();
        info!(tick, "hostile faction turned aggressive");
        ctx.emit(GameEvent::AggressionChanged {
            aggressive: true,
            tick,
        });
    }
}

pub fn run(ctx: &mut SimContext) {
    if !ctx.settings.faction.enabled || ctx.players.is_empty() {
        return;
    }
    run_player(ctx);
    run_hostile(ctx);
}

fn run_player(ctx: &mut SimContext) {
    let timer = &mut ctx.factions.player.satellite_timer;
    if *timer > 0 {
        *timer -= 1;
        return;
    }
    *timer = ctx.settings.faction.satellite_interval_ticks;

    let delay = ctx.settings.faction.satellite_delay_ticks;
    let now = ctx.tick();
    let rockets: Vec<Entity> = ctx.players.iter().filter_map(|p| p.rocket).collect();
    for owner in rockets {
        if ctx.store.is_dead(owner) || satellites_of(ctx, owner) >= ctx.settings.satellite.max_per_rocket {
            continue;
        }
        ctx.scheduler
            .schedule(now, delay, Deferred::SpawnSatellite { owner });
        debug!(?owner, delay, "satellite reinforcement scheduled");
    }
}

/// Live and pending satellites attached to `owner`.
pub fn satellites_of(ctx: &SimContext, owner: Entity) -> usize {
    ctx.store
        .children(owner)
        .into_iter()
        .filter(|&c| ctx.store.kind(c) == Some(EntityKind::Satellite) && !ctx.store.is_dead(c))
        .count()
}

fn run_hostile(ctx: &mut SimContext) {
    let s = ctx.settings.faction.clone();
    let now = ctx.tick();

    {
        let hostile = &mut ctx.factions.hostile;
        hostile.calm_ticks = hostile.calm_ticks.saturating_add(1);
    }
    if ctx.factions.hostile.calm_ticks >= s.aggression_calm_ticks {
        ctx.factions.hostile.losses = 0;
        if ctx.factions.hostile.aggressive {
            ctx.factions.hostile.aggressive = false;
            info!(tick = now, "hostile faction calmed down");
            ctx.emit(GameEvent::AggressionChanged {
                aggressive: false,
                tick: now,
            });
        }
    }

    let factor = if ctx.factions.hostile.aggressive {
        s.aggressive_interval_factor
    } else {
        1.0
    };
    let interval = |ticks: u32| ((ticks as f64 * factor).round() as u32).max(1);

    if countdown(&mut ctx.factions.hostile.single_timer, interval(s.ufo_single_interval_ticks)) {
        let class = pick_single_class(&mut ctx.rng);
        spawn_ufos(ctx, class, 1);
    }
    if countdown(&mut ctx.factions.hostile.squadron_timer, interval(s.squadron_interval_ticks)) {
        schedule_formation(ctx, UfoClass::Fighter, s.squadron_size);
    }
    if countdown(&mut ctx.factions.hostile.swarm_timer, interval(s.swarm_interval_ticks)) {
        schedule_formation(ctx, UfoClass::Swarmer, s.swarm_size);
    }
}

/// Decrement `timer`; on expiry reload it with `reset` and report true.
fn countdown(timer: &mut u32, reset: u32) -> bool {
    if *timer > 0 {
        *timer -= 1;
        return false;
    }
    *timer = reset;
    true
}

fn schedule_formation(ctx: &mut SimContext, class: UfoClass, size: u32) {
    let now = ctx.tick();
    for i in 0..size {
        ctx.scheduler.schedule(
            now,
            i * FORMATION_STAGGER_TICKS,
            Deferred::SpawnUfos { class, count: 1 },
        );
    }
    debug!(?class, size, "formation scheduled");
}

/// Spawn up to `count` UFOs at random edge points, heading inward, without
/// exceeding the live cap.
pub fn spawn_ufos(ctx: &mut SimContext, class: UfoClass, count: u32) {
    let cap = ctx.settings.ufo.max_live;
    let speed = ctx.settings.ufo.speed;
    for _ in 0..count {
        if ctx.store.count_active(EntityKind::Ufo) >= cap {
            debug!(?class, cap, "ufo cap reached");
            return;
        }
        let t = ctx.rng.gen_range(0.0..1.0);
        let position = ctx.field.edge_point(t);
        let inward = ctx.field.delta(position, ctx.field.center());
        let jitter = ctx.rng.gen_range(-0.4..0.4);
        let velocity = heading(inward.y.atan2(inward.x) + jitter) * speed;
        spawn::ufo(ctx, class, position, velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortex_core::settings::Settings;

    #[test]
    fn aggression_has_hysteresis() {
        let mut settings = Settings::default();
        settings.faction.aggression_loss_threshold = 2;
        settings.faction.aggression_calm_ticks = 5;
        let mut ctx = SimContext::new(settings, 1);
        ctx.players.push(Default::default());

        record_hostile_loss(&mut ctx);
        assert!(!ctx.factions.hostile.aggressive);
        record_hostile_loss(&mut ctx);
        assert!(ctx.factions.hostile.aggressive);

        for _ in 0..4 {
            run_hostile(&mut ctx);
        }
        assert!(ctx.factions.hostile.aggressive);
        run_hostile(&mut ctx);
        assert!(!ctx.factions.hostile.aggressive);
        assert_eq!(ctx.factions.hostile.losses, 0);

        let toggles = ctx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::AggressionChanged { .. }))
            .count();
        assert_eq!(toggles, 2);
    }

    #[test]
    fn ufo_cap_is_respected() {
        let mut settings = Settings::default();
        settings.ufo.max_live = 3;
        let mut ctx = SimContext::new(settings, 1);
        spawn_ufos(&mut ctx, UfoClass::Swarmer, 10);
        assert_eq!(ctx.store.count_active(EntityKind::Ufo), 3);
    }

    #[test]
    fn countdown_reloads_on_expiry() {
        let mut timer = 1;
        assert!(!countdown(&mut timer, 3));
        assert!(countdown(&mut timer, 3));
        assert_eq!(timer, 3);
    }
}
