//! Missions: themed asteroid waves.
//!
//! A mission bundles an asteroid constructor, a palette and start/stop hooks.
//! While running it feeds asteroids in at random edge points until its quota
//! is spawned; once every asteroid is gone it reports itself cleared and asks
//! for the next mission.

use hecs::Entity;
use rand::Rng;
use tracing::info;

use vortex_core::enums::{AsteroidKind, EntityKind, MissionTheme};
use vortex_core::events::GameEvent;
use vortex_core::state::MissionView;

use crate::context::SimContext;
use crate::scheduler::Deferred;
use crate::spawn;
use crate::systems::force_fields;

/// Creates one asteroid for the mission with the given palette entry.
pub type AsteroidConstructor = fn(&mut SimContext, u32) -> Entity;
pub type MissionHook = fn(&mut SimContext);

pub struct Mission {
    pub theme: MissionTheme,
    pub name: &'static str,
    pub palette: [u32; 3],
    pub constructor: AsteroidConstructor,
    pub on_start: MissionHook,
    pub on_stop: MissionHook,
}

/// Wells a gravity storm opens on start.
const STORM_WELLS: usize = 2;

pub static CATALOG: [Mission; 4] = [
    Mission {
        theme: MissionTheme::DebrisBelt,
        name: "Debris Belt",
        palette: [0x8d6e63, 0xa1887f, 0x795548],
        constructor: debris_belt,
        on_start: no_hook,
        on_stop: no_hook,
    },
    Mission {
        theme: MissionTheme::IceField,
        name: "Ice Field",
        palette: [0xb3e5fc, 0x81d4fa, 0xe1f5fe],
        constructor: ice_field,
        on_start: no_hook,
        on_stop: no_hook,
    },
    Mission {
        theme: MissionTheme::PlanetoidRun,
        name: "Planetoid Run",
        palette: [0xffb74d, 0xff8a65, 0xa1887f],
        constructor: planetoid_run,
        on_start: no_hook,
        on_stop: no_hook,
    },
    Mission {
        theme: MissionTheme::GravityStorm,
        name: "Gravity Storm",
        palette: [0x9575cd, 0x7986cb, 0x90a4ae],
        constructor: gravity_storm,
        on_start: open_storm,
        on_stop: close_storm,
    },
];

/// Missions cycle through the catalog.
pub fn mission(index: usize) -> &'static Mission {
    &CATALOG[index % CATALOG.len()]
}

fn no_hook(_: &mut SimContext) {}

fn debris_belt(ctx: &mut SimContext, palette: u32) -> Entity {
    let kind = if ctx.rng.gen_bool(0.25) {
        AsteroidKind::Iron
    } else {
        AsteroidKind::Rock
    };
    let size = ctx.rng.gen_range(0.5..=1.0);
    spawn::asteroid_at_edge(ctx, kind, size, palette)
}

fn ice_field(ctx: &mut SimContext, palette: u32) -> Entity {
    let size = ctx.rng.gen_range(0.6..=1.0);
    spawn::asteroid_at_edge(ctx, AsteroidKind::Ice, size, palette)
}

fn planetoid_run(ctx: &mut SimContext, palette: u32) -> Entity {
    if ctx.rng.gen_bool(0.2) {
        spawn::asteroid_at_edge(ctx, AsteroidKind::Planetoid, 1.0, palette)
    } else {
        let size = ctx.rng.gen_range(0.4..=0.8);
        spawn::asteroid_at_edge(ctx, AsteroidKind::Rock, size, palette)
    }
}

fn gravity_storm(ctx: &mut SimContext, palette: u32) -> Entity {
    let kind = if ctx.rng.gen_bool(0.5) {
        AsteroidKind::Iron
    } else {
        AsteroidKind::Rock
    };
    let size = ctx.rng.gen_range(0.3..=0.7);
    spawn::asteroid_at_edge(ctx, kind, size, palette)
}

fn open_storm(ctx: &mut SimContext) {
    for _ in 0..STORM_WELLS {
        let x = ctx.rng.gen_range(0.2..0.8) * ctx.field.width();
        let y = ctx.rng.gen_range(0.2..0.8) * ctx.field.height();
        let well = spawn::gravity_well(ctx, vortex_core::types::Vec2::new(x, y));
        if let Some(state) = ctx.mission.as_mut() {
            state.wells.push(well);
        }
    }
}

fn close_storm(ctx: &mut SimContext) {
    let wells = ctx
        .mission
        .as_mut()
        .map(|m| std::mem::take(&mut m.wells))
        .unwrap_or_default();
    for well in wells {
        force_fields::force_collapse(ctx, well);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionState {
    pub index: usize,
    /// Asteroids the constructor has produced so far.
    pub spawned: u32,
    pub spawn_timer: u32,
    pub cleared: bool,
    /// Wells opened by the mission's start hook.
    pub wells: Vec<Entity>,
}

impl MissionState {
    pub fn mission(&self) -> &'static Mission {
        mission(self.index)
    }

    pub fn view(&self, quota: u32) -> MissionView {
        let m = self.mission();
        MissionView {
            index: self.index,
            theme: m.theme,
            name: m.name.to_string(),
            palette: m.palette,
            spawned: self.spawned,
            quota,
            cleared: self.cleared,
        }
    }
}

/// Begin mission `index`: run its start hook and seed the first asteroids.
pub fn start(ctx: &mut SimContext, index: usize) {
    let m = mission(index);
    ctx.mission = Some(MissionState {
        index,
        spawned: 0,
        spawn_timer: ctx.settings.mission.spawn_interval_ticks,
        cleared: false,
        wells: Vec::new(),
    });
    let tick = ctx.tick();
    info!(index, name = m.name, tick, "mission started");
    ctx.emit(GameEvent::MissionStarted {
        index,
        theme: m.theme,
        tick,
    });
    (m.on_start)(ctx);

    let initial = ctx
        .settings
        .mission
        .initial_asteroids
        .min(ctx.settings.mission.quota);
    for _ in 0..initial {
        spawn_one(ctx);
    }
}

/// End the current mission, if any, running its stop hook.
pub fn stop(ctx: &mut SimContext) {
    let Some(index) = ctx.mission.as_ref().map(|m| m.index) else {
        return;
    };
    let m = mission(index);
    (m.on_stop)(ctx);
    ctx.mission = None;
    let tick = ctx.tick();
    info!(index, name = m.name, tick, "mission stopped");
    ctx.emit(GameEvent::MissionStopped {
        index,
        theme: m.theme,
        tick,
    });
}

/// Stop the current mission and start the next one in the catalog.
pub fn advance(ctx: &mut SimContext) {
    let next = ctx.mission.as_ref().map_or(0, |m| m.index + 1);
    stop(ctx);
    start(ctx, next);
}

fn spawn_one(ctx: &mut SimContext) {
    let Some(index) = ctx.mission.as_ref().map(|m| m.index) else {
        return;
    };
    let m = mission(index);
    let palette = m.palette[ctx.rng.gen_range(0..m.palette.len())];
    (m.constructor)(ctx, palette);
    if let Some(state) = ctx.mission.as_mut() {
        state.spawned += 1;
    }
}

/// Mission spawner and cleared-check.
pub fn run(ctx: &mut SimContext) {
    if !ctx.settings.mission.enabled {
        return;
    }
    let Some((index, spawned, cleared)) = ctx
        .mission
        .as_ref()
        .map(|m| (m.index, m.spawned, m.cleared))
    else {
        return;
    };
    let s = &ctx.settings.mission;
    let (quota, interval, cap) = (s.quota, s.spawn_interval_ticks, s.max_live_asteroids);

    if spawned < quota {
        let due = ctx
            .mission
            .as_mut()
            .map(|m| {
                if m.spawn_timer > 0 {
                    m.spawn_timer -= 1;
                    false
                } else {
                    m.spawn_timer = interval;
                    true
                }
            })
            .unwrap_or(false);
        if due && ctx.store.count_active(EntityKind::Asteroid) < cap {
            spawn_one(ctx);
        }
        return;
    }

    if cleared || ctx.store.count_active(EntityKind::Asteroid) > 0 {
        return;
    }
    if let Some(m) = ctx.mission.as_mut() {
        m.cleared = true;
    }
    let tick = ctx.tick();
    info!(index, tick, "asteroids cleared");
    ctx.emit(GameEvent::AsteroidsCleared { index, tick });
    ctx.emit(GameEvent::NextMissionRequested { tick });
    if ctx.settings.mission.auto_advance {
        let delay = ctx.settings.mission.advance_delay_ticks;
        ctx.scheduler.schedule(tick, delay, Deferred::AdvanceMission);
    }
}
