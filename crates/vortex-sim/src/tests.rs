//! Tests for the simulation engine, entity store lifecycle, abilities,
//! collisions and gravity wells.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use vortex_core::commands::HostCommand;
use vortex_core::components::*;
use vortex_core::enums::*;
use vortex_core::events::GameEvent;
use vortex_core::input::InputState;
use vortex_core::settings::{AbilityTuning, Settings};
use vortex_core::types::Vec2;

use crate::ability::{AbilityEvent, AbilityMachine};
use crate::context::SimContext;
use crate::engine::{SimConfig, SimulationEngine};
use crate::spawn;
use crate::systems::collision::handlers;

fn engine(settings: Settings, seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig { seed, settings }).unwrap();
    engine.init();
    engine
}

fn sandbox() -> SimulationEngine {
    engine(Settings::sandbox(), 7)
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut a = engine(Settings::default(), 12345);
    let mut b = engine(Settings::default(), 12345);
    a.start(2);
    b.start(2);
    let input = InputState {
        thrust: true,
        fire: true,
        left: true,
        left_pressed_at: 0,
        ..Default::default()
    };
    for engine in [&mut a, &mut b] {
        engine.set_input(0, input);
    }

    for _ in 0..600 {
        let snap_a = a.tick();
        let snap_b = b.tick();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged with same seed");
    }
    assert_eq!(a.drain_events(), b.drain_events());
}

#[test]
fn test_determinism_different_seeds() {
    let mut a = engine(Settings::default(), 111);
    let mut b = engine(Settings::default(), 222);
    a.start(1);
    b.start(1);
    let mut diverged = false;
    for _ in 0..120 {
        let json_a = serde_json::to_string(&a.tick()).unwrap();
        let json_b = serde_json::to_string(&b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "different seeds should produce different asteroid fields");
}

// ---- Lifecycle ----

#[test]
fn test_invalid_settings_rejected() {
    let mut settings = Settings::default();
    settings.bullet.radius = -1.0;
    assert!(SimulationEngine::new(SimConfig { seed: 1, settings }).is_err());
}

#[test]
fn test_lifecycle_phases() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    assert_eq!(engine.phase(), GamePhase::Created);
    engine.start(1);
    assert_eq!(engine.phase(), GamePhase::Created, "start before init is ignored");
    engine.init();
    assert_eq!(engine.phase(), GamePhase::Ready);
    engine.start(1);
    assert_eq!(engine.phase(), GamePhase::Running);
    engine.stop();
    assert_eq!(engine.phase(), GamePhase::Stopped);
    engine.start(2);
    assert_eq!(engine.players().len(), 2);
    engine.dispose();
    assert_eq!(engine.phase(), GamePhase::Disposed);
    engine.do_loop();
    assert_eq!(engine.phase(), GamePhase::Disposed);
}

#[test]
fn test_sixty_ticks_one_second() {
    let mut engine = sandbox();
    engine.start(1);
    for _ in 0..60 {
        engine.do_loop();
    }
    assert_eq!(engine.time().tick, 60);
    assert!((engine.time().elapsed_secs - 1.0).abs() < 1e-9);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = sandbox();
    engine.start(1);
    engine.do_loop();
    engine.queue_command(HostCommand::Pause);
    for _ in 0..10 {
        engine.do_loop();
    }
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, 1);

    engine.queue_command(HostCommand::Resume);
    engine.do_loop();
    assert_eq!(engine.phase(), GamePhase::Running);
    assert_eq!(engine.time().tick, 2);
}

#[test]
fn test_stop_clears_everything() {
    let mut engine = engine(Settings::default(), 3);
    engine.start(2);
    for _ in 0..30 {
        engine.do_loop();
    }
    engine.stop();
    let ctx = engine.context();
    assert_eq!(ctx.store.live_count(), 0);
    assert_eq!(ctx.store.world().len(), 0);
    assert!(ctx.scheduler.is_empty());
    assert!(ctx.mission.is_none());
    assert!(engine.snapshot().entities.is_empty());
}

// ---- Entity store ----

#[test]
fn test_dead_entities_and_children_removed_next_tick() {
    let mut engine = sandbox();
    engine.start(1);
    let ctx = engine.context_mut();
    let rocket = ctx.players[0].rocket.unwrap();
    let satellite = spawn::satellite(ctx, rocket, 0.0).unwrap();
    let effect = spawn::effect(ctx, rocket, VisualEffect::KineticHalo).unwrap();
    engine.do_loop();
    assert_eq!(engine.context().store.live(EntityKind::Satellite), &[satellite]);

    engine.context_mut().store.kill(rocket);
    engine.do_loop();
    let store = &engine.context().store;
    for kind in EntityKind::ALL {
        assert!(!store.live(kind).contains(&rocket));
        assert!(!store.live(kind).contains(&satellite));
        assert!(!store.live(kind).contains(&effect));
    }
    assert!(!store.contains(satellite));
    assert!(!store.contains(effect));
}

#[test]
fn test_spawned_entities_join_at_maintenance() {
    let mut engine = sandbox();
    engine.start(0);
    let ctx = engine.context_mut();
    let rock = spawn::asteroid(ctx, AsteroidKind::Rock, 0.5, Vec2::new(100.0, 100.0), Vec2::ZERO, 0);
    assert!(engine.context().store.live(EntityKind::Asteroid).is_empty());
    engine.do_loop();
    assert_eq!(engine.context().store.live(EntityKind::Asteroid), &[rock]);
}

#[test]
fn test_entities_killed_in_tick_leave_live_lists_same_tick() {
    let mut engine = sandbox();
    engine.start(1);
    let ctx = engine.context_mut();
    let rocket = ctx.players[0].rocket.unwrap();
    let gun = ctx.store.get::<Gun>(rocket).unwrap();
    let bullet = spawn::bullet(ctx, rocket, Faction::Player, &gun, Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0));
    let rock = spawn::asteroid(ctx, AsteroidKind::Rock, 0.5, Vec2::new(104.0, 100.0), Vec2::ZERO, 0);
    ctx.store.update::<Asteroid, _>(rock, |a| a.mover = Mover::Drift);

    engine.do_loop();
    let store = &engine.context().store;
    assert!(!store.live(EntityKind::Bullet).contains(&bullet));
    assert!(!store.live(EntityKind::Asteroid).contains(&rock));
    assert!(!store.physical().contains(&bullet));
    assert!(!store.physical().contains(&rock));
    assert!(!store.contains(bullet));
    assert!(!store.contains(rock));
    // Split children are still queued for the next maintenance.
    let children = store.pending(EntityKind::Asteroid);
    assert_eq!(children.len(), 2);
    engine.do_loop();
    assert_eq!(engine.context().store.live(EntityKind::Asteroid).len(), 2);
}

// ---- Abilities ----

#[test]
fn test_ability_fuzz_stays_in_bounds_and_cycles() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for trigger in [TriggerMode::OnHold, TriggerMode::PressToggle] {
        for (activation_secs, passivation_secs) in [(0.1, 0.2), (0.0, 0.3), (0.25, 0.0)] {
            let tuning = AbilityTuning {
                activation_secs,
                passivation_secs,
                activation_cost: 5.0,
                drain_per_tick: 0.5,
                trigger,
            };
            let mut machine = AbilityMachine::new(&tuning, 10.0);
            let mut energy = 50.0;
            let mut events = Vec::new();

            for _ in 0..10_000 {
                if rng.gen_bool(0.1) {
                    machine.set_button(rng.gen_bool(0.5));
                }
                energy = f64::min(energy + rng.gen_range(0.0..0.6), 100.0);
                let time_scale = rng.gen_range(0.2..=1.0);

                let mut phase = machine.phase();
                events.clear();
                machine.tick(&mut energy, time_scale, &mut events);

                let a = machine.activation();
                assert!((0.0..=1.0).contains(&a), "activation {a} out of range");
                assert!(energy >= 0.0);
                for event in &events {
                    let next = match event {
                        AbilityEvent::ActivateStart => AbilityPhase::Activating,
                        AbilityEvent::ActivateEnd => AbilityPhase::On,
                        AbilityEvent::PassivateStart => AbilityPhase::Passivating,
                        AbilityEvent::PassivateEnd => AbilityPhase::Off,
                        AbilityEvent::ActiveTick | AbilityEvent::PassiveTick => continue,
                    };
                    assert_eq!(phase.successor(), next, "illegal transition from {phase:?}");
                    phase = next;
                }
                assert_eq!(phase, machine.phase());
                match machine.phase() {
                    AbilityPhase::Off => assert_eq!(a, 0.0),
                    AbilityPhase::On => assert_eq!(a, 1.0),
                    _ => {}
                }
            }
        }
    }
}

// ---- Asteroids ----

#[test]
fn test_split_grid() {
    for size in [1.0, 0.5, 0.25, 0.1] {
        for splits in [0u32, 2, 3, 4] {
            for hits_max in [0u32, 2] {
                let mut ctx = SimContext::new(Settings::sandbox(), 5);
                let rock = spawn::asteroid(&mut ctx, AsteroidKind::Rock, size, Vec2::new(300.0, 300.0), Vec2::ZERO, 0);
                ctx.store.update::<Asteroid, _>(rock, |a| {
                    a.splits = splits;
                    a.hits_max = hits_max;
                });
                ctx.store.maintain();
                let ratio = ctx.store.get::<Asteroid>(rock).unwrap().child_ratio;

                for _ in 0..hits_max {
                    assert!(handlers::hit_asteroid(&mut ctx, rock, None, false).is_empty());
                    assert!(!ctx.store.is_dead(rock));
                }
                let children = handlers::hit_asteroid(&mut ctx, rock, None, false);
                assert_eq!(children.len(), splits as usize, "size {size} splits {splits}");
                assert!(ctx.store.is_dead(rock));
                for child in children {
                    assert!(!ctx.store.is_dead(child));
                    let child_size = ctx.store.get::<Asteroid>(child).unwrap().size;
                    assert!((child_size - ratio * size).abs() < 1e-12);
                }
            }
        }
    }
}

#[test]
fn test_fast_bullet_hits_small_target_in_engine() {
    let mut engine = sandbox();
    engine.start(1);
    let ctx = engine.context_mut();
    let rocket = ctx.players[0].rocket.unwrap();
    let gun = ctx.store.get::<Gun>(rocket).unwrap();
    let bullet = spawn::bullet(ctx, rocket, Faction::Player, &gun, Vec2::new(100.0, 100.0), Vec2::new(40.0, 0.0));
    ctx.store.update::<Body, _>(bullet, |b| b.radius = 0.0);
    let target = spawn::asteroid(ctx, AsteroidKind::Rock, 0.5, Vec2::new(135.0, 100.0), Vec2::ZERO, 0);
    ctx.store.update::<Body, _>(target, |b| b.radius = 5.0);
    ctx.store.update::<Asteroid, _>(target, |a| a.mover = Mover::Drift);

    // Both join the live lists during the first tick.
    engine.do_loop();
    assert!(!engine.context().store.is_dead(target));

    // Next tick the bullet ends 5 px past the center; only the sweep sees it.
    engine.do_loop();
    assert!(engine.context().store.is_dead(target));
    assert!(engine.context().store.is_dead(bullet));
}

#[test]
fn test_high_energy_rocket_bullet_passes_through_one_asteroid() {
    let mut settings = Settings::sandbox();
    settings.rocket.high_energy_gun = true;
    let mut engine = engine(settings, 7);
    engine.start(1);
    let ctx = engine.context_mut();
    let rocket = ctx.players[0].rocket.unwrap();
    let gun = ctx.store.get::<Gun>(rocket).unwrap();
    assert!(gun.high_energy);
    let bullet = spawn::bullet(ctx, rocket, Faction::Player, &gun, Vec2::new(100.0, 100.0), Vec2::ZERO);
    let first = spawn::asteroid(ctx, AsteroidKind::Rock, 0.5, Vec2::new(100.0, 100.0), Vec2::ZERO, 0);
    let second = spawn::asteroid(ctx, AsteroidKind::Rock, 0.5, Vec2::new(110.0, 100.0), Vec2::ZERO, 0);
    ctx.store.maintain();

    handlers::bullet_hit(ctx, bullet, first);
    assert!(ctx.store.is_dead(first));
    assert!(!ctx.store.is_dead(bullet));
    handlers::bullet_hit(ctx, bullet, second);
    assert!(ctx.store.is_dead(second));
    assert!(ctx.store.is_dead(bullet));
}

#[test]
fn test_kinetic_shield_absorbs_asteroid() {
    let mut engine = sandbox();
    engine.start(1);
    let ctx = engine.context_mut();
    let rocket = ctx.players[0].rocket.unwrap();
    let at = ctx.store.get::<Body>(rocket).unwrap().position + Vec2::new(35.0, 0.0);
    let rock = spawn::asteroid(ctx, AsteroidKind::Rock, 0.6, at, Vec2::ZERO, 0);
    ctx.store.update::<Asteroid, _>(rock, |a| a.mover = Mover::Drift);
    let full = ctx.store.get::<KineticShield>(rocket).unwrap().energy_max;
    let impact = 0.6 * ctx.settings.asteroid.impact_per_size;

    engine.do_loop();

    let ctx = engine.context();
    assert!(!ctx.store.is_dead(rocket));
    let ks = ctx.store.get::<KineticShield>(rocket).unwrap();
    assert!((ks.energy - (full - impact)).abs() < 1e-9, "shield at {}", ks.energy);
    assert!(ctx.store.is_dead(rock));
    let children = ctx.store.pending(EntityKind::Asteroid);
    assert_eq!(children.len(), 2);
    for child in children {
        assert!(!ctx.store.is_dead(child));
        let size = ctx.store.get::<Asteroid>(child).unwrap().size;
        assert!((size - 0.3).abs() < 1e-9);
    }
    assert_eq!(
        count(&ctx.events, |e| matches!(e, GameEvent::KineticShieldAbsorbed { .. })),
        1
    );
    assert_eq!(
        count(&ctx.events, |e| matches!(e, GameEvent::AsteroidSplit { children: 2, .. })),
        1
    );
}

#[test]
fn test_rocket_dies_when_kinetic_shield_is_drained() {
    let mut engine = sandbox();
    engine.start(1);
    let ctx = engine.context_mut();
    let rocket = ctx.players[0].rocket.unwrap();
    ctx.store.update::<KineticShield, _>(rocket, |k| {
        k.energy = 0.0;
        k.regen = 0.0;
    });
    let at = ctx.store.get::<Body>(rocket).unwrap().position + Vec2::new(30.0, 0.0);
    spawn::asteroid(ctx, AsteroidKind::Rock, 0.6, at, Vec2::ZERO, 0);
    engine.do_loop();
    assert!(engine.context().store.is_dead(rocket));
    assert_eq!(engine.players()[0].lives, Settings::sandbox().rocket.lives - 1);
}

// ---- Gravity wells ----

#[test]
fn test_gravity_well_collapses_exactly_once() {
    let mut settings = Settings::sandbox();
    settings.gravity_well.initial_mass = 10.0;
    settings.gravity_well.critical_mass = 14.0;
    settings.particle.mass = 0.1;
    let mut engine = engine(settings, 9);
    engine.start(0);
    let ctx = engine.context_mut();
    let center = Vec2::new(400.0, 300.0);
    let well = spawn::gravity_well(ctx, center);
    for i in 0..40 {
        let angle = std::f64::consts::TAU * i as f64 / 40.0;
        let offset = Vec2::new(angle.cos(), angle.sin()) * 10.0;
        spawn::particle(ctx, center + offset, Vec2::ZERO, VisualEffect::Debris);
    }

    engine.do_loop();
    engine.do_loop();
    let collapses = |e: &GameEvent| matches!(e, GameEvent::GravityWellCollapsed { .. });
    assert_eq!(count(&engine.context().events, collapses), 1);
    assert!(engine.context().store.is_dead(well));

    for _ in 0..10 {
        engine.do_loop();
    }
    assert_eq!(count(&engine.context().events, collapses), 1);
    assert!(engine.context().store.live(EntityKind::GravityWell).is_empty());
}

#[test]
fn test_potential_drops_near_a_well() {
    let mut engine = sandbox();
    engine.start(0);
    let ctx = engine.context_mut();
    let center = Vec2::new(400.0, 300.0);
    spawn::gravity_well(ctx, center);
    let near = spawn::asteroid(ctx, AsteroidKind::Iron, 0.5, center + Vec2::new(60.0, 0.0), Vec2::ZERO, 0);
    let far = spawn::asteroid(ctx, AsteroidKind::Iron, 0.5, center + Vec2::new(0.0, -290.0), Vec2::ZERO, 0);
    engine.do_loop();
    engine.do_loop();
    let ctx = engine.context();
    let p_near = ctx.store.get::<Body>(near).unwrap().potential;
    let p_far = ctx.store.get::<Body>(far).unwrap().potential;
    assert!(p_near > 0.0 && p_near < 1.0);
    assert_eq!(p_far, 1.0);
}

// ---- Players ----

#[test]
fn test_respawn_after_delay() {
    let mut settings = Settings::sandbox();
    settings.rocket.respawn_delay_ticks = 5;
    let mut engine = engine(settings, 4);
    engine.start(1);
    let rocket = engine.players()[0].rocket.unwrap();
    handlers::destroy_ship(engine.context_mut(), rocket, None);
    for _ in 0..7 {
        engine.do_loop();
    }
    let events = engine.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::PlayerRespawned { player: 0, .. })),
        1
    );
    let new_rocket = engine.players()[0].rocket.unwrap();
    assert_ne!(new_rocket, rocket);
    assert!(!engine.context().store.is_dead(new_rocket));
}

#[test]
fn test_game_over_when_all_players_out() {
    let mut settings = Settings::sandbox();
    settings.rocket.lives = 1;
    let mut engine = engine(settings, 4);
    engine.start(1);
    let rocket = engine.players()[0].rocket.unwrap();
    handlers::destroy_ship(engine.context_mut(), rocket, None);
    engine.do_loop();
    assert_eq!(engine.phase(), GamePhase::GameOver);
    let events = engine.drain_events();
    assert_eq!(count(&events, |e| e.name() == "player out of lives"), 1);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::GameOver { .. })), 1);
    engine.do_loop();
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_turning_input_rotates_rocket() {
    let mut engine = sandbox();
    engine.start(1);
    let rocket = engine.players()[0].rocket.unwrap();
    let before = engine.context().store.get::<Motion>(rocket).unwrap().direction;
    engine.set_input(
        0,
        InputState {
            right: true,
            right_pressed_at: 0,
            ..Default::default()
        },
    );
    for _ in 0..10 {
        engine.do_loop();
    }
    let after = engine.context().store.get::<Motion>(rocket).unwrap().direction;
    assert!(after != before);
}

#[test]
fn test_thrust_moves_rocket() {
    let mut engine = sandbox();
    engine.start(1);
    let rocket = engine.players()[0].rocket.unwrap();
    engine.set_input(
        0,
        InputState {
            thrust: true,
            ..Default::default()
        },
    );
    for _ in 0..5 {
        engine.do_loop();
    }
    let body = engine.context().store.get::<Body>(rocket).unwrap();
    assert!(body.velocity.length() > 0.0);
}

// ---- Field ----

#[test]
fn test_resize_rewraps_on_next_tick() {
    let mut engine = sandbox();
    engine.start(0);
    let rock = spawn::asteroid(
        engine.context_mut(),
        AsteroidKind::Rock,
        0.5,
        Vec2::new(1000.0, 600.0),
        Vec2::ZERO,
        0,
    );
    engine
        .context_mut()
        .store
        .update::<Asteroid, _>(rock, |a| a.mover = Mover::Drift);
    engine.do_loop();
    engine.queue_command(HostCommand::Resize {
        width: 800.0,
        height: 500.0,
    });
    engine.do_loop();
    let p = engine.context().store.get::<Body>(rock).unwrap().position;
    assert!((p.x - 200.0).abs() < 1e-9 && (p.y - 100.0).abs() < 1e-9, "{p:?}");
}

#[test]
fn test_bad_resize_is_ignored() {
    let mut engine = sandbox();
    engine.start(0);
    let before = engine.context().field;
    engine.queue_command(HostCommand::Resize {
        width: -5.0,
        height: 100.0,
    });
    engine.do_loop();
    assert_eq!(engine.context().field, before);
}

// ---- Snapshot ----

#[test]
fn test_snapshot_reports_entities_and_players() {
    let mut engine = engine(Settings::default(), 21);
    engine.start(2);
    let snap = engine.tick();
    assert_eq!(snap.count(EntityKind::Rocket), 2);
    assert_eq!(snap.players.len(), 2);
    assert!(snap.players.iter().all(|p| p.alive));
    let mission = snap.mission.as_ref().expect("mission running");
    assert_eq!(mission.theme, MissionTheme::DebrisBelt);
    assert!(snap.count(EntityKind::Asteroid) > 0);
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.len() < 100_000);
}
