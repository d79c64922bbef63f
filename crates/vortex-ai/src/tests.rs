use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vortex_core::components::Mover;
use vortex_core::enums::{AsteroidKind, UfoClass, UfoPhase};
use vortex_core::types::Vec2;

use crate::fsm::{evaluate, UfoContext, UfoTuning};
use crate::mover::{steer, MoverContext};
use crate::profiles::{asteroid_profile, pick_mover, pick_single_class, ufo_profile};

fn tuning() -> UfoTuning {
    UfoTuning {
        speed: 2.0,
        acquire_range: 400.0,
        strafe_range: 200.0,
        strafe_ticks: 100,
        retreat_ticks: 50,
    }
}

fn ctx(phase: UfoPhase, to_target: Option<Vec2>) -> UfoContext {
    UfoContext {
        class: UfoClass::Fighter,
        phase,
        phase_ticks: 0,
        velocity: Vec2::ZERO,
        to_target,
        aggressive: false,
        wander_heading: 0.0,
        tuning: tuning(),
    }
}

// ---- Profiles ----

#[test]
fn test_child_ratios_shrink() {
    for kind in [
        AsteroidKind::Rock,
        AsteroidKind::Ice,
        AsteroidKind::Iron,
        AsteroidKind::Planetoid,
    ] {
        let p = asteroid_profile(kind);
        assert!(p.child_ratio > 0.0 && p.child_ratio < 1.0, "{kind:?}");
        assert!(p.radius_scale > 0.0 && p.mass_scale > 0.0);
    }
}

#[test]
fn test_only_ice_erodes() {
    assert!(asteroid_profile(AsteroidKind::Ice).erosion > 0.0);
    assert_eq!(asteroid_profile(AsteroidKind::Rock).erosion, 0.0);
    assert_eq!(asteroid_profile(AsteroidKind::Planetoid).erosion, 0.0);
}

#[test]
fn test_pick_mover_is_seeded() {
    let mut a = ChaCha8Rng::seed_from_u64(5);
    let mut b = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..20 {
        assert_eq!(
            pick_mover(AsteroidKind::Rock, &mut a),
            pick_mover(AsteroidKind::Rock, &mut b)
        );
    }
}

#[test]
fn test_single_spawns_are_never_swarmers() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..200 {
        assert_ne!(pick_single_class(&mut rng), UfoClass::Swarmer);
    }
}

// ---- Movers ----

#[test]
fn test_drift_keeps_velocity() {
    let c = MoverContext {
        velocity: Vec2::new(1.0, 0.5),
        age_ticks: 10,
        to_target: None,
    };
    assert_eq!(steer(&Mover::Drift, &c), Vec2::new(1.0, 0.5));
}

#[test]
fn test_spiral_preserves_speed() {
    let c = MoverContext {
        velocity: Vec2::new(1.0, 0.0),
        age_ticks: 0,
        to_target: None,
    };
    let v = steer(&Mover::Spiral { turn_rate: 0.1 }, &c);
    assert!((v.length() - 1.0).abs() < 1e-12);
    assert!(v.y > 0.0);
}

#[test]
fn test_wobble_heading_stays_bounded() {
    let mover = Mover::Wobble {
        amplitude: 0.3,
        period_ticks: 120.0,
    };
    let mut v = Vec2::new(1.0, 0.0);
    for age in 0..600 {
        v = steer(
            &mover,
            &MoverContext {
                velocity: v,
                age_ticks: age,
                to_target: None,
            },
        );
        let heading = v.y.atan2(v.x);
        assert!(heading.abs() < 0.35, "heading {heading} at {age}");
    }
}

#[test]
fn test_homing_capped() {
    let mover = Mover::Homing {
        strength: 0.5,
        max_speed: 1.5,
    };
    let mut v = Vec2::ZERO;
    for _ in 0..20 {
        v = steer(
            &mover,
            &MoverContext {
                velocity: v,
                age_ticks: 0,
                to_target: Some(Vec2::new(100.0, 0.0)),
            },
        );
    }
    assert!((v.length() - 1.5).abs() < 1e-9);
    assert!(v.x > 0.0);
}

// ---- FSM ----

#[test]
fn test_no_target_wanders() {
    let update = evaluate(&ctx(UfoPhase::Approach, None));
    assert_eq!(update.new_phase, UfoPhase::Approach);
    assert!(!update.fire);
    assert!(update.aim.is_none());
    assert!((update.desired_velocity.length() - 2.0).abs() < 1e-9);
}

#[test]
fn test_target_beyond_acquire_range_ignored_when_calm() {
    let update = evaluate(&ctx(UfoPhase::Approach, Some(Vec2::new(600.0, 0.0))));
    assert!(update.aim.is_none());

    let mut aggressive = ctx(UfoPhase::Approach, Some(Vec2::new(600.0, 0.0)));
    aggressive.aggressive = true;
    let update = evaluate(&aggressive);
    assert!(update.aim.is_some());
    assert!(update.desired_velocity.x > 0.0);
}

#[test]
fn test_approach_to_strafe_to_retreat() {
    let to = Some(Vec2::new(150.0, 0.0));
    let update = evaluate(&ctx(UfoPhase::Approach, to));
    assert_eq!(update.new_phase, UfoPhase::Strafe);
    assert!(update.phase_changed);
    assert!(update.fire);
    // Fighters raise their shield while strafing.
    assert!(update.use_ability);

    let mut strafing = ctx(UfoPhase::Strafe, to);
    strafing.phase_ticks = 100;
    let update = evaluate(&strafing);
    assert_eq!(update.new_phase, UfoPhase::Retreat);
    assert!(update.desired_velocity.x < 0.0);

    let mut retreating = ctx(UfoPhase::Retreat, to);
    retreating.phase_ticks = 50;
    assert_eq!(evaluate(&retreating).new_phase, UfoPhase::Approach);
}

#[test]
fn test_swarmer_is_fastest() {
    assert!(
        ufo_profile(UfoClass::Swarmer).speed_factor > ufo_profile(UfoClass::Fighter).speed_factor
    );
}

#[test]
fn test_only_fighters_carry_high_energy_guns() {
    assert!(ufo_profile(UfoClass::Fighter).high_energy);
    assert!(!ufo_profile(UfoClass::Scout).high_energy);
    assert!(!ufo_profile(UfoClass::Swarmer).high_energy);
}
