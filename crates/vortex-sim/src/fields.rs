//! Force field laws.
//!
//! Each field kind implements [`ForceField`]: a hand-tuned `force` falloff
//! (not inverse-square), a potential contribution used for time dilation,
//! and `apply`, which turns the law into an impulse on one target. All
//! displacements go through the toroidal [`Field`].

use vortex_core::components::{Disruptor, GravityWell};
use vortex_core::constants::DISTANCE_EPSILON;
use vortex_core::enums::EntityKind;
use vortex_core::field::Field;
use vortex_core::types::Vec2;

/// Upper bound on a single field's potential contribution, keeping every
/// potential strictly positive.
const MAX_POTENTIAL_CONTRIBUTION: f64 = 0.95;

/// The slice of a target entity a field may read and push.
#[derive(Debug, Clone, Copy)]
pub struct FieldTarget {
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    pub angular_velocity: f64,
    /// An active shield ability.
    pub shielded: bool,
    /// The entity projecting this field.
    pub is_source: bool,
}

pub trait ForceField {
    fn reach(&self) -> f64;

    /// Signed impulse magnitude toward the field center for a body of
    /// `mass` at `distance`. Negative pushes outward.
    fn force(&self, mass: f64, distance: f64) -> f64;

    /// Fraction in [0, 1) by which the field reduces potential at `distance`.
    fn potential(&self, distance: f64) -> f64;

    /// Accumulate this field's impulse into `target`.
    fn apply(&self, field: &Field, origin: Vec2, target: &mut FieldTarget) {
        pull(self, field, origin, target);
    }
}

/// Default application: impulse along the wraparound delta.
pub fn pull<F: ForceField + ?Sized>(law: &F, field: &Field, origin: Vec2, target: &mut FieldTarget) {
    let delta = field.delta(target.position, origin);
    let distance = delta.length() + DISTANCE_EPSILON;
    if distance >= law.reach() {
        return;
    }
    let f = law.force(target.mass, distance);
    target.velocity += delta / distance * f;
}

/// Multiplicative potential factor for one field at `distance`.
pub fn potential_factor<F: ForceField + ?Sized>(law: &F, distance: f64) -> f64 {
    1.0 - law.potential(distance).clamp(0.0, MAX_POTENTIAL_CONTRIBUTION)
}

fn falloff(distance: f64, reach: f64) -> f64 {
    if distance >= reach {
        0.0
    } else {
        1.0 - distance / reach
    }
}

impl ForceField for GravityWell {
    fn reach(&self) -> f64 {
        self.reach
    }

    fn force(&self, mass: f64, distance: f64) -> f64 {
        let f = falloff(distance, self.reach);
        self.strength * self.mass * f * f / ((1.0 + distance / self.core_radius) * mass.max(0.1).sqrt())
    }

    fn potential(&self, distance: f64) -> f64 {
        let f = falloff(distance, self.reach);
        self.potential_strength * f * f
    }

    fn apply(&self, field: &Field, origin: Vec2, target: &mut FieldTarget) {
        pull(self, field, origin, target);

        if !target.kind.is_ship() {
            return;
        }
        // Ergosphere: spin ships by their angle of incidence to the well.
        let delta = field.delta(target.position, origin);
        let distance = delta.length() + DISTANCE_EPSILON;
        if distance >= self.ergosphere_radius || target.velocity.length_squared() < 1e-12 {
            return;
        }
        let radial = delta / distance;
        let incidence = radial.perp_dot(target.velocity).atan2(radial.dot(target.velocity));
        target.angular_velocity +=
            self.ergosphere_torque * incidence * falloff(distance, self.ergosphere_radius);
    }
}

impl ForceField for Disruptor {
    fn reach(&self) -> f64 {
        self.reach
    }

    fn force(&self, mass: f64, distance: f64) -> f64 {
        -self.shield_push * falloff(distance, self.reach) / mass.max(0.1).sqrt()
    }

    fn potential(&self, distance: f64) -> f64 {
        self.potential_strength * falloff(distance, self.reach)
    }

    fn apply(&self, field: &Field, origin: Vec2, target: &mut FieldTarget) {
        if target.is_source {
            return;
        }
        if target.shielded {
            // Shields are shoved out instead of slowed.
            pull(self, field, origin, target);
            return;
        }
        if !matches!(
            target.kind,
            EntityKind::Bullet | EntityKind::Ufo | EntityKind::Rocket | EntityKind::Asteroid
        ) {
            return;
        }
        let distance = field.distance(target.position, origin) + DISTANCE_EPSILON;
        let damping = self.damping * falloff(distance, self.reach);
        target.velocity *= 1.0 - damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortex_core::settings::Settings;

    fn well() -> GravityWell {
        let g = Settings::default().gravity_well;
        GravityWell {
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
        }
    }

    fn target(kind: EntityKind, position: Vec2, velocity: Vec2) -> FieldTarget {
        FieldTarget {
            kind,
            position,
            velocity,
            mass: 1.0,
            angular_velocity: 0.0,
            shielded: false,
            is_source: false,
        }
    }

    #[test]
    fn well_force_falls_off_and_vanishes_at_reach() {
        let w = well();
        assert!(w.force(1.0, 10.0) > w.force(1.0, 100.0));
        assert!(w.force(1.0, 100.0) > 0.0);
        assert_eq!(w.force(1.0, w.reach), 0.0);
        assert!(w.force(0.1, 50.0) > w.force(4.0, 50.0));
    }

    #[test]
    fn well_pulls_across_the_seam() {
        let f = Field::new(800.0, 600.0);
        let w = well();
        let mut t = target(EntityKind::Asteroid, Vec2::new(790.0, 300.0), Vec2::ZERO);
        w.apply(&f, Vec2::new(20.0, 300.0), &mut t);
        assert!(t.velocity.x > 0.0, "{:?}", t.velocity);
        assert!(t.velocity.y.abs() < 1e-12);
    }

    #[test]
    fn ergosphere_spins_only_ships() {
        let f = Field::new(800.0, 600.0);
        let w = well();
        let origin = Vec2::new(400.0, 300.0);
        let mut ship = target(EntityKind::Rocket, Vec2::new(350.0, 300.0), Vec2::new(0.0, 2.0));
        let mut rock = target(EntityKind::Asteroid, Vec2::new(350.0, 300.0), Vec2::new(0.0, 2.0));
        w.apply(&f, origin, &mut ship);
        w.apply(&f, origin, &mut rock);
        assert!(ship.angular_velocity.abs() > 0.0);
        assert_eq!(rock.angular_velocity, 0.0);
    }

    #[test]
    fn potential_factor_stays_positive() {
        let mut w = well();
        w.potential_strength = 1.0;
        let p = potential_factor(&w, 0.0);
        assert!(p > 0.0 && p < 1.0);
        assert_eq!(potential_factor(&w, w.reach + 1.0), 1.0);
    }

    #[test]
    fn disruptor_damps_but_spares_source_and_pushes_shields() {
        let f = Field::new(800.0, 600.0);
        let d = Disruptor {
            reach: 150.0,
            damping: 0.1,
            shield_push: 0.05,
            potential_strength: 0.3,
        };
        let origin = Vec2::new(400.0, 300.0);

        let mut bullet = target(EntityKind::Bullet, Vec2::new(430.0, 300.0), Vec2::new(5.0, 0.0));
        d.apply(&f, origin, &mut bullet);
        assert!(bullet.velocity.x < 5.0 && bullet.velocity.x > 4.0);

        let mut owner = target(EntityKind::Rocket, origin, Vec2::new(3.0, 0.0));
        owner.is_source = true;
        d.apply(&f, origin, &mut owner);
        assert_eq!(owner.velocity, Vec2::new(3.0, 0.0));

        let mut shielded = target(EntityKind::Ufo, Vec2::new(430.0, 300.0), Vec2::ZERO);
        shielded.shielded = true;
        d.apply(&f, origin, &mut shielded);
        assert!(shielded.velocity.x > 0.0, "pushed away from the center");
    }
}
