//! Collision detection.
//!
//! Rules live in a table keyed by ordered kind pairs, decided at
//! registration. Every rule runs the exhaustive cross product of its two live
//! sets; populations are small, so there is no spatial partitioning. Fast
//! movers are swept through sub-steps to avoid tunneling.

pub mod handlers;

use hecs::Entity;
use tracing::debug;

use vortex_core::components::{Body, KineticShield};
use vortex_core::constants::FAST_MOVER_SPEED_SQ;
use vortex_core::enums::{AbilityKind, EntityKind};
use vortex_core::field::Field;

use crate::ability::Ability;
use crate::context::SimContext;

/// Resolution callback, receiving the pair in registration order.
pub type Handler = fn(&mut SimContext, Entity, Entity);

struct Rule {
    a: EntityKind,
    b: EntityKind,
    handler: Handler,
}

#[derive(Default)]
pub struct CollisionTable {
    rules: Vec<Rule>,
}

impl CollisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for `(a, b)`.
    ///
    /// # Panics
    /// If a rule for the pair already exists in either order.
    pub fn register(&mut self, a: EntityKind, b: EntityKind, handler: Handler) {
        let taken = self
            .rules
            .iter()
            .any(|r| (r.a == a && r.b == b) || (r.a == b && r.b == a));
        assert!(!taken, "collision pair {a:?}/{b:?} registered twice");
        self.rules.push(Rule { a, b, handler });
    }

    /// The arena's rule set.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(EntityKind::Rocket, EntityKind::Rocket, handlers::ship_ship);
        table.register(EntityKind::Rocket, EntityKind::Ufo, handlers::ship_ship);
        table.register(EntityKind::Rocket, EntityKind::Asteroid, handlers::rocket_asteroid);
        table.register(EntityKind::Ufo, EntityKind::Asteroid, handlers::ufo_asteroid);
        table.register(EntityKind::Satellite, EntityKind::Asteroid, handlers::satellite_asteroid);
        table.register(EntityKind::Bullet, EntityKind::Rocket, handlers::bullet_hit);
        table.register(EntityKind::Bullet, EntityKind::Ufo, handlers::bullet_hit);
        table.register(EntityKind::Bullet, EntityKind::Satellite, handlers::bullet_hit);
        table.register(EntityKind::Bullet, EntityKind::Asteroid, handlers::bullet_hit);
        debug!(rules = table.len(), "collision table built");
        table
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn run(&self, ctx: &mut SimContext) {
        for rule in &self.rules {
            let left: Vec<Entity> = ctx.store.live(rule.a).to_vec();
            let right: Vec<Entity> = ctx.store.live(rule.b).to_vec();
            let same = rule.a == rule.b;
            for (i, &a) in left.iter().enumerate() {
                let start = if same { i + 1 } else { 0 };
                for &b in &right[start.min(right.len())..] {
                    // Earlier resolutions may have killed either side.
                    if !interactive(ctx, a) {
                        break;
                    }
                    if !interactive(ctx, b) {
                        continue;
                    }
                    if touching(ctx, a, b) {
                        (rule.handler)(ctx, a, b);
                    }
                }
            }
        }
    }
}

fn interactive(ctx: &SimContext, e: Entity) -> bool {
    ctx.store
        .get::<Body>(e)
        .is_some_and(|b| !b.dead && !b.hyperspace)
}

fn touching(ctx: &SimContext, a: Entity, b: Entity) -> bool {
    let (Some(ba), Some(bb)) = (ctx.store.get::<Body>(a), ctx.store.get::<Body>(b)) else {
        return false;
    };
    let reach = effective_radius(ctx, a, &ba) + effective_radius(ctx, b, &bb);
    swept_hit(&ctx.field, &ba, &bb, reach)
}

/// Hit radius, widened by an engaged shield or the large kinetic shield.
pub fn effective_radius(ctx: &SimContext, e: Entity, body: &Body) -> f64 {
    let mut radius = body.radius;
    let shielded = ctx
        .store
        .get::<Ability>(e)
        .is_some_and(|a| a.kind == AbilityKind::Shield && a.machine.is_engaged());
    let kinetic = ctx.store.get::<KineticShield>(e);
    if shielded {
        radius *= ctx.settings.abilities.shield_radius_factor;
        if let Some(ks) = kinetic {
            radius = radius.max(ks.radius);
        }
    }
    if let Some(ks) = kinetic.filter(|ks| ks.large) {
        radius = radius.max(ks.large_radius);
    }
    radius
}

/// Whether two bodies came within `reach` of each other this tick.
///
/// Slow pairs test end positions only. When either body moved more than
/// `sqrt(FAST_MOVER_SPEED_SQ)` the tick's displacement is split into
/// `ceil(d² / FAST_MOVER_SPEED_SQ)` sub-steps, both bodies interpolated, and
/// the first overlapping sample wins.
pub fn swept_hit(field: &Field, a: &Body, b: &Body, reach: f64) -> bool {
    let reach_sq = reach * reach;
    let da = field.delta(a.prev_position, a.position);
    let db = field.delta(b.prev_position, b.position);
    let fastest = da.length_squared().max(db.length_squared());
    if fastest <= FAST_MOVER_SPEED_SQ {
        return field.distance_squared(a.position, b.position) < reach_sq;
    }
    let steps = (fastest / FAST_MOVER_SPEED_SQ).ceil() as u32;
    (1..=steps).any(|k| {
        let t = k as f64 / steps as f64;
        let pa = a.prev_position + da * t;
        let pb = b.prev_position + db * t;
        field.distance_squared(pa, pb) < reach_sq
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortex_core::types::Vec2;

    fn body(prev: Vec2, position: Vec2, radius: f64) -> Body {
        Body {
            position,
            prev_position: prev,
            velocity: position - prev,
            radius,
            hyperspace: false,
            dead: false,
            potential: 1.0,
        }
    }

    #[test]
    fn fast_bullet_does_not_tunnel() {
        let field = Field::new(800.0, 600.0);
        let bullet = body(Vec2::new(100.0, 300.0), Vec2::new(140.0, 300.0), 0.0);
        let target = body(Vec2::new(135.0, 300.0), Vec2::new(135.0, 300.0), 5.0);
        // End positions alone miss: 5 px apart, reach 5.
        assert!(field.distance_squared(bullet.position, target.position) >= 25.0);
        assert!(swept_hit(&field, &bullet, &target, 5.0));
    }

    #[test]
    fn sweep_crosses_the_seam() {
        let field = Field::new(800.0, 600.0);
        let prev = Vec2::new(780.0, 300.0);
        let bullet = body(prev, field.wrap(prev + Vec2::new(40.0, 0.0)), 0.0);
        let target = body(Vec2::new(5.0, 300.0), Vec2::new(5.0, 300.0), 3.0);
        assert!(swept_hit(&field, &bullet, &target, 3.0));
    }

    #[test]
    fn slow_pairs_use_end_positions() {
        let field = Field::new(800.0, 600.0);
        let a = body(Vec2::new(100.0, 100.0), Vec2::new(102.0, 100.0), 4.0);
        let b = body(Vec2::new(110.0, 100.0), Vec2::new(110.0, 100.0), 4.0);
        assert!(!swept_hit(&field, &a, &b, 8.0));
        assert!(swept_hit(&field, &a, &b, 8.5));
    }

    #[test]
    fn sweep_misses_a_parallel_path() {
        let field = Field::new(800.0, 600.0);
        let bullet = body(Vec2::new(100.0, 300.0), Vec2::new(140.0, 300.0), 0.0);
        let target = body(Vec2::new(120.0, 320.0), Vec2::new(120.0, 320.0), 5.0);
        assert!(!swept_hit(&field, &bullet, &target, 5.0));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn reversed_pair_is_rejected() {
        let mut table = CollisionTable::new();
        table.register(EntityKind::Bullet, EntityKind::Ufo, handlers::bullet_hit);
        table.register(EntityKind::Ufo, EntityKind::Bullet, handlers::bullet_hit);
    }

    #[test]
    fn standard_table_has_no_duplicates() {
        assert_eq!(CollisionTable::standard().len(), 9);
    }
}
