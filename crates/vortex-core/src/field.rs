//! Toroidal playfield geometry.
//!
//! Both axes wrap, so every inter-entity displacement is the shortest signed
//! delta across the seams. Nothing else in the simulation may compute a
//! distance by plain subtraction.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// A `width × height` arena whose opposite edges are adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    width: f64,
    height: f64,
}

impl Field {
    /// Panics on non-positive or non-finite bounds.
    pub fn new(width: f64, height: f64) -> Self {
        assert!(
            width.is_finite() && width > 0.0,
            "field width must be positive, got {width}"
        );
        assert!(
            height.is_finite() && height > 0.0,
            "field height must be positive, got {height}"
        );
        Self { width, height }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Change the bounds. Live positions are not touched here; they are
    /// re-wrapped by the next physics pass.
    pub fn resize(&mut self, width: f64, height: f64) {
        *self = Field::new(width, height);
    }

    /// Map any coordinate into `[0, width) × [0, height)`.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(p.x, self.width), wrap_axis(p.y, self.height))
    }

    /// Shortest signed x displacement from `a` to `b`, magnitude ≤ width/2.
    pub fn signed_delta_x(&self, a: Vec2, b: Vec2) -> f64 {
        shortest(b.x - a.x, self.width)
    }

    /// Shortest signed y displacement from `a` to `b`, magnitude ≤ height/2.
    pub fn signed_delta_y(&self, a: Vec2, b: Vec2) -> f64 {
        shortest(b.y - a.y, self.height)
    }

    /// Shortest displacement vector from `a` to `b`.
    pub fn delta(&self, a: Vec2, b: Vec2) -> Vec2 {
        Vec2::new(self.signed_delta_x(a, b), self.signed_delta_y(a, b))
    }

    pub fn distance_squared(&self, a: Vec2, b: Vec2) -> f64 {
        self.delta(a, b).length_squared()
    }

    pub fn distance(&self, a: Vec2, b: Vec2) -> f64 {
        self.distance_squared(a, b).sqrt()
    }

    /// Uniform position on one of the four edges, `t` in [0,1) picks the spot
    /// along the perimeter.
    pub fn edge_point(&self, t: f64) -> Vec2 {
        let perimeter = 2.0 * (self.width + self.height);
        let s = t.rem_euclid(1.0) * perimeter;
        if s < self.width {
            Vec2::new(s, 0.0)
        } else if s < self.width + self.height {
            Vec2::new(0.0, s - self.width)
        } else if s < 2.0 * self.width + self.height {
            Vec2::new(s - self.width - self.height, 0.0)
        } else {
            Vec2::new(0.0, s - 2.0 * self.width - self.height)
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Field::new(
            crate::constants::FIELD_WIDTH,
            crate::constants::FIELD_HEIGHT,
        )
    }
}

fn wrap_axis(v: f64, extent: f64) -> f64 {
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if w >= extent {
        0.0
    } else {
        w
    }
}

fn shortest(d: f64, extent: f64) -> f64 {
    let half = extent * 0.5;
    let mut d = d.rem_euclid(extent);
    if d > half {
        d -= extent;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    #[test]
    fn wrap_maps_into_bounds() {
        let f = field();
        let p = f.wrap(Vec2::new(-10.0, 605.0));
        assert_eq!(p, Vec2::new(790.0, 5.0));
        let q = f.wrap(Vec2::new(800.0, 600.0));
        assert_eq!(q, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn wrap_is_periodic() {
        let f = field();
        for &(x, y) in &[(12.5, 44.0), (799.9, 0.1), (-3.0, -700.0), (1601.0, 1250.0)] {
            let base = f.wrap(Vec2::new(x, y));
            for k in -3..=3 {
                let k = k as f64;
                let shifted = f.wrap(Vec2::new(x + k * 800.0, y + k * 600.0));
                assert!((shifted - base).length() < 1e-9, "k={k} {shifted:?} vs {base:?}");
            }
        }
    }

    #[test]
    fn signed_delta_takes_the_short_way() {
        let f = field();
        let a = Vec2::new(790.0, 10.0);
        let b = Vec2::new(10.0, 590.0);
        assert!((f.signed_delta_x(a, b) - 20.0).abs() < 1e-9);
        assert!((f.signed_delta_y(a, b) + 20.0).abs() < 1e-9);
        assert!(f.signed_delta_x(a, b).abs() <= 400.0);
    }

    #[test]
    fn distance_invariant_under_translation_by_bounds() {
        let f = field();
        let a = Vec2::new(5.0, 300.0);
        let b = Vec2::new(780.0, 20.0);
        let d = f.distance(a, b);
        assert!((d - f.distance(a + Vec2::new(800.0, 0.0), b)).abs() < 1e-9);
        assert!((d - f.distance(a, b + Vec2::new(0.0, 600.0))).abs() < 1e-9);
        assert!((d - f.distance(a - Vec2::new(800.0, 600.0), b)).abs() < 1e-9);
    }

    #[test]
    fn near_edge_distance_is_not_euclidean() {
        let f = field();
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(799.0, 599.0);
        assert!((f.distance(a, b) - 8f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn edge_points_lie_on_an_edge() {
        let f = field();
        for i in 0..20 {
            let p = f.edge_point(i as f64 / 20.0);
            assert!(p.x == 0.0 || p.y == 0.0, "{p:?}");
            assert_eq!(f.wrap(p), p);
        }
    }

    #[test]
    #[should_panic]
    fn negative_bounds_fail_fast() {
        let _ = Field::new(-1.0, 10.0);
    }
}
