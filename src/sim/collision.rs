//! Circle overlap tests and viewport bounds
//!
//! Everything in the arena is a circle, so collision detection is a single
//! distance comparison. The same test drives live infection/capture checks
//! and rejection sampling when placing new balls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;

/// Whether two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Whether two balls overlap. Symmetric: `overlaps(a, b) == overlaps(b, a)`.
#[inline]
pub fn overlaps(a: &Ball, b: &Ball) -> bool {
    circles_overlap(a.pos, a.radius(), b.pos, b.radius())
}

/// The axis-aligned play area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a circle's center so the whole circle stays inside.
    /// A circle wider than the viewport is centered on that axis.
    pub fn clamp_center(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(pos.x, radius, self.width),
            clamp_axis(pos.y, radius, self.height),
        )
    }

    /// Elastic wall bounce: flip each velocity component whose wall the
    /// circle has crossed while still heading outward.
    pub fn reflect(&self, pos: Vec2, vel: Vec2, radius: f32) -> Vec2 {
        let mut vel = vel;
        if (pos.x < radius && vel.x < 0.0) || (pos.x > self.width - radius && vel.x > 0.0) {
            vel.x = -vel.x;
        }
        if (pos.y < radius && vel.y < 0.0) || (pos.y > self.height - radius && vel.y > 0.0) {
            vel.y = -vel.y;
        }
        vel
    }

    /// True once the circle is entirely outside and still moving away
    pub fn has_escaped(&self, pos: Vec2, vel: Vec2, radius: f32) -> bool {
        (vel.x < 0.0 && pos.x + radius < 0.0)
            || (vel.x > 0.0 && pos.x - radius > self.width)
            || (vel.y < 0.0 && pos.y + radius < 0.0)
            || (vel.y > 0.0 && pos.y - radius > self.height)
    }
}

fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if radius * 2.0 >= extent {
        extent / 2.0
    } else {
        value.clamp(radius, extent - radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallColor;
    use proptest::prelude::*;

    fn ball_at(x: f32, y: f32, diameter: f32) -> Ball {
        let mut ball = Ball::new(0, BallColor::Blue1, diameter);
        ball.pos = Vec2::new(x, y);
        ball
    }

    #[test]
    fn test_overlap_and_touching() {
        let a = ball_at(0.0, 0.0, 20.0);
        let b = ball_at(15.0, 0.0, 20.0);
        assert!(overlaps(&a, &b));

        // Exactly touching is not an overlap
        let c = ball_at(20.0, 0.0, 20.0);
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_reflect_only_when_heading_out() {
        let viewport = Viewport::new(100.0, 100.0);

        // Past the left wall moving left: flips
        let vel = viewport.reflect(Vec2::new(4.0, 50.0), Vec2::new(-3.0, 3.0), 5.0);
        assert_eq!(vel, Vec2::new(3.0, 3.0));

        // Past the left wall but already moving back in: untouched
        let vel = viewport.reflect(Vec2::new(4.0, 50.0), Vec2::new(3.0, 3.0), 5.0);
        assert_eq!(vel, Vec2::new(3.0, 3.0));

        // Bottom-right corner flips both axes
        let vel = viewport.reflect(Vec2::new(98.0, 98.0), Vec2::new(3.0, 3.0), 5.0);
        assert_eq!(vel, Vec2::new(-3.0, -3.0));
    }

    #[test]
    fn test_has_escaped() {
        let viewport = Viewport::new(100.0, 100.0);
        // Partly visible on the left edge
        assert!(!viewport.has_escaped(Vec2::new(-4.0, 50.0), Vec2::new(-3.0, 0.0), 5.0));
        // Fully outside, moving away
        assert!(viewport.has_escaped(Vec2::new(-6.0, 50.0), Vec2::new(-3.0, 0.0), 5.0));
        // Fully outside but heading in (freshly spawned)
        assert!(!viewport.has_escaped(Vec2::new(-6.0, 50.0), Vec2::new(3.0, 0.0), 5.0));
        assert!(viewport.has_escaped(Vec2::new(50.0, 106.0), Vec2::new(0.0, 3.0), 5.0));
    }

    #[test]
    fn test_clamp_oversized_circle() {
        let viewport = Viewport::new(100.0, 200.0);
        let pos = viewport.clamp_center(Vec2::new(0.0, 0.0), 60.0);
        assert_eq!(pos, Vec2::new(50.0, 60.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ad in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bd in 0.0f32..200.0,
        ) {
            let a = ball_at(ax, ay, ad);
            let b = ball_at(bx, by, bd);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_clamped_center_is_inside(
            x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, r in 0.0f32..40.0,
        ) {
            let viewport = Viewport::new(480.0, 800.0);
            let pos = viewport.clamp_center(Vec2::new(x, y), r);
            prop_assert!(pos.x >= r && pos.x <= 480.0 - r);
            prop_assert!(pos.y >= r && pos.y <= 800.0 - r);
        }
    }
}
