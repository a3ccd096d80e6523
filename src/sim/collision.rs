//! Collision detection between the player and the field
//!
//! The player is a circle; obstacles and the goal are axis-aligned boxes
//! given by center and half-extents. All checks are pure functions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, center + half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Build from center and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size * 0.5)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Point on (or in) the rectangle closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Circle vs rectangle overlap
///
/// Clamps the circle center onto the rectangle to find the nearest point, then
/// compares squared distance against r². Touching edges do not count.
#[inline]
pub fn circle_rect_intersect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = rect.closest_point(center);
    center.distance_squared(nearest) < radius * radius
}

/// Circle vs circle overlap (sum-of-radii test, touching does not count)
#[inline]
pub fn circle_circle_intersect(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Rect {
        // 40x20 box centered at (100, 100)
        Rect::from_center_size(Vec2::new(100.0, 100.0), Vec2::new(40.0, 20.0))
    }

    #[test]
    fn test_circle_inside_rect() {
        assert!(circle_rect_intersect(Vec2::new(100.0, 100.0), 1.0, &unit_box()));
    }

    #[test]
    fn test_circle_near_edge() {
        let rect = unit_box();
        // Right edge at x=120
        assert!(circle_rect_intersect(Vec2::new(125.0, 100.0), 6.0, &rect));
        assert!(!circle_rect_intersect(Vec2::new(125.0, 100.0), 4.0, &rect));
        // Exactly touching is not a hit
        assert!(!circle_rect_intersect(Vec2::new(125.0, 100.0), 5.0, &rect));
    }

    #[test]
    fn test_circle_near_corner() {
        let rect = unit_box();
        // Corner at (120, 110); circle center 3-4-5 away
        let center = Vec2::new(123.0, 114.0);
        assert!(circle_rect_intersect(center, 5.1, &rect));
        assert!(!circle_rect_intersect(center, 4.9, &rect));
    }

    #[test]
    fn test_circle_circle() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(circle_circle_intersect(a, 6.0, b, 5.0));
        assert!(!circle_circle_intersect(a, 5.0, b, 5.0));
        assert!(!circle_circle_intersect(a, 2.0, b, 2.0));
    }

    #[test]
    fn test_checks_are_pure() {
        let rect = unit_box();
        let center = Vec2::new(118.0, 95.0);
        let first = circle_rect_intersect(center, 3.0, &rect);
        let second = circle_rect_intersect(center, 3.0, &rect);
        assert_eq!(first, second);
        assert_eq!(
            circle_circle_intersect(center, 3.0, rect.center, 2.0),
            circle_circle_intersect(center, 3.0, rect.center, 2.0)
        );
    }
}
