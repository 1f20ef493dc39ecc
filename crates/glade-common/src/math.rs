//! 2D math helpers shared by gameplay and the engine.
//!
//! World space is y-up: positive `y` points towards the top of the screen.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Squared length below which a vector is treated as zero.
pub const EPSILON_SQ: f32 = 1e-8;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new AABB from two corners, in any order.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates an AABB from center and half-extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of the AABB.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Checks if this AABB overlaps with another.
    ///
    /// Boxes that only touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Checks if a point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let c = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(1.5, 1.5));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(2.0, 3.0), Vec2::new(0.5, 1.0));
        assert_eq!(b.min, Vec2::new(1.5, 2.0));
        assert_eq!(b.max, Vec2::new(2.5, 4.0));
        assert_eq!(b.center(), Vec2::new(2.0, 3.0));
        assert_eq!(b.half_extents(), Vec2::new(0.5, 1.0));
    }

    proptest! {
        #[test]
        fn prop_union_contains_both_centers(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
        ) {
            let a = Aabb::from_center(Vec2::new(ax, ay), Vec2::splat(0.5));
            let b = Aabb::from_center(Vec2::new(bx, by), Vec2::splat(0.5));
            let u = a.union(&b);
            prop_assert!(u.contains(a.center()));
            prop_assert!(u.contains(b.center()));
        }
    }
}
