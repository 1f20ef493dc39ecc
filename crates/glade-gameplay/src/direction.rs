//! Facing and cardinal directions.
//!
//! Actors remember the last direction they moved or attacked in. Attacks and
//! animations only care about the dominant axis of that direction.

use glade_common::{Aabb, Vec2, EPSILON_SQ};
use serde::{Deserialize, Serialize};

use crate::attack::HitboxConfig;

/// One of the four screen directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardinalDirection {
    /// Facing up (+y)
    Up,
    /// Facing down (-y, default)
    #[default]
    Down,
    /// Facing left (-x)
    Left,
    /// Facing right (+x)
    Right,
}

impl CardinalDirection {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Convert direction to a unit vector.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// Pick the direction of the dominant axis of `v`.
    ///
    /// Ties go to the horizontal axis. Returns `None` for a zero vector.
    #[must_use]
    pub fn from_vec2(v: Vec2) -> Option<Self> {
        if v.length_squared() <= EPSILON_SQ {
            return None;
        }

        if v.x.abs() >= v.y.abs() {
            if v.x > 0.0 {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if v.y > 0.0 {
            Some(Self::Up)
        } else {
            Some(Self::Down)
        }
    }

    /// Animator `MoveDir` code: 1 = Up, 2 = Down, 3 = Left, 4 = Right.
    #[must_use]
    pub const fn move_dir_code(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => 2,
            Self::Left => 3,
            Self::Right => 4,
        }
    }

    /// Whether the direction lies on the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Hitbox placed in front of a body facing this way.
    ///
    /// The box starts at the body's edge, extends `reach` outwards and is
    /// `width` wide across the facing axis.
    #[must_use]
    pub fn hitbox(self, center: Vec2, body_half_extents: Vec2, hitbox: &HitboxConfig) -> Aabb {
        let dir = self.to_vec2();
        let edge = if self.is_horizontal() {
            body_half_extents.x
        } else {
            body_half_extents.y
        };
        let box_center = center + dir * (edge + hitbox.reach * 0.5);
        let half = if self.is_horizontal() {
            Vec2::new(hitbox.reach * 0.5, hitbox.width * 0.5)
        } else {
            Vec2::new(hitbox.width * 0.5, hitbox.reach * 0.5)
        };
        Aabb::from_center(box_center, half)
    }
}

/// Unit-length facing vector.
///
/// Never zero: it starts pointing down and only changes to another non-zero
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facing(Vec2);

impl Default for Facing {
    fn default() -> Self {
        Self::from_cardinal(CardinalDirection::Down)
    }
}

impl Facing {
    /// Facing along a cardinal direction.
    #[must_use]
    pub fn from_cardinal(direction: CardinalDirection) -> Self {
        Self(direction.to_vec2())
    }

    /// Facing along `v`, or `None` if `v` is zero.
    #[must_use]
    pub fn try_from_vec2(v: Vec2) -> Option<Self> {
        if v.length_squared() <= EPSILON_SQ || !v.is_finite() {
            None
        } else {
            Some(Self(v.normalize()))
        }
    }

    /// Turn towards `v`. Zero vectors leave the facing unchanged.
    ///
    /// Returns whether the facing changed.
    pub fn update(&mut self, v: Vec2) -> bool {
        match Self::try_from_vec2(v) {
            Some(facing) if facing != *self => {
                *self = facing;
                true
            },
            _ => false,
        }
    }

    /// The unit vector.
    #[must_use]
    pub fn vector(self) -> Vec2 {
        self.0
    }

    /// Dominant cardinal direction.
    #[must_use]
    pub fn cardinal(self) -> CardinalDirection {
        CardinalDirection::from_vec2(self.0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cardinal_from_vector() {
        assert_eq!(CardinalDirection::from_vec2(Vec2::new(1.0, 0.2)), Some(CardinalDirection::Right));
        assert_eq!(CardinalDirection::from_vec2(Vec2::new(-1.0, 0.5)), Some(CardinalDirection::Left));
        assert_eq!(CardinalDirection::from_vec2(Vec2::new(0.1, 0.9)), Some(CardinalDirection::Up));
        assert_eq!(CardinalDirection::from_vec2(Vec2::new(0.1, -0.9)), Some(CardinalDirection::Down));
        assert_eq!(CardinalDirection::from_vec2(Vec2::ZERO), None);
    }

    #[test]
    fn test_cardinal_tie_prefers_horizontal() {
        assert_eq!(CardinalDirection::from_vec2(Vec2::new(1.0, 1.0)), Some(CardinalDirection::Right));
        assert_eq!(CardinalDirection::from_vec2(Vec2::new(-1.0, -1.0)), Some(CardinalDirection::Left));
    }

    #[test]
    fn test_move_dir_codes() {
        let codes: Vec<i32> = CardinalDirection::ALL.iter().map(|d| d.move_dir_code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_hitbox_placement() {
        let hitbox = HitboxConfig {
            reach: 1.0,
            width: 0.5,
        };
        let body = Vec2::new(0.25, 0.5);

        let right = CardinalDirection::Right.hitbox(Vec2::ZERO, body, &hitbox);
        assert_eq!(right.min, Vec2::new(0.25, -0.25));
        assert_eq!(right.max, Vec2::new(1.25, 0.25));

        let down = CardinalDirection::Down.hitbox(Vec2::ZERO, body, &hitbox);
        assert_eq!(down.min, Vec2::new(-0.25, -1.5));
        assert_eq!(down.max, Vec2::new(0.25, -0.5));
    }

    #[test]
    fn test_facing_ignores_zero() {
        let mut facing = Facing::default();
        assert_eq!(facing.cardinal(), CardinalDirection::Down);
        assert!(!facing.update(Vec2::ZERO));
        assert_eq!(facing.vector(), Vec2::NEG_Y);

        assert!(facing.update(Vec2::new(-3.0, 0.0)));
        assert_eq!(facing.cardinal(), CardinalDirection::Left);
        assert!(!facing.update(Vec2::new(-0.5, 0.0)));
    }

    proptest! {
        #[test]
        fn prop_facing_is_unit_length(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0) {
            let mut facing = Facing::default();
            facing.update(Vec2::new(x, y));
            prop_assert!((facing.vector().length() - 1.0).abs() < 1e-4);
        }
    }
}
