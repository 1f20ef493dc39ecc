//! Movement resolution against host collision.
//!
//! Each fixed tick an actor tries to move along its desired velocity. If the
//! full displacement is blocked, the horizontal and then vertical components
//! are tried on their own so actors slide along walls instead of sticking.

use glade_common::{Aabb, Vec2, EPSILON_SQ};
use serde::{Deserialize, Serialize};

use crate::host::ShapeCast;

/// Movement configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Speed in units per second at full input.
    pub speed: f32,
    /// Extra distance added to every cast so actors stop short of colliders.
    pub collision_offset: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            collision_offset: 0.05,
        }
    }
}

/// How a movement attempt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveResolution {
    /// No movement was requested.
    Idle,
    /// The full displacement was applied.
    Full,
    /// Blocked, slid along the horizontal axis.
    SlideHorizontal,
    /// Blocked, slid along the vertical axis.
    SlideVertical,
    /// Every attempt was blocked.
    Blocked,
}

/// Result of a movement attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Displacement to apply this tick.
    pub displacement: Vec2,
    /// Which attempt succeeded.
    pub resolution: MoveResolution,
}

impl MoveOutcome {
    pub(crate) const fn none(resolution: MoveResolution) -> Self {
        Self {
            displacement: Vec2::ZERO,
            resolution,
        }
    }

    /// Whether the actor moved.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.displacement.length_squared() > EPSILON_SQ
    }
}

/// Try to move `body` with `velocity` for `dt` seconds.
///
/// Attempts, in order: the full velocity, its horizontal component, its
/// vertical component. The first unobstructed attempt wins.
pub fn resolve_movement(
    world: &dyn ShapeCast,
    body: Aabb,
    velocity: Vec2,
    config: &MovementConfig,
    dt: f32,
) -> MoveOutcome {
    if dt <= 0.0 || velocity.length_squared() <= EPSILON_SQ || !velocity.is_finite() {
        return MoveOutcome::none(MoveResolution::Idle);
    }

    let attempts = [
        (velocity, MoveResolution::Full),
        (Vec2::new(velocity.x, 0.0), MoveResolution::SlideHorizontal),
        (Vec2::new(0.0, velocity.y), MoveResolution::SlideVertical),
    ];

    for (index, (attempt, resolution)) in attempts.into_iter().enumerate() {
        if attempt.length_squared() <= EPSILON_SQ {
            continue;
        }
        // An axis attempt identical to the full one was already rejected.
        if index > 0 && attempt == velocity {
            continue;
        }
        if try_move(world, body, attempt, config, dt) {
            return MoveOutcome {
                displacement: attempt * dt,
                resolution,
            };
        }
    }

    MoveOutcome::none(MoveResolution::Blocked)
}

fn try_move(world: &dyn ShapeCast, body: Aabb, velocity: Vec2, config: &MovementConfig, dt: f32) -> bool {
    let distance = velocity.length() * dt + config.collision_offset;
    world.cast(body, velocity.normalize_or_zero(), distance) == 0
}

/// Static collision world made of axis-aligned obstacles.
///
/// Serves as the host shape cast in tests and headless runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxWorld {
    obstacles: Vec<Aabb>,
}

impl BoxWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world from a list of obstacles.
    #[must_use]
    pub fn with_obstacles(obstacles: Vec<Aabb>) -> Self {
        Self { obstacles }
    }

    /// Adds an obstacle.
    pub fn add_obstacle(&mut self, obstacle: Aabb) {
        self.obstacles.push(obstacle);
    }

    /// All obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }
}

impl ShapeCast for BoxWorld {
    fn cast(&self, shape: Aabb, direction: Vec2, distance: f32) -> usize {
        let swept = shape.union(&shape.translated(direction * distance.max(0.0)));
        self.obstacles
            .iter()
            .filter(|o| o.overlaps(&swept) && !o.overlaps(&shape))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn body_at(x: f32, y: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::splat(0.5))
    }

    fn wall_right() -> BoxWorld {
        // Vertical wall whose left face sits at x = 0.6
        BoxWorld::with_obstacles(vec![Aabb::new(Vec2::new(0.6, -10.0), Vec2::new(1.6, 10.0))])
    }

    #[test]
    fn test_free_movement() {
        let world = BoxWorld::new();
        let outcome = resolve_movement(&world, body_at(0.0, 0.0), Vec2::new(5.0, 0.0), &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::Full);
        assert!((outcome.displacement.x - 0.1).abs() < 1e-6);
        assert!(outcome.moved());
    }

    #[test]
    fn test_zero_velocity_is_idle() {
        let world = BoxWorld::new();
        let outcome = resolve_movement(&world, body_at(0.0, 0.0), Vec2::ZERO, &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::Idle);
        assert!(!outcome.moved());
    }

    #[test]
    fn test_diagonal_slides_along_wall() {
        let world = wall_right();
        let outcome = resolve_movement(&world, body_at(0.0, 0.0), Vec2::new(5.0, 5.0), &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::SlideVertical);
        assert_eq!(outcome.displacement.x, 0.0);
        assert!(outcome.displacement.y > 0.0);
    }

    #[test]
    fn test_slide_horizontal_under_ceiling() {
        // Ceiling whose bottom face sits at y = 0.55
        let world = BoxWorld::with_obstacles(vec![Aabb::new(Vec2::new(-10.0, 0.55), Vec2::new(10.0, 2.0))]);
        let outcome = resolve_movement(&world, body_at(0.0, 0.0), Vec2::new(-3.0, 4.0), &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::SlideHorizontal);
        assert!(outcome.displacement.x < 0.0);
        assert_eq!(outcome.displacement.y, 0.0);
    }

    #[test]
    fn test_straight_into_wall_is_blocked() {
        let world = wall_right();
        let outcome = resolve_movement(&world, body_at(0.0, 0.0), Vec2::new(5.0, 0.0), &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::Blocked);
        assert!(!outcome.moved());
    }

    #[test]
    fn test_corner_blocks_both_axes() {
        let world = BoxWorld::with_obstacles(vec![
            Aabb::new(Vec2::new(0.6, -10.0), Vec2::new(1.6, 10.0)),
            Aabb::new(Vec2::new(-10.0, 0.55), Vec2::new(10.0, 2.0)),
        ]);
        let outcome = resolve_movement(&world, body_at(0.0, 0.0), Vec2::new(5.0, 5.0), &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::Blocked);
    }

    #[test]
    fn test_moving_away_from_touching_wall() {
        let world = wall_right();
        let outcome = resolve_movement(&world, body_at(0.1, 0.0), Vec2::new(-5.0, 0.0), &MovementConfig::default(), DT);
        assert_eq!(outcome.resolution, MoveResolution::Full);
    }
}
