//! Enemy brain: patrol, chase and attack.
//!
//! The brain only decides. It returns an [`AiDecision`] whose input frame the
//! owner feeds into the enemy's
//! [`ActorActionStateMachine`](crate::actor::ActorActionStateMachine) exactly
//! like player input, plus the damage due when a strike lands.

use glade_common::{GladeError, GladeResult, Vec2, EPSILON_SQ};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::host::InputFrame;

/// Enemy brain configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyBrainConfig {
    /// Distance at which the target is noticed.
    pub detection_range: f32,
    /// Distance at which the enemy stops and strikes.
    pub attack_range: f32,
    /// Seconds between strikes.
    pub attack_cooldown: f32,
    /// Damage dealt per strike.
    pub damage_per_hit: i32,
    /// Speed while patrolling.
    pub patrol_speed: f32,
    /// Speed while chasing.
    pub chase_speed: f32,
    /// A waypoint counts as reached within this distance.
    pub reach_distance: f32,
    /// Once engaged, the target is only lost beyond
    /// `detection_range * leash_multiplier`.
    pub leash_multiplier: f32,
    /// Patrol route, visited in order and wrapping around.
    pub waypoints: Vec<Vec2>,
}

impl Default for EnemyBrainConfig {
    fn default() -> Self {
        Self {
            detection_range: 5.0,
            attack_range: 1.2,
            attack_cooldown: 1.5,
            damage_per_hit: 1,
            patrol_speed: 2.0,
            chase_speed: 3.0,
            reach_distance: 0.2,
            leash_multiplier: 1.0,
            waypoints: Vec::new(),
        }
    }
}

impl EnemyBrainConfig {
    /// Check value ranges. A zero cooldown would strike every tick.
    pub fn validate(&self) -> GladeResult<()> {
        at_least("detection_range", self.detection_range, 0.0)?;
        at_least("attack_range", self.attack_range, 0.0)?;
        at_least("patrol_speed", self.patrol_speed, 0.0)?;
        at_least("chase_speed", self.chase_speed, 0.0)?;
        at_least("leash_multiplier", self.leash_multiplier, 1.0)?;
        positive("attack_cooldown", self.attack_cooldown)?;
        positive("reach_distance", self.reach_distance)?;

        if self.damage_per_hit < 0 {
            return Err(GladeError::InvalidValue {
                field: "damage_per_hit",
                reason: format!("must not be negative, got {}", self.damage_per_hit),
            });
        }
        if let Some(waypoint) = self.waypoints.iter().find(|w| !w.is_finite()) {
            return Err(GladeError::InvalidValue {
                field: "waypoints",
                reason: format!("not a finite point: {waypoint}"),
            });
        }
        Ok(())
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> GladeResult<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(GladeError::InvalidValue {
            field,
            reason: format!("must be at least {min}, got {value}"),
        })
    }
}

fn positive(field: &'static str, value: f32) -> GladeResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GladeError::InvalidValue {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

/// What the brain is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiMode {
    /// Walking the patrol route (or standing if there is none).
    #[default]
    Patrolling,
    /// Closing in on the target.
    Chasing,
    /// In range, striking on a cooldown.
    Attacking,
}

/// One tick's decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiDecision {
    /// Mode after this tick.
    pub mode: AiMode,
    /// Virtual controller input. Movement is scaled so that
    /// `movement * base_speed` is the wanted velocity; attack is set on strikes.
    pub input: InputFrame,
    /// Direction to face when not moving.
    pub face: Option<Vec2>,
    /// Damage due this tick, if a strike landed.
    pub strike: Option<i32>,
}

/// Per-enemy brain state.
#[derive(Debug, Clone)]
pub struct EnemyBrain {
    config: EnemyBrainConfig,
    mode: AiMode,
    waypoint: usize,
    cooldown: f32,
}

impl EnemyBrain {
    /// Creates a brain in patrol mode, ready to strike.
    #[must_use]
    pub fn new(config: EnemyBrainConfig) -> Self {
        Self {
            config,
            mode: AiMode::Patrolling,
            waypoint: 0,
            cooldown: 0.0,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> AiMode {
        self.mode
    }

    /// Index of the waypoint being walked to.
    #[must_use]
    pub fn waypoint_index(&self) -> usize {
        self.waypoint
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &EnemyBrainConfig {
        &self.config
    }

    /// Decide what to do this tick.
    ///
    /// `base_speed` is the enemy actor's movement speed; steering is scaled
    /// against it so patrol and chase speeds come out right.
    pub fn think(&mut self, dt: f32, position: Vec2, target: Option<Vec2>, base_speed: f32) -> AiDecision {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let mode = self.select_mode(position, target);
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "Enemy mode changed");
            self.mode = mode;
        }

        match (mode, target) {
            (AiMode::Chasing, Some(target)) => AiDecision {
                mode,
                input: steer(target - position, self.config.chase_speed, base_speed),
                face: None,
                strike: None,
            },
            (AiMode::Attacking, Some(target)) => {
                let strike = if self.cooldown <= 0.0 {
                    self.cooldown = self.config.attack_cooldown;
                    trace!(damage = self.config.damage_per_hit, "Enemy strikes");
                    Some(self.config.damage_per_hit)
                } else {
                    None
                };
                AiDecision {
                    mode,
                    input: InputFrame {
                        attack: strike.is_some(),
                        ..InputFrame::new()
                    },
                    face: Some(target - position),
                    strike,
                }
            },
            _ => AiDecision {
                mode: AiMode::Patrolling,
                input: self.patrol(position, base_speed),
                face: None,
                strike: None,
            },
        }
    }

    fn select_mode(&self, position: Vec2, target: Option<Vec2>) -> AiMode {
        let Some(target) = target else {
            return AiMode::Patrolling;
        };
        let distance = position.distance(target);
        let engaged = self.mode != AiMode::Patrolling;
        let range = if engaged {
            self.config.detection_range * self.config.leash_multiplier.max(1.0)
        } else {
            self.config.detection_range
        };

        if distance > range {
            AiMode::Patrolling
        } else if distance > self.config.attack_range {
            AiMode::Chasing
        } else {
            AiMode::Attacking
        }
    }

    fn patrol(&mut self, position: Vec2, base_speed: f32) -> InputFrame {
        let count = self.config.waypoints.len();
        if count == 0 {
            return InputFrame::new();
        }
        self.waypoint %= count;
        let goal = self.config.waypoints[self.waypoint];
        if position.distance(goal) <= self.config.reach_distance {
            self.waypoint = (self.waypoint + 1) % count;
            trace!(waypoint = self.waypoint, "Waypoint reached");
        }
        let goal = self.config.waypoints[self.waypoint];
        steer(goal - position, self.config.patrol_speed, base_speed)
    }
}

fn steer(direction: Vec2, speed: f32, base_speed: f32) -> InputFrame {
    if base_speed <= 0.0 || direction.length_squared() <= EPSILON_SQ {
        return InputFrame::new();
    }
    InputFrame::steering(direction, speed / base_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn brain() -> EnemyBrain {
        EnemyBrain::new(EnemyBrainConfig::default())
    }

    #[test]
    fn test_config_ranges() {
        assert!(EnemyBrainConfig::default().validate().is_ok());

        let zero_cooldown = EnemyBrainConfig {
            attack_cooldown: 0.0,
            ..EnemyBrainConfig::default()
        };
        assert!(matches!(
            zero_cooldown.validate(),
            Err(GladeError::InvalidValue {
                field: "attack_cooldown",
                ..
            })
        ));

        let backwards = EnemyBrainConfig {
            chase_speed: -3.0,
            ..EnemyBrainConfig::default()
        };
        assert!(matches!(
            backwards.validate(),
            Err(GladeError::InvalidValue { field: "chase_speed", .. })
        ));

        let lost = EnemyBrainConfig {
            detection_range: f32::NAN,
            ..EnemyBrainConfig::default()
        };
        assert!(lost.validate().is_err());

        let healing = EnemyBrainConfig {
            damage_per_hit: -1,
            ..EnemyBrainConfig::default()
        };
        assert!(healing.validate().is_err());
    }

    #[test]
    fn test_modes_by_distance() {
        let mut brain = brain();
        let target = Vec2::ZERO;

        let far = brain.think(DT, Vec2::new(10.0, 0.0), Some(target), 2.0);
        assert_eq!(far.mode, AiMode::Patrolling);
        assert!(far.strike.is_none());

        let near = brain.think(DT, Vec2::new(4.0, 0.0), Some(target), 2.0);
        assert_eq!(near.mode, AiMode::Chasing);
        assert!(near.input.movement.x < 0.0);
        assert!((near.input.movement.length() - 1.5).abs() < 1e-5);

        let close = brain.think(DT, Vec2::new(1.0, 0.0), Some(target), 2.0);
        assert_eq!(close.mode, AiMode::Attacking);
        assert_eq!(close.input.movement, Vec2::ZERO);
        assert_eq!(close.strike, Some(1));
        assert!(close.input.attack);
    }

    #[test]
    fn test_strikes_on_cooldown_not_every_tick() {
        let mut brain = brain();
        let mut strikes = 0;
        // 2 seconds in range with a 1.5 s cooldown
        for _ in 0..100 {
            if brain.think(DT, Vec2::new(1.0, 0.0), Some(Vec2::ZERO), 2.0).strike.is_some() {
                strikes += 1;
            }
        }
        assert_eq!(strikes, 2);
    }

    #[test]
    fn test_no_target_patrols() {
        let mut brain = brain();
        let decision = brain.think(DT, Vec2::ZERO, None, 2.0);
        assert_eq!(decision.mode, AiMode::Patrolling);
        assert_eq!(decision.input.movement, Vec2::ZERO);
    }

    #[test]
    fn test_waypoints_wrap() {
        let mut brain = EnemyBrain::new(EnemyBrainConfig {
            waypoints: vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)],
            ..EnemyBrainConfig::default()
        });

        let at_first = brain.think(DT, Vec2::new(0.1, 0.0), None, 2.0);
        assert_eq!(brain.waypoint_index(), 1);
        assert!(at_first.input.movement.x > 0.0);

        brain.think(DT, Vec2::new(3.9, 0.0), None, 2.0);
        assert_eq!(brain.waypoint_index(), 0);
    }

    #[test]
    fn test_leash_keeps_chasing() {
        let mut brain = EnemyBrain::new(EnemyBrainConfig {
            leash_multiplier: 2.0,
            ..EnemyBrainConfig::default()
        });

        // Not noticed at 7 while patrolling
        assert_eq!(brain.think(DT, Vec2::new(7.0, 0.0), Some(Vec2::ZERO), 2.0).mode, AiMode::Patrolling);

        brain.think(DT, Vec2::new(4.0, 0.0), Some(Vec2::ZERO), 2.0);
        assert_eq!(brain.think(DT, Vec2::new(7.0, 0.0), Some(Vec2::ZERO), 2.0).mode, AiMode::Chasing);
        assert_eq!(brain.think(DT, Vec2::new(11.0, 0.0), Some(Vec2::ZERO), 2.0).mode, AiMode::Patrolling);
    }

    #[test]
    fn test_faces_target_while_attacking() {
        let mut brain = brain();
        let decision = brain.think(DT, Vec2::new(0.0, 1.0), Some(Vec2::ZERO), 2.0);
        assert_eq!(decision.face, Some(Vec2::new(0.0, -1.0)));
    }
}
