//! Attack timing windows.
//!
//! An attack runs through three phases: windup (pre-hit delay), active (the
//! hitbox deals damage), and cooldown (post-hit recovery). The actor stays
//! movement-locked for the whole sequence unless the host reports that the
//! attack animation finished early.

use glade_common::ActorId;
use serde::{Deserialize, Serialize};

use crate::direction::CardinalDirection;

// ============================================================================
// Attack Phases
// ============================================================================

/// Phase of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Preparing to strike.
    Windup,
    /// Active damage window.
    Active,
    /// Recovering after the strike.
    Cooldown,
    /// Attack ran to completion.
    Complete,
    /// Attack was cut short.
    Cancelled,
}

impl AttackPhase {
    /// Check if attack can deal damage.
    #[must_use]
    pub fn can_damage(&self) -> bool {
        *self == Self::Active
    }

    /// Check if attack is finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

// ============================================================================
// Attack Configuration
// ============================================================================

/// Timing configuration for an attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTiming {
    /// Duration of windup phase (seconds).
    pub windup: f32,
    /// Duration of active phase (seconds).
    pub active: f32,
    /// Duration of cooldown phase (seconds).
    pub cooldown: f32,
}

impl Default for AttackTiming {
    fn default() -> Self {
        Self {
            windup: 0.05,
            active: 0.3,
            cooldown: 0.15,
        }
    }
}

impl AttackTiming {
    /// Create new attack timing.
    #[must_use]
    pub fn new(windup: f32, active: f32, cooldown: f32) -> Self {
        Self {
            windup: windup.max(0.0),
            active: active.max(0.01),
            cooldown: cooldown.max(0.0),
        }
    }

    /// Get total attack duration.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.windup + self.active + self.cooldown
    }

    /// Whether every phase has a finite, non-negative duration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.windup, self.active, self.cooldown]
            .iter()
            .all(|d| d.is_finite() && *d >= 0.0)
            && self.active > 0.0
    }
}

/// Area swept by an attack in front of the attacker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitboxConfig {
    /// How far the hitbox extends from the body edge.
    pub reach: f32,
    /// Width of the hitbox across the facing axis.
    pub width: f32,
}

impl Default for HitboxConfig {
    fn default() -> Self {
        Self {
            reach: 0.8,
            width: 0.6,
        }
    }
}

/// Attack configuration for an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Phase timing.
    pub timing: AttackTiming,
    /// Damage dealt to each target hit during the active window.
    pub damage: i32,
    /// Directional hitbox. Required for actors whose attacks hit through
    /// hitboxes (the player).
    pub hitbox: Option<HitboxConfig>,
    /// Audio cue played when the attack starts.
    pub cue: Option<String>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            timing: AttackTiming::default(),
            damage: 1,
            hitbox: None,
            cue: None,
        }
    }
}

impl AttackConfig {
    /// Sword swing: default timing, a hitbox in front and the `attack` cue.
    #[must_use]
    pub fn sword() -> Self {
        Self {
            hitbox: Some(HitboxConfig::default()),
            cue: Some("attack".to_string()),
            ..Self::default()
        }
    }
}

// ============================================================================
// Active Attack
// ============================================================================

/// An attack in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAttack {
    /// Direction the hitbox faces.
    pub direction: CardinalDirection,
    /// Current phase.
    pub phase: AttackPhase,
    /// Time in current phase.
    pub phase_time: f32,
    /// Time since the attack started.
    pub elapsed: f32,
    /// Attack timing.
    pub timing: AttackTiming,
    /// Actors already hit (each target is hit at most once).
    pub hit_actors: Vec<ActorId>,
}

impl ActiveAttack {
    /// Start a new attack in the windup phase.
    #[must_use]
    pub fn new(direction: CardinalDirection, timing: AttackTiming) -> Self {
        Self {
            direction,
            phase: AttackPhase::Windup,
            phase_time: 0.0,
            elapsed: 0.0,
            timing,
            hit_actors: Vec::new(),
        }
    }

    /// Advance the attack. Large steps may cross several phases at once.
    pub fn tick(&mut self, dt: f32) {
        if self.phase.is_finished() {
            return;
        }

        self.elapsed += dt;
        self.phase_time += dt;

        loop {
            let (duration, next) = match self.phase {
                AttackPhase::Windup => (self.timing.windup, AttackPhase::Active),
                AttackPhase::Active => (self.timing.active, AttackPhase::Cooldown),
                AttackPhase::Cooldown => (self.timing.cooldown, AttackPhase::Complete),
                _ => return,
            };
            if self.phase_time < duration {
                return;
            }
            self.phase_time -= duration;
            self.phase = next;
            if next.is_finished() {
                self.phase_time = 0.0;
                return;
            }
        }
    }

    /// Cancel the attack.
    pub fn cancel(&mut self) {
        if !self.phase.is_finished() {
            self.phase = AttackPhase::Cancelled;
        }
    }

    /// Check if attack is in damage window.
    #[must_use]
    pub fn can_damage(&self) -> bool {
        self.phase.can_damage()
    }

    /// Check if the attack is over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    /// Time left until the whole sequence completes.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.timing.total_duration() - self.elapsed).max(0.0)
    }

    /// Get progress through current phase (0.0-1.0).
    #[must_use]
    pub fn phase_progress(&self) -> f32 {
        let duration = match self.phase {
            AttackPhase::Windup => self.timing.windup,
            AttackPhase::Active => self.timing.active,
            AttackPhase::Cooldown => self.timing.cooldown,
            _ => 1.0,
        };
        if duration <= 0.0 {
            1.0
        } else {
            (self.phase_time / duration).clamp(0.0, 1.0)
        }
    }

    /// Register a hit on an actor. Returns false if it was already hit.
    pub fn register_hit(&mut self, target: ActorId) -> bool {
        if self.hit_actors.contains(&target) {
            return false;
        }
        self.hit_actors.push(target);
        true
    }
}
