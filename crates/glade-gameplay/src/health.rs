//! Health, damage and death.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default duration of the damage flash (seconds).
pub const DEFAULT_FLASH_DURATION: f32 = 0.15;

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing happened (non-positive amount or already dead).
    Ignored,
    /// Damage applied, actor still alive.
    Damaged {
        /// Health actually removed
        applied: i32,
        /// Health left
        remaining: i32,
    },
    /// Damage applied and the actor died on this call.
    Killed {
        /// Health actually removed
        applied: i32,
    },
}

impl DamageOutcome {
    /// Whether any health was removed.
    #[must_use]
    pub fn landed(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Whether this call killed the actor.
    #[must_use]
    pub fn killed(self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

/// Clamped health pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
    dead: bool,
    flash_remaining: f32,
    flash_duration: f32,
}

impl Health {
    /// Full health pool of `max` points (at least 1).
    #[must_use]
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            dead: false,
            flash_remaining: 0.0,
            flash_duration: DEFAULT_FLASH_DURATION,
        }
    }

    /// Start at a given value, clamped to `0..=max`.
    #[must_use]
    pub fn with_current(mut self, current: i32) -> Self {
        self.current = current.clamp(0, self.max);
        self.dead = self.current == 0;
        self
    }

    /// Set the damage flash duration.
    #[must_use]
    pub fn with_flash_duration(mut self, seconds: f32) -> Self {
        self.flash_duration = seconds.max(0.0);
        self
    }

    /// Current health.
    #[must_use]
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Health as a fraction of max (for health bars).
    #[must_use]
    pub fn fraction(&self) -> f32 {
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    /// Whether health reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Whether the damage flash is showing.
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        self.flash_remaining > 0.0
    }

    /// Remove `amount` health.
    ///
    /// Non-positive amounts and damage to a dead pool are ignored. Death is
    /// reported exactly once, on the call that reaches zero. Each landed hit
    /// restarts the damage flash.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if amount <= 0 || self.dead {
            return DamageOutcome::Ignored;
        }

        let before = self.current;
        self.current = before.saturating_sub(amount).clamp(0, self.max);
        let applied = before - self.current;
        self.flash_remaining = self.flash_duration;
        debug!(amount, applied, remaining = self.current, max = self.max, "Took damage");

        if self.current == 0 {
            self.dead = true;
            DamageOutcome::Killed { applied }
        } else {
            DamageOutcome::Damaged {
                applied,
                remaining: self.current,
            }
        }
    }

    /// Restore up to `amount` health. Dead pools cannot be healed.
    ///
    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.dead {
            return 0;
        }
        let before = self.current;
        self.current = before.saturating_add(amount).min(self.max);
        self.current - before
    }

    /// Advance the damage flash.
    pub fn tick(&mut self, dt: f32) {
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}
