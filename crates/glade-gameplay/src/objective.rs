//! Objective tracker.
//!
//! Shows the current objective, switches to a completion message once, then
//! hides itself after a delay with a linear fade.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Objective configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveConfig {
    /// Objective shown at start.
    pub text: String,
    /// Text shown once complete.
    pub completed_text: String,
    /// Seconds the completion text stays fully visible.
    pub hide_delay: f32,
    /// Seconds of fade-out after the delay.
    pub fade_duration: f32,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            text: "Reach the secret location!".to_string(),
            completed_text: "Objective Complete!".to_string(),
            hide_delay: 2.0,
            fade_duration: 0.5,
        }
    }
}

/// Objective display state.
#[derive(Debug, Clone)]
pub struct ObjectiveTracker {
    config: ObjectiveConfig,
    complete: bool,
    since_complete: f32,
}

impl ObjectiveTracker {
    /// Creates a tracker showing the configured objective.
    #[must_use]
    pub fn new(config: ObjectiveConfig) -> Self {
        Self {
            config,
            complete: false,
            since_complete: 0.0,
        }
    }

    /// Whether the objective is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Text to display, e.g. `Objective: Reach the secret location!`.
    #[must_use]
    pub fn display_text(&self) -> String {
        let text = if self.complete {
            &self.config.completed_text
        } else {
            &self.config.text
        };
        format!("Objective: {text}")
    }

    /// Mark the objective reached. Returns true only the first time.
    pub fn reach_destination(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.complete = true;
        self.since_complete = 0.0;
        info!(objective = %self.config.text, "Objective complete");
        true
    }

    /// Advance the hide timer.
    pub fn tick(&mut self, dt: f32) {
        if self.complete {
            self.since_complete += dt;
        }
    }

    /// Display opacity in `0..=1`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if !self.complete || self.since_complete < self.config.hide_delay {
            return 1.0;
        }
        if self.config.fade_duration <= 0.0 {
            return 0.0;
        }
        let t = (self.since_complete - self.config.hide_delay) / self.config.fade_duration;
        1.0 - t.clamp(0.0, 1.0)
    }

    /// Whether the display is still shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.alpha() > 0.0
    }
}

impl Default for ObjectiveTracker {
    fn default() -> Self {
        Self::new(ObjectiveConfig::default())
    }
}
