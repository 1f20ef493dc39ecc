//! Footstep audio cadence.

use glade_common::{GladeError, GladeResult};
use serde::{Deserialize, Serialize};

use crate::host::AudioSink;

/// Footstep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    /// Audio cue for one step.
    pub cue: String,
    /// Seconds between steps while moving.
    pub step_interval: f32,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            cue: "footstep".to_string(),
            step_interval: 0.35,
        }
    }
}

impl FootstepConfig {
    /// A zero or negative interval would fire a step every frame.
    pub fn validate(&self) -> GladeResult<()> {
        if !(self.step_interval.is_finite() && self.step_interval > 0.0) {
            return Err(GladeError::InvalidValue {
                field: "footsteps.step_interval",
                reason: format!("must be positive, got {}", self.step_interval),
            });
        }
        if self.cue.trim().is_empty() {
            return Err(GladeError::InvalidValue {
                field: "footsteps.cue",
                reason: "must name an audio cue".to_string(),
            });
        }
        Ok(())
    }
}

/// Plays a footstep at a fixed interval while the actor moves.
#[derive(Debug, Clone)]
pub struct FootstepCadence {
    config: FootstepConfig,
    timer: f32,
    sounding: bool,
}

impl FootstepCadence {
    /// Creates a cadence from configuration.
    #[must_use]
    pub fn new(config: FootstepConfig) -> Self {
        Self {
            config,
            timer: 0.0,
            sounding: false,
        }
    }

    /// Advance the cadence. Returns true if a step was played.
    ///
    /// Stopping resets the timer and silences the cue.
    pub fn tick(&mut self, is_moving: bool, dt: f32, audio: &mut dyn AudioSink) -> bool {
        if !is_moving {
            self.timer = 0.0;
            if self.sounding {
                audio.stop(&self.config.cue);
                self.sounding = false;
            }
            return false;
        }

        self.timer += dt;
        if self.timer >= self.config.step_interval {
            audio.play_one_shot(&self.config.cue);
            self.sounding = true;
            self.timer = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{AudioCommand, RecordingAudio};

    #[test]
    fn test_config_rejects_non_positive_interval() {
        assert!(FootstepConfig::default().validate().is_ok());

        for interval in [0.0, -0.35, f32::NAN, f32::INFINITY] {
            let config = FootstepConfig {
                step_interval: interval,
                ..FootstepConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(GladeError::InvalidValue {
                    field: "footsteps.step_interval",
                    ..
                })
            ));
        }

        let silent = FootstepConfig {
            cue: String::new(),
            ..FootstepConfig::default()
        };
        assert!(silent.validate().is_err());
    }

    #[test]
    fn test_steps_at_interval() {
        let mut cadence = FootstepCadence::new(FootstepConfig {
            cue: "step".to_string(),
            step_interval: 0.25,
        });
        let mut audio = RecordingAudio::new();

        // 1 second of walking at 10 Hz: a step every third tick
        for _ in 0..10 {
            cadence.tick(true, 0.1, &mut audio);
        }
        assert_eq!(audio.one_shots("step"), 3);
    }

    #[test]
    fn test_stop_resets_and_silences() {
        let mut cadence = FootstepCadence::new(FootstepConfig {
            cue: "step".to_string(),
            step_interval: 0.2,
        });
        let mut audio = RecordingAudio::new();

        assert!(!cadence.tick(true, 0.15, &mut audio));
        assert!(cadence.tick(true, 0.1, &mut audio));
        cadence.tick(false, 0.1, &mut audio);
        assert_eq!(audio.log.last(), Some(&AudioCommand::Stop("step".to_string())));

        // Timer restarted: 0.15 is not enough for a new step
        assert!(!cadence.tick(true, 0.15, &mut audio));
        assert_eq!(audio.one_shots("step"), 1);
    }

    #[test]
    fn test_idle_never_stops_silent_cue() {
        let mut cadence = FootstepCadence::new(FootstepConfig::default());
        let mut audio = RecordingAudio::new();
        cadence.tick(false, 0.1, &mut audio);
        assert!(audio.log.is_empty());
    }
}
