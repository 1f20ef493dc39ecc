//! Engine configuration.
//!
//! Provides loop timing, logging and level content for a headless run.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use glade_gameplay::SimulationConfig;

use crate::script::InputScript;

/// Configuration file name.
const CONFIG_FILE: &str = "glade.toml";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Loop Settings ===
    /// Frames per second of the simulated frame clock
    pub target_fps: u32,
    /// Physics steps per second
    pub fixed_hz: u32,
    /// Seconds of gameplay to run before exiting
    pub run_seconds: f32,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,

    // === Logging Settings ===
    /// Default filter directive when `RUST_LOG` is unset
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,

    // === Content ===
    /// Level to simulate
    pub level: SimulationConfig,
    /// Scripted player input
    pub script: InputScript,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Loop
            target_fps: 60,
            fixed_hz: 50,
            run_seconds: 12.0,
            realtime: false,

            // Logging
            log_filter: "glade=info".to_string(),
            log_format: LogFormat::Pretty,

            // Content
            level: SimulationConfig::demo(),
            script: InputScript::demo(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// Falls back to the working directory when the platform has no
    /// config directory.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(|| PathBuf::from(CONFIG_FILE), |dir| dir.join("glade").join(CONFIG_FILE))
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Loop
        self.target_fps = self.target_fps.clamp(10, 240);
        self.fixed_hz = self.fixed_hz.clamp(10, 240);
        self.run_seconds = if self.run_seconds.is_finite() {
            self.run_seconds.clamp(0.0, 3600.0)
        } else {
            0.0
        };

        // Logging
        if self.log_filter.trim().is_empty() {
            self.log_filter = "glade=info".to_string();
        }

        // Content
        self.level.event_capacity = self.level.event_capacity.clamp(16, 65_536);
    }

    /// Number of frames the run lasts.
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        (self.run_seconds * self.target_fps as f32).round() as u64
    }
}
