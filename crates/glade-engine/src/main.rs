//! # Glade Engine
//!
//! Headless runner for Glade levels.
//!
//! ```text
//! glade [CONFIG]                 run a level (default: platform config dir)
//! glade --write-config [PATH]    write the default configuration and exit
//! ```
//!
//! `RUST_LOG` overrides the configured log filter.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod host;
mod script;
mod timing;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, LogFormat};

/// Main entry point.
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--write-config") {
        let path = args.next().map_or_else(EngineConfig::config_path, PathBuf::from);
        EngineConfig::default()
            .save_to(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let path = first.map_or_else(EngineConfig::config_path, PathBuf::from);
    let mut config = EngineConfig::load_from(&path);
    config.validate();

    init_tracing(&config)?;

    info!("Glade starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Config: {}", path.display());

    let summary = app::run(&config)?;

    info!(frames = summary.frames, flow = ?summary.flow, "Glade shutdown complete");
    Ok(())
}

fn init_tracing(config: &EngineConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_filter))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
    Ok(())
}
