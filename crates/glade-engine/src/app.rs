//! Headless run loop.
//!
//! Frames tick the simulation with scripted input; physics steps run on the
//! fixed timestep in between. Events are drained into the log once per frame.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use glade_gameplay::{FlowState, HostSinks, SceneRequest, Simulation};

use crate::config::EngineConfig;
use crate::host::{EventLog, LoggingAnimation, LoggingAudio, LoggingSceneLoader, RunStats};
use crate::script::ScriptPlayer;
use crate::timing::{ClockMode, FrameTiming};

/// What a run ended with.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frames ticked
    pub frames: u64,
    /// Physics steps
    pub fixed_steps: u64,
    /// Gameplay seconds elapsed
    pub elapsed: f32,
    /// Event tallies
    pub stats: RunStats,
    /// Player health at the end
    pub player_health: i32,
    /// Enemies still alive
    pub enemies_left: usize,
    /// Last scene the loader was asked for
    pub last_scene: Option<String>,
    /// Flow state at the end
    pub flow: FlowState,
}

/// Run the configured level until the time runs out or the player dies.
pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    let mut simulation = Simulation::new(config.level.clone());
    let mut animation = LoggingAnimation::new();
    let mut audio = LoggingAudio::new();
    let mut scenes = LoggingSceneLoader::new();
    let mut log = EventLog::new();
    let mut script = ScriptPlayer::new(&config.script);

    let initial = simulation
        .director()
        .resolve(&SceneRequest::ReloadActive)
        .context("initial scene is not in the catalogue")?;
    simulation.director_mut().request(&SceneRequest::Index(initial), &mut scenes);

    let mode = if config.realtime {
        ClockMode::Realtime
    } else {
        ClockMode::Simulated
    };
    let mut timing = FrameTiming::new(mode, config.target_fps, config.fixed_hz);
    let fixed_dt = timing.fixed_dt();
    let total_frames = config.total_frames();

    info!(
        frames = total_frames,
        fps = config.target_fps,
        fixed_hz = config.fixed_hz,
        ?mode,
        "Run starting"
    );

    let mut frames = 0;
    let mut fixed_steps = 0;
    timing.reset();

    while frames < total_frames {
        let dt = timing.delta_time();
        let input = script.next_frame(dt);

        {
            let mut sinks = HostSinks::new(&mut animation, &mut audio, &mut scenes);
            simulation.tick(dt, &input, &mut sinks);

            let steps = timing.accumulate(dt);
            for _ in 0..steps {
                simulation.fixed_tick(fixed_dt, &mut sinks);
            }
            fixed_steps += u64::from(steps);
        }

        simulation.events().dispatch(&mut log);
        frames += 1;

        if simulation.director().flow() == FlowState::GameOver {
            warn!(frame = frames, "Player died, ending run");
            break;
        }

        timing.sleep_remainder();
    }

    if !script.is_idle() {
        debug!(pending = script.pending_action_count(), "Run ended before the script");
    }

    let summary = RunSummary {
        frames,
        fixed_steps,
        elapsed: simulation.elapsed(),
        stats: log.stats(),
        player_health: simulation.player().health().current(),
        enemies_left: simulation.enemies().count(),
        last_scene: scenes.last().map(str::to_string),
        flow: simulation.director().flow(),
    };

    info!(
        frames = summary.frames,
        fixed_steps = summary.fixed_steps,
        elapsed = summary.elapsed,
        events = log.total(),
        triggers = animation.trigger_count(),
        cues = audio.one_shot_count(),
        fps = timing.current_fps(),
        "Run finished"
    );
    info!(
        health = summary.player_health,
        enemies_left = summary.enemies_left,
        scene = ?summary.last_scene,
        scene_loads = scenes.load_count(),
        stats = ?summary.stats,
        "Final state"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Button, InputScript, ScriptAction};
    use glade_gameplay::SimulationConfig;

    fn quiet(seconds: f32) -> EngineConfig {
        EngineConfig {
            run_seconds: seconds,
            level: SimulationConfig::empty(),
            script: InputScript::default(),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_run_counts_frames_and_steps() {
        let summary = run(&quiet(1.0)).expect("run");
        assert_eq!(summary.frames, 60);
        assert!((49..=50).contains(&summary.fixed_steps));
        assert!((summary.elapsed - 1.0).abs() < 1e-3);
        assert_eq!(summary.flow, FlowState::Playing);
        assert_eq!(summary.last_scene.as_deref(), Some("#1"));
    }

    #[test]
    fn test_bad_initial_scene_is_an_error() {
        let mut config = quiet(0.1);
        config.level.scenes.initial = 99;
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_pause_freezes_gameplay_time() {
        let mut config = quiet(1.0);
        config.script = InputScript {
            steps: vec![ScriptAction::Press {
                button: Button::Pause,
            }],
        };
        let summary = run(&config).expect("run");
        assert_eq!(summary.frames, 60);
        assert_eq!(summary.elapsed, 0.0);
        assert_eq!(summary.flow, FlowState::Paused);
    }

    #[test]
    fn test_demo_run_talks_and_fights() {
        let summary = run(&EngineConfig::default()).expect("run");
        assert_eq!(summary.stats.dialogues, 1);
        assert!(summary.stats.attacks > 0);
        assert!(summary.player_health > 0);
    }
}
