//! Headless host: sinks that log what a renderer, mixer or scene manager
//! would have been asked to do.

use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

use glade_common::ActorId;
use glade_gameplay::{AnimationSink, AudioSink, EventHandler, GameEvent, SceneLoader};

// ============================================================================
// Animation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamValue {
    Bool(bool),
    Float(f32),
    Int(i32),
}

/// Animation sink that logs parameter changes and triggers.
///
/// Parameters are written every frame; only changes are logged.
#[derive(Debug, Default)]
pub struct LoggingAnimation {
    params: HashMap<(ActorId, String), ParamValue>,
    triggers: u64,
}

impl LoggingAnimation {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triggers fired.
    #[must_use]
    pub fn trigger_count(&self) -> u64 {
        self.triggers
    }

    fn set(&mut self, actor: ActorId, name: &str, value: ParamValue) {
        let key = (actor, name.to_string());
        if self.params.get(&key) != Some(&value) {
            trace!(%actor, param = name, ?value, "Animator parameter");
            self.params.insert(key, value);
        }
    }
}

impl AnimationSink for LoggingAnimation {
    fn set_bool(&mut self, actor: ActorId, name: &str, value: bool) {
        self.set(actor, name, ParamValue::Bool(value));
    }

    fn set_float(&mut self, actor: ActorId, name: &str, value: f32) {
        self.set(actor, name, ParamValue::Float(value));
    }

    fn set_int(&mut self, actor: ActorId, name: &str, value: i32) {
        self.set(actor, name, ParamValue::Int(value));
    }

    fn trigger(&mut self, actor: ActorId, name: &str) {
        self.triggers += 1;
        debug!(%actor, trigger = name, "Animator trigger");
    }
}

// ============================================================================
// Audio
// ============================================================================

/// Audio sink that logs cues.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    one_shots: u64,
}

impl LoggingAudio {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of one-shot cues played.
    #[must_use]
    pub fn one_shot_count(&self) -> u64 {
        self.one_shots
    }
}

impl AudioSink for LoggingAudio {
    fn play_one_shot(&mut self, cue: &str) {
        self.one_shots += 1;
        trace!(cue, "Play one-shot");
    }

    fn play_loop(&mut self, cue: &str) {
        debug!(cue, "Play loop");
    }

    fn stop(&mut self, cue: &str) {
        debug!(cue, "Stop cue");
    }
}

// ============================================================================
// Scenes
// ============================================================================

/// Scene loader that logs loads and remembers the last one.
#[derive(Debug, Default)]
pub struct LoggingSceneLoader {
    last: Option<String>,
    loads: u32,
}

impl LoggingSceneLoader {
    /// Creates a loader with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Description of the last load.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Number of loads.
    #[must_use]
    pub fn load_count(&self) -> u32 {
        self.loads
    }
}

impl SceneLoader for LoggingSceneLoader {
    fn load_by_name(&mut self, name: &str) {
        info!(scene = name, "Loading scene");
        self.last = Some(name.to_string());
        self.loads += 1;
    }

    fn load_by_index(&mut self, index: usize) {
        info!(index, "Loading scene");
        self.last = Some(format!("#{index}"));
        self.loads += 1;
    }
}

// ============================================================================
// Events
// ============================================================================

/// Tallies of what happened during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Attacks started by any actor
    pub attacks: u32,
    /// Damage events
    pub hits: u32,
    /// Deaths
    pub deaths: u32,
    /// Dialogues opened
    pub dialogues: u32,
    /// Info panels opened
    pub panels: u32,
    /// Scene requests from trigger zones
    pub scene_requests: u32,
    /// Objective completed
    pub objective_completed: bool,
    /// Game over reached
    pub game_over: bool,
}

/// Event handler that logs gameplay events and tallies them.
#[derive(Debug, Default)]
pub struct EventLog {
    stats: RunStats,
    total: u64,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies so far.
    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Number of events handled.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl EventHandler for EventLog {
    fn handle(&mut self, event: &GameEvent) {
        self.total += 1;
        match event {
            GameEvent::AttackStarted { actor, direction } => {
                self.stats.attacks += 1;
                debug!(%actor, ?direction, "Attack started");
            },
            GameEvent::AttackEnded { actor, reason } => {
                debug!(%actor, ?reason, "Attack ended");
            },
            GameEvent::ActorDamaged {
                actor,
                damage,
                remaining,
                source,
            } => {
                self.stats.hits += 1;
                info!(%actor, damage, remaining, ?source, "Actor damaged");
            },
            GameEvent::ActorDied { actor } => {
                self.stats.deaths += 1;
                info!(%actor, "Actor died");
            },
            GameEvent::EnemyDespawned { actor } => debug!(%actor, "Enemy despawned"),
            GameEvent::DialogueOpened { actor, source } => {
                self.stats.dialogues += 1;
                info!(%actor, ?source, "Dialogue opened");
            },
            GameEvent::DialogueClosed { actor, reason } => info!(%actor, ?reason, "Dialogue closed"),
            GameEvent::PanelOpened { actor, source } => {
                self.stats.panels += 1;
                info!(%actor, %source, "Panel opened");
            },
            GameEvent::PanelClosed { actor, source } => info!(%actor, %source, "Panel closed"),
            GameEvent::InteractableRegistered { id } => debug!(%id, "Interactable in reach"),
            GameEvent::InteractableCleared { id } => debug!(%id, "Interactable out of reach"),
            GameEvent::SceneRequested { request } => {
                self.stats.scene_requests += 1;
                info!(?request, "Scene requested");
            },
            GameEvent::ObjectiveCompleted => {
                self.stats.objective_completed = true;
                info!("Objective complete");
            },
            GameEvent::Paused => info!("Paused"),
            GameEvent::Resumed => info!("Resumed"),
            GameEvent::GameOver => {
                self.stats.game_over = true;
                warn!("Game over");
            },
        }
    }
}
