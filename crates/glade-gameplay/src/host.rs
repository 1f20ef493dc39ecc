//! Interfaces to the hosting environment.
//!
//! Gameplay never talks to a renderer, audio device, physics engine or scene
//! loader directly. The host samples input into an [`InputFrame`] once per
//! frame and receives signals through the sink traits defined here. Every
//! sink is fire-and-forget: nothing returned from them flows back into the
//! state machine.

use glade_common::{Aabb, ActorId, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Input
// ============================================================================

/// Input sampled by the host for one frame.
///
/// Button fields are edges: `true` only on the frame the button went down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// Desired movement; unit length or shorter for device input.
    pub movement: Vec2,
    /// Attack button pressed this frame
    pub attack: bool,
    /// Interact button pressed this frame
    pub interact: bool,
    /// Advance-dialogue button pressed this frame
    pub advance: bool,
    /// Skip-dialogue button pressed this frame
    pub skip: bool,
    /// Pause button pressed this frame
    pub pause: bool,
}

impl InputFrame {
    /// Creates an empty input frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the movement vector, clamped to unit length.
    #[must_use]
    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement.clamp_length_max(1.0);
        self
    }

    /// Presses attack.
    #[must_use]
    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    /// Presses interact.
    #[must_use]
    pub fn with_interact(mut self) -> Self {
        self.interact = true;
        self
    }

    /// Presses advance.
    #[must_use]
    pub fn with_advance(mut self) -> Self {
        self.advance = true;
        self
    }

    /// Presses skip.
    #[must_use]
    pub fn with_skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Presses pause.
    #[must_use]
    pub fn with_pause(mut self) -> Self {
        self.pause = true;
        self
    }

    /// Steering input for AI-driven actors.
    ///
    /// `scale` multiplies the actor's configured movement speed and may
    /// exceed 1.0 (chasing is faster than patrolling).
    #[must_use]
    pub fn steering(direction: Vec2, scale: f32) -> Self {
        Self {
            movement: direction.normalize_or_zero() * scale.max(0.0),
            ..Self::default()
        }
    }
}

// ============================================================================
// Physics
// ============================================================================

/// Shape-cast query provided by the host physics.
pub trait ShapeCast {
    /// Sweeps `shape` along `direction` for `distance` units and returns how
    /// many colliders the sweep touches.
    fn cast(&self, shape: Aabb, direction: Vec2, distance: f32) -> usize;
}

// ============================================================================
// Animation
// ============================================================================

/// Receives animation parameters for actors.
pub trait AnimationSink {
    /// Sets a boolean parameter.
    fn set_bool(&mut self, actor: ActorId, name: &str, value: bool);

    /// Sets a float parameter.
    fn set_float(&mut self, actor: ActorId, name: &str, value: f32);

    /// Sets an integer parameter.
    fn set_int(&mut self, actor: ActorId, name: &str, value: i32);

    /// Fires a one-shot trigger.
    fn trigger(&mut self, actor: ActorId, name: &str);
}

/// Animation sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAnimation;

impl AnimationSink for NullAnimation {
    fn set_bool(&mut self, _actor: ActorId, _name: &str, _value: bool) {}
    fn set_float(&mut self, _actor: ActorId, _name: &str, _value: f32) {}
    fn set_int(&mut self, _actor: ActorId, _name: &str, _value: i32) {}
    fn trigger(&mut self, _actor: ActorId, _name: &str) {}
}

/// Animation sink that remembers the latest value of each parameter.
#[derive(Debug, Default, Clone)]
pub struct RecordingAnimation {
    bools: HashMap<(ActorId, String), bool>,
    floats: HashMap<(ActorId, String), f32>,
    ints: HashMap<(ActorId, String), i32>,
    triggers: Vec<(ActorId, String)>,
}

impl RecordingAnimation {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest boolean value set for a parameter.
    #[must_use]
    pub fn bool_param(&self, actor: ActorId, name: &str) -> Option<bool> {
        self.bools.get(&(actor, name.to_string())).copied()
    }

    /// Latest float value set for a parameter.
    #[must_use]
    pub fn float_param(&self, actor: ActorId, name: &str) -> Option<f32> {
        self.floats.get(&(actor, name.to_string())).copied()
    }

    /// Latest integer value set for a parameter.
    #[must_use]
    pub fn int_param(&self, actor: ActorId, name: &str) -> Option<i32> {
        self.ints.get(&(actor, name.to_string())).copied()
    }

    /// Number of times a trigger fired for an actor.
    #[must_use]
    pub fn trigger_count(&self, actor: ActorId, name: &str) -> usize {
        self.triggers
            .iter()
            .filter(|(a, n)| *a == actor && n == name)
            .count()
    }
}

impl AnimationSink for RecordingAnimation {
    fn set_bool(&mut self, actor: ActorId, name: &str, value: bool) {
        self.bools.insert((actor, name.to_string()), value);
    }

    fn set_float(&mut self, actor: ActorId, name: &str, value: f32) {
        self.floats.insert((actor, name.to_string()), value);
    }

    fn set_int(&mut self, actor: ActorId, name: &str, value: i32) {
        self.ints.insert((actor, name.to_string()), value);
    }

    fn trigger(&mut self, actor: ActorId, name: &str) {
        self.triggers.push((actor, name.to_string()));
    }
}

// ============================================================================
// Audio
// ============================================================================

/// Receives audio cues.
pub trait AudioSink {
    /// Plays a cue once.
    fn play_one_shot(&mut self, cue: &str);

    /// Starts a looping cue.
    fn play_loop(&mut self, cue: &str);

    /// Stops a cue.
    fn stop(&mut self, cue: &str);
}

/// Audio sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_one_shot(&mut self, _cue: &str) {}
    fn play_loop(&mut self, _cue: &str) {}
    fn stop(&mut self, _cue: &str) {}
}

/// An audio command captured by [`RecordingAudio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    /// `play_one_shot`
    OneShot(String),
    /// `play_loop`
    Loop(String),
    /// `stop`
    Stop(String),
}

/// Audio sink that keeps a log of every command.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    /// Commands in the order received
    pub log: Vec<AudioCommand>,
}

impl RecordingAudio {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of one-shots played for a cue.
    #[must_use]
    pub fn one_shots(&self, cue: &str) -> usize {
        self.log
            .iter()
            .filter(|c| matches!(c, AudioCommand::OneShot(name) if name == cue))
            .count()
    }
}

impl AudioSink for RecordingAudio {
    fn play_one_shot(&mut self, cue: &str) {
        self.log.push(AudioCommand::OneShot(cue.to_string()));
    }

    fn play_loop(&mut self, cue: &str) {
        self.log.push(AudioCommand::Loop(cue.to_string()));
    }

    fn stop(&mut self, cue: &str) {
        self.log.push(AudioCommand::Stop(cue.to_string()));
    }
}

// ============================================================================
// Scenes
// ============================================================================

/// Loads scenes on behalf of gameplay.
pub trait SceneLoader {
    /// Loads a scene by catalogue name.
    fn load_by_name(&mut self, name: &str);

    /// Loads a scene by catalogue index.
    fn load_by_index(&mut self, index: usize);
}

/// A scene load captured by [`RecordingSceneLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneLoad {
    /// Loaded by name
    Name(String),
    /// Loaded by index
    Index(usize),
}

/// Scene loader that records every load.
#[derive(Debug, Default, Clone)]
pub struct RecordingSceneLoader {
    /// Loads in the order received
    pub loads: Vec<SceneLoad>,
}

impl RecordingSceneLoader {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneLoader for RecordingSceneLoader {
    fn load_by_name(&mut self, name: &str) {
        self.loads.push(SceneLoad::Name(name.to_string()));
    }

    fn load_by_index(&mut self, index: usize) {
        self.loads.push(SceneLoad::Index(index));
    }
}

/// Bundle of host sinks handed to the simulation each tick.
pub struct HostSinks<'a> {
    /// Animation parameter sink
    pub animation: &'a mut dyn AnimationSink,
    /// Audio sink
    pub audio: &'a mut dyn AudioSink,
    /// Scene loader
    pub scenes: &'a mut dyn SceneLoader,
}

impl<'a> HostSinks<'a> {
    /// Bundles the three sinks.
    pub fn new(
        animation: &'a mut dyn AnimationSink,
        audio: &'a mut dyn AudioSink,
        scenes: &'a mut dyn SceneLoader,
    ) -> Self {
        Self {
            animation,
            audio,
            scenes,
        }
    }
}
