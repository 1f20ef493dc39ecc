//! Scene flow: scene requests, delayed changes, pause and game over.
//!
//! Scene loading itself belongs to the host. The director resolves requests
//! against a catalogue, rejects the ones that point nowhere and forwards the
//! rest to a [`SceneLoader`].

use glade_common::{GladeError, GladeResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::host::SceneLoader;

// ============================================================================
// Catalogue and requests
// ============================================================================

/// Ordered list of scene names; a scene's index is its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCatalog {
    scenes: Vec<String>,
}

impl SceneCatalog {
    /// Creates a catalogue.
    #[must_use]
    pub fn new<I, S>(scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scenes: scenes.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Name at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.scenes.get(index).map(String::as_str)
    }

    /// Index of `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s == name)
    }
}

/// Where to go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneRequest {
    /// Catalogue index.
    Index(usize),
    /// Catalogue name.
    Name(String),
    /// Offset from the active scene.
    Relative(i64),
    /// Load the active scene again.
    ReloadActive,
}

/// Game flow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlowState {
    /// Gameplay runs.
    #[default]
    Playing,
    /// Gameplay frozen by the player.
    Paused,
    /// Player died; gameplay frozen until restart or menu.
    GameOver,
}

/// Scene configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// All scenes.
    pub catalog: SceneCatalog,
    /// Index of the scene running at start.
    pub initial: usize,
    /// Scene loaded by "main menu".
    pub menu_scene: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            catalog: SceneCatalog::new(["MainMenu", "Village", "Forest"]),
            initial: 1,
            menu_scene: "MainMenu".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ScheduledChange {
    request: SceneRequest,
    remaining: f32,
}

// ============================================================================
// Director
// ============================================================================

/// Resolves scene requests and tracks the flow state.
#[derive(Debug, Clone)]
pub struct SceneDirector {
    catalog: SceneCatalog,
    active: usize,
    menu_scene: String,
    flow: FlowState,
    scheduled: Option<ScheduledChange>,
}

impl SceneDirector {
    /// Creates a director on the configured initial scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            active: config.initial,
            catalog: config.catalog,
            menu_scene: config.menu_scene,
            flow: FlowState::Playing,
            scheduled: None,
        }
    }

    /// Index of the active scene.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Name of the active scene.
    #[must_use]
    pub fn active_name(&self) -> Option<&str> {
        self.catalog.name(self.active)
    }

    /// Scene catalogue.
    #[must_use]
    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// Current flow state.
    #[must_use]
    pub fn flow(&self) -> FlowState {
        self.flow
    }

    /// Whether gameplay should tick.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.flow == FlowState::Playing
    }

    /// Multiplier for gameplay time.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        if self.is_running() {
            1.0
        } else {
            0.0
        }
    }

    /// Whether a delayed change is waiting.
    #[must_use]
    pub fn has_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Resolve a request to a catalogue index.
    pub fn resolve(&self, request: &SceneRequest) -> GladeResult<usize> {
        let index = match request {
            SceneRequest::Index(index) => Some(*index).filter(|i| *i < self.catalog.len()),
            SceneRequest::Name(name) => self.catalog.index_of(name),
            SceneRequest::Relative(offset) => i64::try_from(self.active)
                .ok()
                .and_then(|active| active.checked_add(*offset))
                .and_then(|target| usize::try_from(target).ok())
                .filter(|i| *i < self.catalog.len()),
            SceneRequest::ReloadActive => Some(self.active).filter(|i| *i < self.catalog.len()),
        };
        index.ok_or_else(|| GladeError::OutOfRangeRequest(format!("{request:?} with {} scenes", self.catalog.len())))
    }

    /// Load a scene now.
    ///
    /// Requests that resolve to nothing are logged and ignored. Any load puts
    /// the flow back to playing.
    pub fn request(&mut self, request: &SceneRequest, loader: &mut dyn SceneLoader) -> Option<usize> {
        let index = match self.resolve(request) {
            Ok(index) => index,
            Err(err) => {
                warn!(%err, "Scene request ignored");
                return None;
            },
        };

        match request {
            SceneRequest::Name(name) => loader.load_by_name(name),
            _ => loader.load_by_index(index),
        }
        info!(index, name = ?self.catalog.name(index), "Loading scene");
        self.active = index;
        self.flow = FlowState::Playing;
        self.scheduled = None;
        Some(index)
    }

    /// Load a scene after `delay` seconds of running time. Replaces any
    /// pending change.
    pub fn schedule(&mut self, request: SceneRequest, delay: f32) {
        debug!(?request, delay, "Scene change scheduled");
        self.scheduled = Some(ScheduledChange {
            request,
            remaining: delay.max(0.0),
        });
    }

    /// Count down a scheduled change. Returns the loaded index when it fires.
    ///
    /// A scheduled change fires once, even if its request is rejected.
    pub fn tick(&mut self, dt: f32, loader: &mut dyn SceneLoader) -> Option<usize> {
        let change = self.scheduled.as_mut()?;
        change.remaining -= dt;
        if change.remaining > 0.0 {
            return None;
        }
        let change = self.scheduled.take()?;
        self.request(&change.request, loader)
    }

    /// Toggle between playing and paused. Game over is unaffected.
    pub fn toggle_pause(&mut self) -> FlowState {
        self.flow = match self.flow {
            FlowState::Playing => FlowState::Paused,
            FlowState::Paused => FlowState::Playing,
            FlowState::GameOver => FlowState::GameOver,
        };
        debug!(flow = ?self.flow, "Pause toggled");
        self.flow
    }

    /// Enter game over. Returns true only the first time.
    pub fn game_over(&mut self) -> bool {
        if self.flow == FlowState::GameOver {
            return false;
        }
        info!(scene = ?self.active_name(), "Game over");
        self.flow = FlowState::GameOver;
        true
    }

    /// Reload the active scene and resume play.
    pub fn restart(&mut self, loader: &mut dyn SceneLoader) -> Option<usize> {
        self.request(&SceneRequest::ReloadActive, loader)
    }

    /// Load the menu scene and resume play.
    pub fn main_menu(&mut self, loader: &mut dyn SceneLoader) -> Option<usize> {
        let menu = SceneRequest::Name(self.menu_scene.clone());
        self.request(&menu, loader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingSceneLoader, SceneLoad};

    fn director() -> SceneDirector {
        SceneDirector::new(SceneConfig::default())
    }

    #[test]
    fn test_request_by_index_and_name() {
        let mut director = director();
        let mut loader = RecordingSceneLoader::new();

        assert_eq!(director.request(&SceneRequest::Index(2), &mut loader), Some(2));
        assert_eq!(director.request(&SceneRequest::Name("MainMenu".into()), &mut loader), Some(0));
        assert_eq!(
            loader.loads,
            vec![SceneLoad::Index(2), SceneLoad::Name("MainMenu".to_string())]
        );
        assert_eq!(director.active_name(), Some("MainMenu"));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut director = director();
        let mut loader = RecordingSceneLoader::new();

        assert!(director.request(&SceneRequest::Index(3), &mut loader).is_none());
        assert!(director.request(&SceneRequest::Name("Credits".into()), &mut loader).is_none());
        assert!(director.request(&SceneRequest::Relative(-2), &mut loader).is_none());
        assert!(loader.loads.is_empty());
        assert_eq!(director.active(), 1);

        assert!(matches!(
            director.resolve(&SceneRequest::Index(9)),
            Err(GladeError::OutOfRangeRequest(_))
        ));
    }

    #[test]
    fn test_relative_request() {
        let mut director = director();
        let mut loader = RecordingSceneLoader::new();
        assert_eq!(director.request(&SceneRequest::Relative(1), &mut loader), Some(2));
        assert_eq!(director.request(&SceneRequest::Relative(-2), &mut loader), Some(0));
    }

    #[test]
    fn test_delayed_change_fires_once() {
        let mut director = director();
        let mut loader = RecordingSceneLoader::new();
        director.schedule(SceneRequest::Index(2), 0.5);

        assert!(director.tick(0.3, &mut loader).is_none());
        assert_eq!(director.tick(0.3, &mut loader), Some(2));
        for _ in 0..10 {
            assert!(director.tick(0.3, &mut loader).is_none());
        }
        assert_eq!(loader.loads, vec![SceneLoad::Index(2)]);
    }

    #[test]
    fn test_rejected_scheduled_change_is_dropped() {
        let mut director = director();
        let mut loader = RecordingSceneLoader::new();
        director.schedule(SceneRequest::Index(42), 0.0);
        assert!(director.tick(0.1, &mut loader).is_none());
        assert!(!director.has_scheduled());
    }

    #[test]
    fn test_pause_and_game_over() {
        let mut director = director();
        let mut loader = RecordingSceneLoader::new();

        assert_eq!(director.toggle_pause(), FlowState::Paused);
        assert_eq!(director.time_scale(), 0.0);
        assert_eq!(director.toggle_pause(), FlowState::Playing);

        assert!(director.game_over());
        assert!(!director.game_over());
        assert_eq!(director.toggle_pause(), FlowState::GameOver);

        assert_eq!(director.restart(&mut loader), Some(1));
        assert!(director.is_running());

        director.game_over();
        assert_eq!(director.main_menu(&mut loader), Some(0));
        assert_eq!(loader.loads.last(), Some(&SceneLoad::Name("MainMenu".to_string())));
        assert_eq!(director.flow(), FlowState::Playing);
    }
}
