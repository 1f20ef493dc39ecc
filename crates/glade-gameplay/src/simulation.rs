//! Level simulation.
//!
//! Owns the player, enemies, interactables, trigger zones, scene director,
//! objective and event bus, and advances them in a fixed order:
//!
//! Per frame ([`Simulation::tick`]):
//! 1. Pause toggle (frozen flow skips everything below)
//! 2. Scheduled scene change and objective fade
//! 3. Interact input toggles the open info panel, or engages the registered
//!    interactable
//! 4. Player input and timers
//! 5. Enemy brains, enemy input and enemy strikes on the player
//! 6. Signals to events, despawns, game over
//!
//! Per physics step ([`Simulation::fixed_tick`]):
//! 1. Player and enemy movement
//! 2. Player hitbox against enemy bodies
//! 3. Proximity edges into the interaction registry, falling back to another
//!    interactable still in range when the registered one is left
//! 4. Trigger zones
//! 5. Signals to events, despawns, game over

use glade_common::{Aabb, ActorId, InteractableId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::actor::{ActorActionStateMachine, ActorConfig, ActorSignal};
use crate::dialogue::DialogueScript;
use crate::enemy_ai::{AiMode, EnemyBrain, EnemyBrainConfig};
use crate::events::{EventBus, GameEvent};
use crate::health::DamageOutcome;
use crate::host::{HostSinks, InputFrame, SceneLoader};
use crate::interaction::{Interactable, InteractableKind, ProximityEdge, ProximityTracker, TriggerAction, TriggerZone};
use crate::movement::BoxWorld;
use crate::objective::{ObjectiveConfig, ObjectiveTracker};
use crate::scene::{FlowState, SceneConfig, SceneDirector, SceneRequest};

// ============================================================================
// Configuration
// ============================================================================

/// One enemy placed in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySpawn {
    /// Actor configuration.
    pub actor: ActorConfig,
    /// Brain configuration.
    pub brain: EnemyBrainConfig,
    /// Spawn position.
    pub position: Vec2,
}

impl Default for EnemySpawn {
    fn default() -> Self {
        Self {
            actor: ActorConfig::enemy("slime"),
            brain: EnemyBrainConfig::default(),
            position: Vec2::ZERO,
        }
    }
}

/// Level content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Player configuration.
    pub player: ActorConfig,
    /// Player spawn position.
    pub player_spawn: Vec2,
    /// Enemies.
    pub enemies: Vec<EnemySpawn>,
    /// Interactables.
    pub interactables: Vec<Interactable>,
    /// Trigger zones.
    pub triggers: Vec<TriggerZone>,
    /// Static collision.
    pub obstacles: Vec<Aabb>,
    /// Scene catalogue and menu.
    pub scenes: SceneConfig,
    /// Level objective.
    pub objective: ObjectiveConfig,
    /// Event bus capacity.
    pub event_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::demo()
    }
}

impl SimulationConfig {
    /// A level with only the player in it.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            player: ActorConfig::player("player"),
            player_spawn: Vec2::ZERO,
            enemies: Vec::new(),
            interactables: Vec::new(),
            triggers: Vec::new(),
            obstacles: Vec::new(),
            scenes: SceneConfig::default(),
            objective: ObjectiveConfig::default(),
            event_capacity: 1024,
        }
    }

    /// The village level: an elder to talk to, a patrolling slime, a wall
    /// and an exit to the forest behind the objective marker.
    #[must_use]
    pub fn demo() -> Self {
        let elder = DialogueScript::new([
            "Welcome, traveller.",
            "A slime has been bothering the village.",
            "The forest lies to the east. Good luck!",
        ]);

        Self {
            enemies: vec![EnemySpawn {
                actor: ActorConfig::enemy("slime"),
                brain: EnemyBrainConfig {
                    waypoints: vec![Vec2::new(6.0, -2.0), Vec2::new(6.0, 2.0)],
                    ..EnemyBrainConfig::default()
                },
                position: Vec2::new(6.0, 0.0),
            }],
            interactables: vec![Interactable::dialogue(
                InteractableId::new(1),
                Vec2::new(0.0, 2.0),
                1.5,
                elder,
            )],
            triggers: vec![
                TriggerZone::new(
                    Aabb::new(Vec2::new(10.0, -1.0), Vec2::new(11.0, 1.0)),
                    TriggerAction::CompleteObjective,
                ),
                TriggerZone::new(
                    Aabb::new(Vec2::new(12.0, -1.0), Vec2::new(13.0, 1.0)),
                    TriggerAction::LoadScene(SceneRequest::Name("Forest".to_string())),
                ),
            ],
            obstacles: vec![Aabb::new(Vec2::new(3.0, 1.0), Vec2::new(3.5, 5.0))],
            ..Self::empty()
        }
    }
}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Debug, Clone)]
struct Enemy {
    actor: ActorActionStateMachine,
    brain: EnemyBrain,
}

/// A running level.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    player: ActorActionStateMachine,
    enemies: Vec<Enemy>,
    interactables: Vec<Interactable>,
    triggers: Vec<TriggerZone>,
    proximity: ProximityTracker,
    world: BoxWorld,
    director: SceneDirector,
    objective: ObjectiveTracker,
    events: EventBus,
    elapsed: f32,
}

impl Simulation {
    /// Build a level from configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let director = SceneDirector::new(config.scenes.clone());
        let events = EventBus::new(config.event_capacity);
        let mut simulation = Self {
            player: spawn_player(&config),
            enemies: Vec::new(),
            interactables: Vec::new(),
            triggers: Vec::new(),
            proximity: ProximityTracker::new(),
            world: BoxWorld::new(),
            director,
            objective: ObjectiveTracker::new(config.objective.clone()),
            events,
            elapsed: 0.0,
            config,
        };
        simulation.populate();
        simulation
    }

    fn populate(&mut self) {
        self.enemies = self
            .config
            .enemies
            .iter()
            .map(spawn_enemy)
            .collect();
        self.interactables = self.config.interactables.clone();
        self.triggers = self.config.triggers.clone();
        self.proximity.clear();
        self.world = BoxWorld::with_obstacles(self.config.obstacles.clone());
        self.objective = ObjectiveTracker::new(self.config.objective.clone());
        self.elapsed = 0.0;
        info!(
            enemies = self.enemies.len(),
            interactables = self.interactables.len(),
            triggers = self.triggers.len(),
            "Level populated"
        );
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    /// The player.
    #[must_use]
    pub fn player(&self) -> &ActorActionStateMachine {
        &self.player
    }

    /// Mutable player access for host signals such as attack-finished.
    pub fn player_mut(&mut self) -> &mut ActorActionStateMachine {
        &mut self.player
    }

    /// Living enemies.
    pub fn enemies(&self) -> impl Iterator<Item = &ActorActionStateMachine> {
        self.enemies.iter().map(|enemy| &enemy.actor)
    }

    /// Brain mode of an enemy.
    #[must_use]
    pub fn enemy_mode(&self, id: ActorId) -> Option<AiMode> {
        self.enemies
            .iter()
            .find(|enemy| enemy.actor.id() == id)
            .map(|enemy| enemy.brain.mode())
    }

    /// Interactables in the level.
    #[must_use]
    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }

    /// Static collision.
    #[must_use]
    pub fn world(&self) -> &BoxWorld {
        &self.world
    }

    /// Scene director.
    #[must_use]
    pub fn director(&self) -> &SceneDirector {
        &self.director
    }

    /// Mutable director access, e.g. to schedule a delayed scene change.
    pub fn director_mut(&mut self) -> &mut SceneDirector {
        &mut self.director
    }

    /// Objective tracker.
    #[must_use]
    pub fn objective(&self) -> &ObjectiveTracker {
        &self.objective
    }

    /// Event bus; drain it once per frame.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Running gameplay time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // ------------------------------------------------------------------------
    // Flow
    // ------------------------------------------------------------------------

    /// Reload the active scene and rebuild the level.
    pub fn restart(&mut self, scenes: &mut dyn SceneLoader) {
        if self.director.restart(scenes).is_some() {
            self.player = spawn_player(&self.config);
            self.populate();
        }
    }

    /// Go to the menu scene.
    pub fn main_menu(&mut self, scenes: &mut dyn SceneLoader) {
        self.director.main_menu(scenes);
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Per-frame update.
    pub fn tick(&mut self, dt: f32, input: &InputFrame, sinks: &mut HostSinks<'_>) {
        if input.pause {
            self.toggle_pause();
        }
        if !self.director.is_running() {
            return;
        }
        self.elapsed += dt;

        self.director.tick(dt, sinks.scenes);
        self.objective.tick(dt);

        if input.interact {
            self.interact();
        }

        self.player.tick(dt, input, sinks.animation, sinks.audio);
        self.update_enemies(dt, sinks);
        self.settle();
    }

    /// Per-physics-step update.
    pub fn fixed_tick(&mut self, dt: f32, sinks: &mut HostSinks<'_>) {
        if !self.director.is_running() {
            return;
        }

        self.player.fixed_tick(dt, &self.world);
        for enemy in &mut self.enemies {
            enemy.actor.fixed_tick(dt, &self.world);
        }

        self.resolve_player_hits();
        self.update_proximity();
        self.update_triggers(sinks.scenes);
        self.settle();
    }

    fn toggle_pause(&mut self) {
        let before = self.director.flow();
        let after = self.director.toggle_pause();
        match (before, after) {
            (FlowState::Playing, FlowState::Paused) => {
                self.events.publish(GameEvent::Paused);
            },
            (FlowState::Paused, FlowState::Playing) => {
                self.events.publish(GameEvent::Resumed);
            },
            _ => {},
        }
    }

    fn interact(&mut self) {
        // An open panel closes on interact even after the player left its range
        if self.player.is_panel_open() {
            self.player.close_panel();
            return;
        }
        if self.player.is_in_dialogue() {
            return;
        }
        let Some(id) = self.player.interaction().current() else {
            return;
        };
        let Some(interactable) = self.interactables.iter().find(|i| i.id == id) else {
            debug!(%id, "Registered interactable no longer exists");
            return;
        };
        match &interactable.kind {
            InteractableKind::Dialogue(script) => {
                self.player.open_dialogue(script.clone(), Some(id));
            },
            InteractableKind::Panel { .. } => {
                self.player.open_panel(id);
            },
        }
    }

    fn update_enemies(&mut self, dt: f32, sinks: &mut HostSinks<'_>) {
        let target = (!self.player.is_dead()).then(|| self.player.position());

        for enemy in &mut self.enemies {
            if enemy.actor.is_dead() || enemy.actor.is_disabled() {
                continue;
            }
            let speed = enemy.actor.config().movement.speed;
            let decision = enemy.brain.think(dt, enemy.actor.position(), target, speed);
            if let Some(direction) = decision.face {
                enemy.actor.face(direction);
            }
            enemy.actor.tick(dt, &decision.input, sinks.animation, sinks.audio);

            if let Some(damage) = decision.strike {
                let outcome = self.player.take_damage(damage);
                publish_damage(&self.events, self.player.id(), Some(enemy.actor.id()), outcome);
            }
        }
    }

    fn resolve_player_hits(&mut self) {
        let Some(hitbox) = self.player.active_hitbox() else {
            return;
        };
        let damage = self.player.attack_damage();

        for enemy in &mut self.enemies {
            if enemy.actor.is_dead() {
                continue;
            }
            let Some(body) = enemy.actor.body_aabb() else {
                continue;
            };
            if hitbox.overlaps(&body) && self.player.register_hit(enemy.actor.id()) {
                let outcome = enemy.actor.take_damage(damage);
                publish_damage(&self.events, enemy.actor.id(), Some(self.player.id()), outcome);
            }
        }
    }

    fn update_proximity(&mut self) {
        for edge in self.proximity.update(self.player.position(), &self.interactables) {
            match edge {
                ProximityEdge::Enter(id) => {
                    self.player.interaction_mut().set(id);
                    self.events.publish(GameEvent::InteractableRegistered { id });
                },
                ProximityEdge::Exit(id) => {
                    if self.player.interaction_mut().clear(id) {
                        self.events.publish(GameEvent::InteractableCleared { id });
                    }
                },
            }
        }

        if self.player.interaction().current().is_none() {
            if let Some(id) = self.nearest_in_range() {
                self.player.interaction_mut().set(id);
                self.events.publish(GameEvent::InteractableRegistered { id });
            }
        }
    }

    /// Closest interactable the player is still inside the range of.
    fn nearest_in_range(&self) -> Option<InteractableId> {
        let position = self.player.position();
        self.interactables
            .iter()
            .filter(|i| self.proximity.is_inside(i.id))
            .min_by(|a, b| {
                let da = a.position.distance_squared(position);
                let db = b.position.distance_squared(position);
                da.total_cmp(&db)
            })
            .map(|i| i.id)
    }

    fn update_triggers(&mut self, scenes: &mut dyn SceneLoader) {
        let Some(body) = self.player.body_aabb() else {
            return;
        };

        let fired: Vec<TriggerAction> = self
            .triggers
            .iter_mut()
            .filter_map(|zone| zone.update(&body).cloned())
            .collect();

        for action in fired {
            match action {
                TriggerAction::LoadScene(request) => {
                    self.events.publish(GameEvent::SceneRequested {
                        request: request.clone(),
                    });
                    self.director.request(&request, scenes);
                },
                TriggerAction::CompleteObjective => {
                    if self.objective.reach_destination() {
                        self.events.publish(GameEvent::ObjectiveCompleted);
                    }
                },
            }
        }
    }

    /// Turn actor signals into events, remove dead enemies and end the game
    /// when the player dies.
    fn settle(&mut self) {
        publish_signals(&self.events, self.player.id(), self.player.drain_signals());
        for enemy in &mut self.enemies {
            publish_signals(&self.events, enemy.actor.id(), enemy.actor.drain_signals());
        }

        let events = &self.events;
        self.enemies.retain(|enemy| {
            if enemy.actor.is_dead() {
                debug!(actor = %enemy.actor.id(), "Enemy despawned");
                events.publish(GameEvent::EnemyDespawned { actor: enemy.actor.id() });
                false
            } else {
                true
            }
        });

        if self.player.is_dead() && self.director.game_over() {
            self.events.publish(GameEvent::GameOver);
        }
    }
}

fn spawn_player(config: &SimulationConfig) -> ActorActionStateMachine {
    ActorActionStateMachine::new(ActorId::new(), config.player.clone()).with_position(config.player_spawn)
}

fn publish_damage(events: &EventBus, actor: ActorId, source: Option<ActorId>, outcome: DamageOutcome) {
    let (damage, remaining) = match outcome {
        DamageOutcome::Ignored => return,
        DamageOutcome::Damaged { applied, remaining } => (applied, remaining),
        DamageOutcome::Killed { applied } => (applied, 0),
    };
    events.publish(GameEvent::ActorDamaged {
        actor,
        damage,
        remaining,
        source,
    });
}

// Damage events are published where the hit lands so they carry the source.
fn spawn_enemy(spawn: &EnemySpawn) -> Enemy {
    let mut actor = ActorActionStateMachine::new(ActorId::new(), spawn.actor.clone()).with_position(spawn.position);
    if let Err(err) = spawn.brain.validate() {
        if !actor.is_disabled() {
            error!(actor = %spawn.actor.name, id = %actor.id(), %err, "Enemy brain misconfigured, disabling it");
            actor.disable();
        }
    }
    Enemy {
        actor,
        brain: EnemyBrain::new(spawn.brain.clone()),
    }
}

fn publish_signals(events: &EventBus, actor: ActorId, signals: Vec<ActorSignal>) {
    for signal in signals {
        let event = match signal {
            ActorSignal::AttackStarted { direction } => GameEvent::AttackStarted { actor, direction },
            ActorSignal::AttackEnded { reason } => GameEvent::AttackEnded { actor, reason },
            ActorSignal::DialogueOpened { source, .. } => GameEvent::DialogueOpened { actor, source },
            ActorSignal::DialogueClosed { reason } => GameEvent::DialogueClosed { actor, reason },
            ActorSignal::PanelOpened { source } => GameEvent::PanelOpened { actor, source },
            ActorSignal::PanelClosed { source } => GameEvent::PanelClosed { actor, source },
            ActorSignal::Died => GameEvent::ActorDied { actor },
            ActorSignal::DialogueAdvanced { .. } | ActorSignal::Damaged { .. } => continue,
        };
        events.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActionState;
    use crate::host::{NullAnimation, NullAudio, RecordingSceneLoader, SceneLoad};

    const FRAME: f32 = 1.0 / 50.0;

    struct Host {
        animation: NullAnimation,
        audio: NullAudio,
        scenes: RecordingSceneLoader,
    }

    impl Host {
        fn new() -> Self {
            Self {
                animation: NullAnimation,
                audio: NullAudio,
                scenes: RecordingSceneLoader::new(),
            }
        }

        fn step(&mut self, sim: &mut Simulation, input: InputFrame) {
            let mut sinks = HostSinks::new(&mut self.animation, &mut self.audio, &mut self.scenes);
            sim.tick(FRAME, &input, &mut sinks);
            sim.fixed_tick(FRAME, &mut sinks);
        }

        fn run(&mut self, sim: &mut Simulation, input: InputFrame, frames: usize) {
            for _ in 0..frames {
                self.step(sim, input);
            }
        }
    }

    fn enemy_at(position: Vec2) -> EnemySpawn {
        EnemySpawn {
            position,
            ..EnemySpawn::default()
        }
    }

    #[test]
    fn test_player_walks_into_npc_and_talks() {
        let mut config = SimulationConfig::empty();
        config.player.chars_per_second = 0.0;
        config.interactables = vec![Interactable::dialogue(
            InteractableId::new(7),
            Vec2::new(2.0, 0.0),
            1.0,
            DialogueScript::new(["Hi", "Bye"]),
        )];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        // 5 units/s for 0.24 s reaches x = 1.2
        host.run(&mut sim, InputFrame::new().with_movement(Vec2::X), 12);
        assert_eq!(sim.player().interaction().current(), Some(InteractableId::new(7)));

        host.step(&mut sim, InputFrame::new().with_interact());
        assert_eq!(sim.player().action_state(), ActionState::DialogueLocked);

        host.step(&mut sim, InputFrame::new().with_advance());
        host.step(&mut sim, InputFrame::new().with_advance());
        assert!(sim.player().can_move());

        let events = sim.events().drain();
        assert!(events.contains(&GameEvent::InteractableRegistered {
            id: InteractableId::new(7)
        }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::DialogueClosed { .. })));
    }

    #[test]
    fn test_interact_toggles_panel_out_of_range() {
        let sign = InteractableId::new(3);
        let mut config = SimulationConfig::empty();
        config.interactables = vec![Interactable::panel(sign, Vec2::new(1.0, 0.0), 1.5, "Village of Glade")];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        host.step(&mut sim, InputFrame::new());
        assert_eq!(sim.player().interaction().current(), Some(sign));

        host.step(&mut sim, InputFrame::new().with_interact());
        assert_eq!(sim.player().action_state(), ActionState::PanelLocked);
        host.run(&mut sim, InputFrame::new().with_movement(Vec2::X), 5);
        assert_eq!(sim.player().position(), Vec2::ZERO);

        // Knocked out of range while reading: the registry clears, the panel stays
        sim.player_mut().set_position(Vec2::new(-10.0, 0.0));
        host.step(&mut sim, InputFrame::new());
        assert_eq!(sim.player().interaction().current(), None);
        assert!(sim.player().is_panel_open());

        host.step(&mut sim, InputFrame::new().with_interact());
        assert!(!sim.player().is_panel_open());
        assert!(sim.player().can_move());

        // Out of range, interacting again opens nothing
        host.step(&mut sim, InputFrame::new().with_interact());
        assert!(!sim.player().is_panel_open());

        let events = sim.events().drain();
        let player = sim.player().id();
        assert!(events.contains(&GameEvent::PanelOpened { actor: player, source: sign }));
        assert!(events.contains(&GameEvent::PanelClosed { actor: player, source: sign }));
    }

    #[test]
    fn test_leaving_one_interactable_falls_back_to_overlapping_one() {
        let elder = InteractableId::new(1);
        let sign = InteractableId::new(2);
        let mut config = SimulationConfig::empty();
        config.player.chars_per_second = 0.0;
        config.interactables = vec![
            Interactable::dialogue(elder, Vec2::ZERO, 2.0, DialogueScript::new(["Hello"])),
            Interactable::panel(sign, Vec2::new(1.5, 0.0), 1.0, "Notice"),
        ];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        host.step(&mut sim, InputFrame::new());
        assert_eq!(sim.player().interaction().current(), Some(elder));

        sim.player_mut().set_position(Vec2::new(1.0, 0.0));
        host.step(&mut sim, InputFrame::new());
        assert_eq!(sim.player().interaction().current(), Some(sign));

        // Leave the sign while still beside the elder
        sim.player_mut().set_position(Vec2::new(-0.5, 0.0));
        host.step(&mut sim, InputFrame::new());
        assert_eq!(sim.player().interaction().current(), Some(elder));

        host.step(&mut sim, InputFrame::new().with_interact());
        assert_eq!(sim.player().dialogue().and_then(|d| d.source()), Some(elder));

        let registered = sim
            .events()
            .drain()
            .into_iter()
            .filter(|e| *e == GameEvent::InteractableRegistered { id: elder })
            .count();
        assert_eq!(registered, 2);
    }

    #[test]
    fn test_misconfigured_brain_disables_enemy() {
        let mut config = SimulationConfig::empty();
        let mut spawn = enemy_at(Vec2::new(1.0, 0.0));
        spawn.brain.attack_cooldown = 0.0;
        config.enemies = vec![spawn];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        host.run(&mut sim, InputFrame::new(), 50);

        let enemy = sim.enemies().next().expect("enemy present");
        assert!(enemy.is_disabled());
        assert_eq!(enemy.position(), Vec2::new(1.0, 0.0));
        assert_eq!(sim.player().health().current(), sim.player().health().max());
        assert!(!sim
            .events()
            .drain()
            .iter()
            .any(|e| matches!(e, GameEvent::ActorDamaged { .. })));
    }

    #[test]
    fn test_enemy_chases_and_strikes_on_cooldown() {
        let mut config = SimulationConfig::empty();
        config.enemies = vec![enemy_at(Vec2::new(4.0, 0.0))];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        // 3 seconds standing still; the slime closes in and strikes every 1.5 s
        host.run(&mut sim, InputFrame::new(), 150);

        let strikes = sim
            .events()
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ActorDamaged { source: Some(_), .. }))
            .count();
        assert!((1..=2).contains(&strikes), "{strikes} strikes");
        assert!(sim.player().health().current() >= 98);
    }

    #[test]
    fn test_player_kills_enemy_and_it_despawns() {
        let mut config = SimulationConfig::empty();
        let mut spawn = enemy_at(Vec2::new(0.0, -1.0));
        spawn.actor.max_health = 1;
        // Keep the slime passive so only the player fights
        spawn.brain.detection_range = 0.0;
        spawn.brain.attack_range = 0.0;
        config.enemies = vec![spawn];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        // Default facing is down, towards the slime
        host.step(&mut sim, InputFrame::new().with_attack());
        host.run(&mut sim, InputFrame::new(), 20);

        assert_eq!(sim.enemies().count(), 0);
        let events = sim.events().drain();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ActorDied { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDespawned { .. })));
    }

    #[test]
    fn test_one_hit_per_attack() {
        let mut config = SimulationConfig::empty();
        let mut spawn = enemy_at(Vec2::new(0.0, -1.0));
        spawn.actor.max_health = 10;
        spawn.brain.detection_range = 0.0;
        spawn.brain.attack_range = 0.0;
        config.enemies = vec![spawn];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        host.step(&mut sim, InputFrame::new().with_attack());
        host.run(&mut sim, InputFrame::new(), 30);

        let enemy = sim.enemies().next().expect("enemy alive");
        assert_eq!(enemy.health().current(), 9);
    }

    #[test]
    fn test_player_death_is_game_over_once() {
        let mut config = SimulationConfig::empty();
        config.player.max_health = 1;
        config.enemies = vec![enemy_at(Vec2::new(1.0, 0.0))];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        host.run(&mut sim, InputFrame::new(), 5);
        assert!(sim.player().is_dead());
        assert_eq!(sim.director().flow(), FlowState::GameOver);

        // Frozen: time no longer advances
        let elapsed = sim.elapsed();
        host.run(&mut sim, InputFrame::new(), 5);
        assert_eq!(sim.elapsed(), elapsed);

        let game_overs = sim
            .events()
            .drain()
            .into_iter()
            .filter(|e| *e == GameEvent::GameOver)
            .count();
        assert_eq!(game_overs, 1);

        sim.restart(&mut host.scenes);
        assert!(!sim.player().is_dead());
        assert!(sim.director().is_running());
        assert_eq!(host.scenes.loads, vec![SceneLoad::Index(1)]);
    }

    #[test]
    fn test_pause_freezes_gameplay() {
        let mut sim = Simulation::new(SimulationConfig::empty());
        let mut host = Host::new();

        host.step(&mut sim, InputFrame::new().with_pause());
        host.run(&mut sim, InputFrame::new().with_movement(Vec2::X), 10);
        assert_eq!(sim.player().position(), Vec2::ZERO);

        host.step(&mut sim, InputFrame::new().with_pause());
        host.run(&mut sim, InputFrame::new().with_movement(Vec2::X), 2);
        assert!(sim.player().position().x > 0.0);

        let events = sim.events().drain();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_triggers_complete_objective_and_exit_level() {
        let mut sim = Simulation::new(SimulationConfig::demo());
        let mut host = Host::new();

        // Start past the slime and walk east through both zones
        sim.player_mut().set_position(Vec2::new(8.0, 0.0));
        host.run(&mut sim, InputFrame::new().with_movement(Vec2::X), 60);

        assert!(sim.objective().is_complete());
        assert_eq!(host.scenes.loads, vec![SceneLoad::Name("Forest".to_string())]);
        assert_eq!(sim.director().active_name(), Some("Forest"));

        let events = sim.events().drain();
        assert!(events.contains(&GameEvent::ObjectiveCompleted));
    }

    #[test]
    fn test_misconfigured_enemy_does_not_stop_level() {
        let mut config = SimulationConfig::empty();
        let mut broken = enemy_at(Vec2::new(3.0, 0.0));
        broken.actor.body = None;
        config.enemies = vec![broken];
        let mut sim = Simulation::new(config);
        let mut host = Host::new();

        host.run(&mut sim, InputFrame::new().with_movement(Vec2::Y), 10);
        assert!(sim.player().position().y > 0.0);
        let enemy = sim.enemies().next().expect("inert enemy kept");
        assert!(enemy.is_disabled());
        assert_eq!(enemy.position(), Vec2::new(3.0, 0.0));
    }
}
