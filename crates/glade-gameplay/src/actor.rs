//! Actor action state machine.
//!
//! Decides whether an actor may move, attack or be interrupted, and sequences
//! attack, dialogue and info panel windows over time. Every timed sequence lives in a
//! single [`ActiveSequence`] slot; the movement lock is derived from that slot,
//! so whichever sequence occupies it holds the lock and clearing the slot
//! releases it on every exit path.
//!
//! The machine is driven by the host through two entry points:
//! - [`ActorActionStateMachine::tick`] once per frame (input, timers, animator)
//! - [`ActorActionStateMachine::fixed_tick`] once per physics step (movement)

use glade_common::{Aabb, ActorId, GladeError, GladeResult, InteractableId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::attack::{ActiveAttack, AttackConfig, AttackTiming};
use crate::dialogue::{DialogueCloseReason, DialogueScript, DialogueSession, DialogueStep, DEFAULT_CHARS_PER_SECOND};
use crate::direction::{CardinalDirection, Facing};
use crate::footsteps::{FootstepCadence, FootstepConfig};
use crate::health::{DamageOutcome, Health, DEFAULT_FLASH_DURATION};
use crate::host::{AnimationSink, AudioSink, InputFrame, ShapeCast};
use crate::interaction::InteractionRegistry;
use crate::movement::{resolve_movement, MoveOutcome, MoveResolution, MovementConfig};

// ============================================================================
// Configuration
// ============================================================================

/// Whether an actor is driven by input or by AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActorKind {
    /// Driven by player input.
    #[default]
    Player,
    /// Driven by an enemy brain.
    Enemy,
}

/// Collision body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Half size of the body box.
    pub half_extents: Vec2,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(0.3, 0.4),
        }
    }
}

/// Names of the animator parameters the machine writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorParams {
    /// Bool: actor is walking
    pub is_moving: String,
    /// Float: facing x
    pub move_x: String,
    /// Float: facing y
    pub move_y: String,
    /// Int: cardinal direction code
    pub move_dir: String,
    /// Trigger: attack started
    pub attack_trigger: String,
}

impl Default for AnimatorParams {
    fn default() -> Self {
        Self {
            is_moving: "IsMoving".to_string(),
            move_x: "MoveX".to_string(),
            move_y: "MoveY".to_string(),
            move_dir: "MoveDir".to_string(),
            attack_trigger: "swordAttack".to_string(),
        }
    }
}

/// Everything an actor needs, resolved once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Name used in logs.
    pub name: String,
    /// Player or enemy.
    pub kind: ActorKind,
    /// Maximum health.
    pub max_health: i32,
    /// Movement speed and collision offset.
    pub movement: MovementConfig,
    /// Collision body. Required.
    pub body: Option<BodyConfig>,
    /// Attack. Required (with a hitbox) for players.
    pub attack: Option<AttackConfig>,
    /// Footstep audio, if the actor makes any.
    pub footsteps: Option<FootstepConfig>,
    /// Animator parameter names.
    pub animator: AnimatorParams,
    /// Typewriter speed for dialogue this actor reads.
    pub chars_per_second: f32,
    /// Damage flash duration.
    pub hit_flash: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            name: "actor".to_string(),
            kind: ActorKind::Player,
            max_health: 100,
            movement: MovementConfig::default(),
            body: Some(BodyConfig::default()),
            attack: None,
            footsteps: None,
            animator: AnimatorParams::default(),
            chars_per_second: DEFAULT_CHARS_PER_SECOND,
            hit_flash: DEFAULT_FLASH_DURATION,
        }
    }
}

impl ActorConfig {
    /// Player defaults: sword with a hitbox, footsteps.
    #[must_use]
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attack: Some(AttackConfig::sword()),
            footsteps: Some(FootstepConfig::default()),
            ..Self::default()
        }
    }

    /// Enemy defaults: slower, fragile, strikes without a hitbox.
    #[must_use]
    pub fn enemy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ActorKind::Enemy,
            max_health: 3,
            movement: MovementConfig {
                speed: 2.0,
                ..MovementConfig::default()
            },
            attack: Some(AttackConfig {
                timing: AttackTiming::new(0.1, 0.2, 0.3),
                ..AttackConfig::default()
            }),
            chars_per_second: 0.0,
            ..Self::default()
        }
    }

    /// Check required references and value ranges.
    pub fn validate(&self) -> GladeResult<()> {
        let Some(body) = &self.body else {
            return Err(self.missing("body"));
        };
        if !(body.half_extents.x > 0.0 && body.half_extents.y > 0.0 && body.half_extents.is_finite()) {
            return Err(GladeError::InvalidValue {
                field: "body.half_extents",
                reason: format!("must be positive, got {}", body.half_extents),
            });
        }

        if self.kind == ActorKind::Player {
            match &self.attack {
                None => return Err(self.missing("attack")),
                Some(attack) if attack.hitbox.is_none() => return Err(self.missing("attack.hitbox")),
                Some(_) => {},
            }
        }

        if let Some(attack) = &self.attack {
            if !attack.timing.is_valid() {
                return Err(GladeError::InvalidValue {
                    field: "attack.timing",
                    reason: format!("{:?}", attack.timing),
                });
            }
        }

        if self.max_health <= 0 {
            return Err(GladeError::InvalidValue {
                field: "max_health",
                reason: format!("must be at least 1, got {}", self.max_health),
            });
        }

        if !self.movement.speed.is_finite() || self.movement.speed < 0.0 {
            return Err(GladeError::InvalidValue {
                field: "movement.speed",
                reason: format!("must be finite and non-negative, got {}", self.movement.speed),
            });
        }

        if let Some(footsteps) = &self.footsteps {
            footsteps.validate()?;
        }

        Ok(())
    }

    fn missing(&self, field: &'static str) -> GladeError {
        GladeError::ConfigurationMissing {
            actor: self.name.clone(),
            field,
        }
    }
}

// ============================================================================
// States, sequences and signals
// ============================================================================

/// Coarse action state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionState {
    /// Standing still.
    #[default]
    Idle,
    /// Moved during the last fixed tick.
    Moving,
    /// Attack sequence running.
    Attacking,
    /// Reading dialogue.
    DialogueLocked,
    /// Info panel open.
    PanelLocked,
}

/// The timed sequence holding the movement lock, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveSequence {
    /// Nothing running; movement free.
    #[default]
    None,
    /// Attack windup, active window and cooldown.
    Attack(ActiveAttack),
    /// Open dialogue session.
    Dialogue(DialogueSession),
    /// Info panel opened by an interactable. Stays until closed.
    Panel(InteractableId),
}

/// Why an attack sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackEndReason {
    /// Windup, active and cooldown all elapsed.
    Expired,
    /// The host reported the attack animation finished.
    FinishedSignal,
    /// Cut short (death or forced cancel).
    Cancelled,
}

/// Why a request did nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IgnoreReason {
    /// Actor is misconfigured and inert.
    Disabled,
    /// Actor is dead.
    Dead,
    /// An attack is already running.
    AlreadyAttacking,
    /// Dialogue holds the movement lock.
    DialogueLocked,
    /// An info panel holds the movement lock.
    PanelOpen,
    /// The previous attack's cooldown has not elapsed.
    OnCooldown {
        /// Seconds left
        remaining: f32,
    },
    /// Actor has no attack.
    NoAttack,
    /// No attack is running.
    NotAttacking,
    /// No dialogue is open.
    NotInDialogue,
    /// No info panel is open.
    NotInPanel,
    /// The current line is still being typed.
    StillRevealing,
    /// Dialogue script has no lines.
    EmptyScript,
}

/// Outcome of a request to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The request changed state.
    Applied,
    /// The request was invalid in the current state.
    Ignored(IgnoreReason),
}

impl Transition {
    /// Whether the request changed state.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Something that happened to an actor, drained by the owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorSignal {
    /// Attack sequence began.
    AttackStarted {
        /// Hitbox direction
        direction: CardinalDirection,
    },
    /// Attack sequence ended and released the lock.
    AttackEnded {
        /// Why
        reason: AttackEndReason,
    },
    /// Dialogue session opened.
    DialogueOpened {
        /// Interactable that started it
        source: Option<InteractableId>,
        /// Number of lines
        lines: usize,
    },
    /// Dialogue moved to another line.
    DialogueAdvanced {
        /// New line index
        line: usize,
    },
    /// Dialogue session closed and released the lock.
    DialogueClosed {
        /// Why
        reason: DialogueCloseReason,
    },
    /// Info panel shown.
    PanelOpened {
        /// Interactable showing it
        source: InteractableId,
    },
    /// Info panel hidden and the lock released.
    PanelClosed {
        /// Interactable that showed it
        source: InteractableId,
    },
    /// Damage landed.
    Damaged {
        /// Health removed
        amount: i32,
        /// Health left
        remaining: i32,
    },
    /// Health reached zero.
    Died,
}

/// Read-only snapshot of an actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorState {
    /// Movement permitted this tick.
    pub can_move: bool,
    /// Attack sequence running.
    pub is_attacking: bool,
    /// Unit facing vector.
    pub facing: Vec2,
    /// Seconds until another attack is allowed.
    pub attack_cooldown_remaining: f32,
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// World position.
    pub position: Vec2,
    /// Coarse action state.
    pub action: ActionState,
}

// ============================================================================
// State machine
// ============================================================================

/// Per-actor action state machine.
#[derive(Debug, Clone)]
pub struct ActorActionStateMachine {
    id: ActorId,
    config: ActorConfig,
    disabled: bool,
    position: Vec2,
    facing: Facing,
    health: Health,
    attack_cooldown_remaining: f32,
    action: ActionState,
    sequence: ActiveSequence,
    desired_velocity: Vec2,
    moved_last_fixed: bool,
    footsteps: Option<FootstepCadence>,
    interaction: InteractionRegistry,
    signals: Vec<ActorSignal>,
}

impl ActorActionStateMachine {
    /// Creates an actor at the origin.
    ///
    /// A configuration that fails validation is logged once and leaves the
    /// actor inert: every tick and request is ignored.
    #[must_use]
    pub fn new(id: ActorId, config: ActorConfig) -> Self {
        let disabled = match config.validate() {
            Ok(()) => false,
            Err(err) => {
                error!(actor = %config.name, %id, %err, "Actor misconfigured, disabling it");
                true
            },
        };

        let health = Health::new(config.max_health).with_flash_duration(config.hit_flash);
        let footsteps = config.footsteps.clone().map(FootstepCadence::new);

        Self {
            id,
            config,
            disabled,
            position: Vec2::ZERO,
            facing: Facing::default(),
            health,
            attack_cooldown_remaining: 0.0,
            action: ActionState::Idle,
            sequence: ActiveSequence::None,
            desired_velocity: Vec2::ZERO,
            moved_last_fixed: false,
            footsteps,
            interaction: InteractionRegistry::new(),
            signals: Vec::new(),
        }
    }

    /// Place the actor at `position`.
    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    /// Actor id.
    #[must_use]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Configuration the actor was built from.
    #[must_use]
    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// Whether the actor is inert because of bad configuration.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the actor may move.
    #[must_use]
    pub fn can_move(&self) -> bool {
        !self.disabled && !self.health.is_dead() && matches!(self.sequence, ActiveSequence::None)
    }

    /// Whether an attack sequence is running.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        matches!(self.sequence, ActiveSequence::Attack(_))
    }

    /// Whether dialogue holds the movement lock.
    #[must_use]
    pub fn is_in_dialogue(&self) -> bool {
        matches!(self.sequence, ActiveSequence::Dialogue(_))
    }

    /// Whether an info panel holds the movement lock.
    #[must_use]
    pub fn is_panel_open(&self) -> bool {
        matches!(self.sequence, ActiveSequence::Panel(_))
    }

    /// Interactable whose panel is open.
    #[must_use]
    pub fn panel_source(&self) -> Option<InteractableId> {
        match self.sequence {
            ActiveSequence::Panel(source) => Some(source),
            _ => None,
        }
    }

    /// Coarse action state.
    #[must_use]
    pub fn action_state(&self) -> ActionState {
        self.action
    }

    /// The running sequence.
    #[must_use]
    pub fn sequence(&self) -> &ActiveSequence {
        &self.sequence
    }

    /// The running attack.
    #[must_use]
    pub fn active_attack(&self) -> Option<&ActiveAttack> {
        match &self.sequence {
            ActiveSequence::Attack(attack) => Some(attack),
            _ => None,
        }
    }

    /// The open dialogue.
    #[must_use]
    pub fn dialogue(&self) -> Option<&DialogueSession> {
        match &self.sequence {
            ActiveSequence::Dialogue(session) => Some(session),
            _ => None,
        }
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Body box at the current position.
    #[must_use]
    pub fn body_aabb(&self) -> Option<Aabb> {
        self.config
            .body
            .as_ref()
            .map(|body| Aabb::from_center(self.position, body.half_extents))
    }

    /// Facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Health pool.
    #[must_use]
    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Whether health reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Seconds until another attack is allowed.
    #[must_use]
    pub fn attack_cooldown_remaining(&self) -> f32 {
        self.attack_cooldown_remaining
    }

    /// Damage per hit of this actor's attack.
    #[must_use]
    pub fn attack_damage(&self) -> i32 {
        self.config.attack.as_ref().map_or(0, |attack| attack.damage)
    }

    /// Interactable currently in reach.
    #[must_use]
    pub fn interaction(&self) -> &InteractionRegistry {
        &self.interaction
    }

    /// Mutable access for proximity enter/exit.
    pub fn interaction_mut(&mut self) -> &mut InteractionRegistry {
        &mut self.interaction
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn state(&self) -> ActorState {
        ActorState {
            can_move: self.can_move(),
            is_attacking: self.is_attacking(),
            facing: self.facing.vector(),
            attack_cooldown_remaining: self.attack_cooldown_remaining,
            health: self.health.current(),
            max_health: self.health.max(),
            position: self.position,
            action: self.action,
        }
    }

    /// Hitbox of the running attack while its active window is open.
    #[must_use]
    pub fn active_hitbox(&self) -> Option<Aabb> {
        let attack = self.active_attack().filter(|a| a.can_damage())?;
        let hitbox = self.config.attack.as_ref()?.hitbox.as_ref()?;
        let body = self.config.body.as_ref()?;
        Some(attack.direction.hitbox(self.position, body.half_extents, hitbox))
    }

    /// Record a hit by the running attack. False if `target` was already hit
    /// or no attack is running.
    pub fn register_hit(&mut self, target: ActorId) -> bool {
        match &mut self.sequence {
            ActiveSequence::Attack(attack) => attack.register_hit(target),
            _ => false,
        }
    }

    /// Take all signals raised since the last drain.
    pub fn drain_signals(&mut self) -> Vec<ActorSignal> {
        std::mem::take(&mut self.signals)
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Per-frame update: timers, input, animator parameters and footsteps.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &InputFrame,
        animation: &mut dyn AnimationSink,
        audio: &mut dyn AudioSink,
    ) {
        if self.disabled {
            return;
        }

        self.health.tick(dt);
        self.attack_cooldown_remaining = (self.attack_cooldown_remaining - dt).max(0.0);

        if self.health.is_dead() {
            self.desired_velocity = Vec2::ZERO;
            if let Some(footsteps) = &mut self.footsteps {
                footsteps.tick(false, dt, audio);
            }
            return;
        }

        self.desired_velocity = input.movement * self.config.movement.speed;
        if self.can_move() {
            self.facing.update(input.movement);
        }

        self.advance_sequence(dt, input);

        if input.attack {
            let transition = self.request_attack(animation, audio);
            if let Transition::Ignored(reason) = transition {
                trace!(actor = %self.config.name, ?reason, "Attack input ignored");
            }
        }

        self.write_animator(animation);

        let is_moving = self.can_move() && self.moved_last_fixed;
        if let Some(footsteps) = &mut self.footsteps {
            footsteps.tick(is_moving, dt, audio);
        }
    }

    /// Per-physics-step update: movement with wall sliding.
    ///
    /// Only moves while no sequence holds the lock.
    pub fn fixed_tick(&mut self, dt: f32, world: &dyn ShapeCast) -> MoveOutcome {
        let body = match self.body_aabb() {
            Some(body) if self.can_move() => body,
            _ => {
                self.moved_last_fixed = false;
                if self.action == ActionState::Moving {
                    self.action = ActionState::Idle;
                }
                return MoveOutcome::none(MoveResolution::Idle);
            },
        };

        let outcome = resolve_movement(world, body, self.desired_velocity, &self.config.movement, dt);
        self.position += outcome.displacement;
        self.moved_last_fixed = outcome.moved();
        self.action = if self.moved_last_fixed {
            ActionState::Moving
        } else {
            ActionState::Idle
        };
        outcome
    }

    fn advance_sequence(&mut self, dt: f32, input: &InputFrame) {
        match &mut self.sequence {
            ActiveSequence::None => {},
            ActiveSequence::Attack(attack) => {
                attack.tick(dt);
                if attack.is_finished() {
                    self.end_attack(AttackEndReason::Expired);
                }
            },
            ActiveSequence::Dialogue(session) => {
                session.tick(dt);
                if input.skip {
                    self.skip_dialogue();
                } else if input.advance {
                    self.advance_dialogue();
                }
            },
            ActiveSequence::Panel(_) => {},
        }
    }

    fn write_animator(&self, animation: &mut dyn AnimationSink) {
        let params = &self.config.animator;
        let facing = self.facing.vector();
        animation.set_bool(self.id, &params.is_moving, self.can_move() && self.moved_last_fixed);
        animation.set_float(self.id, &params.move_x, facing.x);
        animation.set_float(self.id, &params.move_y, facing.y);
        animation.set_int(self.id, &params.move_dir, self.facing.cardinal().move_dir_code());
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    /// Start an attack in the facing direction.
    pub fn request_attack(&mut self, animation: &mut dyn AnimationSink, audio: &mut dyn AudioSink) -> Transition {
        if let Some(reason) = self.inert_reason() {
            return Transition::Ignored(reason);
        }
        match self.sequence {
            ActiveSequence::Attack(_) => return Transition::Ignored(IgnoreReason::AlreadyAttacking),
            ActiveSequence::Dialogue(_) => return Transition::Ignored(IgnoreReason::DialogueLocked),
            ActiveSequence::Panel(_) => return Transition::Ignored(IgnoreReason::PanelOpen),
            ActiveSequence::None => {},
        }
        let Some(attack) = &self.config.attack else {
            return Transition::Ignored(IgnoreReason::NoAttack);
        };
        if self.attack_cooldown_remaining > 0.0 {
            return Transition::Ignored(IgnoreReason::OnCooldown {
                remaining: self.attack_cooldown_remaining,
            });
        }

        let direction = self.facing.cardinal();
        self.attack_cooldown_remaining = attack.timing.total_duration();
        self.sequence = ActiveSequence::Attack(ActiveAttack::new(direction, attack.timing.clone()));
        self.action = ActionState::Attacking;
        self.moved_last_fixed = false;

        animation.trigger(self.id, &self.config.animator.attack_trigger);
        if let Some(cue) = &attack.cue {
            audio.play_one_shot(cue);
        }

        debug!(actor = %self.config.name, ?direction, "Attack started");
        self.signals.push(ActorSignal::AttackStarted { direction });
        Transition::Applied
    }

    /// The host reports the attack animation finished. Releases the lock
    /// early; the cooldown keeps running.
    pub fn notify_attack_finished(&mut self) -> Transition {
        if self.is_attacking() {
            self.end_attack(AttackEndReason::FinishedSignal);
            Transition::Applied
        } else {
            Transition::Ignored(IgnoreReason::NotAttacking)
        }
    }

    /// Open a dialogue session, replacing any open one.
    ///
    /// Refused while attacking or while an info panel is open.
    pub fn open_dialogue(&mut self, script: DialogueScript, source: Option<InteractableId>) -> Transition {
        if let Some(reason) = self.inert_reason() {
            return Transition::Ignored(reason);
        }
        if self.is_attacking() {
            return Transition::Ignored(IgnoreReason::AlreadyAttacking);
        }
        if self.is_panel_open() {
            return Transition::Ignored(IgnoreReason::PanelOpen);
        }

        let session = match DialogueSession::open(script, self.config.chars_per_second, source) {
            Ok(session) => session,
            Err(err) => {
                warn!(actor = %self.config.name, %err, "Dialogue not opened");
                return Transition::Ignored(IgnoreReason::EmptyScript);
            },
        };

        if self.is_in_dialogue() {
            self.end_dialogue(DialogueCloseReason::Replaced);
        }

        let lines = session.line_count();
        self.sequence = ActiveSequence::Dialogue(session);
        self.action = ActionState::DialogueLocked;
        self.desired_velocity = Vec2::ZERO;
        self.moved_last_fixed = false;

        debug!(actor = %self.config.name, ?source, lines, "Dialogue opened");
        self.signals.push(ActorSignal::DialogueOpened { source, lines });
        Transition::Applied
    }

    /// Acknowledge the current dialogue line.
    pub fn advance_dialogue(&mut self) -> Transition {
        let ActiveSequence::Dialogue(session) = &mut self.sequence else {
            return Transition::Ignored(IgnoreReason::NotInDialogue);
        };
        match session.advance() {
            DialogueStep::StillRevealing => Transition::Ignored(IgnoreReason::StillRevealing),
            DialogueStep::NextLine(line) => {
                self.signals.push(ActorSignal::DialogueAdvanced { line });
                Transition::Applied
            },
            DialogueStep::Closed | DialogueStep::NotOpen => {
                self.end_dialogue(DialogueCloseReason::Exhausted);
                Transition::Applied
            },
        }
    }

    /// Close the dialogue at any line.
    pub fn skip_dialogue(&mut self) -> Transition {
        if self.is_in_dialogue() {
            self.end_dialogue(DialogueCloseReason::Skipped);
            Transition::Applied
        } else {
            Transition::Ignored(IgnoreReason::NotInDialogue)
        }
    }

    /// Show the info panel of `source`, replacing any open panel.
    ///
    /// Locks movement until [`Self::close_panel`]. Refused while attacking or
    /// reading dialogue.
    pub fn open_panel(&mut self, source: InteractableId) -> Transition {
        if let Some(reason) = self.inert_reason() {
            return Transition::Ignored(reason);
        }
        match self.sequence {
            ActiveSequence::Attack(_) => return Transition::Ignored(IgnoreReason::AlreadyAttacking),
            ActiveSequence::Dialogue(_) => return Transition::Ignored(IgnoreReason::DialogueLocked),
            ActiveSequence::Panel(_) => self.end_panel(),
            ActiveSequence::None => {},
        }

        self.sequence = ActiveSequence::Panel(source);
        self.action = ActionState::PanelLocked;
        self.desired_velocity = Vec2::ZERO;
        self.moved_last_fixed = false;

        debug!(actor = %self.config.name, %source, "Panel opened");
        self.signals.push(ActorSignal::PanelOpened { source });
        Transition::Applied
    }

    /// Hide the info panel and release the lock.
    pub fn close_panel(&mut self) -> Transition {
        if self.is_panel_open() {
            self.end_panel();
            Transition::Applied
        } else {
            Transition::Ignored(IgnoreReason::NotInPanel)
        }
    }

    /// Cancel whichever sequence is running. Returns whether one was.
    pub fn cancel_sequence(&mut self) -> bool {
        match self.sequence {
            ActiveSequence::None => false,
            ActiveSequence::Attack(_) => {
                self.end_attack(AttackEndReason::Cancelled);
                true
            },
            ActiveSequence::Dialogue(_) => {
                self.end_dialogue(DialogueCloseReason::Cancelled);
                true
            },
            ActiveSequence::Panel(_) => {
                self.end_panel();
                true
            },
        }
    }

    /// Make the actor inert, as a failed configuration check does.
    ///
    /// Cancels the running sequence; later ticks and requests are ignored.
    pub fn disable(&mut self) {
        if self.disabled {
            return;
        }
        self.cancel_sequence();
        self.disabled = true;
        self.desired_velocity = Vec2::ZERO;
        self.moved_last_fixed = false;
        self.action = ActionState::Idle;
    }

    /// Apply damage. Death cancels the running sequence.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.disabled {
            return DamageOutcome::Ignored;
        }

        let outcome = self.health.take_damage(amount);
        match outcome {
            DamageOutcome::Ignored => {},
            DamageOutcome::Damaged { applied, remaining } => {
                self.signals.push(ActorSignal::Damaged {
                    amount: applied,
                    remaining,
                });
            },
            DamageOutcome::Killed { applied } => {
                self.signals.push(ActorSignal::Damaged {
                    amount: applied,
                    remaining: 0,
                });
                self.cancel_sequence();
                self.desired_velocity = Vec2::ZERO;
                self.moved_last_fixed = false;
                self.action = ActionState::Idle;
                info!(actor = %self.config.name, id = %self.id, "Actor died");
                self.signals.push(ActorSignal::Died);
            },
        }
        outcome
    }

    /// Restore health. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.disabled {
            return 0;
        }
        self.health.heal(amount)
    }

    /// Teleport the actor.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Turn towards `direction` while free to move.
    pub fn face(&mut self, direction: Vec2) -> bool {
        self.can_move() && self.facing.update(direction)
    }

    fn inert_reason(&self) -> Option<IgnoreReason> {
        if self.disabled {
            Some(IgnoreReason::Disabled)
        } else if self.health.is_dead() {
            Some(IgnoreReason::Dead)
        } else {
            None
        }
    }

    fn end_attack(&mut self, reason: AttackEndReason) {
        if let ActiveSequence::Attack(mut attack) = std::mem::take(&mut self.sequence) {
            if reason == AttackEndReason::Cancelled {
                attack.cancel();
            }
            self.action = ActionState::Idle;
            debug!(actor = %self.config.name, ?reason, "Attack ended");
            self.signals.push(ActorSignal::AttackEnded { reason });
        }
    }

    fn end_dialogue(&mut self, reason: DialogueCloseReason) {
        if let ActiveSequence::Dialogue(mut session) = std::mem::take(&mut self.sequence) {
            session.skip();
            self.action = ActionState::Idle;
            debug!(actor = %self.config.name, ?reason, "Dialogue closed");
            self.signals.push(ActorSignal::DialogueClosed { reason });
        }
    }

    fn end_panel(&mut self) {
        if let ActiveSequence::Panel(source) = std::mem::take(&mut self.sequence) {
            self.action = ActionState::Idle;
            debug!(actor = %self.config.name, %source, "Panel closed");
            self.signals.push(ActorSignal::PanelClosed { source });
        }
    }
}
