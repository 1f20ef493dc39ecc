//! Event bus for inter-system communication.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use glade_common::{ActorId, InteractableId};

use crate::actor::AttackEndReason;
use crate::dialogue::DialogueCloseReason;
use crate::direction::CardinalDirection;
use crate::scene::SceneRequest;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Attack sequence started
    AttackStarted {
        /// Attacker
        actor: ActorId,
        /// Hitbox direction
        direction: CardinalDirection,
    },
    /// Attack sequence ended
    AttackEnded {
        /// Attacker
        actor: ActorId,
        /// Why it ended
        reason: AttackEndReason,
    },
    /// Actor took damage
    ActorDamaged {
        /// Victim
        actor: ActorId,
        /// Damage amount
        damage: i32,
        /// Health left
        remaining: i32,
        /// Source actor (if any)
        source: Option<ActorId>,
    },
    /// Actor died
    ActorDied {
        /// Victim
        actor: ActorId,
    },
    /// Dead enemy removed from the level
    EnemyDespawned {
        /// Enemy
        actor: ActorId,
    },
    /// Dialogue session opened
    DialogueOpened {
        /// Reader
        actor: ActorId,
        /// Interactable that started it
        source: Option<InteractableId>,
    },
    /// Dialogue session closed
    DialogueClosed {
        /// Reader
        actor: ActorId,
        /// Why it closed
        reason: DialogueCloseReason,
    },
    /// Info panel shown
    PanelOpened {
        /// Reader
        actor: ActorId,
        /// Interactable showing it
        source: InteractableId,
    },
    /// Info panel hidden
    PanelClosed {
        /// Reader
        actor: ActorId,
        /// Interactable that showed it
        source: InteractableId,
    },
    /// Interactable came into reach
    InteractableRegistered {
        /// Interactable
        id: InteractableId,
    },
    /// Interactable went out of reach
    InteractableCleared {
        /// Interactable
        id: InteractableId,
    },
    /// Scene load requested
    SceneRequested {
        /// Request
        request: SceneRequest,
    },
    /// Objective reached
    ObjectiveCompleted,
    /// Game paused
    Paused,
    /// Game resumed
    Resumed,
    /// Player died
    GameOver,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    ///
    /// Never blocks. Returns false if the bus was full and the event dropped.
    pub fn publish(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(?event, capacity = self.capacity, "Event bus full, dropping event");
                false
            },
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Drains pending events into a handler. Returns how many were handled.
    pub fn dispatch(&self, handler: &mut dyn EventHandler) -> usize {
        let mut count = 0;
        for event in self.receiver.try_iter() {
            handler.handle(&event);
            count += 1;
        }
        count
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}

/// Typed event handler trait.
pub trait EventHandler {
    /// Handles an event.
    fn handle(&mut self, event: &GameEvent);
}

impl EventHandler for Vec<GameEvent> {
    fn handle(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}
