//! Interactables, trigger zones and proximity tracking.
//!
//! The proximity tracker turns positions into enter/exit edges. Interactables
//! register themselves with the player on enter and clear themselves on exit;
//! trigger zones fire an action when the player walks in.

use glade_common::{Aabb, InteractableId, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::dialogue::DialogueScript;
use crate::scene::SceneRequest;

// ============================================================================
// Registry
// ============================================================================

/// The interactable currently available to an actor.
///
/// Holds at most one handle and owns nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionRegistry {
    current: Option<InteractableId>,
}

impl InteractionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interactable on proximity-enter, replacing any other.
    pub fn set(&mut self, id: InteractableId) {
        self.current = Some(id);
    }

    /// Clear on proximity-exit. Only clears if `id` is the one registered.
    ///
    /// Returns whether the registry changed.
    pub fn clear(&mut self, id: InteractableId) -> bool {
        if self.current == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Drop whatever is registered.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// The registered interactable.
    #[must_use]
    pub fn current(&self) -> Option<InteractableId> {
        self.current
    }
}

// ============================================================================
// Interactables
// ============================================================================

/// What happens when the player interacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractableKind {
    /// Opens a dialogue session.
    Dialogue(DialogueScript),
    /// Toggles an info panel. Interacting again closes it, in range or not.
    Panel {
        /// Text shown on the panel.
        text: String,
    },
}

/// An object the player can engage with while nearby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    /// Handle.
    pub id: InteractableId,
    /// World position.
    pub position: Vec2,
    /// Proximity radius.
    pub radius: f32,
    /// Behaviour on interact.
    pub kind: InteractableKind,
}

impl Interactable {
    /// Dialogue interactable.
    #[must_use]
    pub fn dialogue(id: InteractableId, position: Vec2, radius: f32, script: DialogueScript) -> Self {
        Self {
            id,
            position,
            radius,
            kind: InteractableKind::Dialogue(script),
        }
    }

    /// Info panel interactable.
    #[must_use]
    pub fn panel(id: InteractableId, position: Vec2, radius: f32, text: impl Into<String>) -> Self {
        Self {
            id,
            position,
            radius,
            kind: InteractableKind::Panel { text: text.into() },
        }
    }

    /// Whether `point` lies within the proximity radius.
    #[must_use]
    pub fn is_near(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }
}

/// A proximity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityEdge {
    /// The player came within range.
    Enter(InteractableId),
    /// The player left range.
    Exit(InteractableId),
}

/// Tracks which interactables the player is near.
#[derive(Debug, Clone, Default)]
pub struct ProximityTracker {
    inside: BTreeSet<InteractableId>,
}

impl ProximityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the new position against the previous state.
    ///
    /// Exits are reported before enters so a registry fed in order ends up
    /// holding the newest interactable.
    pub fn update(&mut self, point: Vec2, interactables: &[Interactable]) -> Vec<ProximityEdge> {
        let now: BTreeSet<InteractableId> = interactables
            .iter()
            .filter(|i| i.is_near(point))
            .map(|i| i.id)
            .collect();

        let mut edges: Vec<ProximityEdge> = self
            .inside
            .difference(&now)
            .map(|id| ProximityEdge::Exit(*id))
            .collect();
        edges.extend(now.difference(&self.inside).map(|id| ProximityEdge::Enter(*id)));

        for edge in &edges {
            debug!(?edge, "Proximity changed");
        }
        self.inside = now;
        edges
    }

    /// Whether the player is near `id`.
    #[must_use]
    pub fn is_inside(&self, id: InteractableId) -> bool {
        self.inside.contains(&id)
    }

    /// Forget all proximity state.
    pub fn clear(&mut self) {
        self.inside.clear();
    }
}

// ============================================================================
// Trigger Zones
// ============================================================================

/// Action fired by a trigger zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TriggerAction {
    /// Request a scene load (level exit).
    LoadScene(SceneRequest),
    /// Mark the current objective complete.
    CompleteObjective,
}

/// An area that fires an action when the player enters it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerZone {
    /// Area covered.
    pub area: Aabb,
    /// Action on enter.
    pub action: TriggerAction,
    #[serde(skip)]
    occupied: bool,
}

impl TriggerZone {
    /// Creates a trigger zone.
    #[must_use]
    pub fn new(area: Aabb, action: TriggerAction) -> Self {
        Self {
            area,
            action,
            occupied: false,
        }
    }

    /// Update with the player's body. Returns the action on the entering tick.
    pub fn update(&mut self, body: &Aabb) -> Option<&TriggerAction> {
        let inside = self.area.overlaps(body);
        let entered = inside && !self.occupied;
        self.occupied = inside;
        entered.then_some(&self.action)
    }

    /// Whether the player is inside.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}
