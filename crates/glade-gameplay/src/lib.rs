//! # Glade Gameplay
//!
//! Gameplay systems for Glade.
//!
//! This crate provides the host-independent action layer of a 2D action RPG:
//! - Actor action state machine (movement lock, attack windows, dialogue gating)
//! - Movement resolution with wall sliding against a host shape cast
//! - Health, damage and death
//! - Enemy AI (patrol, chase, attack)
//! - Dialogue sessions with typewriter reveal
//! - Interactables (dialogue and info panels), trigger zones and proximity tracking
//! - Scene flow (scene requests, pause, game over) and objectives
//! - Event bus for inter-system communication
//! - A simulation that owns all of the above and is driven by `tick`/`fixed_tick`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod attack;
pub mod dialogue;
pub mod direction;
pub mod enemy_ai;
pub mod events;
pub mod footsteps;
pub mod health;
pub mod host;
pub mod interaction;
pub mod movement;
pub mod objective;
pub mod scene;
pub mod simulation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::attack::*;
    pub use crate::dialogue::*;
    pub use crate::direction::*;
    pub use crate::enemy_ai::*;
    pub use crate::events::*;
    pub use crate::footsteps::*;
    pub use crate::health::*;
    pub use crate::host::*;
    pub use crate::interaction::*;
    pub use crate::movement::*;
    pub use crate::objective::*;
    pub use crate::scene::*;
    pub use crate::simulation::*;
}

pub use prelude::*;
