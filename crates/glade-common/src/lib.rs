//! # Glade Common
//!
//! Common types, utilities, and shared abstractions for Glade.
//!
//! This crate provides foundational types used across all Glade crates:
//! - ID types (ActorId, InteractableId)
//! - 2D math (Vec2 re-export, axis-aligned boxes)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_generation() {
        let id1 = ActorId::new();
        let id2 = ActorId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
        assert!(!ActorId::NULL.is_valid());
    }

    #[test]
    fn test_error_display() {
        let err = GladeError::ConfigurationMissing {
            actor: "slime".to_string(),
            field: "body",
        };
        assert_eq!(
            err.to_string(),
            "Configuration missing on 'slime': required field 'body' is unset"
        );
    }
}
