//! Error types for Glade.

use thiserror::Error;

/// Top-level error type for Glade operations.
///
/// None of these ever cross an actor boundary: the owner of the failing
/// component logs the error and keeps the rest of the simulation running.
#[derive(Debug, Error)]
pub enum GladeError {
    /// A required reference was left unset in an actor's configuration.
    #[error("Configuration missing on '{actor}': required field '{field}' is unset")]
    ConfigurationMissing {
        /// Name of the misconfigured actor
        actor: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A request referenced something beyond the available range.
    #[error("Request out of range: {0}")]
    OutOfRangeRequest(String),

    /// Content failed to parse
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Glade operations.
pub type GladeResult<T> = Result<T, GladeError>;
