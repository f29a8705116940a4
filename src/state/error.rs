//! State management-specific error types.

use crate::canvas::CanvasError;

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Tab with the given name does not exist
    #[error("Tab not found: {name}")]
    TabNotFound { name: String },

    /// Gesture referenced an entity that is gone
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Assist worker is not running
    #[error("Assist worker is not running")]
    AssistOffline,
}
