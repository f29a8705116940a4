//! Canvas-specific error types.

use super::{PostitId, TaskId};

/// Errors that can occur while operating on canvas entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// Task is no longer present in the task store
    #[error("Invalid reference: task {0:?} is not on the canvas")]
    UnknownTask(TaskId),

    /// Post-it is no longer present in the post-it store
    #[error("Invalid reference: post-it {0:?} is not on the canvas")]
    UnknownPostit(PostitId),
}
