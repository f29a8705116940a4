//! Persistence-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the task file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A line could not be decoded into a task record
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Failed to read the task file
    #[error("Failed to read tasks from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the task file
    #[error("Failed to save tasks to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let error = PersistenceError::MalformedRecord {
            line: 4,
            reason: "bad priority".to_string(),
        };
        assert!(error.to_string().contains("line 4"));
        assert!(error.to_string().contains("bad priority"));

        let error = PersistenceError::WriteFailed {
            path: PathBuf::from("/nope/Tasks.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/nope/Tasks.txt"));
        assert!(error.to_string().contains("denied"));
    }
}
