//! Error types for rule execution.

use std::path::PathBuf;

/// Error produced by a failing [`Action`](crate::Action).
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while executing a rule graph.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An I/O error occurred while inspecting or copying a rule's files.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A rule's action reported failure.
    #[error("{label}: {source}")]
    ActionFailed {
        /// The action's label.
        label: String,
        /// The error the action returned.
        source: ActionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = EngineError::Io {
            path: PathBuf::from("/tmp/out/foo__init.class"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("foo__init.class"));
    }

    #[test]
    fn action_failed_display() {
        let err = EngineError::ActionFailed {
            label: "cljc".to_string(),
            source: "exit status 1".into(),
        };
        assert_eq!(err.to_string(), "cljc: exit status 1");
    }
}
