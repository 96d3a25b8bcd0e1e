//! Error kinds produced by the mutation engines
//!
//! Fatal errors abort a run and come back as the `Err` side of an engine call.
//! Non-fatal errors are recorded in a [`WalkOutcome`](crate::outcome::WalkOutcome)
//! while the traversal carries on with the remaining files.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The file-level step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Backup,
    Read,
    Write,
    Restore,
    Delete,
}

impl IoOperation {
    fn verb(self) -> &'static str {
        match self {
            IoOperation::Backup => "creating backup for",
            IoOperation::Read => "reading file",
            IoOperation::Write => "writing modified content to",
            IoOperation::Restore => "restoring backup",
            IoOperation::Delete => "deleting backup file",
        }
    }
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The request cannot be executed at all (empty search text)
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The filename pattern is malformed; aborts the traversal
    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The root directory could not be inspected, so no traversal started
    #[error("cannot start traversal at '{}': {source}", path.display())]
    RootUnavailable { path: PathBuf, source: io::Error },

    /// A path inside the tree could not be stat'ed or listed
    #[error("accessing path '{}': {source}", path.display())]
    Access { path: PathBuf, source: io::Error },

    /// A read, write, backup, rename or delete failed on one file
    #[error("{operation} '{}': {source}", path.display())]
    Io {
        operation: IoOperation,
        path: PathBuf,
        source: io::Error,
    },
}

impl EngineError {
    pub fn io(operation: IoOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        EngineError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Fatal errors stop the run; everything else is recorded and skipped
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidRequest { .. }
                | EngineError::InvalidPattern { .. }
                | EngineError::RootUnavailable { .. }
        )
    }

    /// Path the error is attached to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            EngineError::RootUnavailable { path, .. }
            | EngineError::Access { path, .. }
            | EngineError::Io { path, .. } => Some(path),
            EngineError::InvalidRequest { .. } | EngineError::InvalidPattern { .. } => None,
        }
    }

    fn io_source(&self) -> Option<&io::Error> {
        match self {
            EngineError::RootUnavailable { source, .. }
            | EngineError::Access { source, .. }
            | EngineError::Io { source, .. } => Some(source),
            EngineError::InvalidRequest { .. } | EngineError::InvalidPattern { .. } => None,
        }
    }

    /// Short error-kind label used by the JSON report
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidRequest { .. } => "invalid_request",
            EngineError::InvalidPattern { .. } => "invalid_pattern",
            EngineError::RootUnavailable { .. } => "root_unavailable",
            EngineError::Access { .. } => "access",
            EngineError::Io { .. } => "io",
        }
    }
}

/// Check if an IO error is a permission denied error
pub fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Check if an IO error is a "not found" error
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Actionable follow-up text for an engine error, when one applies
pub fn hint_for(err: &EngineError) -> Option<String> {
    match err {
        EngineError::InvalidPattern { .. } => Some(
            "Possible fixes:\n\
             1. Close every '[' with a matching ']'\n\
             2. Quote the pattern so the shell does not expand it: --pattern '*.txt'"
                .to_string(),
        ),
        EngineError::InvalidRequest { .. } => {
            Some("Pass the text to search for with --old <TEXT>".to_string())
        }
        _ => {
            let source = err.io_source()?;
            let path = err.path()?;
            if is_permission_denied(source) {
                let parent_dir = path
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".".to_string());
                Some(format!(
                    "Possible fixes:\n\
                     1. Check file permissions: ls -l '{}'\n\
                     2. Ensure write access to the directory: chmod u+w '{}'",
                    path.display(),
                    parent_dir
                ))
            } else if is_not_found(source) {
                Some(format!(
                    "Possible fixes:\n\
                     1. Check the path is correct: '{}'\n\
                     2. Use an absolute path if the relative path is ambiguous",
                    path.display()
                ))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_fatal_classification() {
        let pattern = EngineError::InvalidPattern {
            pattern: "[abc".to_string(),
            message: "unterminated".to_string(),
        };
        assert!(pattern.is_fatal());

        let request = EngineError::InvalidRequest {
            reason: "empty".to_string(),
        };
        assert!(request.is_fatal());

        let io_err = EngineError::io(
            IoOperation::Read,
            "/tmp/a.txt",
            io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io_err.is_fatal());

        let access = EngineError::Access {
            path: PathBuf::from("/tmp/locked"),
            source: io::Error::new(ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!access.is_fatal());
    }

    #[test]
    fn test_io_error_message_names_path_and_step() {
        let err = EngineError::io(
            IoOperation::Write,
            "/tmp/a.txt",
            io::Error::new(ErrorKind::Other, "disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("writing modified content to"));
        assert!(msg.contains("/tmp/a.txt"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_hint_for_permission_denied() {
        let err = EngineError::io(
            IoOperation::Backup,
            "/tmp/dir/a.txt",
            io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        let hint = hint_for(&err).unwrap();
        assert!(hint.contains("ls -l '/tmp/dir/a.txt'"));
        assert!(hint.contains("chmod u+w '/tmp/dir'"));
    }

    #[test]
    fn test_hint_for_other_io_error_is_none() {
        let err = EngineError::io(
            IoOperation::Read,
            "/tmp/a.txt",
            io::Error::new(ErrorKind::Other, "boom"),
        );
        assert!(hint_for(&err).is_none());
    }
}
