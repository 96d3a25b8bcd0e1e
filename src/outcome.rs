use crate::error::EngineError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The bulk transformation a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Replace,
    Restore,
    Clean,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Replace => write!(f, "replace"),
            Action::Restore => write!(f, "restore"),
            Action::Clean => write!(f, "clean"),
        }
    }
}

/// Accumulated result of one traversal.
///
/// Created empty when a run starts and filled in as files are visited.
/// Only the first non-fatal error is kept; later ones are logged and dropped.
#[derive(Debug)]
pub struct WalkOutcome {
    pub action: Action,
    /// Rewritten, restored or deleted paths in traversal order
    pub affected_paths: Vec<PathBuf>,
    /// Files that passed the selection predicate and were attempted
    pub scanned_count: usize,
    /// Human-readable description of each action taken
    pub messages: Vec<String>,
    pub first_error: Option<EngineError>,
    /// Set when the run finished cleanly without touching anything
    pub nothing_to_do: bool,
}

impl WalkOutcome {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            affected_paths: Vec::new(),
            scanned_count: 0,
            messages: Vec::new(),
            first_error: None,
            nothing_to_do: false,
        }
    }

    /// Record a non-fatal error; the first one wins
    pub fn record_error(&mut self, err: EngineError) {
        tracing::warn!(action = %self.action, error = %err, "skipping after error");
        if self.first_error.is_none() {
            self.first_error = Some(err);
        }
    }

    pub fn record_affected(&mut self, path: PathBuf, message: String) {
        self.messages.push(message);
        self.affected_paths.push(path);
    }

    pub fn affected_count(&self) -> usize {
        self.affected_paths.len()
    }

    pub fn has_error(&self) -> bool {
        self.first_error.is_some()
    }

    /// Close the outcome once traversal has completed
    pub(crate) fn finish(mut self) -> Self {
        self.nothing_to_do = self.affected_paths.is_empty() && self.first_error.is_none();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoOperation;
    use std::io;

    fn io_error(name: &str) -> EngineError {
        EngineError::io(
            IoOperation::Read,
            name,
            io::Error::new(io::ErrorKind::Other, "boom"),
        )
    }

    #[test]
    fn test_first_error_wins() {
        let mut outcome = WalkOutcome::new(Action::Replace);
        outcome.record_error(io_error("first.txt"));
        outcome.record_error(io_error("second.txt"));

        let err = outcome.first_error.unwrap();
        assert_eq!(err.path(), Some(std::path::Path::new("first.txt")));
    }

    #[test]
    fn test_finish_sets_nothing_to_do_only_when_clean() {
        let empty = WalkOutcome::new(Action::Clean).finish();
        assert!(empty.nothing_to_do);

        let mut failed = WalkOutcome::new(Action::Clean);
        failed.record_error(io_error("a.bak"));
        assert!(!failed.finish().nothing_to_do);

        let mut touched = WalkOutcome::new(Action::Restore);
        touched.record_affected(PathBuf::from("a"), "Restored: a".to_string());
        let touched = touched.finish();
        assert!(!touched.nothing_to_do);
        assert_eq!(touched.affected_count(), 1);
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Restore).unwrap(), "\"restore\"");
    }
}
