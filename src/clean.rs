use crate::backup_manager::BackupManager;
use crate::error::{EngineError, IoOperation};
use crate::outcome::{Action, WalkOutcome};
use crate::walker;
use std::fs;
use std::path::Path;

/// Deletes every `.bak` file in a tree
pub struct CleanEngine;

impl CleanEngine {
    /// Delete all backups under `root`. Same error policy as restore.
    pub fn run(root: &Path) -> Result<WalkOutcome, EngineError> {
        tracing::info!(root = %root.display(), "starting clean");
        let mut outcome = WalkOutcome::new(Action::Clean);

        walker::walk_files(root, &mut outcome, |entry, outcome| {
            if !BackupManager::is_backup_name(entry.file_name()) {
                return Ok(());
            }

            let path = entry.path();
            outcome.scanned_count += 1;

            match fs::remove_file(path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "deleted backup");
                    outcome.record_affected(
                        path.to_path_buf(),
                        format!("Deleted backup: {}", path.display()),
                    );
                }
                Err(e) => outcome.record_error(EngineError::io(IoOperation::Delete, path, e)),
            }
            Ok(())
        })?;

        let mut outcome = outcome.finish();
        if outcome.nothing_to_do {
            outcome
                .messages
                .push("No .bak files found to clean in the specified directory.".to_string());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_clean_removes_only_backups() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let keep = [
            create_test_file(root, "a.txt", "a"),
            create_test_file(root, "notes.bak.txt", "b"),
            create_test_file(root, "UPPER.BAK", "c"),
        ];
        let gone = [
            create_test_file(root, "a.txt.bak", "old a"),
            create_test_file(root, "deep/er/x.bak", "old x"),
        ];

        let outcome = CleanEngine::run(root).unwrap();

        assert_eq!(outcome.affected_paths, gone.to_vec());
        assert_eq!(outcome.scanned_count, 2);
        for path in &keep {
            assert!(path.exists(), "{} should survive", path.display());
        }
        for path in &gone {
            assert!(!path.exists(), "{} should be deleted", path.display());
        }
    }

    #[test]
    fn test_clean_twice_reports_nothing() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "a.txt.bak", "old");

        let first = CleanEngine::run(temp_dir.path()).unwrap();
        assert_eq!(first.affected_count(), 1);
        assert!(!first.nothing_to_do);

        let second = CleanEngine::run(temp_dir.path()).unwrap();
        assert_eq!(second.affected_count(), 0);
        assert!(second.first_error.is_none());
        assert!(second.nothing_to_do);
        assert!(second.messages[0].contains("No .bak files found to clean"));
    }

    #[test]
    fn test_clean_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = CleanEngine::run(temp_dir.path()).unwrap();
        assert!(outcome.nothing_to_do);
        assert_eq!(outcome.scanned_count, 0);
    }
}
