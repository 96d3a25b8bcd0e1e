use crate::backup_manager::BackupManager;
use crate::error::EngineError;
use crate::outcome::{Action, WalkOutcome};
use crate::walker;
use std::path::Path;

/// Moves every `.bak` file in a tree back over its original
pub struct RestoreEngine;

impl RestoreEngine {
    /// Restore all backups under `root`.
    ///
    /// Only a root that cannot be inspected yields `Err`. An empty result with
    /// no error is a success and sets `nothing_to_do`.
    pub fn run(root: &Path) -> Result<WalkOutcome, EngineError> {
        tracing::info!(root = %root.display(), "starting restore");
        let mut outcome = WalkOutcome::new(Action::Restore);

        walker::walk_files(root, &mut outcome, |entry, outcome| {
            if !BackupManager::is_backup_name(entry.file_name()) {
                return Ok(());
            }

            let backup_path = entry.path();
            outcome.scanned_count += 1;

            match BackupManager::restore_backup(backup_path) {
                Ok(original) => {
                    tracing::info!(original = %original.display(), "restored");
                    let message = format!(
                        "Restored: {} from {}",
                        original.display(),
                        backup_path.display()
                    );
                    outcome.record_affected(original, message);
                }
                Err(e) => outcome.record_error(e),
            }
            Ok(())
        })?;

        let mut outcome = outcome.finish();
        if outcome.nothing_to_do {
            outcome
                .messages
                .push("No .bak files found to restore in the specified directory.".to_string());
        }
        Ok(outcome)
    }
}
