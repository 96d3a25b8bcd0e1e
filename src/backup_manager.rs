use crate::error::{EngineError, IoOperation};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Literal suffix appended to the full original filename
pub const BACKUP_SUFFIX: &str = ".bak";

const BACKUP_EXTENSION: &str = "bak";

/// Single-level `.bak` backups stored next to the original file.
///
/// There is no versioning: a new backup overwrites the previous one.
pub struct BackupManager;

impl BackupManager {
    /// Backup location for `path`: same directory, `.bak` appended to the full name
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Original location for a backup, or None if `backup_path` has no `.bak` suffix
    pub fn original_path(backup_path: &Path) -> Option<PathBuf> {
        // A bare ".bak" is all stem and has no extension.
        if backup_path.extension()? != BACKUP_EXTENSION {
            return None;
        }
        Some(backup_path.with_extension(""))
    }

    /// Whether a base filename names a backup file. Works on the raw name,
    /// so names that are not valid UTF-8 are recognized too.
    pub fn is_backup_name(file_name: impl AsRef<OsStr>) -> bool {
        file_name
            .as_ref()
            .as_encoded_bytes()
            .ends_with(BACKUP_SUFFIX.as_bytes())
    }

    /// Copy `path` to `path.bak`, carrying over the permission bits.
    ///
    /// Returns the backup path.
    pub fn create_backup(path: &Path) -> Result<PathBuf, EngineError> {
        let fail = |e| EngineError::io(IoOperation::Backup, path, e);

        let content = fs::read(path).map_err(fail)?;
        let permissions = fs::metadata(path).map_err(fail)?.permissions();

        let backup_path = Self::backup_path(path);
        fs::write(&backup_path, &content).map_err(fail)?;
        // fs::write keeps the mode of a pre-existing backup, so apply it explicitly.
        fs::set_permissions(&backup_path, permissions).map_err(fail)?;

        tracing::debug!(original = %path.display(), backup = %backup_path.display(), "backup created");
        Ok(backup_path)
    }

    /// Move `backup_path` over its original, replacing whatever is there.
    ///
    /// Returns the restored original path. The pre-restore content of the
    /// original is lost once the rename succeeds.
    pub fn restore_backup(backup_path: &Path) -> Result<PathBuf, EngineError> {
        let original = Self::original_path(backup_path).ok_or_else(|| {
            EngineError::io(
                IoOperation::Restore,
                backup_path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("file name does not end with '{}'", BACKUP_SUFFIX),
                ),
            )
        })?;

        fs::rename(backup_path, &original)
            .map_err(|e| EngineError::io(IoOperation::Restore, backup_path, e))?;

        tracing::debug!(backup = %backup_path.display(), original = %original.display(), "backup restored");
        Ok(original)
    }
}
