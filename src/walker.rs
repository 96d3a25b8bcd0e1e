//! Depth-first traversal shared by the three engines
//!
//! Entries are visited in lexical order within each directory. Only regular
//! files reach the visitor: directories, symlinks and special files are passed
//! over. Access errors are recorded on the outcome and the walk continues with
//! the next sibling.

use crate::error::EngineError;
use crate::outcome::WalkOutcome;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Walk `root`, calling `visit` for every regular file.
///
/// An `Err` from `visit` is fatal and stops the walk immediately.
pub(crate) fn walk_files<F>(
    root: &Path,
    outcome: &mut WalkOutcome,
    mut visit: F,
) -> Result<(), EngineError>
where
    F: FnMut(&DirEntry, &mut WalkOutcome) -> Result<(), EngineError>,
{
    fs::metadata(root).map_err(|source| EngineError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                outcome.record_error(access_error(root, err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        tracing::trace!(path = %entry.path().display(), "visiting");
        visit(&entry, outcome)?;
    }

    Ok(())
}

fn access_error(root: &Path, err: walkdir::Error) -> EngineError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = match err.into_io_error() {
        Some(source) => source,
        None => io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
    };
    EngineError::Access { path, source }
}

/// Base filename of an entry, lossily decoded
pub(crate) fn file_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}
