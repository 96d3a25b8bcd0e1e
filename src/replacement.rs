use crate::backup_manager::BackupManager;
use crate::error::{EngineError, IoOperation};
use crate::outcome::{Action, WalkOutcome};
use crate::pattern::PatternMatcher;
use crate::walker::{self, file_name};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parameters for one replacement run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRequest {
    pub root: PathBuf,
    /// Filename glob; `""` and `"*"` match every file
    pub pattern: String,
    /// Literal, case-sensitive text to look for; must not be empty
    pub search: String,
    /// May be empty, which deletes every occurrence of `search`
    pub replacement: String,
    pub create_backup: bool,
}

impl ReplacementRequest {
    pub fn new(
        root: impl Into<PathBuf>,
        search: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            pattern: "*".to_string(),
            search: search.into(),
            replacement: replacement.into(),
            create_backup: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_backup(mut self, create_backup: bool) -> Self {
        self.create_backup = create_backup;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.search.is_empty() {
            return Err(EngineError::InvalidRequest {
                reason: "search text must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Recursive literal search-and-replace over a directory tree
pub struct ReplacementEngine;

impl ReplacementEngine {
    /// Run `request` to completion.
    ///
    /// `Err` means the run was rejected or aborted (empty search text,
    /// malformed pattern, unreadable root). Per-file problems are reported
    /// through `WalkOutcome::first_error` instead.
    pub fn run(request: &ReplacementRequest) -> Result<WalkOutcome, EngineError> {
        request.validate()?;
        let matcher = PatternMatcher::new(&request.pattern).inspect_err(|e| {
            tracing::error!(error = %e, "aborting replacement");
        })?;

        tracing::info!(
            root = %request.root.display(),
            pattern = %request.pattern,
            backup = request.create_backup,
            "starting replacement"
        );

        let mut outcome = WalkOutcome::new(Action::Replace);

        walker::walk_files(&request.root, &mut outcome, |entry, outcome| {
            if !matcher.matches(&file_name(entry)) {
                return Ok(());
            }

            let path = entry.path();
            outcome.scanned_count += 1;
            tracing::debug!(path = %path.display(), "matched");

            Self::process_file(path, request, outcome);
            Ok(())
        })?;

        Ok(outcome.finish())
    }

    /// Back up, rewrite and record a single selected file. Every failure is
    /// recorded on `outcome`; none of them stops the walk.
    fn process_file(path: &Path, request: &ReplacementRequest, outcome: &mut WalkOutcome) {
        // A failed backup is reported but never blocks the replacement.
        if request.create_backup {
            if let Err(e) = BackupManager::create_backup(path) {
                outcome.record_error(e);
            }
        }

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                outcome.record_error(EngineError::io(IoOperation::Read, path, e));
                return;
            }
        };

        let search = request.search.as_bytes();
        let Some(updated) = replace_all(&content, search, request.replacement.as_bytes()) else {
            return;
        };

        // Truncating an existing file leaves its permission bits as they were.
        if let Err(e) = fs::write(path, updated) {
            outcome.record_error(EngineError::io(IoOperation::Write, path, e));
            return;
        }

        tracing::info!(path = %path.display(), "modified");
        outcome.record_affected(path.to_path_buf(), format!("Modified: {}", path.display()));
    }
}

/// Replace every non-overlapping occurrence of `needle`, scanning left to right.
///
/// Returns None when `needle` does not occur at all.
pub fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Option<Vec<u8>> {
    if needle.is_empty() {
        return None;
    }

    let mut out: Option<Vec<u8>> = None;
    let mut last = 0;
    let mut i = 0;

    while i + needle.len() <= haystack.len() {
        if &haystack[i..i + needle.len()] == needle {
            let buf = out.get_or_insert_with(|| Vec::with_capacity(haystack.len()));
            buf.extend_from_slice(&haystack[last..i]);
            buf.extend_from_slice(replacement);
            i += needle.len();
            last = i;
        } else {
            i += 1;
        }
    }

    let mut buf = out?;
    buf.extend_from_slice(&haystack[last..]);
    Some(buf)
}
