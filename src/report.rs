use crate::error::{EngineError, hint_for};
use crate::outcome::{Action, WalkOutcome};
use colored::*;
use serde::Serialize;
use std::io::IsTerminal;

/// Process exit codes for the command-line front-end
pub const EXIT_OK: i32 = 0;
/// At least one file failed; others may have succeeded
pub const EXIT_PARTIAL: i32 = 1;
/// The run was rejected or aborted, or the command line was invalid
pub const EXIT_FATAL: i32 = 2;

pub struct ReportFormatter {
    use_color: bool,
    list_files: bool,
}

impl ReportFormatter {
    pub fn new(color_enabled: bool, list_files: bool) -> Self {
        Self {
            use_color: color_enabled && Self::should_use_color(),
            list_files,
        }
    }

    /// Formatter that never emits ANSI codes
    pub fn plain() -> Self {
        Self {
            use_color: false,
            list_files: true,
        }
    }

    /// Auto-detect if we should use colors
    fn should_use_color() -> bool {
        // Check NO_COLOR env var (https://no-color.org/)
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }

        std::io::stdout().is_terminal()
    }

    /// Line printed before an action starts
    pub fn header(&self, action: Action) -> String {
        let text = match action {
            Action::Replace => "Performing text replacement...",
            Action::Restore => "Restoring from backup files...",
            Action::Clean => "Cleaning backup files...",
        };
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Per-file lines followed by a summary.
    ///
    /// Counts are always printed, including when a non-fatal error occurred.
    pub fn format_outcome(&self, outcome: &WalkOutcome) -> String {
        let mut output = String::new();

        if self.list_files && !outcome.affected_paths.is_empty() {
            for message in outcome.messages.iter().take(outcome.affected_paths.len()) {
                if self.use_color {
                    output.push_str(&format!("  {} {}\n", "-".green(), message));
                } else {
                    output.push_str(&format!("  - {}\n", message));
                }
            }
            output.push('\n');
        }

        let summary = Self::summary(outcome);
        if self.use_color {
            let colored = if outcome.has_error() {
                summary.yellow().bold()
            } else if outcome.affected_count() > 0 {
                summary.green().bold()
            } else {
                summary.normal()
            };
            output.push_str(&format!("{}\n", colored));
        } else {
            output.push_str(&format!("{}\n", summary));
        }

        output
    }

    /// One-line summary of an outcome
    pub fn summary(outcome: &WalkOutcome) -> String {
        let n = outcome.affected_count();
        match outcome.action {
            Action::Replace => {
                if n > 0 {
                    format!(
                        "Modified {} of {} matching file(s).",
                        n, outcome.scanned_count
                    )
                } else if outcome.scanned_count > 0 {
                    format!(
                        "Search text not found in any of {} matching file(s).",
                        outcome.scanned_count
                    )
                } else {
                    "No files found matching the pattern in the specified directory.".to_string()
                }
            }
            Action::Restore => {
                if outcome.nothing_to_do {
                    "No .bak files found to restore.".to_string()
                } else {
                    format!("Restored {} of {} backup file(s).", n, outcome.scanned_count)
                }
            }
            Action::Clean => {
                if outcome.nothing_to_do {
                    "No .bak files found to clean.".to_string()
                } else {
                    format!("Deleted {} of {} backup file(s).", n, outcome.scanned_count)
                }
            }
        }
    }

    /// Warning block for the first non-fatal error of a completed run
    pub fn format_warning(&self, outcome: &WalkOutcome, err: &EngineError) -> String {
        let head = format!(
            "Operation completed with {} success(es) and an error: {}",
            outcome.affected_count(),
            err
        );
        self.with_hint(head, err, false)
    }

    /// Error block for a run that was rejected or aborted
    pub fn format_fatal(&self, err: &EngineError) -> String {
        let head = format!("Operation aborted before completion: {}", err);
        self.with_hint(head, err, true)
    }

    fn with_hint(&self, head: String, err: &EngineError, fatal: bool) -> String {
        let mut output = if !self.use_color {
            head
        } else if fatal {
            head.red().bold().to_string()
        } else {
            head.yellow().to_string()
        };
        if let Some(hint) = hint_for(err) {
            output.push_str("\n\n");
            output.push_str(&hint);
        }
        output
    }
}

/// Machine-readable form of a run result
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub action: Action,
    pub affected_paths: Vec<String>,
    pub scanned_count: usize,
    pub messages: &'a [String],
    pub nothing_to_do: bool,
    pub error: Option<JsonError>,
}

#[derive(Debug, Serialize)]
pub struct JsonError {
    pub kind: &'static str,
    pub fatal: bool,
    pub message: String,
    pub path: Option<String>,
}

impl From<&EngineError> for JsonError {
    fn from(err: &EngineError) -> Self {
        Self {
            kind: err.kind(),
            fatal: err.is_fatal(),
            message: err.to_string(),
            path: err.path().map(|p| p.display().to_string()),
        }
    }
}

impl<'a> JsonReport<'a> {
    pub fn from_outcome(outcome: &'a WalkOutcome) -> Self {
        Self {
            action: outcome.action,
            affected_paths: outcome
                .affected_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            scanned_count: outcome.scanned_count,
            messages: &outcome.messages,
            nothing_to_do: outcome.nothing_to_do,
            error: outcome.first_error.as_ref().map(JsonError::from),
        }
    }

    pub fn from_fatal(action: Action, err: &EngineError) -> Self {
        Self {
            action,
            affected_paths: Vec::new(),
            scanned_count: 0,
            messages: &[],
            nothing_to_do: false,
            error: Some(JsonError::from(err)),
        }
    }
}

/// Exit code for an engine result
pub fn exit_code(result: &Result<WalkOutcome, EngineError>) -> i32 {
    match result {
        Ok(outcome) if outcome.has_error() => EXIT_PARTIAL,
        Ok(_) => EXIT_OK,
        Err(_) => EXIT_FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoOperation;
    use std::io;
    use std::path::PathBuf;

    fn outcome_with(action: Action, paths: &[&str], scanned: usize) -> WalkOutcome {
        let mut outcome = WalkOutcome::new(action);
        outcome.scanned_count = scanned;
        for p in paths {
            outcome.record_affected(PathBuf::from(p), format!("Modified: {}", p));
        }
        outcome.finish()
    }

    fn write_error(path: &str) -> EngineError {
        EngineError::io(
            IoOperation::Write,
            path,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        )
    }

    #[test]
    fn test_format_outcome_lists_files_and_summary() {
        let outcome = outcome_with(Action::Replace, &["a.txt", "b.txt"], 3);
        let text = ReportFormatter::plain().format_outcome(&outcome);

        assert!(text.contains("  - Modified: a.txt\n"));
        assert!(text.contains("  - Modified: b.txt\n"));
        assert!(text.ends_with("Modified 2 of 3 matching file(s).\n"));
    }

    #[test]
    fn test_list_files_disabled() {
        let outcome = outcome_with(Action::Replace, &["a.txt"], 1);
        let formatter = ReportFormatter {
            use_color: false,
            list_files: false,
        };
        let text = formatter.format_outcome(&outcome);
        assert!(!text.contains("a.txt"));
        assert!(text.contains("Modified 1 of 1"));
    }

    #[test]
    fn test_replace_summaries() {
        let none_found = outcome_with(Action::Replace, &[], 0);
        assert!(ReportFormatter::summary(&none_found).starts_with("No files found"));

        let not_found = outcome_with(Action::Replace, &[], 4);
        assert_eq!(
            ReportFormatter::summary(&not_found),
            "Search text not found in any of 4 matching file(s)."
        );
    }

    #[test]
    fn test_restore_and_clean_nothing_to_do() {
        let restore = outcome_with(Action::Restore, &[], 0);
        assert_eq!(
            ReportFormatter::summary(&restore),
            "No .bak files found to restore."
        );
        let clean = outcome_with(Action::Clean, &[], 0);
        assert_eq!(ReportFormatter::summary(&clean), "No .bak files found to clean.");
    }

    #[test]
    fn test_warning_reports_count_and_error() {
        let mut outcome = WalkOutcome::new(Action::Replace);
        outcome.record_affected(PathBuf::from("ok.txt"), "Modified: ok.txt".to_string());
        outcome.record_error(write_error("/tmp/locked.txt"));
        let outcome = outcome.finish();

        let err = outcome.first_error.as_ref().unwrap();
        let text = ReportFormatter::plain().format_warning(&outcome, err);

        assert!(text.contains("1 success(es)"));
        assert!(text.contains("/tmp/locked.txt"));
        assert!(text.contains("Possible fixes"));
    }

    #[test]
    fn test_exit_codes() {
        let ok: Result<WalkOutcome, EngineError> = Ok(outcome_with(Action::Clean, &[], 0));
        assert_eq!(exit_code(&ok), EXIT_OK);

        let mut partial = WalkOutcome::new(Action::Clean);
        partial.record_error(write_error("x.bak"));
        let partial: Result<WalkOutcome, EngineError> = Ok(partial.finish());
        assert_eq!(exit_code(&partial), EXIT_PARTIAL);

        let fatal: Result<WalkOutcome, EngineError> = Err(EngineError::InvalidPattern {
            pattern: "[".to_string(),
            message: "bad".to_string(),
        });
        assert_eq!(exit_code(&fatal), EXIT_FATAL);
    }

    #[test]
    fn test_json_report_shape() {
        let mut outcome = WalkOutcome::new(Action::Replace);
        outcome.scanned_count = 2;
        outcome.record_affected(PathBuf::from("a.txt"), "Modified: a.txt".to_string());
        outcome.record_error(write_error("b.txt"));
        let outcome = outcome.finish();

        let value = serde_json::to_value(JsonReport::from_outcome(&outcome)).unwrap();

        assert_eq!(value["action"], "replace");
        assert_eq!(value["affected_paths"][0], "a.txt");
        assert_eq!(value["scanned_count"], 2);
        assert_eq!(value["nothing_to_do"], false);
        assert_eq!(value["error"]["kind"], "io");
        assert_eq!(value["error"]["fatal"], false);
        assert_eq!(value["error"]["path"], "b.txt");
    }
}
