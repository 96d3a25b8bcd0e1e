//! replace-tree: recursive literal search-and-replace with `.bak` backups
//!
//! The library holds the file-tree mutation engines used by the binary at
//! src/main.rs: replacement, restore from backup, and backup cleanup.

pub mod backup_manager;
pub mod clean;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod outcome;
pub mod pattern;
pub mod replacement;
pub mod report;
pub mod restore;
pub mod version;
mod walker;
pub mod wizard;

// Re-export commonly used types for convenience
pub use backup_manager::{BACKUP_SUFFIX, BackupManager};
pub use clean::CleanEngine;
pub use error::{EngineError, IoOperation};
pub use outcome::{Action, WalkOutcome};
pub use pattern::PatternMatcher;
pub use replacement::{ReplacementEngine, ReplacementRequest};
pub use restore::RestoreEngine;
pub use version::BuildInfo;
