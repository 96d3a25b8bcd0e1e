//! Build metadata
//!
//! Commit, build date and builder are injected at compile time through
//! `REPLACE_TREE_COMMIT`, `REPLACE_TREE_BUILD_DATE` and `REPLACE_TREE_BUILT_BY`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: &'static str,
    pub built_by: &'static str,
}

impl BuildInfo {
    /// Metadata baked into this binary
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: match option_env!("REPLACE_TREE_COMMIT") {
                Some(commit) => commit,
                None => "none",
            },
            date: match option_env!("REPLACE_TREE_BUILD_DATE") {
                Some(date) => date,
                None => "unknown",
            },
            built_by: match option_env!("REPLACE_TREE_BUILT_BY") {
                Some(built_by) => built_by,
                None => "unknown",
            },
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "replace-tree version: {}", self.version)?;
        writeln!(f, "commit: {}", self.commit)?;
        writeln!(f, "built_at: {}", self.date)?;
        write!(f, "built_by: {}", self.built_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_field() {
        let info = BuildInfo {
            version: "1.2.3",
            commit: "abc123",
            date: "2025-01-01",
            built_by: "ci",
        };
        let text = info.to_string();
        assert_eq!(
            text,
            "replace-tree version: 1.2.3\ncommit: abc123\nbuilt_at: 2025-01-01\nbuilt_by: ci"
        );
    }

    #[test]
    fn test_current_uses_package_version() {
        assert_eq!(BuildInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
