//! Configuration management for replace-tree
//!
//! The configuration lives in ~/.replace-tree/config.toml

use crate::pattern::PatternMatcher;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// replace-tree configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for the replace action
    #[serde(default)]
    pub replace: ReplaceConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Debug logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceConfig {
    /// Filename pattern used when --pattern is not given
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Whether to create .bak files when neither --backup nor --no-backup
    /// is given. Unset means no for the command line and yes in the wizard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            backup: None,
        }
    }
}

impl ReplaceConfig {
    /// Backup choice for a command-line run; an explicit flag wins
    pub fn resolve_backup(&self, flag: Option<bool>) -> bool {
        flag.or(self.backup).unwrap_or(false)
    }

    /// Default answer of the wizard's backup prompt
    pub fn wizard_backup_default(&self) -> bool {
        self.backup.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Colored output (NO_COLOR and non-terminal stdout still disable it)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Print one line per affected file
    #[serde(default = "default_true")]
    pub list_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            list_files: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a debug log of every run
    #[serde(default)]
    pub debug: bool,

    /// Directory for the log file (default: ~/.replace-tree)
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

/// Get the configuration directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;

    let config_dir = home_dir.join(".replace-tree");
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default configuration file content with comments
fn default_config_content() -> &'static str {
    r#"# replace-tree configuration file
#
# Values set here can be overridden by command-line flags.

[replace]
# Filename pattern used when --pattern is not given (default: "*")
pattern = "*"

# Create .bak backups when neither --backup nor --no-backup is passed.
# Unset: no backups on the command line, "yes" suggested by the wizard.
# backup = true

[output]
# Colored output (default: true). NO_COLOR also disables colors.
color = true

# Print one line per modified, restored or deleted file (default: true)
list_files = true

[logging]
# Write a debug log of every run (default: false)
debug = false

# Directory for replace-tree.log (default: ~/.replace-tree)
#log_dir = "/var/tmp/replace-tree"
"#
}

/// Write the default commented configuration to `path`
pub fn save_default_config_to(path: &Path) -> Result<()> {
    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config file: {}", path.display()))
}

/// Load configuration from `path`.
///
/// A missing file is created with defaults. A malformed file is replaced with
/// the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        save_default_config_to(path)?;
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    match toml::from_str::<Config>(&config_str) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed config, restoring defaults");
            save_default_config_to(path)?;
            Ok(Config::default())
        }
    }
}

/// Load the user configuration from the default location
pub fn load_config() -> Result<Config> {
    load_config_from(&config_file_path()?)
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    PatternMatcher::new(&config.replace.pattern)
        .with_context(|| format!("Invalid [replace] pattern: {}", config.replace.pattern))?;

    if let Some(dir) = &config.logging.log_dir {
        if dir.trim().is_empty() {
            anyhow::bail!("Invalid log_dir: must not be empty");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.replace.pattern, "*");
        assert_eq!(config.replace.backup, None);
        assert!(config.output.color);
        assert!(config.output.list_files);
        assert!(!config.logging.debug);
        assert_eq!(config.logging.log_dir, None);
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(default_config_content()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[replace]\nbackup = true\n").unwrap();
        assert_eq!(parsed.replace.backup, Some(true));
        assert_eq!(parsed.replace.pattern, "*");
        assert!(parsed.output.color);
    }

    #[test]
    fn test_backup_flag_overrides_config() {
        let unset = ReplaceConfig::default();
        assert!(!unset.resolve_backup(None));
        assert!(unset.resolve_backup(Some(true)));
        assert!(unset.wizard_backup_default());

        let enabled = ReplaceConfig {
            backup: Some(true),
            ..ReplaceConfig::default()
        };
        assert!(enabled.resolve_backup(None));
        assert!(!enabled.resolve_backup(Some(false)));

        let disabled = ReplaceConfig {
            backup: Some(false),
            ..ReplaceConfig::default()
        };
        assert!(!disabled.resolve_backup(None));
        assert!(disabled.resolve_backup(Some(true)));
        assert!(!disabled.wizard_backup_default());
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_pattern() {
        let mut config = Config::default();
        config.replace.pattern = "[abc".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_empty_log_dir() {
        let mut config = Config::default();
        config.logging.log_dir = Some("  ".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = load_config_from(&path).unwrap();

        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_config_replaces_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "this is [not toml").unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), default_config_content());
    }

    #[test]
    fn test_load_config_reads_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[replace]\npattern = \"*.rs\"\n[output]\ncolor = false\n").unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.replace.pattern, "*.rs");
        assert!(!config.output.color);
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[replace]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[logging]"));
    }
}
