use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "replace-tree")]
#[command(about = "Recursive search-and-replace with .bak backup, restore, and cleanup")]
#[command(long_about = "replace-tree replaces literal text in every file of a directory tree.

Files are selected by a glob pattern matched against the file name. Before a
file is rewritten, a copy can be kept next to it as <name>.bak. Those backups
can later be moved back over the originals (--restore) or deleted (--clean).

One unreadable or unwritable file never stops the run: the remaining files are
still processed and the first problem is reported at the end.

EXIT STATUS:
  0  every file was processed
  1  the run completed but at least one file failed
  2  the run was rejected or aborted (empty search text, bad pattern,
     missing directory, invalid arguments)

EXAMPLES:
  replace-tree --old foo --new bar                     Replace in every file under .
  replace-tree --dir src --pattern '*.rs' --old a --new b --backup
  replace-tree --dir src --old 'TODO: ' --new ''       Delete every occurrence
  replace-tree --dir src --restore                     Put .bak files back
  replace-tree --dir src --clean                       Delete .bak files
  replace-tree                                         Start the interactive wizard")]
#[command(disable_version_flag = true)]
#[command(group(ArgGroup::new("operation").args(["old", "restore", "clean", "wizard"])))]
struct Cli {
    /// Target directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Filename pattern (e.g. '*.txt'); defaults to the configured pattern, else '*'
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Text to replace (literal, case-sensitive)
    #[arg(long, value_name = "TEXT")]
    old: Option<String>,

    /// Replacement text (empty deletes every occurrence)
    #[arg(long, value_name = "TEXT", default_value = "", requires = "old")]
    new: String,

    /// Create a .bak copy of each matching file before replacing
    #[arg(long, conflicts_with = "no_backup")]
    backup: bool,

    /// Never create backups, even when the config enables them
    #[arg(long)]
    no_backup: bool,

    /// Restore files from .bak backups
    #[arg(long)]
    restore: bool,

    /// Delete all .bak backup files
    #[arg(long)]
    clean: bool,

    /// Run the interactive wizard
    #[arg(long)]
    wizard: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write a debug log (see `replace-tree config --path` for its location)
    #[arg(long)]
    debug: bool,

    /// Show version, commit and build information
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show configuration
    #[command(long_about = "Show the replace-tree configuration.

The configuration file is ~/.replace-tree/config.toml. It is created with
commented defaults the first time replace-tree runs.

CONFIGURATION OPTIONS:
  [replace]
    pattern = \"*\"        # Default filename pattern
    backup = true         # Create .bak files unless --no-backup is given

  [output]
    color = true          # Colored output
    list_files = true     # One line per affected file

  [logging]
    debug = false         # Write a debug log
    log_dir = \"/path\"    # Log directory (optional)

EXAMPLES:
  replace-tree config --show      Print the effective configuration
  replace-tree config --path      Print the configuration file location")]
    Config {
        /// Print the effective configuration
        #[arg(long, conflicts_with = "path")]
        show: bool,

        /// Print the configuration file location
        #[arg(long)]
        path: bool,
    },
}

/// Options that apply to every operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub json: bool,
    pub debug: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Args {
    Replace {
        dir: PathBuf,
        pattern: Option<String>,
        old: String,
        new: String,
        /// None leaves the choice to the config file
        backup: Option<bool>,
        options: GlobalOptions,
    },
    Restore {
        dir: PathBuf,
        options: GlobalOptions,
    },
    Clean {
        dir: PathBuf,
        options: GlobalOptions,
    },
    Wizard {
        options: GlobalOptions,
    },
    Version,
    Config {
        show: bool,
        path: bool,
    },
}

pub fn parse_args() -> Args {
    into_args(Cli::parse())
}

/// Parse from an explicit argument list (first item is the program name)
pub fn try_parse_from<I, T>(itr: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr).map(into_args)
}

fn into_args(cli: Cli) -> Args {
    if cli.version {
        return Args::Version;
    }

    if let Some(Commands::Config { show, path }) = cli.command {
        return Args::Config { show, path };
    }

    let options = GlobalOptions {
        json: cli.json,
        debug: cli.debug,
    };

    if cli.clean {
        Args::Clean {
            dir: cli.dir,
            options,
        }
    } else if cli.restore {
        Args::Restore {
            dir: cli.dir,
            options,
        }
    } else if let Some(old) = cli.old {
        Args::Replace {
            dir: cli.dir,
            pattern: cli.pattern,
            old,
            new: cli.new,
            backup: if cli.backup {
                Some(true)
            } else if cli.no_backup {
                Some(false)
            } else {
                None
            },
            options,
        }
    } else {
        // No operation flag: fall back to the wizard
        Args::Wizard { options }
    }
}
