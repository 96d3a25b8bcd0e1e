use anyhow::Result;
use replace_tree::cli::{self, Args, GlobalOptions};
use replace_tree::config::{self, Config};
use replace_tree::report::{self, EXIT_FATAL, JsonReport, ReportFormatter};
use replace_tree::wizard::{Job, Wizard, WizardSettings};
use replace_tree::{Action, BuildInfo, EngineError, ReplacementRequest, WalkOutcome, logger};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_FATAL);
        }
    }
}

fn run() -> Result<i32> {
    let args = cli::parse_args();

    match args {
        Args::Version => {
            println!("{}", BuildInfo::current());
            Ok(0)
        }
        Args::Config { show, path } => show_config(show, path),
        Args::Replace {
            dir,
            pattern,
            old,
            new,
            backup,
            options,
        } => {
            let config = load_config_or_default();
            init_logging(&config, &options);
            let request = ReplacementRequest::new(dir, old, new)
                .with_pattern(pattern.unwrap_or_else(|| config.replace.pattern.clone()))
                .with_backup(config.replace.resolve_backup(backup));
            Ok(execute(Job::Replace(request), &config, &options))
        }
        Args::Restore { dir, options } => {
            let config = load_config_or_default();
            init_logging(&config, &options);
            Ok(execute(Job::Restore(dir), &config, &options))
        }
        Args::Clean { dir, options } => {
            let config = load_config_or_default();
            init_logging(&config, &options);
            Ok(execute(Job::Clean(dir), &config, &options))
        }
        Args::Wizard { options } => {
            let config = load_config_or_default();
            init_logging(&config, &options);
            run_wizard(&config)
        }
    }
}

/// Configuration problems never block an operation: fall back to defaults
fn load_config_or_default() -> Config {
    let loaded = config::load_config()
        .and_then(|c| config::validate_config(&c).map(|_| c));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Using default configuration: {:#}", e);
            Config::default()
        }
    }
}

fn init_logging(config: &Config, options: &GlobalOptions) {
    let log_dir = config.logging.log_dir.as_deref().map(Path::new);
    match logger::init_debug_logging(config.logging.debug || options.debug, log_dir) {
        Ok(Some(path)) => tracing::debug!(log = %path.display(), "debug logging enabled"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: Debug logging disabled: {:#}", e),
    }
}

/// Run one job in the foreground and print its result
fn execute(job: Job, config: &Config, options: &GlobalOptions) -> i32 {
    let action = job.action();
    let formatter = ReportFormatter::new(config.output.color, config.output.list_files);

    if !options.json {
        println!("{}", formatter.header(action));
    }

    let result = job.run();
    let code = report::exit_code(&result);

    if options.json {
        print_json(action, &result);
    } else {
        print_human(&formatter, &result);
    }

    code
}

fn print_human(formatter: &ReportFormatter, result: &Result<WalkOutcome, EngineError>) {
    match result {
        Ok(outcome) => {
            print!("{}", formatter.format_outcome(outcome));
            if let Some(err) = &outcome.first_error {
                eprintln!("\n{}", formatter.format_warning(outcome, err));
            }
        }
        Err(err) => eprintln!("{}", formatter.format_fatal(err)),
    }
}

fn print_json(action: Action, result: &Result<WalkOutcome, EngineError>) {
    let report = match result {
        Ok(outcome) => JsonReport::from_outcome(outcome),
        Err(err) => JsonReport::from_fatal(action, err),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: Failed to serialize report: {}", e),
    }
}

fn run_wizard(config: &Config) -> Result<i32> {
    let settings = WizardSettings {
        default_pattern: config.replace.pattern.clone(),
        default_backup: config.replace.wizard_backup_default(),
    };
    let formatter = ReportFormatter::new(config.output.color, config.output.list_files);

    let stdin = io::stdin();
    let mut wizard = Wizard::new(stdin.lock(), io::stdout(), settings, formatter);
    wizard.run()?;
    Ok(0)
}

fn show_config(show: bool, path: bool) -> Result<i32> {
    let config_path: PathBuf = config::config_file_path()?;

    if path {
        println!("{}", config_path.display());
        return Ok(0);
    }

    let config = config::load_config_from(&config_path)?;
    config::validate_config(&config)?;

    if show {
        println!("# {}\n", config_path.display());
        println!("{}", toml::to_string_pretty(&config)?);
    } else {
        println!("Configuration file: {}", config_path.display());
        println!("Use --show to print it or --path to print only its location.");
    }
    Ok(0)
}
