//! Interactive wizard
//!
//! A line-oriented sequence of prompts that collects the parameters for one
//! operation, asks for confirmation, and runs the engine on a worker thread.
//! `:b` goes back one step and `:q` quits at any prompt. End of input exits.

use crate::clean::CleanEngine;
use crate::error::EngineError;
use crate::outcome::{Action, WalkOutcome};
use crate::pattern::PatternMatcher;
use crate::replacement::{ReplacementEngine, ReplacementRequest};
use crate::report::ReportFormatter;
use crate::restore::RestoreEngine;
use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use anyhow::Result;
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const BACK: &str = ":b";
const QUIT: &str = ":q";
const PROGRESS_TICK: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChooseAction,
    EnterDir,
    EnterPattern,
    EnterOldText,
    EnterNewText,
    ConfirmBackup,
    ConfirmOperation,
    ShowResult,
    Error,
}

/// Defaults offered at the prompts
#[derive(Debug, Clone)]
pub struct WizardSettings {
    pub default_pattern: String,
    pub default_backup: bool,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            default_pattern: "*".to_string(),
            default_backup: true,
        }
    }
}

/// Everything collected so far
#[derive(Debug, Clone, Default)]
struct Collected {
    action: Option<Action>,
    dir: PathBuf,
    pattern: String,
    old: String,
    new: String,
    backup: bool,
}

/// Work handed to the worker thread
#[derive(Debug, Clone)]
pub enum Job {
    Replace(ReplacementRequest),
    Restore(PathBuf),
    Clean(PathBuf),
}

impl Job {
    pub fn action(&self) -> Action {
        match self {
            Job::Replace(_) => Action::Replace,
            Job::Restore(_) => Action::Restore,
            Job::Clean(_) => Action::Clean,
        }
    }

    pub fn run(&self) -> Result<WalkOutcome, EngineError> {
        match self {
            Job::Replace(request) => ReplacementEngine::run(request),
            Job::Restore(dir) => RestoreEngine::run(dir),
            Job::Clean(dir) => CleanEngine::run(dir),
        }
    }
}

/// Run `job` on a background thread; the result arrives on the returned channel
pub fn dispatch(job: Job) -> Receiver<Result<WalkOutcome, EngineError>> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        // The receiver may be gone if the wizard was torn down.
        let _ = tx.send(job.run());
    });
    rx
}

enum Flow {
    Continue,
    Dispatch,
    Quit,
}

pub struct Wizard<R, W> {
    input: R,
    output: W,
    settings: WizardSettings,
    formatter: ReportFormatter,
    step: Step,
    data: Collected,
    /// Validation message shown above the next prompt
    notice: Option<String>,
    /// Text shown on the ShowResult / Error screens
    screen: String,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(input: R, output: W, settings: WizardSettings, formatter: ReportFormatter) -> Self {
        Self {
            input,
            output,
            settings,
            formatter,
            step: Step::ChooseAction,
            data: Collected::default(),
            notice: None,
            screen: String::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Drive the wizard until the user quits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.render()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }
            let line = line.trim_end_matches(['\n', '\r']);

            match self.handle_input(line) {
                Flow::Continue => {}
                Flow::Quit => return Ok(()),
                Flow::Dispatch => self.perform()?,
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        if let Some(notice) = self.notice.take() {
            writeln!(self.output, "! {}", notice)?;
        }

        match self.step {
            Step::ChooseAction => {
                writeln!(self.output, "\nWhat would you like to do?")?;
                writeln!(self.output, "  1) Replace text in files")?;
                writeln!(self.output, "  2) Restore files from .bak")?;
                writeln!(self.output, "  3) Clean .bak backup files")?;
                writeln!(self.output, "  4) Exit")?;
                write!(self.output, "> ")?;
            }
            Step::EnterDir => write!(self.output, "Target directory [.]: ")?,
            Step::EnterPattern => write!(
                self.output,
                "File pattern [{}]: ",
                self.settings.default_pattern
            )?,
            Step::EnterOldText => write!(self.output, "Text to replace: ")?,
            Step::EnterNewText => write!(self.output, "Replace with (empty deletes): ")?,
            Step::ConfirmBackup => {
                let hint = if self.settings.default_backup { "Y/n" } else { "y/N" };
                write!(self.output, "Create .bak backups before replacing? [{}]: ", hint)?;
            }
            Step::ConfirmOperation => {
                let summary = self.summary();
                writeln!(self.output, "\n{}", summary)?;
                write!(self.output, "Proceed? [Y/n]: ")?;
            }
            Step::ShowResult | Step::Error => {
                writeln!(self.output, "\n{}", self.screen)?;
                write!(self.output, "Press Enter to return to the menu.")?;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn summary(&self) -> String {
        let dir = self.data.dir.display();
        match self.data.action {
            Some(Action::Replace) => format!(
                "Replace '{}' with '{}' in files matching '{}' under '{}' (backup: {})",
                self.data.old,
                self.data.new,
                self.data.pattern,
                dir,
                if self.data.backup { "yes" } else { "no" }
            ),
            Some(Action::Restore) => format!("Restore every .bak file under '{}'", dir),
            Some(Action::Clean) => format!("Delete every .bak file under '{}'", dir),
            None => String::new(),
        }
    }

    fn handle_input(&mut self, line: &str) -> Flow {
        if line.trim() == QUIT {
            return Flow::Quit;
        }
        if line.trim() == BACK {
            self.go_back();
            return Flow::Continue;
        }

        match self.step {
            Step::ChooseAction => match line.trim() {
                "1" => self.begin(Action::Replace),
                "2" => self.begin(Action::Restore),
                "3" => self.begin(Action::Clean),
                "4" | "q" => return Flow::Quit,
                other => self.notice = Some(format!("Unknown choice '{}'. Pick 1-4.", other)),
            },
            Step::EnterDir => {
                let raw = line.trim();
                let dir = PathBuf::from(if raw.is_empty() { "." } else { raw });
                match fs::metadata(&dir) {
                    Ok(meta) if meta.is_dir() => {
                        self.data.dir = dir;
                        self.step = match self.data.action {
                            Some(Action::Replace) => Step::EnterPattern,
                            _ => Step::ConfirmOperation,
                        };
                    }
                    Ok(_) => {
                        self.notice =
                            Some(format!("Path '{}' is not a directory.", dir.display()))
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        self.notice =
                            Some(format!("Directory '{}' does not exist.", dir.display()))
                    }
                    Err(e) => {
                        self.notice = Some(format!(
                            "Error accessing directory '{}': {}",
                            dir.display(),
                            e
                        ))
                    }
                }
            }
            Step::EnterPattern => {
                let raw = line.trim();
                let pattern = if raw.is_empty() {
                    self.settings.default_pattern.clone()
                } else {
                    raw.to_string()
                };
                match PatternMatcher::new(&pattern) {
                    Ok(_) => {
                        self.data.pattern = pattern;
                        self.step = Step::EnterOldText;
                    }
                    Err(e) => self.notice = Some(format!("Invalid file pattern syntax: {}", e)),
                }
            }
            Step::EnterOldText => {
                if line.is_empty() {
                    self.notice = Some("Text to replace cannot be empty.".to_string());
                } else {
                    self.data.old = line.to_string();
                    self.step = Step::EnterNewText;
                }
            }
            Step::EnterNewText => {
                self.data.new = line.to_string();
                self.step = Step::ConfirmBackup;
            }
            Step::ConfirmBackup => match parse_yes_no(line, self.settings.default_backup) {
                Some(backup) => {
                    self.data.backup = backup;
                    self.step = Step::ConfirmOperation;
                }
                None => self.notice = Some("Please answer y or n.".to_string()),
            },
            Step::ConfirmOperation => match parse_yes_no(line, true) {
                Some(true) => return Flow::Dispatch,
                Some(false) => self.reset(),
                None => self.notice = Some("Please answer y or n.".to_string()),
            },
            Step::ShowResult | Step::Error => self.reset(),
        }
        Flow::Continue
    }

    fn begin(&mut self, action: Action) {
        self.data = Collected {
            action: Some(action),
            ..Collected::default()
        };
        self.step = Step::EnterDir;
    }

    fn go_back(&mut self) {
        let replace = self.data.action == Some(Action::Replace);
        let previous = match self.step {
            Step::ChooseAction => Step::ChooseAction,
            Step::EnterDir | Step::ShowResult | Step::Error => {
                self.reset();
                return;
            }
            Step::EnterPattern => Step::EnterDir,
            Step::EnterOldText => Step::EnterPattern,
            Step::EnterNewText => Step::EnterOldText,
            Step::ConfirmBackup => Step::EnterNewText,
            Step::ConfirmOperation if replace => Step::ConfirmBackup,
            Step::ConfirmOperation => Step::EnterDir,
        };
        self.step = previous;
    }

    fn reset(&mut self) {
        self.step = Step::ChooseAction;
        self.data = Collected::default();
        self.screen.clear();
    }

    fn job(&self) -> Option<Job> {
        let dir = self.data.dir.clone();
        Some(match self.data.action? {
            Action::Replace => Job::Replace(
                ReplacementRequest::new(dir, self.data.old.clone(), self.data.new.clone())
                    .with_pattern(self.data.pattern.clone())
                    .with_backup(self.data.backup),
            ),
            Action::Restore => Job::Restore(dir),
            Action::Clean => Job::Clean(dir),
        })
    }

    /// Hand the job to a worker and wait for it, showing progress meanwhile
    fn perform(&mut self) -> Result<()> {
        let Some(job) = self.job() else {
            self.reset();
            return Ok(());
        };

        writeln!(self.output, "{}", self.formatter.header(job.action()))?;
        let rx = dispatch(job);

        let result = loop {
            match rx.recv_timeout(PROGRESS_TICK) {
                Ok(result) => break Some(result),
                Err(RecvTimeoutError::Timeout) => {
                    write!(self.output, ".")?;
                    self.output.flush()?;
                }
                Err(RecvTimeoutError::Disconnected) => break None,
            }
        };

        match result {
            Some(Ok(outcome)) => {
                let mut screen = self.formatter.format_outcome(&outcome);
                if let Some(err) = &outcome.first_error {
                    screen.push('\n');
                    screen.push_str(&self.formatter.format_warning(&outcome, err));
                }
                self.screen = screen;
                self.step = Step::ShowResult;
            }
            Some(Err(err)) => {
                self.screen = self.formatter.format_fatal(&err);
                self.step = Step::Error;
            }
            None => {
                self.screen = "Operation failed: worker stopped unexpectedly.".to_string();
                self.step = Step::Error;
            }
        }
        Ok(())
    }
}

fn parse_yes_no(line: &str, default: bool) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
