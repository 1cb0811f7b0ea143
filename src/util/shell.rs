//! Centralized shell output.
//!
//! Status lines go to stderr in the familiar right-aligned format. In JSON
//! mode, human output is suppressed and only JSON events reach stdout.
//! While an external tool runs, a spinner is shown if stderr is a terminal.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Shell output mode - Human and Json are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Human-readable output with optional colors and spinners.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// Machine-readable JSON output only.
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

/// Output verbosity level (Human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: no spinners, tool commands are logged
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Exported,
    Removed,

    // In-progress statuses (cyan)
    Configuring,
    Building,

    // Info statuses (blue)
    Info,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Exported => "Exported",
            Status::Removed => "Removed",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Info => "Info",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Exported | Status::Removed => "\x1b[1;32m",
            Status::Configuring | Status::Building => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Width status words are right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
    spinners: bool,
}

impl Shell {
    /// Create a new shell with the given mode.
    pub fn new(mode: ShellMode) -> Self {
        let stderr_tty = io::stderr().is_terminal();
        let (use_color, spinners) = match &mode {
            ShellMode::Json => (false, false),
            ShellMode::Human { verbosity, color } => (
                match color {
                    ColorChoice::Auto => stderr_tty,
                    ColorChoice::Always => true,
                    ColorChoice::Never => false,
                },
                stderr_tty && *verbosity == Verbosity::Normal,
            ),
        };

        Shell {
            mode,
            use_color,
            spinners,
        }
    }

    /// Create a shell from CLI flags. JSON mode takes precedence over quiet/verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        let mode = if json {
            ShellMode::Json
        } else {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
            ShellMode::Human { verbosity, color }
        };

        Shell::new(mode)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Quiet,
                ..
            }
        )
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    /// Print a status message: `{status:>12} {message}`.
    ///
    /// In quiet mode only errors are printed; in JSON mode nothing is.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() || (self.is_quiet() && status != Status::Error) {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an error. Errors are shown in every mode.
    pub fn error(&self, msg: impl Display) {
        if self.is_json() {
            self.json_event(&serde_json::json!({
                "reason": "error",
                "message": msg.to_string(),
            }));
        } else {
            eprintln!("{}: {}", self.paint(Status::Error, "error"), msg);
        }
    }

    /// Print a JSON event to stdout. Ignored in human mode.
    pub fn json_event<T: Serialize>(&self, event: &T) {
        if !self.is_json() {
            return;
        }
        if let Ok(line) = serde_json::to_string(event) {
            println!("{}", line);
            let _ = io::stdout().flush();
        }
    }

    /// Show a status line and, on a terminal, a spinner until the returned
    /// guard is dropped.
    pub fn spinner(&self, status: Status, msg: impl Display) -> Spinner {
        let msg = msg.to_string();
        if !self.spinners {
            self.status(status, &msg);
            return Spinner {
                bar: None,
                line: String::new(),
            };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{prefix} {msg} {spinner:.cyan}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(self.format_status(status));
        bar.set_message(msg.clone());
        bar.enable_steady_tick(Duration::from_millis(100));

        Spinner {
            bar: Some(bar),
            line: format!("{} {}", self.format_status(status), msg),
        }
    }

    fn paint(&self, status: Status, text: &str) -> String {
        if self.use_color {
            format!("{}{}\x1b[0m", status.color_code(), text)
        } else {
            text.to_string()
        }
    }

    fn format_status(&self, status: Status) -> String {
        let padded = format!("{:>width$}", status.as_str(), width = STATUS_WIDTH);
        self.paint(status, &padded)
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

/// Guard for an active spinner. Dropping it replaces the spinner with the
/// plain status line.
pub struct Spinner {
    bar: Option<ProgressBar>,
    line: String,
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            eprintln!("{}", self.line);
        }
    }
}
