//! Console output: styling and terminal state for echoed log lines.

pub mod progress;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

use crate::domain::Severity;

/// Console stream for an echoed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress normal-severity output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Render a log line for the console: dimmed timestamp, the message green
    /// for completed steps and red for errors.
    #[must_use]
    pub fn render(&self, timestamp: &str, message: &str, severity: Severity) -> String {
        let stamp = format!("[{timestamp}]");
        match severity {
            Severity::Normal => format!("{} {message}", stamp.style(self.styles.dim)),
            Severity::Success => format!(
                "{} {}",
                stamp.style(self.styles.dim),
                message.style(self.styles.success)
            ),
            Severity::Error => format!(
                "{} {}",
                stamp.style(self.styles.dim),
                message.style(self.styles.error)
            ),
        }
    }

    /// Print to stdout (normal and success, suppressed when `quiet`) or
    /// stderr (error, never suppressed).
    pub fn echo(&self, timestamp: &str, message: &str, severity: Severity) {
        let line = self.render(timestamp, message, severity);
        match self.stream(severity) {
            Some(Stream::Stdout) => println!("{line}"),
            Some(Stream::Stderr) => eprintln!("{line}"),
            None => {}
        }
    }

    /// Console stream a line of `severity` goes to, or `None` when quiet
    /// suppresses it.
    #[must_use]
    pub fn stream(&self, severity: Severity) -> Option<Stream> {
        match severity {
            Severity::Error => Some(Stream::Stderr),
            Severity::Normal | Severity::Success if self.quiet => None,
            Severity::Normal | Severity::Success => Some(Stream::Stdout),
        }
    }
}
