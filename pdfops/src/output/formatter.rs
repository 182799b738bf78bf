//! Message formatting and display.
//!
//! Messages go to stdout; tracing events go to stderr, so the two never
//! interleave on a pipe.
//!
//! # Examples
//!
//! ```
//! use pdfops::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Splitting report.pdf");
//! formatter.success("Wrote 4 documents");
//! ```

use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// How much the formatter prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    /// Results and warnings.
    #[default]
    Normal,
    /// Everything, including details.
    Verbose,
}

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    /// Lowest verbosity at which messages of this level are printed.
    fn threshold(self) -> Verbosity {
        match self {
            Self::Warning | Self::Error => Verbosity::Quiet,
            Self::Info | Self::Success => Verbosity::Normal,
            Self::Debug => Verbosity::Verbose,
        }
    }

    /// Symbol and ANSI color.
    fn marker(self) -> Option<(char, &'static str)> {
        match self {
            Self::Info => None,
            Self::Success => Some(('✓', "\x1b[32m")),
            Self::Warning => Some(('⚠', "\x1b[33m")),
            Self::Error => Some(('✗', "\x1b[31m")),
            Self::Debug => Some(('→', "\x1b[36m")),
        }
    }
}

/// Prints CLI messages at a fixed [`Verbosity`].
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    verbosity: Verbosity,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter from the CLI flags. `quiet` wins over `verbose`.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self::with_verbosity(verbosity)
    }

    /// Create a formatter printing at `verbosity`.
    ///
    /// Colors are used only when stdout is a terminal.
    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Informational message.
    pub fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message);
    }

    /// Completed step.
    pub fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message);
    }

    /// Printed even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Printed even in quiet mode.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Printed in verbose mode only.
    pub fn debug(&self, message: &str) {
        self.emit(MessageLevel::Debug, message);
    }

    /// Render a message with its level marker, without printing it.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        match level.marker() {
            None => message.to_string(),
            Some((symbol, color)) if self.colored => format!("{color}{symbol} {message}{RESET}"),
            Some((symbol, _)) => format!("{symbol} {message}"),
        }
    }

    /// Print a section header, preceded by an empty line.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("\n{title}");
        }
    }

    /// Print an indented `label: value` line. Verbose mode only.
    pub fn detail(&self, label: &str, value: &str) {
        if self.is_verbose() {
            println!("  {label}: {value}");
        }
    }

    /// Print an indented, numbered line.
    pub fn list_item(&self, index: usize, message: &str) {
        if self.should_print() {
            println!("  {index}. {message}");
        }
    }

    /// Whether results and informational messages are printed.
    pub fn should_print(&self) -> bool {
        self.verbosity >= Verbosity::Normal
    }

    /// Whether details are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Whether only warnings and errors are printed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        if self.verbosity >= level.threshold() {
            println!("{}", self.render(level, message));
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::with_verbosity(Verbosity::Normal)
    }
}
