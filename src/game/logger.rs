//! Game event logger with bump-allocated formatting
//!
//! Messages are formatted into a bump arena, then copied once into an owned
//! [`LogEntry`] when captured. The arena is reset whenever the buffer is
//! cleared.

use crate::game::VerbosityLevel;
use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt::{self, Write as FmtWrite};
use std::ops::Deref;

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Capture only to the in-memory buffer
    Memory,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// e.g. "controller_choice"
    pub category: Option<&'static str>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    /// Echo controller choices with the controller name to stderr
    debug_choices: bool,
    format_bump: RefCell<Bump>,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        GameLogger::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            debug_choices: false,
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory and stop printing
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_debug_choices(&mut self, enabled: bool) {
        self.debug_choices = enabled;
    }

    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
        self.format_bump.get_mut().reset();
    }

    /// Print captured entries the verbosity allows, then clear the buffer
    pub fn flush_buffer(&mut self) {
        for entry in self.log_buffer.borrow().iter() {
            if entry.level <= self.verbosity {
                self.write_stdout(entry.level, &entry.message);
            }
        }
        self.clear_logs();
    }

    fn write_stdout(&self, level: VerbosityLevel, message: &str) {
        match self.output_format {
            OutputFormat::Json => {
                let line = serde_json::json!({ "level": level, "message": message });
                println!("{line}");
            }
            OutputFormat::Text if level == VerbosityLevel::Minimal => println!("{message}"),
            OutputFormat::Text => println!("  {message}"),
        }
    }

    fn record(&self, level: VerbosityLevel, category: Option<&'static str>, args: fmt::Arguments<'_>) {
        let should_capture = self.is_capturing();
        let should_output =
            matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) && level <= self.verbosity;
        if !should_capture && !should_output {
            return;
        }

        let bump = self.format_bump.borrow();
        let mut message = bumpalo::collections::String::new_in(&bump);
        // Writing into an in-memory string only fails if a Display impl does
        if message.write_fmt(args).is_err() {
            return;
        }

        if should_output {
            self.write_stdout(level, &message);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.as_str().to_owned(),
                category,
            });
        }
    }

    pub fn minimal(&self, message: &str) {
        self.record(VerbosityLevel::Minimal, None, format_args!("{message}"));
    }

    pub fn normal(&self, message: &str) {
        self.record(VerbosityLevel::Normal, None, format_args!("{message}"));
    }

    pub fn verbose(&self, message: &str) {
        self.record(VerbosityLevel::Verbose, None, format_args!("{message}"));
    }

    /// Format-and-log without building an intermediate `String`
    pub fn log_fmt(&self, level: VerbosityLevel, args: fmt::Arguments<'_>) {
        if level == VerbosityLevel::Silent {
            return;
        }
        self.record(level, None, args);
    }

    /// Log a controller decision at Normal level
    ///
    /// The logged line is the same whichever controller made the choice.
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        if self.debug_choices {
            eprintln!("  >>> {controller_name}: {message}");
        }
        self.record(
            VerbosityLevel::Normal,
            Some("controller_choice"),
            format_args!("{message}"),
        );
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

/// Settings are cloned, captured entries are not
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            debug_choices: self.debug_choices,
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        assert_eq!(logger.output_mode(), OutputMode::Stdout);
    }

    #[test]
    fn test_log_capture() {
        let mut logger = GameLogger::new();
        logger.enable_capture();

        logger.normal("test message");
        logger.minimal("minimal message");
        logger.log_fmt(VerbosityLevel::Verbose, format_args!("rolled {}", 7));

        let logs = logger.logs();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].level, VerbosityLevel::Minimal);
        assert_eq!(logs[2].message, "rolled 7");
    }

    #[test]
    fn test_controller_choice_category() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        logger.controller_choice("heuristic", "Player 1 chose Ranch");

        let logs = logger.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].category, Some("controller_choice"));
    }

    #[test]
    fn test_silent_stdout_logger_records_nothing() {
        let logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.normal("dropped");
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_flush_buffer() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        logger.normal("message 1");
        logger.normal("message 2");
        assert_eq!(logger.logs().len(), 2);

        logger.flush_buffer();
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_clone_drops_entries() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.normal("kept in original");
        let copy = logger.clone();
        assert!(copy.is_capturing());
        assert!(copy.logs().is_empty());
        assert_eq!(logger.logs().len(), 1);
    }
}
