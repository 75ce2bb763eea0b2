// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Logger
//!
//! Lightweight logging abstraction for the bootstrap phase, kept separate
//! from the `tracing` spans the engine itself emits (see
//! [`crate::init_tracing`]). Bootstrap code runs before a caller has
//! necessarily installed a `tracing` subscriber, so it talks to this trait
//! instead of calling `tracing` macros directly — that keeps bootstrap
//! failures (bad config, bad passphrase) testable without a subscriber.
//!
//! ## Usage
//!
//! ```rust
//! use sealdb_bootstrap::logger::{BootstrapLogger, ConsoleLogger};
//!
//! let logger = ConsoleLogger::new();
//! logger.info("loading configuration");
//! ```

#[cfg(test)]
use std::fmt;

/// Bootstrap logging abstraction.
///
/// Implementations can route through `tracing`, discard everything, or (in
/// tests) capture messages for assertions.
pub trait BootstrapLogger: Send + Sync {
    /// Log a fatal bootstrap error, typically just before the process gives up.
    fn error(&self, message: &str);

    /// Log a non-fatal issue, such as a config value falling back to default.
    fn warn(&self, message: &str);

    /// Log normal bootstrap progress.
    fn info(&self, message: &str);

    /// Log detailed diagnostic information.
    fn debug(&self, message: &str);
}

/// Routes bootstrap logs through `tracing` under a fixed target.
pub struct ConsoleLogger {
    prefix: String,
}

impl ConsoleLogger {
    /// Create a logger with the default `"bootstrap"` prefix.
    pub fn new() -> Self {
        Self::with_prefix("bootstrap")
    }

    /// Create a logger that tags every message with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapLogger for ConsoleLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "sealdb_bootstrap", "[{}] {}", self.prefix, message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "sealdb_bootstrap", "[{}] {}", self.prefix, message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "sealdb_bootstrap", "[{}] {}", self.prefix, message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "sealdb_bootstrap", "[{}] {}", self.prefix, message);
    }
}

/// Discards every message. Useful when embedding SealDB in a host that
/// manages its own logging and doesn't want bootstrap chatter.
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapLogger for NoOpLogger {
    fn error(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

/// Captures log messages in memory for test assertions.
#[cfg(test)]
pub struct CapturingLogger {
    messages: std::sync::Arc<std::sync::Mutex<Vec<LogMessage>>>,
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

#[cfg(test)]
impl CapturingLogger {
    pub fn new() -> Self {
        Self {
            messages: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.messages.lock().unwrap().push(LogMessage {
            level,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
impl BootstrapLogger for CapturingLogger {
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
}

#[cfg(test)]
impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_logger_does_not_panic() {
        let logger = ConsoleLogger::new();
        logger.info("test message");
    }

    #[test]
    fn console_logger_with_prefix_does_not_panic() {
        let logger = ConsoleLogger::with_prefix("custom");
        logger.debug("test message");
    }

    #[test]
    fn noop_logger_swallows_everything() {
        let logger = NoOpLogger::new();
        logger.error("error");
        logger.warn("warning");
        logger.info("info");
        logger.debug("debug");
    }

    #[test]
    fn capturing_logger_records_in_order() {
        let logger = CapturingLogger::new();

        logger.error("error message");
        logger.warn("warning message");
        logger.info("info message");
        logger.debug("debug message");

        let messages = logger.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].level, LogLevel::Error);
        assert_eq!(messages[0].message, "error message");
        assert_eq!(messages[1].level, LogLevel::Warn);
        assert_eq!(messages[2].level, LogLevel::Info);
        assert_eq!(messages[3].level, LogLevel::Debug);
    }

    #[test]
    fn capturing_logger_clear_empties_the_buffer() {
        let logger = CapturingLogger::new();

        logger.info("message 1");
        logger.info("message 2");
        assert_eq!(logger.messages().len(), 2);

        logger.clear();
        assert_eq!(logger.messages().len(), 0);

        logger.info("message 3");
        assert_eq!(logger.messages().len(), 1);
    }

    #[test]
    fn log_level_displays_as_upper_case_word() {
        assert_eq!(format!("{}", LogLevel::Error), "ERROR");
        assert_eq!(format!("{}", LogLevel::Warn), "WARN");
        assert_eq!(format!("{}", LogLevel::Info), "INFO");
        assert_eq!(format!("{}", LogLevel::Debug), "DEBUG");
    }
}
