//! Structured console logging
//!
//! Timestamped, leveled log lines with optional key=value fields and a
//! per-run session id. Latency-probe failures are reported here at WARN
//! without interrupting the run.

use crate::models::RunConfig;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn colorize(&self, text: &str) -> String {
        match self {
            LogLevel::Debug => text.cyan().to_string(),
            LogLevel::Info => text.green().to_string(),
            LogLevel::Warn => text.yellow().to_string(),
            LogLevel::Error => text.red().to_string(),
        }
    }
}

/// Console logger with a minimum level and a session id shared by every
/// entry of one measurement run.
pub struct Logger {
    name: String,
    min_level: LogLevel,
    use_color: bool,
    session_id: String,
}

impl Logger {
    /// Create a logger configured from the run settings.
    pub fn with_config(name: &str, config: &RunConfig) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            name: name.to_string(),
            min_level,
            use_color: config.enable_color,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Error, message)
    }

    fn write_entry(&self, level: LogLevel, message: &str, fields: &BTreeMap<String, serde_json::Value>) {
        if !self.would_log(level) {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = if self.use_color {
            level.colorize(&format!("{:>5}", level.as_str()))
        } else {
            format!("{:>5}", level.as_str())
        };

        let mut output = format!("{} {} [{}] {}", timestamp, level_str, self.name, message);

        if !fields.is_empty() {
            let fields_str: Vec<String> = fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        // Warnings and errors go to stderr, everything else to stdout
        if level >= LogLevel::Warn {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
    }
}

/// Builder pattern for log entries with structured fields
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: &str) -> Self {
        Self {
            logger,
            level,
            message: message.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.level, &self.message, &self.fields);
    }
}
