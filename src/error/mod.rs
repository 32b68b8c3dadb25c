//! Error handling for the internet speed tester
//!
//! Every fetch/transfer failure carries the stage it happened in (which
//! endpoint, which failure class) so the top level can report exactly what
//! broke. Components never terminate the process themselves; `main`
//! decides, using [`AppError::exit_code`].

use thiserror::Error;

/// Custom error types for the internet speed tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration or CLI validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failures while retrieving or parsing the client configuration payload
    #[error("Cannot retrieve client config from {url}: {cause}")]
    ConfigFetch { url: String, cause: String },

    /// Failures while retrieving or parsing the server list payload
    #[error("Cannot retrieve server list from {url}: {cause}")]
    ServerList { url: String, cause: String },

    /// Download throughput test failures
    #[error("Cannot test download speed of {url}: {cause}")]
    Download { url: String, cause: String },

    /// Upload throughput test failures
    #[error("Cannot test upload speed of {url}: {cause}")]
    Upload { url: String, cause: String },

    /// Parsing errors (URLs, numeric attributes, payload structure)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Latency selection was asked to choose from an empty candidate set
    #[error("No candidate servers to select from")]
    NoCandidates,

    /// A server id requested via --server is not in the catalog
    #[error("Server id '{0}' not found in the server list")]
    ServerNotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new client-config fetch error
    pub fn config_fetch<U: Into<String>, S: Into<String>>(url: U, cause: S) -> Self {
        Self::ConfigFetch {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// Create a new server-list fetch error
    pub fn server_list<U: Into<String>, S: Into<String>>(url: U, cause: S) -> Self {
        Self::ServerList {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// Create a new download test error
    pub fn download<U: Into<String>, S: Into<String>>(url: U, cause: S) -> Self {
        Self::Download {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// Create a new upload test error
    pub fn upload<U: Into<String>, S: Into<String>>(url: U, cause: S) -> Self {
        Self::Upload {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::ConfigFetch { .. } => "CONFIG_FETCH",
            Self::ServerList { .. } => "SERVER_LIST",
            Self::Download { .. } => "DOWNLOAD",
            Self::Upload { .. } => "UPLOAD",
            Self::Parse(_) => "PARSE",
            Self::NoCandidates => "SELECTION",
            Self::ServerNotFound(_) => "SELECTION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable (a retry of the whole run may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigFetch { .. }
            | Self::ServerList { .. }
            | Self::Download { .. }
            | Self::Upload { .. } => true,
            Self::Config(_)
            | Self::Parse(_)
            | Self::NoCandidates
            | Self::ServerNotFound(_)
            | Self::Internal(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1, // Invalid configuration/usage
            Self::ConfigFetch { .. } | Self::ServerList { .. } => 2, // API fetch failures
            Self::Download { .. } | Self::Upload { .. } => 3, // Transfer test failures
            Self::NoCandidates | Self::ServerNotFound(_) => 4, // Selection failures
            Self::Internal(_) => 99, // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::ConfigFetch { .. } | Self::ServerList { .. } => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Download { .. } | Self::Upload { .. } => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::NoCandidates | Self::ServerNotFound(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<quick_xml::DeError> for AppError {
    fn from(error: quick_xml::DeError) -> Self {
        Self::parse(format!("XML parse error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("bad flag combination");
        assert_eq!(config_error.category(), "CONFIG");
        assert!(!config_error.is_recoverable());
        assert_eq!(config_error.exit_code(), 1);

        let fetch_error = AppError::config_fetch("http://example.com/cfg", "connect error");
        assert_eq!(fetch_error.category(), "CONFIG_FETCH");
        assert!(fetch_error.is_recoverable());
        assert_eq!(fetch_error.exit_code(), 2);
    }

    #[test]
    fn test_error_messages_identify_stage() {
        let error = AppError::server_list("http://example.com/servers", "HTTP status 503");
        let display = error.to_string();
        assert!(display.contains("server list"));
        assert!(display.contains("http://example.com/servers"));
        assert!(display.contains("503"));

        let error = AppError::download("http://host/random1500x1500.jpg", "cannot read body");
        assert!(error.to_string().contains("download speed"));
        assert!(error.to_string().contains("cannot read body"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::parse("x").exit_code(), 1);
        assert_eq!(AppError::server_list("u", "c").exit_code(), 2);
        assert_eq!(AppError::download("u", "c").exit_code(), 3);
        assert_eq!(AppError::upload("u", "c").exit_code(), 3);
        assert_eq!(AppError::NoCandidates.exit_code(), 4);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_no_candidates_display() {
        let error = AppError::NoCandidates;
        assert_eq!(error.to_string(), "No candidate servers to select from");
        assert_eq!(error.category(), "SELECTION");
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("test error");
        let plain = error.format_for_console(false);
        assert!(plain.contains("[CONFIG]"));
        assert!(plain.contains("test error"));

        let colored = error.format_for_console(true);
        assert!(colored.contains("test error"));
    }

    #[test]
    fn test_float_parse_conversion() {
        let parse_error = "not-a-float".parse::<f64>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");
        assert!(app_error.to_string().contains("Float parse error"));
    }
}
