//! Core error types for ledgerview
//!
//! The table engine itself is total over its input domain; these errors only
//! surface at the edges (loading data, reading configuration, parsing
//! user-supplied specs).

use thiserror::Error;

/// Core error type for all ledgerview operations
#[derive(Error, Debug)]
pub enum LvError {
    #[error("Source error: {source_name} - {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid spec: {0}")]
    InvalidSpec(String),
}

impl LvError {
    /// Build a source error from anything printable
    pub fn upstream(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LvError::Source { .. } => "source_error",
            LvError::Io(_) => "io_error",
            LvError::Json(_) => "json_error",
            LvError::Config(_) => "configuration_error",
            LvError::InvalidSpec(_) => "invalid_spec",
        }
    }

    /// Whether the error came from the upstream data source rather than local input
    pub fn is_upstream(&self) -> bool {
        matches!(self, LvError::Source { .. })
    }
}

impl From<::config::ConfigError> for LvError {
    fn from(err: ::config::ConfigError) -> Self {
        LvError::Config(err.to_string())
    }
}
