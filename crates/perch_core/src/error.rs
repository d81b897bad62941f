//! Error types for Perch.
//!
//! Tooltip coordination itself cannot fail. Errors only come from the ambient
//! edges: loading configuration, finding an async runtime, and setting up logs.

use thiserror::Error;

/// Main error type for Perch.
#[derive(Debug, Error)]
pub enum PerchError {
    /// Configuration could not be read or parsed.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No async runtime was available to drive timers.
    #[error("Runtime error: {message}")]
    Runtime {
        /// Human-readable error message.
        message: String,
    },

    /// Filesystem error (config files, log directory).
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

impl PerchError {
    // ========== Constructors ==========

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a new config error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a new runtime error.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime { message: message.into() }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    // ========== Methods ==========

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Config",
            Self::Runtime { .. } => "Runtime",
            Self::Io { .. } => "I/O",
            Self::Internal { .. } => "Internal",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { .. } => Some("Check the group config JSON"),
            Self::Runtime { .. } => Some("Mount tooltip groups from inside a tokio runtime"),
            Self::Io { hint, .. } => hint.as_deref(),
            Self::Internal { .. } => Some("Please report this issue"),
        }
    }
}

// ========== Error Conversions ==========

/// Convert from std::io::Error to PerchError.
impl From<std::io::Error> for PerchError {
    fn from(err: std::io::Error) -> Self {
        PerchError::Io {
            message: err.to_string(),
            hint: Some("Check file permissions and paths".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_json::Error to PerchError.
impl From<serde_json::Error> for PerchError {
    fn from(err: serde_json::Error) -> Self {
        PerchError::config_with_source(format!("JSON error: {err}"), err)
    }
}

/// Convert from a missing tokio runtime to PerchError.
impl From<tokio::runtime::TryCurrentError> for PerchError {
    fn from(err: tokio::runtime::TryCurrentError) -> Self {
        PerchError::runtime(err.to_string())
    }
}
