//! Error handling for ipyhist
//!
//! Every fallible operation in the crate returns [`Result`]. Store failures
//! keep the underlying SQLite error so its message reaches the caller intact.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ipyhist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ipyhist operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Opening or querying the history store failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Home directory could not be determined
    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },

    /// Invalid request or command line arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// An entry identifier could not be parsed as an integer
    #[error("Invalid entry id: {value:?}")]
    InvalidEntryId { value: String },

    /// File already exists
    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// Terminal setup or teardown failed
    #[error("Terminal error: {reason}")]
    Terminal { reason: String },

    /// Generic error with custom message
    #[error("{message}")]
    Custom { message: String },
}

impl Error {
    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Error::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid entry id error
    pub fn invalid_entry_id<S: Into<String>>(value: S) -> Self {
        Error::InvalidEntryId {
            value: value.into(),
        }
    }

    pub fn terminal<S: Into<String>>(reason: S) -> Self {
        Error::Terminal {
            reason: reason.into(),
        }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Database(_) => "database",
            Error::HomeDirectoryNotFound => "system",
            Error::ConfigValidation { .. } => "config",
            Error::InvalidArguments { .. } => "arguments",
            Error::InvalidEntryId { .. } => "input",
            Error::FileExists { .. } => "file",
            Error::Terminal { .. } => "terminal",
            Error::Custom { .. } => "custom",
        }
    }
}
