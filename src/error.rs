//! Error types for the Spellgram library.
//!
//! All fallible operations return [`SpellgramError`] through the [`Result`]
//! alias. Search branches that cannot produce a sentence are not errors; they
//! are scored with the unreachable sentinel and compared away.
//!
//! # Examples
//!
//! ```
//! use spellgram::error::{Result, SpellgramError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SpellgramError::invalid_argument("phrase must be non-empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Spellgram operations.
#[derive(Error, Debug)]
pub enum SpellgramError {
    /// I/O errors while reading frequency, vocabulary or confusion files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Empty word, key or phrase passed to a public operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A source file contains a line that cannot be parsed
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Configuration values that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SpellgramError.
pub type Result<T> = std::result::Result<T, SpellgramError>;

impl SpellgramError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SpellgramError::InvalidArgument(msg.into())
    }

    /// Create a new malformed data error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        SpellgramError::MalformedData(msg.into())
    }

    /// Create a malformed data error pointing at a 1-based line of a source.
    pub fn malformed_line<S: Into<String>>(source: &str, line: usize, msg: S) -> Self {
        SpellgramError::MalformedData(format!("{source}:{line}: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SpellgramError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SpellgramError::Other(msg.into())
    }
}
