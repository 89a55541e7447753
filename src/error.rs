//! Unified error types for chatdom.
//!
//! This module provides a single [`ChatdomError`] enum that covers every
//! failure the engine surfaces to its caller.
//!
//! # Error Taxonomy
//!
//! - **Structural mismatch** is fatal: the page snapshot does not have the
//!   shape the engine relies on, so the whole scrape is unreliable.
//! - **Parse errors** carry the offending timestamp text. The engine aborts
//!   on them because grouping needs a parseable date for every record.
//! - Fields that cannot be resolved for a single fragment are *not* errors;
//!   they are carried forward and counted in
//!   [`ScrapeReport`](crate::report::ScrapeReport).

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for chatdom operations.
///
/// # Example
///
/// ```rust
/// use chatdom::error::Result;
/// use chatdom::NormalizedMessage;
///
/// fn my_function() -> Result<Vec<NormalizedMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatdomError>;

/// The error type for all chatdom operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatdomError {
    /// An I/O error occurred while reading a snapshot or writing an export.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The document does not contain a node the engine cannot work without.
    ///
    /// This typically means the upstream page layout changed. It is never
    /// retried.
    #[error("Structural mismatch: could not locate {anchor}: {detail}")]
    StructuralMismatch {
        /// The anchor that was looked for (e.g. "message list container")
        anchor: &'static str,
        /// What was tried
        detail: String,
    },

    /// A timestamp string did not match any supported format.
    ///
    /// Usually a sign of a non-English locale.
    #[error("Cannot parse timestamp '{input}'. Expected one of: {expected}")]
    Parse {
        /// The offending text
        input: String,
        /// Human readable list of accepted formats
        expected: &'static str,
    },

    /// Invalid date given on the command line or in configuration.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// Unknown or unavailable export format.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// Which format was requested (e.g. "export")
        format: &'static str,
        /// What went wrong
        message: String,
    },

    /// The engine configuration could not be loaded.
    #[error("Invalid configuration{}: {message}", file_note(path.as_deref()))]
    Config {
        /// Description of what's wrong
        message: String,
        /// The configuration file, if any
        path: Option<PathBuf>,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

fn file_note(path: Option<&Path>) -> String {
    path.map(|p| format!(" (file: {})", p.display()))
        .unwrap_or_default()
}

impl From<std::string::FromUtf8Error> for ChatdomError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatdomError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatdomError {
    /// Creates a structural mismatch error.
    pub fn structural(anchor: &'static str, detail: impl Into<String>) -> Self {
        ChatdomError::StructuralMismatch {
            anchor,
            detail: detail.into(),
        }
    }

    /// Creates a timestamp parse error.
    pub fn parse(input: impl Into<String>, expected: &'static str) -> Self {
        ChatdomError::Parse {
            input: input.into(),
            expected,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatdomError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ChatdomError::Config {
            message: message.into(),
            path,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatdomError::Io(_))
    }

    /// Returns `true` if the document shape was not recognized.
    pub fn is_structural(&self) -> bool {
        matches!(self, ChatdomError::StructuralMismatch { .. })
    }

    /// Returns `true` if this is a timestamp parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatdomError::Parse { .. })
    }

    /// Returns `true` if an export format was rejected.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatdomError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatdomError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
