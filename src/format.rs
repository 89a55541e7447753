//! Export format types.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "csv-output")]
//! # fn example() -> chatdom::Result<()> {
//! use chatdom::chatlog::ExportRow;
//! use chatdom::format::{ExportFormat, to_format_string};
//!
//! let rows = vec![ExportRow {
//!     date: "02/15/2024".into(),
//!     time: "02:35 PM".into(),
//!     sender: "Alice".into(),
//!     message: "Hello".into(),
//! }];
//! let csv = to_format_string(&rows, ExportFormat::Csv)?;
//! assert!(csv.starts_with("Date,Time,Sender,Message"));
//!
//! let format = ExportFormat::from_path("chat.html")?;
//! assert_eq!(format, ExportFormat::Html);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chatlog::ExportRow;
use crate::error::ChatdomError;

/// Export file format.
///
/// # Example
///
/// ```rust
/// use chatdom::format::ExportFormat;
/// use std::str::FromStr;
///
/// let format = ExportFormat::from_str("txt").unwrap();
/// assert_eq!(format, ExportFormat::Txt);
/// assert_eq!(format.extension(), "txt");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExportFormat {
    /// One `"{date}, {time} - {sender}: {message}"` line per message,
    /// the layout of the client's own chat export
    #[default]
    Txt,

    /// `Date,Time,Sender,Message` table
    Csv,

    /// HTML table with the same columns as CSV
    Html,

    /// JSON array of rows
    Json,
}

impl ExportFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// ```rust
    /// use chatdom::format::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::Csv.extension(), "csv");
    /// assert_eq!(ExportFormat::Html.extension(), "html");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["txt", "csv", "html", "json"]
    }

    /// Returns all formats.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Txt,
            ExportFormat::Csv,
            ExportFormat::Html,
            ExportFormat::Json,
        ]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Html => "text/html",
            ExportFormat::Json => "application/json",
        }
    }

    /// Cargo feature the writer of this format needs, if any.
    pub fn required_feature(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Txt => None,
            ExportFormat::Csv => Some("csv-output"),
            ExportFormat::Html => Some("html-output"),
            ExportFormat::Json => Some("json-output"),
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// ```rust
    /// use chatdom::format::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::from_path("chat.HTM").unwrap(), ExportFormat::Html);
    /// assert!(ExportFormat::from_path("chat.pdf").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChatdomError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            "html" | "htm" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ChatdomError::InvalidFormat {
                format: "export",
                message: format!(
                    "Unknown file extension: '.{}'. Expected one of: {}",
                    ext,
                    ExportFormat::all_names().join(", ")
                ),
            }),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Txt => write!(f, "TXT"),
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Html => write!(f, "HTML"),
            ExportFormat::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            "html" | "htm" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                ExportFormat::all_names().join(", ")
            )),
        }
    }
}

#[allow(dead_code)]
fn feature_missing(format: ExportFormat) -> ChatdomError {
    ChatdomError::InvalidFormat {
        format: "export",
        message: format!(
            "Export format {} requires the '{}' feature to be enabled",
            format,
            format.required_feature().unwrap_or_default()
        ),
    }
}

/// Writes rows to a file in the given format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
pub fn write_to_format(
    rows: &[ExportRow],
    path: impl AsRef<Path>,
    format: ExportFormat,
) -> Result<(), ChatdomError> {
    let path = path.as_ref();
    match format {
        ExportFormat::Txt => crate::export::write_txt(rows, path),
        #[cfg(feature = "csv-output")]
        ExportFormat::Csv => crate::export::write_csv(rows, path),
        #[cfg(feature = "html-output")]
        ExportFormat::Html => crate::export::write_html(rows, path),
        #[cfg(feature = "json-output")]
        ExportFormat::Json => crate::export::write_json(rows, path),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}

/// Renders rows to a string in the given format.
///
/// CSV strings carry no byte order mark; only files do.
pub fn to_format_string(rows: &[ExportRow], format: ExportFormat) -> Result<String, ChatdomError> {
    match format {
        ExportFormat::Txt => Ok(crate::export::to_txt(rows)),
        #[cfg(feature = "csv-output")]
        ExportFormat::Csv => crate::export::to_csv(rows),
        #[cfg(feature = "html-output")]
        ExportFormat::Html => Ok(crate::export::to_html(rows)),
        #[cfg(feature = "json-output")]
        ExportFormat::Json => crate::export::to_json(rows),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}
