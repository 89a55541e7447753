//! Export writers.
//!
//! Every writer consumes the flat [`ExportRow`] sequence of a [`ChatLog`]:
//! - [`write_txt`] / [`to_txt`] - `"{date}, {time} - {sender}: {message}"` lines
//! - [`write_csv`] / [`to_csv`] - `Date,Time,Sender,Message` table
//!   (requires `csv-output` feature)
//! - [`write_html`] / [`to_html`] - the same four columns as an HTML table
//!   (requires `html-output` feature)
//! - [`write_json`] / [`to_json`] - JSON array of rows (requires `json-output` feature)
//!
//! Files go to `exports/WhatsApp Chat with {chat} - {YYYY-MM-DD HH.MM.SS.AM}.{ext}`,
//! see [`export_path`].
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> chatdom::Result<()> {
//! use chatdom::engine::{Engine, ScrapeRequest};
//! use chatdom::export::{to_txt, write_csv};
//!
//! let html = std::fs::read_to_string("snapshot.html")?;
//! let scrape = Engine::new().scrape(&ScrapeRequest::new(&html))?;
//! let rows = scrape.log.rows();
//!
//! print!("{}", to_txt(&rows));
//! write_csv(&rows, "chat.csv")?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```
//!
//! [`ChatLog`]: crate::chatlog::ChatLog

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "html-output")]
mod html_writer;
#[cfg(feature = "json-output")]
mod json_writer;
mod txt_writer;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

pub use crate::chatlog::ExportRow;
use crate::error::Result;
use crate::format::ExportFormat;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "html-output")]
pub use html_writer::{to_html, write_html};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
pub use txt_writer::{to_txt, write_txt};

/// Default export directory, relative to the working directory.
pub const EXPORT_DIR: &str = "exports";

/// Replaces characters that cannot appear in a file name.
pub fn sanitize_chat_name(chat: &str) -> String {
    chat.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// File name of an export made at `at`.
///
/// ```rust
/// use chatdom::export::export_file_name;
/// use chatdom::format::ExportFormat;
/// use chrono::NaiveDate;
///
/// let at = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap().and_hms_opt(14, 5, 9).unwrap();
/// assert_eq!(
///     export_file_name("Alice", at, ExportFormat::Txt),
///     "WhatsApp Chat with Alice - 2024-02-15 02.05.09.PM.txt"
/// );
/// ```
pub fn export_file_name(chat: &str, at: NaiveDateTime, format: ExportFormat) -> String {
    format!(
        "WhatsApp Chat with {} - {}.{}",
        sanitize_chat_name(chat),
        at.format("%Y-%m-%d %I.%M.%S.%p"),
        format.extension()
    )
}

/// Full export path under `dir`, creating the directory if missing.
pub fn export_path(
    dir: &Path,
    chat: &str,
    at: NaiveDateTime,
    format: ExportFormat,
) -> Result<PathBuf> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "created export directory");
    }
    Ok(dir.join(export_file_name(chat, at, format)))
}
