//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - export format options, convertible to
//!   [`ExportFormat`](crate::format::ExportFormat)

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{ChatdomError, Result};

/// Rebuild a WhatsApp Web chat from a saved page snapshot and export it.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdom")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatdom snapshot.html --chat \"Alice\"
    chatdom snapshot.html -f csv -o alice.csv
    chatdom snapshot.html --reference-date 2024-02-16 -f json --stdout
    chatdom sidebar.html --list-chats")]
pub struct Args {
    /// Saved page (rendered DOM) of the open chat
    pub input: PathBuf,

    /// Chat name used in the export file name (default: input file stem)
    #[arg(long, value_name = "NAME")]
    pub chat: Option<String>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "txt")]
    pub format: OutputFormat,

    /// Output file (default: exports/WhatsApp Chat with {chat} - {now}.{ext})
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for generated export file names
    #[arg(long, value_name = "DIR", default_value = crate::export::EXPORT_DIR)]
    pub export_dir: PathBuf,

    /// Print the export to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Number of messages the snapshot was expected to hold
    #[arg(long, value_name = "N")]
    pub target: Option<usize>,

    /// JSON file with engine configuration (markers, fallback names)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Date the snapshot was taken (YYYY-MM-DD), resolves "Today"/"Yesterday"
    #[arg(long, value_name = "DATE")]
    pub reference_date: Option<String>,

    /// List chat titles from the sidebar instead of exporting
    #[arg(long)]
    pub list_chats: bool,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parsed `--reference-date`.
    pub fn reference_date(&self) -> Result<Option<NaiveDate>> {
        self.reference_date
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ChatdomError::invalid_date(s))
            })
            .transpose()
    }

    /// Chat name for export file names.
    pub fn chat_name(&self) -> String {
        self.chat.clone().unwrap_or_else(|| chat_name_from_path(&self.input))
    }
}

fn chat_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("chat")
        .to_string()
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `{date}, {time} - {sender}: {message}` lines (default)
    #[default]
    Txt,

    /// Date,Time,Sender,Message table
    Csv,

    /// HTML table
    Html,

    /// JSON array of rows
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::ExportFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::ExportFormat {
    fn from(format: OutputFormat) -> crate::format::ExportFormat {
        match format {
            OutputFormat::Txt => crate::format::ExportFormat::Txt,
            OutputFormat::Csv => crate::format::ExportFormat::Csv,
            OutputFormat::Html => crate::format::ExportFormat::Html,
            OutputFormat::Json => crate::format::ExportFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ExportFormat;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chatdom").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["page.html"]);
        assert_eq!(args.format, OutputFormat::Txt);
        assert_eq!(args.export_dir, PathBuf::from("exports"));
        assert_eq!(args.chat_name(), "page");
        assert!(args.reference_date().unwrap().is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "page.html",
            "--chat",
            "Team",
            "-f",
            "csv",
            "--reference-date",
            "2024-02-16",
            "--target",
            "500",
            "-vv",
        ]);
        assert_eq!(args.chat_name(), "Team");
        assert_eq!(ExportFormat::from(args.format), ExportFormat::Csv);
        assert_eq!(args.reference_date().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 16));
        assert_eq!(args.target, Some(500));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_bad_reference_date() {
        let args = parse(&["page.html", "--reference-date", "16/02/2024"]);
        assert!(args.reference_date().unwrap_err().is_invalid_date());
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let result = Args::try_parse_from(["chatdom", "page.html", "--stdout", "-o", "x.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Html.to_string(), "HTML");
        assert_eq!(OutputFormat::Json.to_string(), "JSON");
    }
}
