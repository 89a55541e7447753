//! Timestamp parsing for provenance strings, bare times and date separators.
//!
//! Supported inputs:
//! - Provenance: `[2/15/2024, 2:35 PM] Alice` or `[2:35 PM, 2/15/2024] Alice: `
//!   with the date as `M/D/YYYY` or `YYYY-MM-DD`
//! - Bare time of day: `3:02 PM`
//! - Date separator rows: `2/15/2024`, `2024-02-15`, and, when a reference
//!   date is known, `Today`, `Yesterday` or a weekday name
//!
//! Only 12-hour clocks are accepted. Anything else is reported as a
//! [`ChatdomError::Parse`], which usually means the page was rendered in a
//! locale the engine does not support.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use regex::Regex;

use crate::error::{ChatdomError, Result};

/// Formats tried for the reassembled `time date` string.
const PROVENANCE_FORMATS: &[&str] = &[
    "%I:%M %p %m/%d/%Y",
    "%I:%M %p %Y-%m-%d",
    "%I:%M:%S %p %m/%d/%Y",
    "%I:%M:%S %p %Y-%m-%d",
];

const PROVENANCE_EXPECTED: &str = "h:mm AM/PM with M/D/YYYY or YYYY-MM-DD";

/// Formats tried for date separator rows.
const SEPARATOR_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

static BARE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}) ?([AP]M)$").expect("bare time pattern is valid")
});

/// Sender and timestamp parsed from a provenance attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// When the message was sent
    pub timestamp: NaiveDateTime,
    /// Author display name, verbatim
    pub sender: String,
}

/// Uppercases meridians and folds the locale variants (`a.m.`, narrow
/// no-break space) into `AM`/`PM` with a plain space.
pub fn normalize_meridian(text: &str) -> String {
    text.replace(['\u{202F}', '\u{00A0}'], " ")
        .to_uppercase()
        .replace("A.M.", "AM")
        .replace("P.M.", "PM")
        .trim()
        .to_string()
}

/// Parses a provenance attribute such as `[2/15/2024, 2:35 PM] Alice`.
///
/// # Example
///
/// ```rust
/// use chatdom::datetime::parse_provenance;
///
/// let p = parse_provenance("[2/15/2024, 2:35 PM] Alice").unwrap();
/// assert_eq!(p.sender, "Alice");
/// assert_eq!(p.timestamp.to_string(), "2024-02-15 14:35:00");
/// ```
pub fn parse_provenance(raw: &str) -> Result<Provenance> {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let (stamp, sender) = inner
        .split_once("] ")
        .ok_or_else(|| ChatdomError::parse(raw, PROVENANCE_EXPECTED))?;

    let sender = sender.trim_end();
    let sender = sender.strip_suffix(':').unwrap_or(sender).trim();

    Ok(Provenance {
        timestamp: parse_stamp(stamp)?,
        sender: sender.to_string(),
    })
}

/// Parses the bracketed part of a provenance string (`date, time` in either
/// order), reassembling it as `time date`.
pub fn parse_stamp(stamp: &str) -> Result<NaiveDateTime> {
    let (first, second) = stamp
        .split_once(", ")
        .ok_or_else(|| ChatdomError::parse(stamp, PROVENANCE_EXPECTED))?;
    let (time, date) = if first.contains(':') {
        (first, second)
    } else {
        (second, first)
    };

    let candidate = normalize_meridian(&format!("{} {}", time.trim(), date.trim()));
    PROVENANCE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt).ok())
        .and_then(|dt| dt.with_second(0))
        .ok_or_else(|| ChatdomError::parse(stamp, PROVENANCE_EXPECTED))
}

/// Parses a bare `h:mm AM/PM` time of day. Returns `None` for anything else.
///
/// ```rust
/// use chatdom::datetime::parse_time_only;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time_only("3:02 PM"), NaiveTime::from_hms_opt(15, 2, 0));
/// assert_eq!(parse_time_only("3:02 p.m."), NaiveTime::from_hms_opt(15, 2, 0));
/// assert_eq!(parse_time_only("Hello 3:02 PM"), None);
/// ```
pub fn parse_time_only(text: &str) -> Option<NaiveTime> {
    let normalized = normalize_meridian(text);
    let caps = BARE_TIME.captures(&normalized)?;
    let candidate = format!("{}:{} {}", &caps[1], &caps[2], &caps[3]);
    NaiveTime::parse_from_str(&candidate, "%I:%M %p").ok()
}

/// Parses the text of a date separator row.
///
/// Relative labels only resolve when `reference` is given: `Today`,
/// `Yesterday`, and weekday names (the most recent such day strictly before
/// the reference date).
pub fn parse_separator_date(text: &str, reference: Option<NaiveDate>) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = SEPARATOR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }

    let reference = reference?;
    match text.to_lowercase().as_str() {
        "today" => Some(reference),
        "yesterday" => reference.checked_sub_signed(Duration::days(1)),
        other => {
            let weekday: Weekday = other.parse().ok()?;
            (1..=7)
                .filter_map(|back| reference.checked_sub_signed(Duration::days(back)))
                .find(|d| d.weekday() == weekday)
        }
    }
}
