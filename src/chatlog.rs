//! Log assembly: groups normalized messages by calendar date.
//!
//! Grouping is a pure function of the message sequence. Dates appear in
//! first-seen order, messages in input order within each date.
//!
//! # Example
//!
//! ```rust
//! use chatdom::{ChatLog, NormalizedMessage};
//! use chrono::NaiveDate;
//!
//! let at = |d, h| NaiveDate::from_ymd_opt(2024, 2, d).unwrap().and_hms_opt(h, 0, 0).unwrap();
//! let log = ChatLog::from_messages(&[
//!     NormalizedMessage::new("1", at(14, 10), "Alice", "a"),
//!     NormalizedMessage::new("2", at(14, 11), "Bob", "b"),
//!     NormalizedMessage::new("3", at(15, 9), "Alice", "c"),
//! ]);
//!
//! assert_eq!(log.dates(), vec!["02/14/2024", "02/15/2024"]);
//! assert_eq!(log.rows()[2].time, "09:00 AM");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::NormalizedMessage;

/// One message projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// `hh:mm AM/PM`
    pub time: String,
    /// Display name
    pub sender: String,
    /// Rendered body
    pub message: String,
}

/// Messages of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGroup {
    /// `MM/DD/YYYY`
    pub date: String,
    /// Entries in message order
    pub entries: Vec<LogEntry>,
}

/// Flat export row, the shape every writer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// `MM/DD/YYYY`
    pub date: String,
    /// `hh:mm AM/PM`
    pub time: String,
    /// Display name
    pub sender: String,
    /// Rendered body
    pub message: String,
}

/// Messages grouped by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLog {
    groups: Vec<DateGroup>,
}

impl ChatLog {
    /// Groups `messages` by the date of their timestamp.
    pub fn from_messages(messages: &[NormalizedMessage]) -> Self {
        let mut groups: Vec<DateGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for msg in messages {
            let date = msg.date_string();
            let slot = *index.entry(date.clone()).or_insert_with(|| {
                groups.push(DateGroup {
                    date,
                    entries: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].entries.push(LogEntry {
                time: msg.time_string(),
                sender: msg.sender.clone(),
                message: msg.body.clone(),
            });
        }

        Self { groups }
    }

    /// Date groups in order.
    pub fn groups(&self) -> &[DateGroup] {
        &self.groups
    }

    /// Entries of one date, if present.
    pub fn get(&self, date: &str) -> Option<&DateGroup> {
        self.groups.iter().find(|g| g.date == date)
    }

    /// Dates in order.
    pub fn dates(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.date.as_str()).collect()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Returns `true` if the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flattens the log into export rows.
    pub fn rows(&self) -> Vec<ExportRow> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.entries.iter().map(|entry| ExportRow {
                    date: group.date.clone(),
                    time: entry.time.clone(),
                    sender: entry.sender.clone(),
                    message: entry.message.clone(),
                })
            })
            .collect()
    }
}
