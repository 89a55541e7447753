//! Normalized message records produced by the engine.
//!
//! A [`NormalizedMessage`] is the unit of output of one normalization step:
//! every recognized message fragment of the page becomes one (or, for a
//! two-up sticker bundle, two) of these.
//!
//! # Example
//!
//! ```
//! use chatdom::{ContentKind, NormalizedMessage};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 2, 15)
//!     .unwrap()
//!     .and_hms_opt(14, 35, 0)
//!     .unwrap();
//! let msg = NormalizedMessage::new("m1", ts, "Alice", "Hello");
//!
//! assert_eq!(msg.date_string(), "02/15/2024");
//! assert_eq!(msg.time_string(), "02:35 PM");
//! assert_eq!(msg.content_kind, ContentKind::PlainText);
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Body of a message whose attachment was not exported.
pub const MEDIA_OMITTED: &str = "<Media omitted>";

/// Body of a recalled message.
pub const DELETED_SENTINEL: &str = "<You deleted this message>";

/// Date format of the export rows.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Time format of the export rows.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// What a message carries, deciding how its body is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Text only
    #[default]
    PlainText,
    /// An attachment without text; body is [`MEDIA_OMITTED`]
    MediaOnly,
    /// An attachment with a caption; body is prefixed with [`MEDIA_OMITTED`]
    TextWithMediaNotice,
    /// A recalled message; body is [`DELETED_SENTINEL`]
    Deleted,
}

impl ContentKind {
    /// Renders the exported body for resolved `text`.
    ///
    /// ```
    /// use chatdom::ContentKind;
    ///
    /// assert_eq!(ContentKind::PlainText.render("hi"), "hi");
    /// assert_eq!(ContentKind::TextWithMediaNotice.render("look"), "<Media omitted> look");
    /// assert_eq!(ContentKind::MediaOnly.render("ignored"), "<Media omitted>");
    /// ```
    pub fn render(self, text: &str) -> String {
        match self {
            ContentKind::PlainText => text.to_string(),
            ContentKind::MediaOnly => MEDIA_OMITTED.to_string(),
            ContentKind::TextWithMediaNotice => format!("{MEDIA_OMITTED} {text}"),
            ContentKind::Deleted => DELETED_SENTINEL.to_string(),
        }
    }
}

/// Which side of the conversation a fragment was rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Received from another participant
    Incoming,
    /// Sent by the account owner
    Outgoing,
    /// No direction marker found
    #[default]
    Unknown,
}

/// One reconstructed chat message.
///
/// `timestamp` has minute precision and is never missing: fragments that do
/// not expose one inherit it from the previous message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Identifier of the source fragment, for diagnostics only.
    pub id: String,

    /// Calendar date and time of day.
    pub timestamp: NaiveDateTime,

    /// Display name of the author.
    pub sender: String,

    /// Rendered body, already reflecting `content_kind`.
    pub body: String,

    /// What the message carries.
    pub content_kind: ContentKind,

    /// Whether `sender` is the account owner.
    pub is_self: bool,
}

impl NormalizedMessage {
    /// Creates a plain-text message.
    pub fn new(
        id: impl Into<String>,
        timestamp: NaiveDateTime,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            sender: sender.into(),
            body: body.into(),
            content_kind: ContentKind::PlainText,
            is_self: false,
        }
    }

    /// Builder method to set the content kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.content_kind = kind;
        self
    }

    /// Builder method to mark the message as authored by the account owner.
    #[must_use]
    pub fn with_self(mut self, is_self: bool) -> Self {
        self.is_self = is_self;
        self
    }

    /// Calendar date of the message.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Date as exported: `MM/DD/YYYY`.
    pub fn date_string(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }

    /// Time as exported: `hh:mm AM/PM`.
    pub fn time_string(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }

    /// Returns `true` if the message carried an attachment.
    pub fn has_media(&self) -> bool {
        matches!(
            self.content_kind,
            ContentKind::MediaOnly | ContentKind::TextWithMediaNotice
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_render_all_kinds() {
        assert_eq!(ContentKind::PlainText.render("Hello"), "Hello");
        assert_eq!(ContentKind::MediaOnly.render(""), "<Media omitted>");
        assert_eq!(
            ContentKind::TextWithMediaNotice.render("caption"),
            "<Media omitted> caption"
        );
        assert_eq!(
            ContentKind::Deleted.render("anything"),
            "<You deleted this message>"
        );
    }

    #[test]
    fn test_date_and_time_strings() {
        let msg = NormalizedMessage::new("x", ts(9, 5), "Bob", "Hi");
        assert_eq!(msg.date_string(), "02/15/2024");
        assert_eq!(msg.time_string(), "09:05 AM");

        let msg = NormalizedMessage::new("x", ts(0, 0), "Bob", "Hi");
        assert_eq!(msg.time_string(), "12:00 AM");
    }

    #[test]
    fn test_builder() {
        let msg = NormalizedMessage::new("x", ts(14, 35), "Alice", "<Media omitted>")
            .with_kind(ContentKind::MediaOnly)
            .with_self(true);
        assert!(msg.is_self);
        assert!(msg.has_media());
        assert_eq!(msg.date(), NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    }

    #[test]
    fn test_serialization() {
        let msg = NormalizedMessage::new("m1", ts(14, 35), "Alice", "Hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"plain_text\""));
        assert!(json.contains("2024-02-15T14:35:00"));
        let back: NormalizedMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
