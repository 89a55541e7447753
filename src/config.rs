//! Configuration types for the engine.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`Markers`] - every structural marker the engine relies on
//! - [`EngineConfig`] - markers plus fallback names and the reference date
//!
//! The defaults describe the WhatsApp Web markup the engine was written
//! against. When the upstream layout changes, a JSON file with the new
//! markers can be loaded instead of patching the code.
//!
//! # Example
//!
//! ```rust
//! use chatdom::config::EngineConfig;
//! use chrono::NaiveDate;
//!
//! let config = EngineConfig::new()
//!     .with_self_fallback("Me")
//!     .with_reference_date(NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
//! assert_eq!(config.self_fallback, "Me");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dom::NodeMatcher;

/// Structural markers used by segmentation and normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Candidates for the message list container, tried in order
    pub containers: Vec<NodeMatcher>,

    /// Class substring that marks a message row (default: "message")
    pub message_class_hint: String,

    /// Class token of incoming messages
    pub incoming_class: String,

    /// Class token of outgoing messages
    pub outgoing_class: String,

    /// Attribute holding the stable message identifier
    pub id_attribute: String,

    /// Node carrying the provenance attribute
    pub metadata: NodeMatcher,

    /// Attribute holding `[date, time] Sender` provenance
    pub provenance_attribute: String,

    /// Nodes holding the message text, tried in order
    pub selectable: Vec<NodeMatcher>,

    /// Quoted/replied-to blocks whose text is not part of the body
    pub quoted: NodeMatcher,

    /// Markers of a recalled (deleted) message
    pub recall: Vec<NodeMatcher>,

    /// Markers of media attachments (images, video, documents, voice notes)
    pub media: Vec<NodeMatcher>,

    /// Marker of a sticker image
    pub sticker: NodeMatcher,

    /// Marker of a grouped two-up sticker bundle
    pub grouped_sticker: NodeMatcher,

    /// Treat a node with two button children as a contact card
    pub detect_contact_cards: bool,

    /// Container of a sender name that includes emoji images
    pub name_container: NodeMatcher,

    /// Accessibility label of voice notes, never a sender name
    pub voice_label: String,

    /// Sidebar candidates for chat listing, tried in order
    pub chat_list: Vec<NodeMatcher>,

    /// Chat title nodes inside the sidebar
    pub chat_title: NodeMatcher,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            containers: vec![
                NodeMatcher::attr("role").equal_to("application"),
                NodeMatcher::tag("div").with_class("tSmQ1"),
                NodeMatcher::attr("data-testid").equal_to("conversation-panel-messages"),
            ],
            message_class_hint: "message".to_string(),
            incoming_class: "message-in".to_string(),
            outgoing_class: "message-out".to_string(),
            id_attribute: "data-id".to_string(),
            metadata: NodeMatcher::tag("div")
                .with_class("copyable-text")
                .with_attr("data-pre-plain-text"),
            provenance_attribute: "data-pre-plain-text".to_string(),
            selectable: vec![
                NodeMatcher::tag("span").with_class("selectable-text"),
                NodeMatcher::tag("div").with_class("selectable-text"),
            ],
            quoted: NodeMatcher::class("_3fs13"),
            recall: vec![
                NodeMatcher::tag("div").with_class("_1qQEf"),
                NodeMatcher::attr("data-testid").equal_to("recalled-msg"),
            ],
            media: vec![
                NodeMatcher::attr("data-testid").containing("media"),
                NodeMatcher::attr("data-testid").containing("download"),
                NodeMatcher::attr("data-icon").containing("download"),
                NodeMatcher::class("_2FNAC"),
                NodeMatcher::class("_2Irzd"),
            ],
            sticker: NodeMatcher::tag("img").with_attr("data-testid").equal_to("sticker"),
            grouped_sticker: NodeMatcher::attr("data-testid").equal_to("grouped-sticker"),
            detect_contact_cards: true,
            name_container: NodeMatcher::tag("span")
                .with_class("_19038")
                .with_class("_3cwQ7")
                .with_class("_1VzZY"),
            voice_label: "Voice message".to_string(),
            chat_list: vec![
                NodeMatcher::attr("id").equal_to("pane-side"),
                NodeMatcher::attr("id").equal_to("side"),
            ],
            chat_title: NodeMatcher::tag("span").with_attr("title"),
        }
    }
}

/// Configuration of one scrape pass.
///
/// # Example
///
/// ```rust
/// use chatdom::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.self_fallback, "You");
/// assert_eq!(config.unknown_sender, "Unknown");
/// assert!(config.reference_date.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Structural markers
    pub markers: Markers,

    /// Name used for the account owner when no outgoing message exposes it
    /// (default: "You")
    pub self_fallback: String,

    /// Sender used when there is no previous sender to carry forward
    /// (default: "Unknown")
    pub unknown_sender: String,

    /// Date the snapshot was taken, enabling "Today"/"Yesterday"/weekday
    /// date separators (default: None)
    pub reference_date: Option<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            self_fallback: "You".to_string(),
            unknown_sender: "Unknown".to_string(),
            reference_date: None,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the structural markers.
    #[must_use]
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Sets the fallback name of the account owner.
    #[must_use]
    pub fn with_self_fallback(mut self, name: impl Into<String>) -> Self {
        self.self_fallback = name.into();
        self
    }

    /// Sets the sender used when carry-forward has nothing to carry.
    #[must_use]
    pub fn with_unknown_sender(mut self, name: impl Into<String>) -> Self {
        self.unknown_sender = name.into();
        self
    }

    /// Sets the date relative separators are resolved against.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    #[cfg(feature = "json-output")]
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::ChatdomError::config(e.to_string(), None))
    }

    /// Loads a configuration file.
    #[cfg(feature = "json-output")]
    pub fn from_json_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| crate::ChatdomError::config(e.to_string(), Some(path.to_path_buf())))
    }
}
