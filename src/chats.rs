//! Chat listing from the sidebar of a rendered page.
//!
//! ```rust
//! use chatdom::chats::list_chats;
//! use chatdom::config::Markers;
//!
//! let html = r#"<div id="pane-side">
//!     <span title="Alice" dir="auto">Alice</span>
//!     <span title="Team" dir="auto">Team</span>
//!     <span title="Alice" dir="auto">Alice</span>
//! </div>"#;
//! assert_eq!(list_chats(html, &Markers::default()).unwrap(), vec!["Alice", "Team"]);
//! ```

use std::collections::HashSet;

use scraper::Html;
use tracing::debug;

use crate::config::Markers;
use crate::dom::{FragmentView, HtmlFragment};
use crate::error::{ChatdomError, Result};
use crate::normalize::text::strip_directional;

/// Lists chat titles of a page snapshot, first-seen order, without
/// duplicates.
pub fn list_chats(document: &str, markers: &Markers) -> Result<Vec<String>> {
    let html = Html::parse_document(document);
    list_chats_in(&HtmlFragment::root(&html), markers)
}

/// Lists chat titles under an already parsed tree.
pub fn list_chats_in<V: FragmentView>(root: &V, markers: &Markers) -> Result<Vec<String>> {
    let sidebar = markers
        .chat_list
        .iter()
        .find_map(|m| if m.matches(root) { Some(root.clone()) } else { root.find_child(m) })
        .ok_or_else(|| ChatdomError::structural("chat list", "no sidebar found"))?;

    let mut seen = HashSet::new();
    let chats: Vec<String> = sidebar
        .find_all(&markers.chat_title)
        .iter()
        .filter_map(|node| node.attribute("title"))
        .map(|title| strip_directional(title).trim().to_string())
        .filter(|title| !title.is_empty() && seen.insert(title.clone()))
        .collect();

    debug!(count = chats.len(), "listed chats");
    Ok(chats)
}
