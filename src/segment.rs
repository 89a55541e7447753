//! Segmentation: splits the message list into message fragments.
//!
//! The message list container is located first; its direct children are the
//! rows of the conversation in document order, which is also temporal order
//! (oldest loaded row first). Rows are classified as message rows, date
//! separators or anything else (system notices, loading placeholders), and
//! only message rows are emitted, each tagged with [`ShapeHints`] for the
//! normalization pass.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::Markers;
use crate::datetime::parse_separator_date;
use crate::dom::{FragmentView, NodeMatcher};
use crate::error::{ChatdomError, Result};
use crate::message::Direction;

/// Coarse shape of a message fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeHints {
    /// The row is a chat message
    pub is_message_fragment: bool,
    /// A provenance attribute (date, time, sender) is present
    pub has_explicit_metadata: bool,
    /// Some attachment marker is present
    pub has_media_marker: bool,
    /// The message was recalled
    pub has_deletion_marker: bool,
    /// The row renders two logical messages (two-up sticker bundle)
    pub is_paired: bool,
}

/// One message row of the snapshot.
#[derive(Debug, Clone)]
pub struct RawFragment<V> {
    /// Position among emitted fragments
    pub index: usize,
    /// Stable identifier from the markup, or a positional one
    pub id: String,
    /// The row element
    pub view: V,
    /// Side of the conversation
    pub direction: Direction,
    /// Shape hints
    pub shape: ShapeHints,
}

/// Classification of a direct child of the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A chat message
    Message,
    /// A date separator with its parsed date
    DateSeparator(NaiveDate),
    /// System notice, placeholder or UI chrome
    Other,
}

/// Finds the message list container, trying each configured candidate.
pub fn locate_container<V: FragmentView>(root: &V, markers: &Markers) -> Result<V> {
    for candidate in &markers.containers {
        if candidate.matches(root) {
            return Ok(root.clone());
        }
        if let Some(found) = root.find_child(candidate) {
            return Ok(found);
        }
    }
    Err(ChatdomError::structural(
        "message list container",
        format!("none of {} candidate markers matched", markers.containers.len()),
    ))
}

/// Returns `true` if a container row is a chat message.
pub fn is_message_row<V: FragmentView>(row: &V, markers: &Markers) -> bool {
    let hint = markers.message_class_hint.as_str();
    if !hint.is_empty() && row.classes().iter().any(|c| c.contains(hint)) {
        return true;
    }
    if row.attribute(&markers.id_attribute).is_some() {
        return true;
    }
    direction_of(row, markers) != Direction::Unknown
}

/// Classifies a direct child of the message list.
pub fn classify_row<V: FragmentView>(
    row: &V,
    markers: &Markers,
    reference: Option<NaiveDate>,
) -> RowKind {
    if is_message_row(row, markers) {
        return RowKind::Message;
    }
    match parse_separator_date(&row.text(), reference) {
        Some(date) => RowKind::DateSeparator(date),
        None => RowKind::Other,
    }
}

/// Side of the conversation a row was rendered on.
pub fn direction_of<V: FragmentView>(row: &V, markers: &Markers) -> Direction {
    if row.contains(&NodeMatcher::class(markers.incoming_class.as_str())) {
        Direction::Incoming
    } else if row.contains(&NodeMatcher::class(markers.outgoing_class.as_str())) {
        Direction::Outgoing
    } else {
        Direction::Unknown
    }
}

/// Computes the shape hints of a message row.
pub fn shape_of<V: FragmentView>(row: &V, markers: &Markers) -> ShapeHints {
    let is_paired = row.contains(&markers.grouped_sticker);
    let has_media_marker = markers.media.iter().any(|m| row.contains(m))
        || row.contains(&markers.sticker)
        || is_paired
        || (markers.detect_contact_cards && has_button_pair(row));

    ShapeHints {
        is_message_fragment: true,
        has_explicit_metadata: row.contains(&markers.metadata),
        has_media_marker,
        has_deletion_marker: markers.recall.iter().any(|m| row.contains(m)),
        is_paired,
    }
}

/// Contact cards render as a node with exactly two labelled buttons.
fn has_button_pair<V: FragmentView>(row: &V) -> bool {
    let is_button = |el: &V| el.tag() == "button" || el.attribute("role") == Some("button");

    std::iter::once(row.clone())
        .chain(row.descendants())
        .any(|node| {
            let children = node.element_children();
            children.len() == 2
                && children
                    .iter()
                    .all(|c| is_button(c) && !c.text().trim().is_empty())
        })
}

fn fragment_id<V: FragmentView>(row: &V, markers: &Markers, index: usize) -> String {
    let attr = markers.id_attribute.as_str();
    row.attribute(attr)
        .map(str::to_string)
        .or_else(|| {
            row.find_child(&NodeMatcher::attr(attr))
                .and_then(|el| el.attribute(attr).map(str::to_string))
        })
        .unwrap_or_else(|| format!("fragment-{index}"))
}

/// Splits a document into message fragments, in document order.
///
/// Fails with [`ChatdomError::StructuralMismatch`] when the message list
/// container cannot be located.
pub fn segment<V: FragmentView>(root: &V, markers: &Markers) -> Result<Vec<RawFragment<V>>> {
    let container = locate_container(root, markers)?;
    let rows = container.element_children();

    let mut fragments = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        if !is_message_row(&row, markers) {
            skipped += 1;
            continue;
        }

        let index = fragments.len();
        fragments.push(RawFragment {
            index,
            id: fragment_id(&row, markers, index),
            direction: direction_of(&row, markers),
            shape: shape_of(&row, markers),
            view: row,
        });
    }

    debug!(
        fragments = fragments.len(),
        skipped_rows = skipped,
        "segmented message list"
    );

    Ok(fragments)
}
