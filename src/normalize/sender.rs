//! Sender fallback for incoming fragments that carry no provenance.

use tracing::debug;

use crate::config::Markers;
use crate::dom::FragmentView;

use super::text::{has_image, reconstruct_with_emoji, strip_directional};

/// Looks for the sender name of an incoming fragment.
///
/// Spans are scanned in document order. A span whose `aria-label` ends in
/// a colon names the sender (the voice message label excepted). If a span
/// holding an emoji image is met first, the name is rebuilt from the name
/// container instead. Returns `None` when neither applies.
pub fn resolve_sender_fallback<V: FragmentView>(row: &V, markers: &Markers) -> Option<String> {
    let mut emoji_in_name = false;

    for span in row.descendants().into_iter().filter(|el| el.tag() == "span") {
        if let Some(label) = span.attribute("aria-label") {
            if let Some(name) = label.trim_end().strip_suffix(':') {
                let name = strip_directional(name.trim());
                if !name.is_empty() && name != markers.voice_label {
                    debug!(sender = %name, "sender from accessibility label");
                    return Some(name);
                }
            }
        }
        if has_image(&span) {
            emoji_in_name = true;
            break;
        }
    }

    if !emoji_in_name {
        return None;
    }

    let container = row.find_child(&markers.name_container)?;
    let name = strip_directional(reconstruct_with_emoji(&container).trim());
    if name.is_empty() {
        None
    } else {
        debug!(sender = %name, "sender from emoji name container");
        Some(name)
    }
}
