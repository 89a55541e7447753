//! Text reconstruction for bodies and sender names.

use crate::dom::{Child, FragmentView, NodeMatcher};

/// Bidirectional formatting characters the web client wraps names and
/// phone numbers in.
const DIRECTIONAL_MARKS: &[char] = &[
    '\u{200E}', '\u{200F}', '\u{202A}', '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}',
    '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}',
];

/// Removes directional control characters.
pub fn strip_directional(text: &str) -> String {
    text.chars().filter(|c| !DIRECTIONAL_MARKS.contains(c)).collect()
}

/// Returns `true` if an `<img>` appears anywhere under `node`.
pub fn has_image<V: FragmentView>(node: &V) -> bool {
    node.find_child(&NodeMatcher::tag("img")).is_some()
}

/// Rebuilds the text of a node whose emoji are rendered as images.
///
/// Text runs are kept verbatim, images contribute their `alt` alias, in
/// document order. Whitespace-only runs are skipped.
pub fn reconstruct_with_emoji<V: FragmentView>(node: &V) -> String {
    let mut out = String::new();
    for child in node.children() {
        match child {
            Child::Text(text) => {
                if !text.trim().is_empty() {
                    out.push_str(&text);
                }
            }
            Child::Element(el) if el.tag() == "img" => {
                out.push_str(el.attribute("alt").unwrap_or_default());
            }
            Child::Element(el) => out.push_str(&reconstruct_with_emoji(&el)),
        }
    }
    out
}

/// Text of a node, going through emoji reconstruction only when needed.
pub fn extract_text<V: FragmentView>(node: &V) -> String {
    let raw = if has_image(node) {
        reconstruct_with_emoji(node)
    } else {
        node.text()
    };
    strip_directional(&raw)
}
