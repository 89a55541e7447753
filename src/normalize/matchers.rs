//! The matcher chain.
//!
//! Each matcher looks at one message shape and returns the fields it can
//! resolve, or `None` when the fragment does not have that shape. The chain
//! runs in fixed order; later results only fill gaps left by earlier ones
//! (see [`PartialMessage::merge`]).

use tracing::debug;

use crate::datetime::parse_provenance;
use crate::dom::{FragmentView, NodeMatcher};
use crate::error::Result;
use crate::message::Direction;
use crate::segment::RawFragment;

use super::sender::resolve_sender_fallback;
use super::text::{extract_text, strip_directional};
use super::time::resolve_time_only;
use super::{MatchContext, PartialMessage};

/// Signature shared by every step of the chain.
pub type Matcher<V> =
    fn(&RawFragment<V>, &MatchContext<'_>, &PartialMessage) -> Result<Option<PartialMessage>>;

/// The matchers in priority order.
pub fn chain<V: FragmentView>() -> [Matcher<V>; 5] {
    [
        explicit_metadata::<V>,
        body::<V>,
        deletion::<V>,
        media::<V>,
        fallback::<V>,
    ]
}

fn metadata_node<V: FragmentView>(row: &V, ctx: &MatchContext<'_>) -> Option<V> {
    let matcher = &ctx.config.markers.metadata;
    if matcher.matches(row) {
        Some(row.clone())
    } else {
        row.find_child(matcher)
    }
}

/// Parses the provenance attribute. A malformed one is a hard error.
pub fn explicit_metadata<V: FragmentView>(
    fragment: &RawFragment<V>,
    ctx: &MatchContext<'_>,
    _current: &PartialMessage,
) -> Result<Option<PartialMessage>> {
    if !fragment.shape.has_explicit_metadata {
        return Ok(None);
    }
    let Some(node) = metadata_node(&fragment.view, ctx) else {
        return Ok(None);
    };
    let Some(raw) = node.attribute(&ctx.config.markers.provenance_attribute) else {
        return Ok(None);
    };

    let provenance = parse_provenance(raw)?;
    Ok(Some(PartialMessage {
        timestamp: Some(provenance.timestamp),
        sender: Some(strip_directional(&provenance.sender)),
        has_metadata: true,
        ..PartialMessage::default()
    }))
}

/// Locates the body text, skipping quoted replies.
pub fn body<V: FragmentView>(
    fragment: &RawFragment<V>,
    ctx: &MatchContext<'_>,
    _current: &PartialMessage,
) -> Result<Option<PartialMessage>> {
    let markers = &ctx.config.markers;
    let metadata = metadata_node(&fragment.view, ctx);
    let scope = metadata.clone().unwrap_or_else(|| fragment.view.clone());

    let selectable = markers
        .selectable
        .iter()
        .find_map(|m| scope.find_child_outside(m, &markers.quoted));

    let node = match (selectable, metadata) {
        (Some(node), _) => Some(node),
        (None, Some(meta)) => {
            let preview = NodeMatcher::attr("data-testid").containing("media");
            meta.element_children()
                .into_iter()
                .find(|c| !markers.quoted.matches(c) && !c.contains(&preview))
        }
        (None, None) => None,
    };

    Ok(node.map(|node| PartialMessage {
        text: Some(extract_text(&node)),
        ..PartialMessage::default()
    }))
}

/// Recalled messages: the sender follows direction, the time comes from
/// the bare stamp.
pub fn deletion<V: FragmentView>(
    fragment: &RawFragment<V>,
    ctx: &MatchContext<'_>,
    current: &PartialMessage,
) -> Result<Option<PartialMessage>> {
    if !fragment.shape.has_deletion_marker {
        return Ok(None);
    }
    debug!(id = %fragment.id, "recalled message");

    let markers = &ctx.config.markers;
    let sender = match fragment.direction {
        Direction::Outgoing => Some(ctx.self_identity.to_string()),
        Direction::Incoming => resolve_sender_fallback(&fragment.view, markers),
        Direction::Unknown => None,
    };
    let timestamp = if current.has_metadata {
        None
    } else {
        resolve_time_only(
            &fragment.view,
            markers,
            ctx.config.reference_date,
            ctx.last_timestamp,
        )
    };

    Ok(Some(PartialMessage {
        timestamp,
        sender,
        deleted: true,
        ..PartialMessage::default()
    }))
}

/// Attachments. Without provenance the sender and time come from the
/// fallbacks.
pub fn media<V: FragmentView>(
    fragment: &RawFragment<V>,
    ctx: &MatchContext<'_>,
    current: &PartialMessage,
) -> Result<Option<PartialMessage>> {
    if !fragment.shape.has_media_marker {
        return Ok(None);
    }

    let mut partial = PartialMessage {
        media: true,
        ..PartialMessage::default()
    };
    if !current.has_metadata {
        let markers = &ctx.config.markers;
        partial.sender = match fragment.direction {
            Direction::Outgoing => Some(ctx.self_identity.to_string()),
            _ => resolve_sender_fallback(&fragment.view, markers),
        };
        partial.timestamp = resolve_time_only(
            &fragment.view,
            markers,
            ctx.config.reference_date,
            ctx.last_timestamp,
        );
    }

    debug!(id = %fragment.id, with_metadata = current.has_metadata, "media message");
    Ok(Some(partial))
}

/// Plain rows without provenance. A bare stamp or a sender label on the row
/// still beats carry-forward.
pub fn fallback<V: FragmentView>(
    fragment: &RawFragment<V>,
    ctx: &MatchContext<'_>,
    current: &PartialMessage,
) -> Result<Option<PartialMessage>> {
    if current.has_metadata || current.media || current.deleted {
        return Ok(None);
    }

    let markers = &ctx.config.markers;
    let sender = match fragment.direction {
        Direction::Outgoing => Some(ctx.self_identity.to_string()),
        _ => resolve_sender_fallback(&fragment.view, markers),
    };
    let timestamp = resolve_time_only(
        &fragment.view,
        markers,
        ctx.config.reference_date,
        ctx.last_timestamp,
    );
    if sender.is_none() && timestamp.is_none() {
        return Ok(None);
    }

    debug!(id = %fragment.id, "plain row without provenance");
    Ok(Some(PartialMessage {
        timestamp,
        sender,
        ..PartialMessage::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::dom::{El, SyntheticDocument};
    use crate::segment::segment;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn doc(rows: Vec<El>) -> SyntheticDocument {
        let mut container = El::new("div").attr("role", "application");
        for row in rows {
            container = container.child(row);
        }
        SyntheticDocument::new(El::new("body").child(container))
    }

    fn ctx(config: &EngineConfig) -> MatchContext<'_> {
        MatchContext {
            config,
            self_identity: "Alice",
            last_timestamp: None,
        }
    }

    fn metadata(provenance: &str) -> El {
        El::new("div")
            .class("copyable-text")
            .attr("data-pre-plain-text", provenance)
    }

    #[test]
    fn test_explicit_metadata() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div").class("message-in").attr("data-id", "a").child(
            metadata("[2/15/2024, 2:35 PM] \u{202A}Bob\u{202C}: ")
                .child(El::new("span").class("selectable-text").text("Hello")),
        )]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let partial = explicit_metadata(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap()
            .unwrap();
        assert_eq!(partial.timestamp, Some(dt(14, 35)));
        assert_eq!(partial.sender.as_deref(), Some("Bob"));
        assert!(partial.has_metadata);
    }

    #[test]
    fn test_bad_provenance_is_an_error() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div")
            .class("message-in")
            .child(metadata("[15.02.24, 14:35] Bob: "))]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let err = explicit_metadata(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_body_skips_quoted_reply() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div").class("message-in").child(
            metadata("[2/15/2024, 2:35 PM] Bob")
                .child(
                    El::new("div")
                        .class("_3fs13")
                        .child(El::new("span").class("selectable-text").text("quoted")),
                )
                .child(El::new("span").class("selectable-text").text("reply")),
        )]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let partial = body(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap()
            .unwrap();
        assert_eq!(partial.text.as_deref(), Some("reply"));
    }

    #[test]
    fn test_body_falls_back_to_metadata_child() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div").class("message-in").child(
            metadata("[2/15/2024, 2:35 PM] Bob")
                .child(El::new("div").class("_3fs13").text("quoted"))
                .child(El::new("div").attr("data-testid", "media-url-provider").text("preview"))
                .child(El::new("div").text("plain body")),
        )]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let partial = body(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap()
            .unwrap();
        assert_eq!(partial.text.as_deref(), Some("plain body"));
    }

    #[test]
    fn test_body_skips_nested_link_preview() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div").class("message-in").child(
            metadata("[2/15/2024, 2:35 PM] Bob")
                .child(
                    El::new("div").class("x").child(
                        El::new("div")
                            .attr("data-testid", "media-url-provider")
                            .text("preview.com"),
                    ),
                )
                .child(El::new("div").class("y").text("see link")),
        )]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let partial = body(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap()
            .unwrap();
        assert_eq!(partial.text.as_deref(), Some("see link"));
    }

    #[test]
    fn test_fallback_reads_stamp_and_label() {
        let config = EngineConfig::default();
        let d = doc(vec![
            El::new("div").child(El::new("span").text("2/14/2024")),
            El::new("div")
                .class("message-in")
                .child(El::new("span").attr("aria-label", "Bob:"))
                .child(El::new("span").class("selectable-text").text("late reply"))
                .child(El::new("div").child(El::new("span").text("3:05 PM"))),
        ]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let partial = fallback(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap()
            .unwrap();
        assert_eq!(partial.sender.as_deref(), Some("Bob"));
        assert_eq!(
            partial.timestamp,
            NaiveDate::from_ymd_opt(2024, 2, 14)
                .unwrap()
                .and_hms_opt(15, 5, 0)
        );
    }

    #[test]
    fn test_fallback_defers_to_earlier_matchers() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div")
            .class("message-in")
            .child(El::new("span").attr("aria-label", "Bob:"))
            .child(El::new("span").text("3:05 PM"))]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let c = ctx(&config);
        for current in [
            PartialMessage {
                has_metadata: true,
                ..PartialMessage::default()
            },
            PartialMessage {
                media: true,
                ..PartialMessage::default()
            },
            PartialMessage {
                deleted: true,
                ..PartialMessage::default()
            },
        ] {
            assert!(fallback(&fragments[0], &c, &current).unwrap().is_none());
        }
    }

    #[test]
    fn test_deletion_outgoing_uses_self_identity() {
        let config = EngineConfig::default();
        let d = doc(vec![
            El::new("div").child(El::new("span").text("2/15/2024")),
            El::new("div").class("message-out").child(
                El::new("div")
                    .class("_1qQEf")
                    .child(El::new("span").text("3:02 PM")),
            ),
        ]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let partial = deletion(&fragments[0], &ctx(&config), &PartialMessage::default())
            .unwrap()
            .unwrap();
        assert!(partial.deleted);
        assert_eq!(partial.sender.as_deref(), Some("Alice"));
        assert_eq!(partial.timestamp, Some(dt(15, 2)));
    }

    #[test]
    fn test_media_with_metadata_keeps_resolved_fields() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div").class("message-in").child(
            metadata("[2/15/2024, 2:35 PM] Bob")
                .child(El::new("div").attr("data-testid", "image-thumb-media"))
                .child(El::new("span").attr("aria-label", "Carol:")),
        )]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let current = PartialMessage {
            has_metadata: true,
            ..PartialMessage::default()
        };
        let partial = media(&fragments[0], &ctx(&config), &current).unwrap().unwrap();
        assert!(partial.media);
        assert!(partial.sender.is_none());
        assert!(partial.timestamp.is_none());
    }

    #[test]
    fn test_non_matching_shapes_return_none() {
        let config = EngineConfig::default();
        let d = doc(vec![El::new("div")
            .class("message-in")
            .child(El::new("span").text("hi"))]);
        let fragments = segment(&d.root(), &config.markers).unwrap();
        let c = ctx(&config);
        let empty = PartialMessage::default();
        assert!(explicit_metadata(&fragments[0], &c, &empty).unwrap().is_none());
        assert!(deletion(&fragments[0], &c, &empty).unwrap().is_none());
        assert!(media(&fragments[0], &c, &empty).unwrap().is_none());
        assert!(fallback(&fragments[0], &c, &empty).unwrap().is_none());
    }
}
