//! Normalization: turns message fragments into [`NormalizedMessage`]s.
//!
//! Each fragment runs through the matcher chain in [`matchers`], producing a
//! [`PartialMessage`]. The gaps left by the chain are then filled from the
//! rolling [`NormalizationState`]: a missing sender is carried forward from
//! the previous record, a missing timestamp likewise. The state is threaded
//! through [`step`] by value, so every step is a pure function of its input.
//!
//! # Example
//!
//! ```rust
//! use chatdom::config::EngineConfig;
//! use chatdom::dom::{El, SyntheticDocument};
//! use chatdom::normalize::normalize_all;
//! use chatdom::segment::segment;
//!
//! let doc = SyntheticDocument::new(
//!     El::new("div").attr("role", "application").child(
//!         El::new("div").class("message-in").child(
//!             El::new("div")
//!                 .class("copyable-text")
//!                 .attr("data-pre-plain-text", "[2/15/2024, 2:35 PM] Bob")
//!                 .child(El::new("span").class("selectable-text").text("Hello")),
//!         ),
//!     ),
//! );
//! let config = EngineConfig::default();
//! let fragments = segment(&doc.root(), &config.markers).unwrap();
//! let normalized = normalize_all(&fragments, &config).unwrap();
//!
//! assert_eq!(normalized.messages[0].sender, "Bob");
//! assert_eq!(normalized.messages[0].body, "Hello");
//! ```

pub mod matchers;
pub mod sender;
pub mod text;
pub mod time;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::datetime::parse_provenance;
use crate::dom::FragmentView;
use crate::error::Result;
use crate::message::{ContentKind, Direction, NormalizedMessage};
use crate::segment::RawFragment;

use self::text::strip_directional;

/// Fields resolved so far for one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMessage {
    /// Resolved timestamp
    pub timestamp: Option<NaiveDateTime>,
    /// Resolved sender
    pub sender: Option<String>,
    /// Resolved body text, before content-kind rendering
    pub text: Option<String>,
    /// Provenance was parsed
    pub has_metadata: bool,
    /// An attachment is present
    pub media: bool,
    /// The message was recalled
    pub deleted: bool,
}

impl PartialMessage {
    /// Fills the gaps of `self` from `later`. Fields already resolved are
    /// kept; flags accumulate.
    #[must_use]
    pub fn merge(self, later: PartialMessage) -> Self {
        Self {
            timestamp: self.timestamp.or(later.timestamp),
            sender: self.sender.or(later.sender),
            text: self.text.or(later.text),
            has_metadata: self.has_metadata || later.has_metadata,
            media: self.media || later.media,
            deleted: self.deleted || later.deleted,
        }
    }

    /// Content kind implied by the resolved flags.
    pub fn content_kind(&self) -> ContentKind {
        if self.deleted {
            ContentKind::Deleted
        } else if self.media {
            let has_text = self.text.as_deref().is_some_and(|t| !t.trim().is_empty());
            if self.has_metadata && has_text {
                ContentKind::TextWithMediaNotice
            } else {
                ContentKind::MediaOnly
            }
        } else {
            ContentKind::PlainText
        }
    }
}

/// Read-only inputs shared by the matchers for one fragment.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Engine configuration
    pub config: &'a EngineConfig,
    /// Display name of the account owner
    pub self_identity: &'a str,
    /// Timestamp of the previous record
    pub last_timestamp: Option<NaiveDateTime>,
}

/// Rolling state of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationState {
    /// Timestamp of the last emitted record
    pub last_timestamp: Option<NaiveDateTime>,
    /// Sender of the last emitted record
    pub last_sender: Option<String>,
    /// Account owner, once resolved
    pub self_identity: Option<SelfIdentity>,
}

/// Display name of the account owner and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfIdentity {
    /// Display name
    pub name: String,
    /// `true` if read from an outgoing fragment, `false` for the configured
    /// fallback
    pub from_markup: bool,
}

impl NormalizationState {
    /// Empty state for a new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account owner.
    #[must_use]
    pub fn with_self_identity(mut self, identity: SelfIdentity) -> Self {
        self.self_identity = Some(identity);
        self
    }

    /// Resolves the account owner on first use; afterwards a no-op.
    #[must_use]
    pub fn ensure_self_identity<V: FragmentView>(
        self,
        fragments: &[RawFragment<V>],
        config: &EngineConfig,
    ) -> Self {
        if self.self_identity.is_some() {
            return self;
        }
        let identity = resolve_self_identity(fragments, config);
        debug!(name = %identity.name, from_markup = identity.from_markup, "self identity");
        self.with_self_identity(identity)
    }

    fn self_name<'s>(&'s self, config: &'s EngineConfig) -> &'s str {
        self.self_identity
            .as_ref()
            .map_or(config.self_fallback.as_str(), |id| id.name.as_str())
    }

    /// State after emitting `record`.
    #[must_use]
    fn advance(self, record: &NormalizedMessage) -> Self {
        Self {
            last_timestamp: Some(record.timestamp),
            last_sender: Some(record.sender.clone()),
            self_identity: self.self_identity,
        }
    }
}

/// First outgoing fragment with parseable provenance names the account owner.
pub fn resolve_self_identity<V: FragmentView>(
    fragments: &[RawFragment<V>],
    config: &EngineConfig,
) -> SelfIdentity {
    let markers = &config.markers;
    fragments
        .iter()
        .filter(|f| f.direction == Direction::Outgoing && f.shape.has_explicit_metadata)
        .find_map(|f| {
            let node = if markers.metadata.matches(&f.view) {
                f.view.clone()
            } else {
                f.view.find_child(&markers.metadata)?
            };
            let raw = node.attribute(&markers.provenance_attribute)?;
            let provenance = parse_provenance(raw).ok()?;
            let name = strip_directional(&provenance.sender);
            (!name.is_empty()).then_some(name)
        })
        .map_or_else(
            || SelfIdentity {
                name: config.self_fallback.clone(),
                from_markup: false,
            },
            |name| SelfIdentity {
                name,
                from_markup: true,
            },
        )
}

/// What one step produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// Emitted records: none (dropped), one, or two (paired)
    pub records: Vec<NormalizedMessage>,
    /// The sender was carried forward
    pub sender_carried: bool,
    /// The timestamp was carried forward
    pub timestamp_carried: bool,
}

impl Step {
    /// Returns `true` if the fragment produced no record.
    pub fn is_dropped(&self) -> bool {
        self.records.is_empty()
    }
}

/// Runs the matcher chain over one fragment.
pub fn run_chain<V: FragmentView>(
    fragment: &RawFragment<V>,
    ctx: &MatchContext<'_>,
) -> Result<PartialMessage> {
    let mut partial = PartialMessage::default();
    for matcher in matchers::chain::<V>() {
        if let Some(found) = matcher(fragment, ctx, &partial)? {
            partial = partial.merge(found);
        }
    }
    Ok(partial)
}

/// Normalizes one fragment against `state`, returning the next state.
///
/// Only a malformed provenance attribute is an error; every other failure
/// degrades to carry-forward.
pub fn step<V: FragmentView>(
    state: NormalizationState,
    fragment: &RawFragment<V>,
    config: &EngineConfig,
) -> Result<(NormalizationState, Step)> {
    let self_name = state.self_name(config).to_string();
    let ctx = MatchContext {
        config,
        self_identity: &self_name,
        last_timestamp: state.last_timestamp,
    };
    let partial = run_chain(fragment, &ctx)?;

    let mut outcome = Step::default();

    let timestamp = match partial.timestamp {
        Some(ts) => ts,
        None => match state.last_timestamp {
            Some(ts) => {
                debug!(id = %fragment.id, "timestamp carried forward");
                outcome.timestamp_carried = true;
                ts
            }
            None => {
                warn!(id = %fragment.id, "no timestamp and nothing to inherit, fragment dropped");
                return Ok((state, outcome));
            }
        },
    };

    let sender = match partial.sender.as_deref().map(strip_directional) {
        Some(sender) if !sender.trim().is_empty() => sender,
        _ => {
            outcome.sender_carried = true;
            let carried = state
                .last_sender
                .clone()
                .unwrap_or_else(|| config.unknown_sender.clone());
            debug!(id = %fragment.id, sender = %carried, "sender carried forward");
            carried
        }
    };

    let kind = partial.content_kind();
    let text = strip_directional(partial.text.as_deref().unwrap_or_default());
    let is_self = sender == self_name;
    let record = NormalizedMessage::new(fragment.id.clone(), timestamp, sender, kind.render(&text))
        .with_kind(kind)
        .with_self(is_self);

    let state = state.advance(&record);
    if fragment.shape.is_paired {
        let mut second = record.clone();
        second.id = format!("{}#2", record.id);
        outcome.records = vec![record, second];
    } else {
        outcome.records = vec![record];
    }

    Ok((state, outcome))
}

/// Counters collected over a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Fragments that emitted a second record
    pub paired: usize,
    /// Records whose sender was carried forward
    pub unresolved_senders: usize,
    /// Records whose timestamp was carried forward
    pub unresolved_timestamps: usize,
    /// Ids of fragments that emitted nothing
    pub dropped: Vec<String>,
}

/// Result of a full pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Records in fragment order
    pub messages: Vec<NormalizedMessage>,
    /// Account owner used for the pass
    pub self_identity: SelfIdentity,
    /// Counters
    pub diagnostics: Diagnostics,
}

/// Normalizes every fragment in order.
pub fn normalize_all<V: FragmentView>(
    fragments: &[RawFragment<V>],
    config: &EngineConfig,
) -> Result<Normalized> {
    let mut state = NormalizationState::new();
    let mut messages = Vec::with_capacity(fragments.len());
    let mut diagnostics = Diagnostics::default();

    for fragment in fragments {
        state = state.ensure_self_identity(fragments, config);
        let (next, outcome) = step(state, fragment, config)?;
        state = next;

        if outcome.is_dropped() {
            diagnostics.dropped.push(fragment.id.clone());
            continue;
        }
        if outcome.records.len() > 1 {
            diagnostics.paired += 1;
        }
        if outcome.sender_carried {
            diagnostics.unresolved_senders += 1;
        }
        if outcome.timestamp_carried {
            diagnostics.unresolved_timestamps += 1;
        }
        messages.extend(outcome.records);
    }

    let self_identity = state
        .self_identity
        .unwrap_or_else(|| resolve_self_identity(fragments, config));

    Ok(Normalized {
        messages,
        self_identity,
        diagnostics,
    })
}
