//! End-to-end scrape of one page snapshot.
//!
//! # Example
//!
//! ```rust
//! use chatdom::engine::{Engine, ScrapeRequest};
//!
//! let html = r#"
//!     <div role="application">
//!       <div class="message-in" data-id="a">
//!         <div class="copyable-text" data-pre-plain-text="[2/15/2024, 2:35 PM] Alice">
//!           <span class="selectable-text">Hello</span>
//!         </div>
//!       </div>
//!     </div>"#;
//!
//! let scrape = Engine::new().scrape(&ScrapeRequest::new(html)).unwrap();
//! let rows = scrape.log.rows();
//! assert_eq!(rows[0].date, "02/15/2024");
//! assert_eq!(rows[0].time, "02:35 PM");
//! assert_eq!(rows[0].sender, "Alice");
//! assert_eq!(rows[0].message, "Hello");
//! ```

use scraper::Html;
use tracing::{info, warn};

use crate::chatlog::ChatLog;
use crate::config::EngineConfig;
use crate::dom::{FragmentView, HtmlFragment};
use crate::error::Result;
use crate::message::NormalizedMessage;
use crate::normalize::normalize_all;
use crate::report::ScrapeReport;
use crate::segment::segment;

/// Input of one scrape.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeRequest<'a> {
    /// Serialized markup of the rendered page
    pub document: &'a str,
    /// Number of messages the loader was asked to materialize
    pub message_count_target: Option<usize>,
}

impl<'a> ScrapeRequest<'a> {
    /// Request for a whole snapshot with no target.
    pub fn new(document: &'a str) -> Self {
        Self {
            document,
            message_count_target: None,
        }
    }

    /// Sets the message count target.
    #[must_use]
    pub fn with_target(mut self, target: usize) -> Self {
        self.message_count_target = Some(target);
        self
    }
}

/// Output of one scrape.
#[derive(Debug, Clone)]
pub struct Scrape {
    /// Messages grouped by date
    pub log: ChatLog,
    /// Flat record sequence the log was built from
    pub messages: Vec<NormalizedMessage>,
    /// Diagnostics
    pub report: ScrapeReport,
}

/// Segmentation plus normalization under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Engine with the default markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parses the snapshot and runs the pipeline.
    ///
    /// # Errors
    ///
    /// [`ChatdomError::StructuralMismatch`](crate::ChatdomError::StructuralMismatch)
    /// when the message list cannot be located, and
    /// [`ChatdomError::Parse`](crate::ChatdomError::Parse) when a provenance
    /// timestamp is in an unsupported format.
    pub fn scrape(&self, request: &ScrapeRequest<'_>) -> Result<Scrape> {
        let document = Html::parse_document(request.document);
        self.scrape_view(&HtmlFragment::root(&document), request.message_count_target)
    }

    /// Runs the pipeline over an already parsed tree.
    pub fn scrape_view<V: FragmentView>(&self, root: &V, target: Option<usize>) -> Result<Scrape> {
        let fragments = segment(root, &self.config.markers)?;
        let normalized = normalize_all(&fragments, &self.config)?;
        let log = ChatLog::from_messages(&normalized.messages);

        let report = ScrapeReport::new(
            fragments.len(),
            normalized.messages.len(),
            normalized.self_identity.name,
            normalized.diagnostics,
        )
        .with_target(target);

        if report.count_mismatch() {
            warn!(
                expected = report.expected_records(),
                records = report.records,
                dropped = report.dropped.len(),
                "record count differs from fragment count"
            );
        }
        if !report.target_reached() {
            warn!(
                fragments = report.fragments,
                target = ?report.target,
                "snapshot holds fewer messages than requested"
            );
        }
        info!(
            fragments = report.fragments,
            records = report.records,
            dates = log.groups().len(),
            "scrape finished"
        );

        Ok(Scrape {
            log,
            messages: normalized.messages,
            report,
        })
    }
}

/// Scrapes a snapshot with the given configuration.
pub fn scrape(request: &ScrapeRequest<'_>, config: &EngineConfig) -> Result<Scrape> {
    Engine::with_config(config.clone()).scrape(request)
}
