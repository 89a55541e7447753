//! # chatdom
//!
//! Rebuilds a WhatsApp Web conversation from a saved, fully rendered page
//! snapshot and exports it as TXT, CSV, HTML or JSON.
//!
//! ## Overview
//!
//! The engine runs two passes over the page:
//!
//! 1. **Segmentation** ([`segment`]) locates the message list and splits it
//!    into message fragments, in document order, which is also temporal
//!    order.
//! 2. **Normalization** ([`normalize`]) resolves sender, timestamp, body and
//!    content kind for every fragment through a chain of matchers, carrying
//!    forward what a fragment does not show.
//!
//! The records are then grouped by calendar date into a [`ChatLog`], whose
//! flat [`ExportRow`]s feed the [`export`] writers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatdom::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let html = std::fs::read_to_string("snapshot.html")?;
//!     let scrape = Engine::new().scrape(&ScrapeRequest::new(&html))?;
//!
//!     for row in scrape.log.rows() {
//!         println!("{}, {} - {}: {}", row.date, row.time, row.sender, row.message);
//!     }
//!     if scrape.report.count_mismatch() {
//!         eprintln!("{}", scrape.report);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`dom`] - [`FragmentView`] over parsed HTML and synthetic fixture trees
//! - [`segment`] - message list container, row classification, [`RawFragment`]s
//! - [`datetime`] - provenance, bare time and date separator parsing
//! - [`normalize`] - matcher chain, carry-forward state, [`NormalizedMessage`]s
//! - [`chatlog`] - [`ChatLog`] grouping and [`ExportRow`]s
//! - [`engine`] - [`Engine`], [`ScrapeRequest`], [`Scrape`]
//! - [`report`] - [`ScrapeReport`] diagnostics
//! - [`chats`] - chat titles from the sidebar
//! - [`export`], [`format`] - writers and [`ExportFormat`]
//! - [`config`] - [`EngineConfig`] and structural [`Markers`](config::Markers)
//! - [`error`] - [`ChatdomError`], [`Result`]
//! - [`cli`], [`logging`] - binary support (feature `cli`)
//! - [`prelude`] - convenient re-exports

pub mod chatlog;
pub mod chats;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod datetime;
pub mod dom;
pub mod engine;
pub mod error;
pub mod export;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod normalize;
pub mod report;
pub mod segment;

// Re-export the main types at the crate root for convenience
pub use chatlog::{ChatLog, ExportRow};
pub use config::EngineConfig;
pub use dom::FragmentView;
pub use engine::{Engine, Scrape, ScrapeRequest};
pub use error::{ChatdomError, Result};
pub use format::ExportFormat;
pub use message::{ContentKind, Direction, NormalizedMessage};
pub use report::ScrapeReport;
pub use segment::RawFragment;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatdom::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::engine::{Engine, Scrape, ScrapeRequest, scrape};

    // Records and log
    pub use crate::chatlog::{ChatLog, DateGroup, ExportRow, LogEntry};
    pub use crate::message::{ContentKind, Direction, NormalizedMessage};
    pub use crate::report::ScrapeReport;

    // Configuration
    pub use crate::config::{EngineConfig, Markers};

    // Error types
    pub use crate::error::{ChatdomError, Result};

    // Tree views
    pub use crate::dom::{El, FragmentView, HtmlFragment, NodeMatcher, SyntheticDocument};

    // Output
    pub use crate::chats::list_chats;
    pub use crate::export::{to_txt, write_txt};
    #[cfg(feature = "csv-output")]
    pub use crate::export::{to_csv, write_csv};
    #[cfg(feature = "html-output")]
    pub use crate::export::{to_html, write_html};
    #[cfg(feature = "json-output")]
    pub use crate::export::{to_json, write_json};
    pub use crate::format::{ExportFormat, to_format_string, write_to_format};
}
