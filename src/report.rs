//! Diagnostics of one scrape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::Diagnostics;

/// Counters describing how a snapshot was normalized.
///
/// None of these are errors. Unresolved fields were filled by carry-forward
/// and a count mismatch means some fragments were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// Message fragments found by segmentation
    pub fragments: usize,
    /// Records emitted
    pub records: usize,
    /// Fragments that emitted two records
    pub paired: usize,
    /// Records whose sender was carried forward
    pub unresolved_senders: usize,
    /// Records whose timestamp was carried forward
    pub unresolved_timestamps: usize,
    /// Ids of fragments that emitted nothing
    pub dropped: Vec<String>,
    /// Account owner name used for the pass
    pub self_identity: String,
    /// Message count the loader asked for
    pub target: Option<usize>,
}

impl ScrapeReport {
    /// Builds a report from normalization counters.
    pub fn new(
        fragments: usize,
        records: usize,
        self_identity: String,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            fragments,
            records,
            paired: diagnostics.paired,
            unresolved_senders: diagnostics.unresolved_senders,
            unresolved_timestamps: diagnostics.unresolved_timestamps,
            dropped: diagnostics.dropped,
            self_identity,
            target: None,
        }
    }

    /// Sets the requested message count.
    #[must_use]
    pub fn with_target(mut self, target: Option<usize>) -> Self {
        self.target = target;
        self
    }

    /// Records one would expect: one per fragment plus one per pair.
    pub fn expected_records(&self) -> usize {
        self.fragments + self.paired
    }

    /// Returns `true` if the record count differs from the fragment count.
    pub fn count_mismatch(&self) -> bool {
        self.records != self.expected_records()
    }

    /// Returns `true` if the snapshot held at least the requested number of
    /// message fragments, or no target was set.
    pub fn target_reached(&self) -> bool {
        self.target.is_none_or(|target| self.fragments >= target)
    }
}

impl fmt::Display for ScrapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fragments, {} records ({} paired, {} dropped), ",
            self.fragments,
            self.records,
            self.paired,
            self.dropped.len(),
        )?;
        write!(
            f,
            "{} senders and {} timestamps carried forward",
            self.unresolved_senders, self.unresolved_timestamps,
        )
    }
}
