//! Time-only fallback: fragments without provenance usually still show a
//! bare `h:mm AM/PM` stamp, and the calendar date comes from the nearest
//! date separator row.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::config::Markers;
use crate::datetime::{parse_separator_date, parse_time_only};
use crate::dom::FragmentView;
use crate::segment::is_message_row;

/// First text-bearing leaf of `view` (itself included) holding a bare time.
pub fn find_bare_time<V: FragmentView>(view: &V) -> Option<NaiveTime> {
    std::iter::once(view.clone())
        .chain(view.descendants())
        .filter(|node| node.element_children().is_empty())
        .find_map(|leaf| parse_time_only(&leaf.text()))
}

/// Date of the nearest non-message row holding text, when it parses.
///
/// The search stops at that row, so an unreadable label such as `TODAY`
/// hides any older separator.
fn separator_date<V: FragmentView>(
    rows: Vec<V>,
    markers: &Markers,
    reference: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let label = rows
        .into_iter()
        .filter(|row| !is_message_row(row, markers))
        .map(|row| row.text())
        .find(|text| !text.trim().is_empty())?;
    parse_separator_date(&label, reference)
}

/// Calendar date governing a message row: nearest previous separator row,
/// then nearest following one, then the carried-forward date.
pub fn governing_date<V: FragmentView>(
    row: &V,
    markers: &Markers,
    reference: Option<NaiveDate>,
    carried: Option<NaiveDate>,
) -> Option<NaiveDate> {
    separator_date(row.previous_siblings(), markers, reference)
        .or_else(|| separator_date(row.next_siblings(), markers, reference))
        .or(carried)
}

/// Resolves a full timestamp for a row lacking provenance.
///
/// Returns `None` when the row shows no time of day, or when no date can be
/// found for it; the caller then inherits the previous timestamp.
pub fn resolve_time_only<V: FragmentView>(
    row: &V,
    markers: &Markers,
    reference: Option<NaiveDate>,
    last: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    let Some(time) = find_bare_time(row) else {
        debug!("no bare time in fragment");
        return None;
    };
    let date = governing_date(row, markers, reference, last.map(|ts| ts.date()))?;
    Some(date.and_time(time))
}
