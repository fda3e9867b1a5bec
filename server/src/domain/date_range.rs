//! Calendar-date helpers and the bulk date expander.
//!
//! Bulk entry forms take a from/to date pair and a set of line entries and
//! generate one row per (day, entry) combination. The expansion is pure so
//! the planning services can preview and validate before writing anything.

use anyhow::{Context, Result};
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The calendar-date part of a wire date: `2024-01-05T00:00:00` → `2024-01-05`.
pub fn date_prefix(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_prefix(date), DATE_FORMAT)
        .with_context(|| format!("Invalid date: {}", date))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Every calendar day from `from` to `to` inclusive.
///
/// `to < from` yields an empty range rather than an error; callers disable
/// inverted pickers in the UI and rely on this guard server-side.
pub fn days_in_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = from;

    while current <= to {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    days
}

/// Cross product of every day in the inclusive range with every entry,
/// day-major: all of day 1's entries, then all of day 2's.
pub fn expand<T: Clone>(from: NaiveDate, to: NaiveDate, entries: &[T]) -> Vec<(NaiveDate, T)> {
    days_in_range(from, to)
        .into_iter()
        .flat_map(|day| entries.iter().map(move |entry| (day, entry.clone())))
        .collect()
}
