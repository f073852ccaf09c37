//! Run timestamp helpers.
//!
//! Every archive key of a run starts with the run timestamp, formatted as
//! `%Y-%m-%dT%H:%M:%SZ` in UTC (second precision, no offset).

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format of the run timestamp.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Formats `now` as a run timestamp.
#[must_use]
pub fn run_timestamp(now: DateTime<Utc>) -> String {
    now.format(RUN_TIMESTAMP_FORMAT).to_string()
}

/// Parses a run timestamp back into a UTC instant.
#[must_use]
pub fn parse_run_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, RUN_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}
