// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with millisecond precision and a
/// `Z` suffix. Stored timestamps share this format so string ordering
/// on `createdAt` is chronological.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in the stored timestamp format.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}
