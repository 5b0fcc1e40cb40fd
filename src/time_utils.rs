// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timestamp formatting for API responses.

use chrono::{DateTime, SecondsFormat, Utc};

/// Render a stored timestamp for the frontend: RFC3339, whole seconds, `Z` suffix.
///
/// Sub-second precision is dropped so equal-second records render identically.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
