//! HTTP-date handling
//!
//! Formats validator timestamps as IMF-fixdate and parses the three date
//! formats RFC 7231 requires recipients to accept.

use chrono::{DateTime, SubsecRound, Utc};
use std::time::SystemTime;

/// Drop sub-second precision, HTTP dates only carry whole seconds.
/// Truncates, never rounds up.
pub fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(0)
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: DateTime<Utc>) -> String {
    httpdate::fmt_http_date(SystemTime::from(time))
}

/// Parse an HTTP-date header value
///
/// Returns `None` for anything that is not a valid date; callers treat
/// such headers as absent.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    httpdate::parse_http_date(value.trim())
        .ok()
        .map(DateTime::<Utc>::from)
}
