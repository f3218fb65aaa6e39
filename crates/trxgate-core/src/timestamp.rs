//! Request timestamp parsing and freshness (pipeline stages 2 and 3).
//!
//! Only the round-trip UTC form is accepted: an ISO-8601 date-time ending
//! in the `Z` designator, e.g. `2024-08-15T02:11:22.1234567Z`. A numeric
//! offset, even `+00:00`, does not count as UTC-tagged.

use chrono::{DateTime, Duration, Utc};

/// Parses a UTC-tagged ISO-8601 timestamp, `None` for anything else.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if !raw.ends_with(['Z', 'z']) {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Whether `ts` lies within `window` of `now`, in either direction.
pub fn is_fresh(ts: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    let skew = now - ts;
    skew <= window && skew >= -window
}
