//! Request freshness.

use chrono::{DateTime, Utc};

use crate::errors::AuthError;

/// Parse an RFC 3339 timestamp as a UTC instant.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AuthError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AuthError::Timestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Whether `timestamp` is within `tolerance_secs` of `now`, in either direction.
///
/// The boundary is inclusive. A malformed timestamp is never valid.
pub fn is_timestamp_valid_at(timestamp: &str, now: DateTime<Utc>, tolerance_secs: u64) -> bool {
    let Ok(at) = parse_timestamp(timestamp) else {
        return false;
    };
    let skew = (now - at).num_milliseconds().unsigned_abs();
    skew <= tolerance_secs.saturating_mul(1_000)
}

/// [`is_timestamp_valid_at`] against the current time.
pub fn is_timestamp_valid(timestamp: &str, tolerance_secs: u64) -> bool {
    is_timestamp_valid_at(timestamp, Utc::now(), tolerance_secs)
}
