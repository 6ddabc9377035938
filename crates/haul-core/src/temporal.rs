//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, rendered as ISO8601 with Z suffix.
//!
//! ## Security Invariant
//!
//! Every timestamp in the core is UTC. Local timezone offsets would make
//! the same instant render differently across records, breaking the
//! chronological audit trail the tracker exposes. Non-UTC inputs are
//! **rejected at parse time** — there is no silent conversion.
//!
//! Batch location uploads carry caller-supplied timestamps as Unix epoch
//! seconds; [`Timestamp::from_epoch_secs()`] is the ingestion path for those.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::from_epoch_secs()`] — from Unix epoch seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the value is outside the representable range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, MarketError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| MarketError::invalid_input(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps with the `Z` suffix are
    /// accepted — even `+00:00`, which is semantically equivalent, is
    /// rejected so that rendered forms are deterministic.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the string is not valid RFC 3339 or uses a
    /// non-Z timezone offset.
    pub fn parse(s: &str) -> Result<Self, MarketError> {
        if !s.ends_with('Z') {
            return Err(MarketError::invalid_input(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            MarketError::invalid_input(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
