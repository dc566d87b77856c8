//! Ledger time
//!
//! The ledger measures time in milliseconds since the Unix epoch, as
//! reported by the host [`Clock`](crate::ports::Clock). [`Timestamp`] keeps
//! that raw representation and offers conversion to `chrono` for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch
    pub const EPOCH: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Converts a UTC datetime, clamping instants before the epoch to zero
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(u64::try_from(datetime.timestamp_millis()).unwrap_or(0))
    }

    /// Returns the equivalent UTC datetime, if representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Adds an offset in milliseconds
    pub fn checked_add_millis(&self, millis: u64) -> Result<Timestamp, CoreError> {
        self.0
            .checked_add(millis)
            .map(Timestamp)
            .ok_or_else(|| CoreError::overflow(format!("timestamp {} + {}ms", self.0, millis)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_conversion() {
        let datetime = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ts = Timestamp::from_datetime(datetime);
        assert_eq!(ts.as_millis(), 1_704_067_200_000);
        assert_eq!(ts.to_datetime(), Some(datetime));
    }

    #[test]
    fn test_add_overflow() {
        let ts = Timestamp::from_millis(u64::MAX);
        assert!(ts.checked_add_millis(1).is_err());
    }
}
