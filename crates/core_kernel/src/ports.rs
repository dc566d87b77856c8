//! Ports to host capabilities
//!
//! The ledger core does not read wall-clock time itself. It is handed a
//! [`Clock`] by whoever hosts it: the system clock in production, a
//! [`ManualClock`] in tests and simulations.
//!
//! ```rust
//! use core_kernel::ports::{Clock, ManualClock};
//!
//! let clock = ManualClock::starting_at(1_000);
//! clock.advance(500);
//! assert_eq!(clock.now_ms().as_millis(), 1_500);
//! ```

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::temporal::Timestamp;

/// Source of the current time
///
/// Implementations must be monotonically non-decreasing.
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch
    fn now_ms(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        Timestamp::from_datetime(Utc::now())
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn starting_at(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Moves the clock forward, saturating at the maximum timestamp
    pub fn advance(&self, millis: u64) {
        // fetch_update only fails if the closure returns None
        let _ = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(millis))
            });
    }

    /// Sets the clock, ignoring attempts to move it backwards
    pub fn set(&self, millis: u64) {
        self.millis.fetch_max(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}
