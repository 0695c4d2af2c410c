//! Production time source for quota windows and dedup retention.
//!
//! Windows are measured on `Instant`, never on wall-clock time, so an NTP
//! step or a manual clock change can neither reopen a spent month nor freeze
//! a minute. Whether time spent suspended counts toward the 30-day window is
//! platform-specific, as documented for `Instant`, so a month can stretch on
//! hosts that sleep. A restart resets every window because quota state lives
//! only in memory.
//!
//! # Testing
//!
//! See `MockClock` (in `crate::infrastructure::mocks`) for a controllable test clock.
//! Available with the `test-helpers` feature or in test builds.

use crate::application::ports::Clock;
use std::time::Instant;

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
