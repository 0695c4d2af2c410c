//! Shared fixed-window limiter.
//!
//! Wraps a [`FixedWindow`] in a mutex and reads time from the clock port, so
//! that many request threads can call [`FixedWindowLimiter::allow`] on the
//! same limiter.

use crate::application::ports::Clock;
use crate::domain::window::{FixedWindow, WindowUsage};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Admit/deny decisions for one (subject, window) pair.
///
/// The reset-check-increment sequence runs under one lock per limiter, so two
/// concurrent calls can never both see room for the last admit.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Mutex<FixedWindow>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    /// Create a limiter whose first window starts now.
    ///
    /// # Arguments
    /// * `capacity` - Maximum admits per window
    /// * `window_length` - Length of one window
    /// * `clock` - Time source shared with the rest of the gate
    pub fn new(capacity: u64, window_length: Duration, clock: Arc<dyn Clock>) -> Self {
        let window = FixedWindow::new(capacity, window_length, clock.now());
        Self {
            window: Mutex::new(window),
            clock,
        }
    }

    /// Count one request if the current window has room.
    ///
    /// Never fails. Returns `false` without counting when the window is full.
    pub fn allow(&self) -> bool {
        let mut window = self.window.lock();
        // Read the clock under the lock so window starts are observed in order.
        let now = self.clock.now();
        window.register_event(now).is_admit()
    }

    /// Current budget, without counting anything.
    pub fn usage(&self) -> WindowUsage {
        let window = self.window.lock();
        window.usage(self.clock.now())
    }

    /// Admits counted since the last reset.
    pub fn count(&self) -> u64 {
        self.window.lock().count()
    }

    /// Maximum admits per window.
    pub fn capacity(&self) -> u64 {
        self.window.lock().capacity()
    }

    /// Length of one window.
    pub fn window_length(&self) -> Duration {
        self.window.lock().window_length()
    }
}
