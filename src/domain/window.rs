//! Fixed-window counting.
//!
//! A fixed window resets its counter to zero once `window_length` has elapsed
//! since the last reset. Unlike a sliding window, a burst straddling a window
//! boundary can admit close to `2 * capacity` events within one
//! `window_length`. Each window keeps O(1) state.

use std::time::{Duration, Instant};

/// Decision made for one event against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// The event fits in the current window and was counted
    Admit,
    /// The window is full; nothing was counted
    Deny,
}

impl WindowDecision {
    /// Check if this decision is Admit.
    pub fn is_admit(&self) -> bool {
        matches!(self, WindowDecision::Admit)
    }

    /// Check if this decision is Deny.
    pub fn is_deny(&self) -> bool {
        matches!(self, WindowDecision::Deny)
    }
}

/// Point-in-time view of a window's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUsage {
    /// Maximum admits per window
    pub capacity: u64,
    /// Admits counted in the current window
    pub used: u64,
    /// Length of one window
    pub window_length: Duration,
    /// Time left until the window resets
    pub resets_in: Duration,
}

impl WindowUsage {
    /// Admits still available in the current window.
    pub fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.used)
    }

    /// Whether the next event would be denied without a reset.
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.capacity
    }
}

/// Reset-on-elapsed counter for one window.
///
/// This type is pure state: it is not synchronized and takes the current time
/// as an argument. See [`crate::FixedWindowLimiter`] for the shared, clocked
/// version.
///
/// # Example
/// ```
/// use quota_gate::FixedWindow;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut window = FixedWindow::new(2, Duration::from_secs(60), start);
///
/// assert!(window.register_event(start).is_admit());
/// assert!(window.register_event(start).is_admit());
/// assert!(window.register_event(start).is_deny());
///
/// // A full window later the counter starts over
/// let later = start + Duration::from_secs(60);
/// assert!(window.register_event(later).is_admit());
/// assert_eq!(window.count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FixedWindow {
    capacity: u64,
    window_length: Duration,
    count: u64,
    window_start: Instant,
}

impl FixedWindow {
    /// Create an empty window that starts at `now`.
    pub fn new(capacity: u64, window_length: Duration, now: Instant) -> Self {
        Self {
            capacity,
            window_length,
            count: 0,
            window_start: now,
        }
    }

    /// Count one event at `now` if the window has room.
    ///
    /// A `now` earlier than the window start counts as zero elapsed time, so
    /// the window start never moves backward.
    pub fn register_event(&mut self, now: Instant) -> WindowDecision {
        if self.elapsed(now) >= self.window_length {
            self.count = 0;
            self.window_start = now;
        }

        if self.count >= self.capacity {
            return WindowDecision::Deny;
        }

        self.count += 1;
        WindowDecision::Admit
    }

    /// Budget as seen at `now`, without counting anything.
    ///
    /// A window that is due for reset reports zero usage.
    pub fn usage(&self, now: Instant) -> WindowUsage {
        let elapsed = self.elapsed(now);
        let (used, resets_in) = if elapsed >= self.window_length {
            (0, Duration::ZERO)
        } else {
            (self.count, self.window_length - elapsed)
        };

        WindowUsage {
            capacity: self.capacity,
            used,
            window_length: self.window_length,
            resets_in,
        }
    }

    /// Maximum admits per window.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Length of one window.
    pub fn window_length(&self) -> Duration {
        self.window_length
    }

    /// Admits counted since the last reset.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// When the current window began.
    pub fn window_start(&self) -> Instant {
        self.window_start
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.window_start)
    }
}
