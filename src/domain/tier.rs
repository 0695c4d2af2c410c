//! Quota tiers.

use std::fmt;
use std::time::Duration;

/// Window length of the minute tier.
pub const MINUTE_WINDOW: Duration = Duration::from_secs(60);

/// Window length of the month tier (30 days).
pub const MONTH_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// One granularity at which a rate limit is independently enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaTier {
    /// Per-minute budget, checked first
    Minute,
    /// Per-month budget, checked only after the minute tier admits
    Month,
}

impl QuotaTier {
    /// Window length for this tier.
    pub const fn window(self) -> Duration {
        match self {
            QuotaTier::Minute => MINUTE_WINDOW,
            QuotaTier::Month => MONTH_WINDOW,
        }
    }

    /// Short lowercase name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            QuotaTier::Minute => "minute",
            QuotaTier::Month => "month",
        }
    }
}

impl fmt::Display for QuotaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
