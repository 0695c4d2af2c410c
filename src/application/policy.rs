//! Two-tier quota policy.
//!
//! A subject's quota is a minute-scoped and a month-scoped fixed window that
//! are evaluated in that order. The order is part of the budget accounting:
//! a request denied by the minute tier must not spend monthly budget.

use crate::application::limiter::FixedWindowLimiter;
use crate::application::ports::Clock;
use crate::domain::error::QuotaError;
use crate::domain::ids::Subject;
use crate::domain::tier::QuotaTier;
use crate::domain::window::WindowUsage;
use std::sync::Arc;

/// Minute and month limits of one subject.
#[derive(Debug)]
pub struct QuotaPolicy {
    subject: Subject,
    minute: FixedWindowLimiter,
    month: FixedWindowLimiter,
}

impl QuotaPolicy {
    /// Create a policy whose windows both start now.
    ///
    /// # Arguments
    /// * `subject` - Owner of both limiters
    /// * `monthly_capacity` - Admits per 30-day window
    /// * `minute_capacity` - Admits per 60-second window
    /// * `clock` - Time source for both limiters
    pub fn new(
        subject: Subject,
        monthly_capacity: u64,
        minute_capacity: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            subject,
            minute: FixedWindowLimiter::new(
                minute_capacity,
                QuotaTier::Minute.window(),
                Arc::clone(&clock),
            ),
            month: FixedWindowLimiter::new(monthly_capacity, QuotaTier::Month.window(), clock),
        }
    }

    /// Spend one unit of each tier, minute tier first.
    ///
    /// # Errors
    /// * `QuotaError::MinuteLimitExceeded` - the month tier was not consulted
    /// * `QuotaError::MonthlyLimitExceeded` - the minute tier already counted
    ///   this request
    pub fn check_rate(&self) -> Result<(), QuotaError> {
        if !self.minute.allow() {
            tracing::debug!(subject = %self.subject, tier = %QuotaTier::Minute, "quota denied");
            return Err(QuotaError::MinuteLimitExceeded);
        }

        if !self.month.allow() {
            tracing::debug!(subject = %self.subject, tier = %QuotaTier::Month, "quota denied");
            return Err(QuotaError::MonthlyLimitExceeded);
        }

        Ok(())
    }

    /// Owner of this policy.
    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Minute-tier budget.
    pub fn minute_usage(&self) -> WindowUsage {
        self.minute.usage()
    }

    /// Month-tier budget.
    pub fn monthly_usage(&self) -> WindowUsage {
        self.month.usage()
    }

    /// The limiter backing a tier.
    pub fn limiter(&self, tier: QuotaTier) -> &FixedWindowLimiter {
        match tier {
            QuotaTier::Minute => &self.minute,
            QuotaTier::Month => &self.month,
        }
    }
}
