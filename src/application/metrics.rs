//! Observability metrics for admission control.
//!
//! Counts every outcome of [`crate::AdmissionGate::admit`].

use crate::domain::error::{AdmissionError, QuotaError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission outcomes.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    admitted: AtomicU64,
    invalid: AtomicU64,
    unprovisioned: AtomicU64,
    minute_denied: AtomicU64,
    monthly_denied: AtomicU64,
    duplicates: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_admitted(&self) {
        self.inner.admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self, error: &AdmissionError) {
        let counter = match error {
            AdmissionError::InvalidSubmission => &self.inner.invalid,
            AdmissionError::NoQuotaProvisioned { .. } => &self.inner.unprovisioned,
            AdmissionError::Quota(QuotaError::MinuteLimitExceeded) => &self.inner.minute_denied,
            AdmissionError::Quota(QuotaError::MonthlyLimitExceeded) => &self.inner.monthly_denied,
            AdmissionError::Duplicate(_) => &self.inner.duplicates,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of admitted submissions.
    pub fn admitted(&self) -> u64 {
        self.inner.admitted.load(Ordering::Relaxed)
    }

    /// Get the number of submissions with a missing subject or token.
    pub fn invalid(&self) -> u64 {
        self.inner.invalid.load(Ordering::Relaxed)
    }

    /// Get the number of submissions from subjects without a quota.
    pub fn unprovisioned(&self) -> u64 {
        self.inner.unprovisioned.load(Ordering::Relaxed)
    }

    /// Get the number of minute-tier denials.
    pub fn minute_denied(&self) -> u64 {
        self.inner.minute_denied.load(Ordering::Relaxed)
    }

    /// Get the number of month-tier denials.
    pub fn monthly_denied(&self) -> u64 {
        self.inner.monthly_denied.load(Ordering::Relaxed)
    }

    /// Get the number of duplicate tokens rejected.
    pub fn duplicates(&self) -> u64 {
        self.inner.duplicates.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            admitted: self.admitted(),
            invalid: self.invalid(),
            unprovisioned: self.unprovisioned(),
            minute_denied: self.minute_denied(),
            monthly_denied: self.monthly_denied(),
            duplicates: self.duplicates(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        for counter in [
            &self.inner.admitted,
            &self.inner.invalid,
            &self.inner.unprovisioned,
            &self.inner.minute_denied,
            &self.inner.monthly_denied,
            &self.inner.duplicates,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Admitted submissions
    pub admitted: u64,
    /// Submissions with a missing subject or token
    pub invalid: u64,
    /// Submissions from subjects without a quota
    pub unprovisioned: u64,
    /// Minute-tier denials
    pub minute_denied: u64,
    /// Month-tier denials
    pub monthly_denied: u64,
    /// Duplicate tokens
    pub duplicates: u64,
}

impl MetricsSnapshot {
    /// Get the total number of rejected submissions.
    pub fn rejected(&self) -> u64 {
        self.invalid
            .saturating_add(self.unprovisioned)
            .saturating_add(self.minute_denied)
            .saturating_add(self.monthly_denied)
            .saturating_add(self.duplicates)
    }

    /// Get the total number of submissions processed.
    pub fn total(&self) -> u64 {
        self.admitted.saturating_add(self.rejected())
    }

    /// Calculate the rejection rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been processed.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.rejected() as f64 / total as f64
        }
    }
}
