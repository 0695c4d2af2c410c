//! Error taxonomy.
//!
//! Every error here is an expected outcome that the request boundary turns
//! into a structured response. None of them is fatal to the process.

use crate::domain::ids::{Subject, Token};
use crate::domain::tier::QuotaTier;
use thiserror::Error;

/// A quota tier denied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuotaError {
    /// The per-minute budget is spent
    #[error("minute limit exceeded")]
    MinuteLimitExceeded,
    /// The per-month budget is spent
    #[error("monthly limit exceeded")]
    MonthlyLimitExceeded,
}

impl QuotaError {
    /// The tier that denied the request.
    pub fn tier(&self) -> QuotaTier {
        match self {
            QuotaError::MinuteLimitExceeded => QuotaTier::Minute,
            QuotaError::MonthlyLimitExceeded => QuotaTier::Month,
        }
    }
}

/// The token was already accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicated data: token {token} was already accepted")]
pub struct DuplicateError {
    /// The rejected token
    pub token: Token,
}

/// Why a submission was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Subject or token is missing (zero)
    #[error("unique_id and user_id must be present and valid")]
    InvalidSubmission,
    /// The subject has no provisioned quota
    #[error("subject {subject} does not have any quota")]
    NoQuotaProvisioned {
        /// The unknown subject
        subject: Subject,
    },
    /// A quota tier denied the request
    #[error(transparent)]
    Quota(#[from] QuotaError),
    /// The token was already accepted
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),
}

impl AdmissionError {
    /// Whether the same submission may succeed later without outside action.
    ///
    /// Only quota denials are transient; they clear when the tier's window
    /// resets.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdmissionError::Quota(_))
    }

    /// Stable machine-readable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AdmissionError::InvalidSubmission => "invalid_submission",
            AdmissionError::NoQuotaProvisioned { .. } => "no_quota",
            AdmissionError::Quota(QuotaError::MinuteLimitExceeded) => "minute_limit_exceeded",
            AdmissionError::Quota(QuotaError::MonthlyLimitExceeded) => "monthly_limit_exceeded",
            AdmissionError::Duplicate(_) => "duplicate",
        }
    }
}

/// Invalid bootstrap configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The same subject was granted more than once
    #[error("subject {0} is granted more than once")]
    DuplicateSubject(Subject),
    /// Subject zero is reserved for "absent"
    #[error("subject 0 cannot be granted a quota")]
    AbsentSubject,
    /// Retention sweep interval must be greater than zero
    #[error("retention interval must be greater than 0")]
    ZeroRetentionInterval,
    /// Retention max age must be greater than zero
    #[error("retention max age must be greater than 0")]
    ZeroRetentionAge,
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The config document is malformed
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_messages() {
        assert_eq!(
            QuotaError::MinuteLimitExceeded.to_string(),
            "minute limit exceeded"
        );
        assert_eq!(
            QuotaError::MonthlyLimitExceeded.to_string(),
            "monthly limit exceeded"
        );
        assert_eq!(QuotaError::MonthlyLimitExceeded.tier(), QuotaTier::Month);
    }

    #[test]
    fn test_admission_error_codes() {
        let cases = [
            (AdmissionError::InvalidSubmission, "invalid_submission", false),
            (
                AdmissionError::NoQuotaProvisioned {
                    subject: Subject::new(3),
                },
                "no_quota",
                false,
            ),
            (
                AdmissionError::from(QuotaError::MinuteLimitExceeded),
                "minute_limit_exceeded",
                true,
            ),
            (
                AdmissionError::from(QuotaError::MonthlyLimitExceeded),
                "monthly_limit_exceeded",
                true,
            ),
            (
                AdmissionError::from(DuplicateError {
                    token: Token::new(1),
                }),
                "duplicate",
                false,
            ),
        ];

        for (error, code, retryable) in cases {
            assert_eq!(error.code(), code);
            assert_eq!(error.is_retryable(), retryable, "{}", code);
        }
    }

    #[test]
    fn test_transparent_display() {
        let error = AdmissionError::from(QuotaError::MinuteLimitExceeded);
        assert_eq!(error.to_string(), "minute limit exceeded");

        let error = AdmissionError::NoQuotaProvisioned {
            subject: Subject::new(3),
        };
        assert_eq!(error.to_string(), "subject 3 does not have any quota");
    }
}
