//! Quota grants and inbound submissions.

use crate::domain::error::ConfigError;
use crate::domain::ids::{Subject, Token};
use serde::{Deserialize, Serialize};

/// Two-tier allowance provisioned for one subject at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaGrant {
    /// Subject the allowance belongs to
    pub subject: Subject,
    /// Admits per 30-day window
    pub monthly_capacity: u64,
    /// Admits per 60-second window
    pub minute_capacity: u64,
}

impl QuotaGrant {
    /// Create a grant.
    pub fn new(subject: Subject, monthly_capacity: u64, minute_capacity: u64) -> Self {
        Self {
            subject,
            monthly_capacity,
            minute_capacity,
        }
    }

    /// Check that the grant names a real subject.
    ///
    /// A zero capacity is allowed: the subject stays provisioned but its
    /// tier denies every request.
    ///
    /// # Errors
    /// Returns `ConfigError::AbsentSubject` for subject zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subject.is_absent() {
            return Err(ConfigError::AbsentSubject);
        }
        Ok(())
    }

    /// Whether either tier can never admit anything.
    pub fn is_suspended(&self) -> bool {
        self.minute_capacity == 0 || self.monthly_capacity == 0
    }
}

/// One inbound item as decoded by the request layer.
///
/// Missing fields decode to zero and are rejected at admission.
///
/// ```
/// use quota_gate::{Submission, Subject, Token};
///
/// let submission: Submission = serde_json::from_str(r#"{"unique_id": 9, "user_id": 1}"#).unwrap();
/// assert_eq!(submission.subject, Subject::new(1));
/// assert_eq!(submission.token, Token::new(9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submission {
    /// Submitting user
    #[serde(rename = "user_id", default)]
    pub subject: Subject,
    /// Uniqueness token of the item
    #[serde(rename = "unique_id", default)]
    pub token: Token,
}

impl Submission {
    /// Create a submission.
    pub fn new(subject: Subject, token: Token) -> Self {
        Self { subject, token }
    }

    /// Whether both fields carry a real value.
    pub fn is_complete(&self) -> bool {
        !self.subject.is_absent() && !self.token.is_absent()
    }
}
