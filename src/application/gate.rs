//! Admission coordination.
//!
//! The gate runs the request contract for one submission: validate, look up
//! the subject's quota, spend rate budget, then record the token. Each step
//! only runs if the previous one succeeded, so a rejected submission never
//! reaches the dedup store and a duplicate has already spent rate budget.

use crate::application::dedup::DedupStore;
use crate::application::metrics::Metrics;
use crate::application::ports::TokenStorage;
use crate::application::registry::QuotaRegistry;
use crate::domain::error::AdmissionError;
use crate::domain::grant::Submission;
use crate::domain::ids::{Subject, Token};
use std::sync::Arc;

/// A submission that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Submitting subject
    pub subject: Subject,
    /// Token now recorded in the dedup store
    pub token: Token,
}

/// Entry point used by request handlers.
///
/// Cloning is cheap; clones share the registry, dedup store and metrics.
#[derive(Debug)]
pub struct AdmissionGate<S>
where
    S: TokenStorage,
{
    registry: Arc<QuotaRegistry>,
    dedup: Arc<DedupStore<S>>,
    metrics: Metrics,
}

impl<S> Clone for AdmissionGate<S>
where
    S: TokenStorage,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            dedup: Arc::clone(&self.dedup),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S> AdmissionGate<S>
where
    S: TokenStorage,
{
    /// Create a gate over a bootstrapped registry and a dedup store.
    pub fn new(registry: Arc<QuotaRegistry>, dedup: Arc<DedupStore<S>>, metrics: Metrics) -> Self {
        Self {
            registry,
            dedup,
            metrics,
        }
    }

    /// Admit one submission.
    ///
    /// # Errors
    /// * `AdmissionError::InvalidSubmission` - subject or token is zero
    /// * `AdmissionError::NoQuotaProvisioned` - subject is not in the registry
    /// * `AdmissionError::Quota` - minute or month tier denied the request
    /// * `AdmissionError::Duplicate` - token was accepted before
    pub fn admit(&self, subject: Subject, token: Token) -> Result<Admission, AdmissionError> {
        let result = self.run_checks(subject, token);

        match &result {
            Ok(_) => {
                self.metrics.record_admitted();
                tracing::debug!(%subject, %token, "submission admitted");
            }
            Err(error) => {
                self.metrics.record_rejected(error);
                tracing::debug!(%subject, %token, code = error.code(), "submission rejected");
            }
        }

        result
    }

    /// Admit a decoded submission.
    ///
    /// Same as [`AdmissionGate::admit`].
    pub fn admit_submission(&self, submission: &Submission) -> Result<Admission, AdmissionError> {
        self.admit(submission.subject, submission.token)
    }

    fn run_checks(&self, subject: Subject, token: Token) -> Result<Admission, AdmissionError> {
        if subject.is_absent() || token.is_absent() {
            return Err(AdmissionError::InvalidSubmission);
        }

        let Some(policy) = self.registry.lookup(subject) else {
            tracing::warn!(%subject, "submission from subject without quota");
            return Err(AdmissionError::NoQuotaProvisioned { subject });
        };

        policy.check_rate()?;
        self.dedup.put(token)?;

        Ok(Admission { subject, token })
    }

    /// Get a reference to the registry.
    pub fn registry(&self) -> &Arc<QuotaRegistry> {
        &self.registry
    }

    /// Get a reference to the dedup store.
    pub fn dedup(&self) -> &Arc<DedupStore<S>> {
        &self.dedup
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{DuplicateError, QuotaError};
    use crate::domain::grant::QuotaGrant;
    use crate::domain::tier::QuotaTier;
    use crate::infrastructure::mocks::{MockCaptureLayer, MockClock};
    use crate::infrastructure::storage::ShardedTokenStorage;
    use std::time::{Duration, Instant};
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    fn gate() -> (AdmissionGate<ShardedTokenStorage>, Arc<MockClock>) {
        let clock = Arc::new(MockClock::new(Instant::now()));
        let grants = [
            QuotaGrant::new(Subject::new(1), 1000, 1),
            QuotaGrant::new(Subject::new(2), 2000, 20),
        ];
        let registry = Arc::new(QuotaRegistry::from_grants(grants, clock.clone()).unwrap());
        let dedup = Arc::new(DedupStore::new(ShardedTokenStorage::new(), clock.clone()));
        (AdmissionGate::new(registry, dedup, Metrics::new()), clock)
    }

    #[test]
    fn test_valid_submission_is_admitted() {
        let (gate, _clock) = gate();

        let admission = gate.admit(Subject::new(1), Token::new(1)).unwrap();
        assert_eq!(admission.subject, Subject::new(1));
        assert!(gate.dedup().contains(Token::new(1)));
        assert_eq!(gate.metrics().admitted(), 1);
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        let (gate, _clock) = gate();

        for (subject, token) in [(1, 0), (0, 1), (0, 0)] {
            assert_eq!(
                gate.admit(Subject::new(subject), Token::new(token)),
                Err(AdmissionError::InvalidSubmission)
            );
        }
        assert_eq!(gate.metrics().invalid(), 3);
        assert!(gate.dedup().is_empty());
    }

    #[test]
    fn test_unknown_subject() {
        let (gate, _clock) = gate();

        assert_eq!(
            gate.admit(Subject::new(3), Token::new(2)),
            Err(AdmissionError::NoQuotaProvisioned {
                subject: Subject::new(3)
            })
        );
        assert!(!gate.dedup().contains(Token::new(2)));
    }

    #[test]
    fn test_quota_denial_skips_dedup() {
        let (gate, _clock) = gate();

        gate.admit(Subject::new(1), Token::new(10)).unwrap();
        assert_eq!(
            gate.admit(Subject::new(1), Token::new(11)),
            Err(AdmissionError::Quota(QuotaError::MinuteLimitExceeded))
        );

        // The denied token was never recorded, so it is accepted later
        assert!(!gate.dedup().contains(Token::new(11)));
        assert_eq!(gate.metrics().minute_denied(), 1);
    }

    #[test]
    fn test_duplicate_after_quota_passes() {
        let (gate, clock) = gate();

        gate.admit(Subject::new(2), Token::new(5)).unwrap();
        assert_eq!(
            gate.admit(Subject::new(2), Token::new(5)),
            Err(AdmissionError::Duplicate(DuplicateError {
                token: Token::new(5)
            }))
        );

        // Duplicates spend rate budget like any other request
        let policy = gate.registry().lookup(Subject::new(2)).unwrap();
        assert_eq!(policy.minute_usage().used, 2);

        // Tokens are global, not per subject
        clock.advance(Duration::from_secs(60));
        assert!(matches!(
            gate.admit(Subject::new(1), Token::new(5)),
            Err(AdmissionError::Duplicate(_))
        ));
    }

    #[test]
    fn test_minute_window_reopens() {
        let (gate, clock) = gate();

        gate.admit(Subject::new(1), Token::new(1)).unwrap();
        assert!(gate.admit(Subject::new(1), Token::new(2)).is_err());

        clock.advance(QuotaTier::Minute.window());
        assert!(gate.admit(Subject::new(1), Token::new(2)).is_ok());
    }

    #[test]
    fn test_admit_submission() {
        let (gate, _clock) = gate();
        let submission: Submission =
            serde_json::from_str(r#"{"unique_id": 4, "user_id": 2}"#).unwrap();

        assert!(gate.admit_submission(&submission).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let (gate, _clock) = gate();
        let other = gate.clone();

        gate.admit(Subject::new(2), Token::new(8)).unwrap();
        assert!(other.admit(Subject::new(2), Token::new(8)).is_err());
        assert_eq!(other.metrics().snapshot().total(), 2);
    }

    #[test]
    fn test_rejections_are_logged_with_code() {
        let capture = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let (gate, _clock) = gate();

        tracing::subscriber::with_default(subscriber, || {
            let _ = gate.admit(Subject::new(99), Token::new(1));
        });

        assert_eq!(capture.count_at(Level::WARN), 1);
        let rejected = capture
            .get_captured()
            .into_iter()
            .find(|event| event.message == "submission rejected")
            .unwrap();
        assert_eq!(rejected.field("code"), Some("\"no_quota\""));
        assert_eq!(rejected.field("subject"), Some("99"));
    }
}
