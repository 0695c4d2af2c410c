//! Subject to quota policy lookup.
//!
//! The registry is filled once from the bootstrap grants and never changes
//! afterwards, so lookups need no locking and the registry can be shared
//! behind an `Arc` by every request thread.

use crate::application::policy::QuotaPolicy;
use crate::application::ports::Clock;
use crate::domain::error::ConfigError;
use crate::domain::grant::QuotaGrant;
use crate::domain::ids::Subject;
use ahash::AHashMap;
use std::sync::Arc;

/// Read-only map from subject to its quota policy.
#[derive(Debug)]
pub struct QuotaRegistry {
    policies: AHashMap<Subject, QuotaPolicy>,
}

impl QuotaRegistry {
    /// Build the registry from bootstrap grants.
    ///
    /// Every policy's windows start at the current clock reading.
    ///
    /// # Errors
    /// Returns the first invalid grant's `ConfigError`, or
    /// `ConfigError::DuplicateSubject` if a subject appears twice.
    pub fn from_grants<I>(grants: I, clock: Arc<dyn Clock>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = QuotaGrant>,
    {
        let mut policies = AHashMap::new();

        for grant in grants {
            grant.validate()?;
            if policies.contains_key(&grant.subject) {
                return Err(ConfigError::DuplicateSubject(grant.subject));
            }
            if grant.is_suspended() {
                tracing::info!(subject = %grant.subject, "subject provisioned with zero capacity");
            }
            let policy = QuotaPolicy::new(
                grant.subject,
                grant.monthly_capacity,
                grant.minute_capacity,
                Arc::clone(&clock),
            );
            policies.insert(grant.subject, policy);
        }

        tracing::info!(subjects = policies.len(), "quota registry bootstrapped");

        Ok(Self { policies })
    }

    /// Find the policy provisioned for a subject.
    ///
    /// `None` means the subject has no quota at all, which callers must report
    /// separately from an exceeded quota.
    pub fn lookup(&self, subject: Subject) -> Option<&QuotaPolicy> {
        self.policies.get(&subject)
    }

    /// Check whether a subject is provisioned.
    pub fn contains(&self, subject: Subject) -> bool {
        self.policies.contains_key(&subject)
    }

    /// Iterate over provisioned subjects in no particular order.
    pub fn subjects(&self) -> impl Iterator<Item = Subject> + '_ {
        self.policies.keys().copied()
    }

    /// Get the number of provisioned subjects.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if no subject is provisioned.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
