//! First-seen-wins deduplication of submitted tokens.
//!
//! The store is an explicitly constructed component: create one per gate and
//! pass it where it is needed. Tests get isolated instances for free.
//!
//! Tokens are kept forever unless the owner calls
//! [`DedupStore::purge_older_than`] (directly or through the retention
//! sweeper). Without a sweep the set grows with every accepted token.

use crate::application::ports::{Clock, TokenStorage};
use crate::domain::error::DuplicateError;
use crate::domain::ids::Token;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Concurrency-safe set of accepted tokens.
#[derive(Debug)]
pub struct DedupStore<S>
where
    S: TokenStorage,
{
    storage: S,
    clock: Arc<dyn Clock>,
    warn_above: Option<usize>,
    warned: AtomicBool,
}

impl<S> DedupStore<S>
where
    S: TokenStorage,
{
    /// Create a store over the given storage adapter.
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            warn_above: None,
            warned: AtomicBool::new(false),
        }
    }

    /// Log a warning once the store grows past `threshold` tokens.
    ///
    /// The warning fires once per crossing and re-arms after a purge brings
    /// the store back under the threshold.
    pub fn with_warn_threshold(mut self, threshold: usize) -> Self {
        self.warn_above = Some(threshold);
        self
    }

    /// Accept a token if it has never been accepted before.
    ///
    /// Exactly one of any number of concurrent callers with the same token
    /// succeeds. A rejected call leaves the store unchanged.
    ///
    /// # Errors
    /// Returns `DuplicateError` if the token is already stored.
    pub fn put(&self, token: Token) -> Result<(), DuplicateError> {
        if !self.storage.insert_if_absent(token, self.clock.now()) {
            tracing::debug!(%token, "duplicate token rejected");
            return Err(DuplicateError { token });
        }

        self.check_growth();
        Ok(())
    }

    /// Check whether a token has been accepted.
    pub fn contains(&self, token: Token) -> bool {
        self.storage.contains(token)
    }

    /// Get the number of accepted tokens.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no token has been accepted.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Forget tokens accepted more than `max_age` ago.
    ///
    /// A forgotten token is accepted again on its next `put`.
    ///
    /// # Returns
    /// The number of tokens removed
    pub fn purge_older_than(&self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.storage.retain(|_token, accepted_at| {
            let keep = now.saturating_duration_since(*accepted_at) <= max_age;
            if !keep {
                removed += 1;
            }
            keep
        });

        if let Some(threshold) = self.warn_above {
            if self.storage.len() <= threshold {
                self.warned.store(false, Ordering::Relaxed);
            }
        }

        removed
    }

    /// Get a reference to the storage adapter.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn check_growth(&self) {
        let Some(threshold) = self.warn_above else {
            return;
        };

        let len = self.storage.len();
        if len > threshold && !self.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                tokens = len,
                threshold,
                "dedup store grew past its warning threshold"
            );
        }
    }
}
