//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::ids::Token;
use std::fmt::Debug;
use std::time::Instant;

/// Port for obtaining current time.
///
/// Readings must be monotonic within a process. Infrastructure provides
/// concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for the set of accepted tokens.
///
/// Each token is stored with the instant it was accepted so that an optional
/// retention sweep can age entries out. Infrastructure provides
/// `ShardedTokenStorage`; external adapters may back this with shared storage.
pub trait TokenStorage: Send + Sync + Debug {
    /// Insert `token` unless it is already present.
    ///
    /// Must be linearizable per token: among any number of concurrent callers
    /// with the same token, exactly one observes `true`.
    ///
    /// # Returns
    /// `true` if the token was inserted, `false` if it was already stored
    fn insert_if_absent(&self, token: Token, accepted_at: Instant) -> bool;

    /// Check whether a token is stored.
    fn contains(&self, token: Token) -> bool;

    /// Get the number of stored tokens.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove tokens for which the predicate returns false.
    fn retain<F>(&self, f: F)
    where
        F: FnMut(&Token, &Instant) -> bool;
}
