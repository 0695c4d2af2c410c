//! In-memory token storage.
//!
//! Provides concurrent, sharded storage for accepted tokens.

use crate::application::ports::TokenStorage;
use crate::domain::ids::Token;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Instant;

/// Thread-safe sharded token set backed by DashMap.
///
/// Check-and-insert for one token happens under that token's shard lock, so
/// racing inserts of the same token are linearized while different tokens in
/// different shards proceed in parallel.
#[derive(Debug, Default)]
pub struct ShardedTokenStorage {
    map: DashMap<Token, Instant, RandomState>,
}

impl ShardedTokenStorage {
    /// Create an empty storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Create an empty storage instance sized for `capacity` tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// When a token was accepted, if it is stored.
    pub fn accepted_at(&self, token: Token) -> Option<Instant> {
        self.map.get(&token).map(|entry| *entry.value())
    }
}

impl TokenStorage for ShardedTokenStorage {
    fn insert_if_absent(&self, token: Token, accepted_at: Instant) -> bool {
        match self.map.entry(token) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(accepted_at);
                true
            }
        }
    }

    fn contains(&self, token: Token) -> bool {
        self.map.contains_key(&token)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn retain<F>(&self, mut f: F)
    where
        F: FnMut(&Token, &Instant) -> bool,
    {
        self.map.retain(|token, accepted_at| f(token, &*accepted_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let storage = ShardedTokenStorage::new();
        let now = Instant::now();

        assert!(storage.is_empty());
        assert!(storage.insert_if_absent(Token::new(1), now));
        assert!(storage.insert_if_absent(Token::new(2), now));
        assert!(!storage.insert_if_absent(Token::new(1), now));

        assert_eq!(storage.len(), 2);
        assert!(storage.contains(Token::new(2)));
        assert!(!storage.contains(Token::new(3)));
        assert_eq!(storage.accepted_at(Token::new(1)), Some(now));
    }

    #[test]
    fn test_rejected_insert_keeps_first_timestamp() {
        let storage = ShardedTokenStorage::with_capacity(4);
        let first = Instant::now();
        let second = first + std::time::Duration::from_secs(5);

        storage.insert_if_absent(Token::new(1), first);
        storage.insert_if_absent(Token::new(1), second);

        assert_eq!(storage.accepted_at(Token::new(1)), Some(first));
    }

    #[test]
    fn test_retain() {
        let storage = ShardedTokenStorage::new();
        let now = Instant::now();
        for raw in 1..=10 {
            storage.insert_if_absent(Token::new(raw), now);
        }

        storage.retain(|token, _| token.get() % 2 == 0);
        assert_eq!(storage.len(), 5);
        assert!(!storage.contains(Token::new(3)));
    }

    #[test]
    fn test_concurrent_access() {
        let storage = Arc::new(ShardedTokenStorage::new());
        let mut handles = vec![];

        for i in 0..10i64 {
            let storage_clone = Arc::clone(&storage);
            handles.push(thread::spawn(move || {
                for j in 0..100i64 {
                    storage_clone.insert_if_absent(Token::new(i * 100 + j), Instant::now());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.len(), 1000);
    }
}
