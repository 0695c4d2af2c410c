//! Caller-supplied identities.
//!
//! Both identities are opaque integers chosen by the caller. The core never
//! generates them and only ever compares them for exact equality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the entity whose request rate is being limited.
///
/// # Example
/// ```
/// use quota_gate::Subject;
///
/// let subject = Subject::new(7);
/// assert_eq!(subject.get(), 7);
/// assert!(!subject.is_absent());
/// assert!(Subject::new(0).is_absent());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Subject(i64);

impl Subject {
    /// Wrap a raw subject id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw subject id.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the zero value decoders produce for a missing field.
    pub const fn is_absent(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Subject {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of one submitted data item, used for deduplication.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Token(i64);

impl Token {
    /// Wrap a raw token.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw token value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the zero value decoders produce for a missing field.
    pub const fn is_absent(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Token {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
