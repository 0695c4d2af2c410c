//! Domain layer - pure business logic with no I/O and no shared state.
//!
//! This layer contains the core concepts of admission control:
//! - Subject and token identities
//! - Fixed-window counting
//! - Quota tiers and their window lengths
//! - The error taxonomy surfaced to the request boundary
//!
//! All types in this layer take time as an argument and are easily testable.

pub mod error;
pub mod grant;
pub mod ids;
pub mod tier;
pub mod window;
