//! Application layer - orchestration of domain logic.
//!
//! This layer shares domain state safely between request threads:
//! - Fixed-window limiter (one lock per window)
//! - Two-tier quota policy and the subject registry
//! - Dedup store and its optional retention sweep
//! - Admission gate and metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod dedup;
pub mod gate;
pub mod limiter;
pub mod metrics;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod retention;
