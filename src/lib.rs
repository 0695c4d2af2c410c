//! # quota-gate
//!
//! Admission control for metered submissions: per-subject two-tier quotas
//! (per minute and per month) in front of a first-seen-wins dedup store.
//!
//! Every submission carries a subject (the user it is billed to) and a token
//! (its unique identifier). The gate accepts it only if:
//! 1. both identifiers are present (non-zero),
//! 2. the subject has a provisioned quota,
//! 3. both the subject's minute window and month window have capacity left,
//! 4. the token has never been accepted before.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quota_gate::{AdmissionGate, QuotaGrant, Subject, Token};
//!
//! let gate = AdmissionGate::builder()
//!     .with_grant(QuotaGrant::new(Subject::new(1), 1000, 1))  // 1000/month, 1/minute
//!     .with_grant(QuotaGrant::new(Subject::new(2), 2000, 20))
//!     .build()
//!     .unwrap();
//!
//! match gate.admit(Subject::new(1), Token::new(42)) {
//!     Ok(admission) => println!("accepted token {}", admission.token),
//!     Err(e) if e.is_retryable() => println!("throttled: {e}"),
//!     Err(e) => println!("rejected: {e}"),
//! }
//! ```
//!
//! ## Check Order
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! | Step | Failure | Code |
//! |------|---------|------|
//! | Validate identifiers | [`AdmissionError::InvalidSubmission`] | `invalid_submission` |
//! | Look up quota | [`AdmissionError::NoQuotaProvisioned`] | `no_quota` |
//! | Minute window | [`QuotaError::MinuteLimitExceeded`] | `minute_limit_exceeded` |
//! | Month window | [`QuotaError::MonthlyLimitExceeded`] | `monthly_limit_exceeded` |
//! | Dedup | [`DuplicateError`] | `duplicate` |
//!
//! Consequences worth knowing:
//! - A submission denied by a quota never reaches the dedup store, so its
//!   token can still be accepted later.
//! - A duplicate has already spent one unit of both rate windows.
//! - A month denial has already spent one unit of the minute window.
//! - Tokens are global: the same token from two subjects is a duplicate.
//!
//! ## Windows
//!
//! Both tiers use fixed windows: a window opens on the first event after the
//! previous one expired and admits up to `capacity` events until it ends.
//! The month is a fixed 30-day span, not a calendar month. A burst of up to
//! twice the capacity is possible across a window boundary.
//!
//! ## Configuration
//!
//! Quotas are fixed at startup. Load them from JSON:
//!
//! ```rust,no_run
//! use quota_gate::{AdmissionGate, GateConfig};
//!
//! // Reads the file named by QUOTA_GATE_CONFIG, or uses the demo grants
//! let config = GateConfig::from_env().unwrap();
//! let gate = AdmissionGate::from_config(config).unwrap();
//! ```
//!
//! `from_config` returns only the gate. A `retention` block in the config
//! takes effect through `GateBuilder::from_config(config)?.build_with_sweeper()`;
//! otherwise a warning is logged and tokens never expire.
//!
//! ## Retention
//!
//! By default the dedup store remembers every token forever. Retention is
//! opt-in and trades exactness for bounded memory: a token older than
//! `max_age` is forgotten and would be accepted again.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() {
//! use quota_gate::{AdmissionGate, RetentionConfig};
//! use std::time::Duration;
//!
//! let retention = RetentionConfig::new(Duration::from_secs(60), Duration::from_secs(86_400))
//!     .unwrap()
//!     .with_warn_above(1_000_000);
//!
//! let (gate, sweeper) = AdmissionGate::builder()
//!     .with_retention(retention)
//!     .build_with_sweeper()
//!     .unwrap();
//!
//! let handle = sweeper.unwrap().start();
//! // ... serve requests with `gate` ...
//! let removed = handle.shutdown().await.unwrap();
//! # let _ = (gate, removed);
//! # }
//! ```
//!
//! ## Observability
//!
//! Decisions are logged through `tracing` (debug for each decision, warn for
//! unprovisioned subjects and dedup growth). Counters are available too:
//!
//! ```rust,no_run
//! # use quota_gate::AdmissionGate;
//! # let gate = AdmissionGate::builder().build().unwrap();
//! let snapshot = gate.metrics().snapshot();
//! println!("admitted: {}", snapshot.admitted);
//! println!("rejection rate: {:.2}%", snapshot.rejection_rate() * 100.0);
//! ```

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    error::{AdmissionError, ConfigError, DuplicateError, QuotaError},
    grant::{QuotaGrant, Submission},
    ids::{Subject, Token},
    tier::{QuotaTier, MINUTE_WINDOW, MONTH_WINDOW},
    window::{FixedWindow, WindowDecision, WindowUsage},
};

pub use application::{
    dedup::DedupStore,
    gate::{Admission, AdmissionGate},
    limiter::FixedWindowLimiter,
    metrics::{Metrics, MetricsSnapshot},
    policy::QuotaPolicy,
    ports::{Clock, TokenStorage},
    registry::QuotaRegistry,
    retention::{RetentionConfig, RetentionSweeper},
};

#[cfg(feature = "async")]
pub use application::retention::{ShutdownError, SweeperHandle};

pub use infrastructure::{
    builder::{GateBuilder, InMemoryGate},
    clock::SystemClock,
    config::{GateConfig, RetentionSettings, CONFIG_PATH_ENV},
    storage::ShardedTokenStorage,
};
