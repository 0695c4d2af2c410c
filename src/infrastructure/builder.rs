//! Gate assembly.
//!
//! Wires the registry, dedup store, clock and metrics into an
//! [`AdmissionGate`] backed by in-memory sharded token storage.

use crate::application::dedup::DedupStore;
use crate::application::gate::AdmissionGate;
use crate::application::metrics::Metrics;
use crate::application::ports::Clock;
use crate::application::registry::QuotaRegistry;
use crate::application::retention::{RetentionConfig, RetentionSweeper};
use crate::domain::error::ConfigError;
use crate::domain::grant::QuotaGrant;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::GateConfig;
use crate::infrastructure::storage::ShardedTokenStorage;
use std::sync::Arc;

/// Gate over the built-in in-memory token storage.
pub type InMemoryGate = AdmissionGate<ShardedTokenStorage>;

/// Builder for constructing an [`InMemoryGate`].
#[derive(Debug, Default)]
pub struct GateBuilder {
    grants: Vec<QuotaGrant>,
    clock: Option<Arc<dyn Clock>>,
    retention: Option<RetentionConfig>,
    token_capacity: Option<usize>,
    metrics: Option<Metrics>,
}

impl GateBuilder {
    /// Create a builder with no grants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a loaded configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the retention settings are invalid.
    pub fn from_config(config: GateConfig) -> Result<Self, ConfigError> {
        let retention = config.retention_config()?;
        Ok(Self {
            grants: config.quotas,
            retention,
            ..Self::default()
        })
    }

    /// Provision one subject.
    pub fn with_grant(mut self, grant: QuotaGrant) -> Self {
        self.grants.push(grant);
        self
    }

    /// Provision several subjects.
    pub fn with_grants(mut self, grants: impl IntoIterator<Item = QuotaGrant>) -> Self {
        self.grants.extend(grants);
        self
    }

    /// Use a custom clock (for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Enable dedup retention.
    pub fn with_retention(mut self, retention: RetentionConfig) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Pre-size the dedup store.
    pub fn with_token_capacity(mut self, capacity: usize) -> Self {
        self.token_capacity = Some(capacity);
        self
    }

    /// Share an existing metrics tracker.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the gate.
    ///
    /// No sweep runs on a gate built this way. Retention settings only
    /// configure the size warning, and a warning is logged that tokens will
    /// not expire. Use [`GateBuilder::build_with_sweeper`] to get the sweeper.
    ///
    /// # Errors
    /// Returns `ConfigError` if a grant is invalid or a subject repeats.
    pub fn build(self) -> Result<InMemoryGate, ConfigError> {
        let (gate, sweeper) = self.build_with_sweeper()?;
        if let Some(sweeper) = sweeper {
            tracing::warn!(
                max_age = ?sweeper.config().max_age,
                "retention is configured but no sweeper was requested; tokens will not expire"
            );
        }
        Ok(gate)
    }

    /// Build the gate and, if retention is configured, its sweeper.
    ///
    /// # Errors
    /// As [`GateBuilder::build`].
    pub fn build_with_sweeper(
        self,
    ) -> Result<(InMemoryGate, Option<RetentionSweeper<ShardedTokenStorage>>), ConfigError> {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));

        let registry = Arc::new(QuotaRegistry::from_grants(self.grants, Arc::clone(&clock))?);

        let storage = match self.token_capacity {
            Some(capacity) => ShardedTokenStorage::with_capacity(capacity),
            None => ShardedTokenStorage::new(),
        };
        let mut dedup = DedupStore::new(storage, clock);
        if let Some(threshold) = self.retention.and_then(|r| r.warn_above) {
            dedup = dedup.with_warn_threshold(threshold);
        }
        let dedup = Arc::new(dedup);

        let sweeper = self
            .retention
            .map(|config| RetentionSweeper::new(Arc::clone(&dedup), config));

        let gate = AdmissionGate::new(registry, dedup, self.metrics.unwrap_or_default());
        Ok((gate, sweeper))
    }
}

impl InMemoryGate {
    /// Create a builder for an in-memory gate.
    pub fn builder() -> GateBuilder {
        GateBuilder::new()
    }

    /// Build an in-memory gate from a loaded configuration.
    ///
    /// This drops any `retention` block apart from its size warning, like
    /// [`GateBuilder::build`]. To run the sweep, use
    /// `GateBuilder::from_config(config)?.build_with_sweeper()`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn from_config(config: GateConfig) -> Result<Self, ConfigError> {
        GateBuilder::from_config(config)?.build()
    }
}
