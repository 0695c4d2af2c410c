//! Opt-in retention for the dedup store.
//!
//! Without retention the dedup store remembers every token for the life of
//! the process. Enabling a sweep bounds memory at the cost of first-seen-wins
//! semantics: a token purged after `max_age` is accepted again.

use crate::application::dedup::DedupStore;
use crate::application::ports::TokenStorage;
use crate::domain::error::ConfigError;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "async")]
use tokio::sync::oneshot;
#[cfg(feature = "async")]
use tokio::task::JoinHandle;

/// Configuration for the retention sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    /// How often to sweep
    pub interval: Duration,
    /// Tokens accepted longer ago than this are forgotten
    pub max_age: Duration,
    /// Warn once the store holds more tokens than this
    pub warn_above: Option<usize>,
}

impl RetentionConfig {
    /// Create a retention config.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroRetentionInterval` or
    /// `ConfigError::ZeroRetentionAge` if either duration is zero.
    pub fn new(interval: Duration, max_age: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroRetentionInterval);
        }
        if max_age.is_zero() {
            return Err(ConfigError::ZeroRetentionAge);
        }
        Ok(Self {
            interval,
            max_age,
            warn_above: None,
        })
    }

    /// Set the size warning threshold.
    pub fn with_warn_above(mut self, threshold: usize) -> Self {
        self.warn_above = Some(threshold);
        self
    }
}

/// Periodically purges old tokens from a dedup store.
#[derive(Debug)]
pub struct RetentionSweeper<S>
where
    S: TokenStorage,
{
    dedup: Arc<DedupStore<S>>,
    config: RetentionConfig,
}

impl<S> RetentionSweeper<S>
where
    S: TokenStorage,
{
    /// Create a sweeper for a shared dedup store.
    pub fn new(dedup: Arc<DedupStore<S>>, config: RetentionConfig) -> Self {
        Self { dedup, config }
    }

    /// Run one sweep now.
    ///
    /// # Returns
    /// The number of tokens removed
    pub fn sweep(&self) -> usize {
        let removed = self.dedup.purge_older_than(self.config.max_age);
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.dedup.len(),
                "purged expired dedup tokens"
            );
        }
        removed
    }

    /// Start sweeping periodically on the current tokio runtime.
    ///
    /// The first sweep runs one `interval` after the call. The task runs until
    /// [`SweeperHandle::shutdown`] is called.
    #[cfg(feature = "async")]
    pub fn start(self) -> SweeperHandle
    where
        S: 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let period = self.config.interval;

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            let mut total_removed = 0;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        total_removed += self.sweep();
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }

            total_removed
        });

        SweeperHandle { shutdown_tx, task }
    }

    /// Get the sweeper configuration.
    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }
}

/// Error returned when the sweeper task did not stop cleanly.
#[cfg(feature = "async")]
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    /// The sweep task panicked or was cancelled
    #[error("retention sweeper task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Handle to a running retention sweeper.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<usize>,
}

#[cfg(feature = "async")]
impl SweeperHandle {
    /// Stop the sweeper and wait for it to finish.
    ///
    /// # Returns
    /// The total number of tokens the sweeper removed
    ///
    /// # Errors
    /// Returns `ShutdownError::TaskFailed` if the task panicked.
    pub async fn shutdown(self) -> Result<usize, ShutdownError> {
        // The task may already be gone; joining reports why.
        let _ = self.shutdown_tx.send(());
        Ok(self.task.await?)
    }

    /// Check whether the sweep task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
