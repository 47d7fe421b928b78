//! Scoped metrics tracking.

use crate::{BotMetrics, ConsoleMetrics, PersistMetrics};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::{Deref, DerefMut};
use std::thread;
use tracing::{debug, error, warn};

/// What [`Tracker::track`] does with an error returned by the tracked work.
///
/// Either way the record is marked failed and persisted first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the error and continue as if the work returned nothing.
    #[default]
    Suppress,
    /// Hand the error back to the caller.
    Propagate,
}

/// Wraps the processing of one event at a time, persisting one record per scope.
#[derive(Debug, Default)]
pub struct Tracker<P = ConsoleMetrics> {
    sink: P,
    on_error: ErrorPolicy,
}

impl Tracker<ConsoleMetrics> {
    /// A tracker printing to the console.
    pub fn console() -> Self {
        Self::new(ConsoleMetrics)
    }
}

impl<P: PersistMetrics> Tracker<P> {
    pub fn new(sink: P) -> Self {
        Self {
            sink,
            on_error: ErrorPolicy::default(),
        }
    }

    pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.on_error
    }

    /// Open a scope with a fresh, empty [`BotMetrics`].
    ///
    /// The record is persisted when the returned guard is dropped, on every
    /// exit path. A scope dropped during a panic is recorded as failed.
    pub fn begin(&self) -> MetricsScope<'_, P> {
        MetricsScope {
            metrics: BotMetrics::new(),
            sink: &self.sink,
        }
    }

    /// Run `work` inside a scope.
    ///
    /// Returns `Ok(Some(value))` on success. On error the record is marked
    /// failed and persisted, then the error is either absorbed (`Ok(None)`)
    /// or returned, depending on the [`ErrorPolicy`].
    pub fn track<T, E, F>(&self, work: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut BotMetrics) -> Result<T, E>,
        E: Display,
    {
        let mut scope = self.begin();
        match work(&mut scope.metrics) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                scope.mark_failed();
                drop(scope);
                match self.on_error {
                    ErrorPolicy::Suppress => {
                        warn!(error = %e, "tracked work failed, error suppressed");
                        Ok(None)
                    }
                    ErrorPolicy::Propagate => Err(e),
                }
            }
        }
    }
}

/// Guard owning the [`BotMetrics`] of one tracked scope.
pub struct MetricsScope<'t, P: PersistMetrics> {
    metrics: BotMetrics,
    sink: &'t P,
}

impl<P: PersistMetrics> MetricsScope<'_, P> {
    /// Close the scope now instead of at end of block.
    pub fn finish(self) {}
}

impl<P: PersistMetrics> Deref for MetricsScope<'_, P> {
    type Target = BotMetrics;

    fn deref(&self) -> &BotMetrics {
        &self.metrics
    }
}

impl<P: PersistMetrics> DerefMut for MetricsScope<'_, P> {
    fn deref_mut(&mut self) -> &mut BotMetrics {
        &mut self.metrics
    }
}

impl<P: PersistMetrics> Drop for MetricsScope<'_, P> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!("tracked scope unwinding from a panic");
            self.metrics.mark_failed();
        }
        match self.sink.persist(&self.metrics) {
            Ok(()) => debug!(
                success = self.metrics.success,
                response_time = self.metrics.response_time(),
                "persisted metrics"
            ),
            Err(e) => error!(error = %e, "failed to persist metrics"),
        }
    }
}
