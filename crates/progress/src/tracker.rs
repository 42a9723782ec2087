//! Progress tracking - folds one observation into a record.

use lectrack_core::{Interval, ProgressRecord, MERGE_TOLERANCE};

use crate::calculator::calculate_progress;

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Widest gap between spans that still merges them, in seconds
    pub merge_tolerance: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: MERGE_TOLERANCE,
        }
    }
}

/// Combines stored progress with newly observed playback.
///
/// Pure: no storage, no clocks. Callers load the previous record, hand it
/// in, and persist what comes back.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    config: TrackerConfig,
}

impl ProgressTracker {
    /// Create a tracker with the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Fold `interval` into `existing` and return the new record.
    ///
    /// An absent record is treated as untouched. The watched set is merged,
    /// the fraction recomputed from it, and the cursor moved to the end of
    /// the interval. `existing` is not modified. Re-submitting an interval
    /// that is already covered leaves fraction and watched set unchanged.
    pub fn record_observation(
        &self,
        existing: Option<&ProgressRecord>,
        interval: Interval,
        total_duration: f64,
    ) -> ProgressRecord {
        let watched_intervals = match existing {
            Some(record) => record
                .watched_intervals
                .with(interval, self.config.merge_tolerance),
            None => lectrack_core::merge_with_tolerance([interval], self.config.merge_tolerance),
        };
        let fraction = calculate_progress(&watched_intervals, total_duration);

        ProgressRecord {
            fraction,
            watched_intervals,
            last_position: interval.end(),
        }
    }

    /// Recompute the cached fraction against a (possibly revised) duration.
    pub fn reproject(&self, record: &ProgressRecord, total_duration: f64) -> ProgressRecord {
        ProgressRecord {
            fraction: calculate_progress(&record.watched_intervals, total_duration),
            ..record.clone()
        }
    }
}

/// [`ProgressTracker::record_observation`] with the default configuration.
pub fn record_observation(
    existing: Option<&ProgressRecord>,
    interval: Interval,
    total_duration: f64,
) -> ProgressRecord {
    ProgressTracker::new().record_observation(existing, interval, total_duration)
}
