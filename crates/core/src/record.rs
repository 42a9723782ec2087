//! Progress record - what gets persisted per viewer and lecture.

use serde::{Deserialize, Serialize};

use crate::watched::WatchedSet;

/// Stored progress of one viewer on one lecture.
///
/// The JSON shape is the one the web client already stores:
/// `{"progress": 0.1, "watchedIntervals": [[0, 10]], "lastPosition": 10}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Completion in `[0, 1]`.
    ///
    /// Cached projection of `watched_intervals` over the lecture duration.
    /// Recomputed on every observation, never set by hand.
    #[serde(rename = "progress")]
    pub fraction: f64,

    /// Unique coverage
    pub watched_intervals: WatchedSet,

    /// Playback cursor after the latest observation, used to resume
    #[serde(default)]
    pub last_position: f64,
}

impl ProgressRecord {
    /// The untouched record: nothing watched, cursor at zero.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Nothing has been watched yet.
    pub fn is_untouched(&self) -> bool {
        self.watched_intervals.is_empty()
    }

    /// Every second of the lecture is covered.
    pub fn is_complete(&self) -> bool {
        self.fraction >= 1.0
    }

    /// Completion as a whole percentage, rounded down.
    pub fn percent(&self) -> u8 {
        (self.fraction.clamp(0.0, 1.0) * 100.0).floor() as u8
    }
}
