//! Progress Tracking
//!
//! Honest lecture progress: merge watched intervals, compute completion,
//! and fold new observations into persisted records.

#![warn(missing_docs)]

pub mod calculator;
pub mod tracker;
pub mod service;
pub mod observer;

pub use lectrack_core::{merge, merge_with_tolerance, MERGE_TOLERANCE};

pub use calculator::calculate_progress;
pub use tracker::{record_observation, ProgressTracker, TrackerConfig};
pub use service::{LectureProgress, ProgressService, ServiceError};
pub use observer::{
    run_recorder, Observation, PlaybackObserver, PlaybackSampler, RecorderClosed, SamplerConfig,
};
