//! LecTrack core data models.
//!
//! This crate defines the data structures behind honest lecture progress:
//! validated intervals, the normalized set of watched spans, and the record
//! persisted per viewer and lecture.

#![warn(missing_docs)]

// Identities
mod id;

// Watch tracking
mod interval;
mod watched;
mod record;

// Catalog
mod lecture;

// Re-exports
pub use id::{LectureId, ProgressKey, UserId};

pub use interval::{Interval, IntervalError};
pub use watched::{merge, merge_with_tolerance, WatchedSet, MERGE_TOLERANCE};
pub use record::ProgressRecord;

pub use lecture::{format_duration, Lecture};
