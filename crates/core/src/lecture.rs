//! Lecture model - catalog entry.

use serde::{Deserialize, Serialize};

use crate::id::LectureId;

/// A lecture video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    /// Unique identifier
    pub id: LectureId,

    /// Lecture title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Where the video is served from
    pub video_url: String,

    /// Total length, the denominator of completion
    pub duration_in_seconds: u32,
}

impl Lecture {
    /// Create a new lecture.
    pub fn new(
        id: impl Into<LectureId>,
        title: impl Into<String>,
        duration_in_seconds: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            video_url: String::new(),
            duration_in_seconds,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the video URL.
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = url.into();
        self
    }

    /// Duration in seconds as the calculator expects it.
    pub fn total_duration(&self) -> f64 {
        f64::from(self.duration_in_seconds)
    }

    /// Duration as `m:ss`.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.total_duration())
    }
}

/// Format seconds as `m:ss`, e.g. `734.0` → `12:14`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
