//! Identifiers for LecTrack entities.

use serde::{Deserialize, Serialize};

/// Unique identifier for a Lecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LectureId(u32);

impl LectureId {
    /// Wrap a raw catalog id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw numeric value
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for LectureId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LectureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for LectureId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier for a viewer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The single viewer of a local, single-user installation.
    pub fn local() -> Self {
        Self("local".to_string())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one progress record: a viewer watching a lecture.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgressKey {
    /// Who is watching
    pub user: UserId,

    /// What is being watched
    pub lecture: LectureId,
}

impl ProgressKey {
    /// Build a key.
    pub fn new(user: UserId, lecture: impl Into<LectureId>) -> Self {
        Self {
            user,
            lecture: lecture.into(),
        }
    }
}

impl std::fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user, self.lecture)
    }
}
