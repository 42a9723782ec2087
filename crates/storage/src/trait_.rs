//! Storage trait abstraction.

use async_trait::async_trait;
use lectrack_core::{LectureId, ProgressKey, ProgressRecord, UserId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key cannot be mapped onto the backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Persistence contract for progress records.
///
/// Records are keyed by viewer and lecture. Implementations only store and
/// return what they are given; merging and recalculation happen upstream.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the record for a key, `None` if the viewer never watched it.
    async fn load(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>>;

    /// Save a record (create or overwrite).
    async fn save(&mut self, key: &ProgressKey, record: &ProgressRecord) -> Result<()>;

    /// All records of one viewer, ordered by lecture.
    async fn list_user(&self, user: &UserId) -> Result<Vec<(LectureId, ProgressRecord)>>;
}
