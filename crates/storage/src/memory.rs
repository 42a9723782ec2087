//! In-memory storage, for tests and throwaway sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use lectrack_core::{LectureId, ProgressKey, ProgressRecord, UserId};
use tracing::debug;

use super::{ProgressStore, Result};

/// Progress records held in a map. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: HashMap<ProgressKey, ProgressRecord>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No records stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProgressStore for MemoryStorage {
    async fn load(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>> {
        Ok(self.records.get(key).cloned())
    }

    async fn save(&mut self, key: &ProgressKey, record: &ProgressRecord) -> Result<()> {
        debug!(%key, fraction = record.fraction, "storing progress in memory");
        self.records.insert(key.clone(), record.clone());
        Ok(())
    }

    async fn list_user(&self, user: &UserId) -> Result<Vec<(LectureId, ProgressRecord)>> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|(key, _)| &key.user == user)
            .map(|(key, record)| (key.lecture, record.clone()))
            .collect();
        records.sort_by_key(|(lecture, _)| *lecture);
        Ok(records)
    }
}
