//! JSON file storage implementation.
//!
//! Stores one JSON file per viewer and lecture under `progress/<user>/` and
//! keeps small per-record meta markers (version + updated_at) under
//! `meta/<user>/`.

use std::path::{Path, PathBuf};

use lectrack_core::{LectureId, ProgressKey, ProgressRecord, UserId};
use tokio::fs;
use tracing::{debug, warn};

use super::{ProgressStore, Result, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory layout.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("progress")).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user: &UserId) -> Result<PathBuf> {
        Ok(self.root.join("progress").join(user_segment(user)?))
    }

    fn record_path(&self, key: &ProgressKey) -> Result<PathBuf> {
        Ok(self.user_dir(&key.user)?.join(format!("{}.json", key.lecture)))
    }

    fn meta_path(&self, key: &ProgressKey) -> Result<PathBuf> {
        Ok(self
            .root
            .join("meta")
            .join(user_segment(&key.user)?)
            .join(format!("{}.meta.json", key.lecture)))
    }

    /// Read and increment the per-record version, return the new version.
    async fn bump_version(&self, key: &ProgressKey) -> Result<u64> {
        let path = self.meta_path(key)?;
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    /// Stored version of a record, 0 if it was never saved.
    pub async fn version(&self, key: &ProgressKey) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path(key)?).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }
}

#[async_trait::async_trait]
impl ProgressStore for JsonStorage {
    async fn load(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>> {
        read_json(&self.record_path(key)?).await
    }

    async fn save(&mut self, key: &ProgressKey, record: &ProgressRecord) -> Result<()> {
        let path = self.record_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Readers never observe a partially written record.
        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        let version = self.bump_version(key).await?;
        debug!(%key, version, "saved progress record");
        Ok(())
    }

    async fn list_user(&self, user: &UserId) -> Result<Vec<(LectureId, ProgressRecord)>> {
        let dir = self.user_dir(user)?;
        let mut items = Vec::new();
        let mut rd = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(items),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = rd.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(lecture) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<LectureId>().ok())
            else {
                continue;
            };
            match read_json(&path).await {
                Ok(Some(record)) => items.push((lecture, record)),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }

        items.sort_by_key(|(lecture, _)| *lecture);
        Ok(items)
    }
}

/// Map a user id onto a single, safe path segment.
fn user_segment(user: &UserId) -> Result<&str> {
    let id = user.as_str();
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
    if valid {
        Ok(id)
    } else {
        Err(StorageError::InvalidKey(format!("user id {:?}", id)))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
