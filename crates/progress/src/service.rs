//! Progress service - load, fold, save.

use lectrack_core::{Interval, IntervalError, Lecture, ProgressKey, ProgressRecord, UserId};
use lectrack_storage::{LectureCatalog, ProgressStore, StorageError};
use tracing::{debug, info};

use crate::tracker::ProgressTracker;

/// Errors surfaced by the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Observation was malformed
    #[error(transparent)]
    Interval(#[from] IntervalError),

    /// Persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Catalog has no such lecture
    #[error("Lecture not found: {0}")]
    LectureNotFound(lectrack_core::LectureId),
}

/// A catalog lecture together with the viewer's progress on it.
#[derive(Debug, Clone)]
pub struct LectureProgress {
    /// The lecture
    pub lecture: Lecture,

    /// Progress, empty if never watched
    pub record: ProgressRecord,
}

/// Ties the tracker to a store and a catalog.
///
/// Each call is a read-modify-write on one key. The service holds the store
/// exclusively, so calls through one service are serialized.
pub struct ProgressService<S: ProgressStore, C: LectureCatalog> {
    storage: S,
    catalog: C,
    tracker: ProgressTracker,
}

impl<S: ProgressStore, C: LectureCatalog> ProgressService<S, C> {
    /// Create a new service.
    pub fn new(storage: S, catalog: C) -> Self {
        Self {
            storage,
            catalog,
            tracker: ProgressTracker::new(),
        }
    }

    /// Replace the tracker (e.g. to change the merge tolerance).
    pub fn with_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// The underlying store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The lecture catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Record playback from `start` to `end` seconds.
    pub async fn record(
        &mut self,
        key: &ProgressKey,
        start: f64,
        end: f64,
    ) -> Result<ProgressRecord, ServiceError> {
        let interval = Interval::new(start, end)?;
        self.record_interval(key, interval).await
    }

    /// Record an already validated interval.
    pub async fn record_interval(
        &mut self,
        key: &ProgressKey,
        interval: Interval,
    ) -> Result<ProgressRecord, ServiceError> {
        let lecture = self.lecture(key).await?;
        let existing = self.storage.load(key).await?;

        let updated = self
            .tracker
            .record_observation(existing.as_ref(), interval, lecture.total_duration());
        self.storage.save(key, &updated).await?;

        let before = existing.map(|r| r.fraction).unwrap_or(0.0);
        if updated.fraction > before {
            info!(%key, %interval, fraction = updated.fraction, "progress advanced");
        } else {
            debug!(%key, %interval, "observation already covered");
        }

        Ok(updated)
    }

    /// Stored progress for a key, with the fraction projected onto the
    /// lecture's current duration.
    pub async fn progress(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressRecord>, ServiceError> {
        let lecture = self.lecture(key).await?;
        let record = self.storage.load(key).await?;
        Ok(record.map(|r| self.tracker.reproject(&r, lecture.total_duration())))
    }

    /// Every catalog lecture with the viewer's progress.
    pub async fn overview(&self, user: &UserId) -> Result<Vec<LectureProgress>, ServiceError> {
        let stored = self.storage.list_user(user).await?;

        let overview = self
            .catalog
            .list()
            .await
            .into_iter()
            .map(|lecture| {
                let record = stored
                    .iter()
                    .find(|(id, _)| *id == lecture.id)
                    .map(|(_, r)| self.tracker.reproject(r, lecture.total_duration()))
                    .unwrap_or_default();
                LectureProgress { lecture, record }
            })
            .collect();

        Ok(overview)
    }

    async fn lecture(&self, key: &ProgressKey) -> Result<Lecture, ServiceError> {
        self.catalog
            .get_by_id(key.lecture)
            .await
            .ok_or(ServiceError::LectureNotFound(key.lecture))
    }
}
