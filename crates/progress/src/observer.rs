//! Playback observation.
//!
//! The player side samples the playback position and turns consecutive
//! samples into intervals ([`PlaybackSampler`]). Intervals travel as
//! [`Observation`] messages over a channel to a recorder task
//! ([`run_recorder`]) that owns the [`ProgressService`]. Sampling cadence
//! and merge logic never touch each other directly.

use lectrack_core::{Interval, ProgressKey};
use lectrack_storage::{LectureCatalog, ProgressStore};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::service::ProgressService;

/// Configuration for the sampler.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Largest jump between two samples still treated as playback, in seconds
    pub max_step: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { max_step: 1.0 }
    }
}

/// Turns a stream of position samples into forward-playback intervals.
///
/// Positions are floored to whole seconds. The first sample, and any jump
/// larger than `max_step` in either direction, only re-anchors: a seek is
/// not playback. Small backward steps re-anchor too.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSampler {
    config: SamplerConfig,
    anchor: Option<f64>,
}

impl PlaybackSampler {
    /// Create a sampler with the default step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// Feed one sampled position. Returns the interval played since the
    /// previous sample, if the delta looks like playback.
    pub fn sample(&mut self, position: f64) -> Option<Interval> {
        if !position.is_finite() || position < 0.0 {
            self.anchor = None;
            return None;
        }
        let current = position.floor();

        let Some(previous) = self.anchor else {
            self.anchor = Some(current);
            return None;
        };

        if current == previous {
            return None;
        }
        self.anchor = Some(current);

        if current < previous || current - previous > self.config.max_step {
            return None;
        }
        Interval::new(previous, current).ok()
    }

    /// The user seeked to `position`; playback resumes from that second.
    ///
    /// A non-finite or negative position forgets the anchor instead.
    pub fn seek(&mut self, position: f64) {
        self.anchor = if position.is_finite() && position >= 0.0 {
            Some(position.floor())
        } else {
            None
        };
    }

    /// Forget the anchor; the next sample only anchors.
    pub fn reset(&mut self) {
        self.anchor = None;
    }

    /// Last accepted position.
    pub fn anchor(&self) -> Option<f64> {
        self.anchor
    }
}

/// One observed interval for one viewer and lecture.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Whose progress
    pub key: ProgressKey,

    /// What was played
    pub interval: Interval,
}

/// The recorder is gone; no more observations can be delivered.
#[derive(Debug, thiserror::Error)]
#[error("progress recorder has shut down")]
pub struct RecorderClosed;

/// Player-side handle: samples positions for one key and sends intervals.
pub struct PlaybackObserver {
    key: ProgressKey,
    sampler: PlaybackSampler,
    tx: mpsc::Sender<Observation>,
}

impl PlaybackObserver {
    /// Create an observer for `key` that sends into `tx`.
    pub fn new(key: ProgressKey, tx: mpsc::Sender<Observation>) -> Self {
        Self {
            key,
            sampler: PlaybackSampler::new(),
            tx,
        }
    }

    /// Replace the sampler (e.g. to change the step).
    pub fn with_sampler(mut self, sampler: PlaybackSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Feed a position; send an observation if it completes an interval.
    ///
    /// Returns whether an observation was sent.
    pub async fn on_position(&mut self, position: f64) -> Result<bool, RecorderClosed> {
        let Some(interval) = self.sampler.sample(position) else {
            return Ok(false);
        };
        self.tx
            .send(Observation {
                key: self.key.clone(),
                interval,
            })
            .await
            .map_err(|_| RecorderClosed)?;
        Ok(true)
    }

    /// The player seeked to `position`.
    pub fn on_seek(&mut self, position: f64) {
        self.sampler.seek(position);
    }

    /// The player lost its position (reload, source change).
    pub fn on_reset(&mut self) {
        self.sampler.reset();
    }
}

/// Apply observations to the service until every sender is dropped.
///
/// Failed observations are logged and skipped. Returns the service so the
/// caller can keep using its store.
pub async fn run_recorder<S, C>(
    mut rx: mpsc::Receiver<Observation>,
    mut service: ProgressService<S, C>,
) -> ProgressService<S, C>
where
    S: ProgressStore,
    C: LectureCatalog,
{
    let mut applied = 0usize;
    while let Some(observation) = rx.recv().await {
        match service
            .record_interval(&observation.key, observation.interval)
            .await
        {
            Ok(record) => {
                applied += 1;
                debug!(key = %observation.key, fraction = record.fraction, "observation applied");
            }
            Err(e) => {
                warn!(key = %observation.key, error = %e, "dropping observation");
            }
        }
    }
    info!(applied, "progress recorder stopped");
    service
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectrack_core::{Lecture, UserId};
    use lectrack_storage::{MemoryStorage, StaticCatalog};

    #[test]
    fn test_first_sample_only_anchors() {
        let mut sampler = PlaybackSampler::new();
        assert!(sampler.sample(3.4).is_none());
        assert_eq!(sampler.anchor(), Some(3.0));
    }

    #[test]
    fn test_forward_steps_emit() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(0.0);
        let interval = sampler.sample(1.2).unwrap();
        assert_eq!((interval.start(), interval.end()), (0.0, 1.0));
        let interval = sampler.sample(2.0).unwrap();
        assert_eq!((interval.start(), interval.end()), (1.0, 2.0));
    }

    #[test]
    fn test_jump_is_a_seek() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(0.0);
        assert!(sampler.sample(30.0).is_none());
        assert_eq!(sampler.anchor(), Some(30.0));
        assert!(sampler.sample(31.0).is_some());
    }

    #[test]
    fn test_backward_step_reanchors() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(10.0);
        assert!(sampler.sample(9.0).is_none());
        assert_eq!(sampler.anchor(), Some(9.0));
    }

    #[test]
    fn test_paused_emits_nothing() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(5.0);
        assert!(sampler.sample(5.6).is_none());
        assert_eq!(sampler.anchor(), Some(5.0));
    }

    #[test]
    fn test_explicit_seek() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(5.0);
        sampler.seek(40.7);
        assert_eq!(sampler.anchor(), Some(40.0));

        let interval = sampler.sample(41.0).unwrap();
        assert_eq!((interval.start(), interval.end()), (40.0, 41.0));
    }

    #[test]
    fn test_seek_nearby_does_not_bridge() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(5.0);
        sampler.seek(5.0);
        assert!(sampler.sample(5.5).is_none());
        assert!(sampler.sample(6.0).is_some());

        sampler.seek(2.0);
        let interval = sampler.sample(3.0).unwrap();
        assert_eq!((interval.start(), interval.end()), (2.0, 3.0));
    }

    #[test]
    fn test_seek_to_bad_position_forgets_anchor() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(5.0);
        sampler.seek(-1.0);
        assert_eq!(sampler.anchor(), None);
    }

    #[test]
    fn test_reset() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(5.0);
        sampler.reset();
        assert_eq!(sampler.anchor(), None);
        assert!(sampler.sample(6.0).is_none());
        assert!(sampler.sample(7.0).is_some());
    }

    #[test]
    fn test_bad_position_resets() {
        let mut sampler = PlaybackSampler::new();
        sampler.sample(5.0);
        assert!(sampler.sample(f64::NAN).is_none());
        assert_eq!(sampler.anchor(), None);
    }

    #[test]
    fn test_wider_step() {
        let mut sampler = PlaybackSampler::new().with_config(SamplerConfig { max_step: 5.0 });
        sampler.sample(0.0);
        let interval = sampler.sample(4.0).unwrap();
        assert_eq!(interval.len(), 4.0);
    }

    #[tokio::test]
    async fn test_observer_to_recorder() {
        let catalog = StaticCatalog::new(vec![Lecture::new(1, "Intervals", 20)]);
        let service = ProgressService::new(MemoryStorage::new(), catalog);
        let (tx, rx) = mpsc::channel(8);
        let recorder = tokio::spawn(run_recorder(rx, service));

        let key = ProgressKey::new(UserId::local(), 1);
        let mut observer = PlaybackObserver::new(key.clone(), tx);
        for position in [0.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
            observer.on_position(position).await.unwrap();
        }
        observer.on_seek(15.0);
        for position in [15.0, 16.0, 17.0] {
            observer.on_position(position).await.unwrap();
        }
        drop(observer);

        let service = recorder.await.unwrap();
        let record = service.progress(&key).await.unwrap().unwrap();
        assert_eq!(record.watched_intervals.len(), 2);
        assert!((record.fraction - 7.0 / 20.0).abs() < 1e-12);
        assert_eq!(record.last_position, 17.0);
    }

    #[tokio::test]
    async fn test_observer_reset_drops_first_step() {
        let catalog = StaticCatalog::new(vec![Lecture::new(1, "Intervals", 20)]);
        let service = ProgressService::new(MemoryStorage::new(), catalog);
        let (tx, rx) = mpsc::channel(8);
        let recorder = tokio::spawn(run_recorder(rx, service));

        let key = ProgressKey::new(UserId::local(), 1);
        let mut observer = PlaybackObserver::new(key.clone(), tx);
        observer.on_position(0.0).await.unwrap();
        observer.on_reset();
        assert!(!observer.on_position(1.0).await.unwrap());
        assert!(observer.on_position(2.0).await.unwrap());
        drop(observer);

        let service = recorder.await.unwrap();
        let record = service.progress(&key).await.unwrap().unwrap();
        assert_eq!(record.watched_intervals.len(), 1);
        assert!((record.fraction - 1.0 / 20.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_recorder_skips_unknown_lecture() {
        let catalog = StaticCatalog::new(vec![Lecture::new(1, "Intervals", 20)]);
        let service = ProgressService::new(MemoryStorage::new(), catalog);
        let (tx, rx) = mpsc::channel(8);
        let recorder = tokio::spawn(run_recorder(rx, service));

        let interval = Interval::new(0.0, 1.0).unwrap();
        tx.send(Observation {
            key: ProgressKey::new(UserId::local(), 99),
            interval,
        })
        .await
        .unwrap();
        tx.send(Observation {
            key: ProgressKey::new(UserId::local(), 1),
            interval,
        })
        .await
        .unwrap();
        drop(tx);

        let service = recorder.await.unwrap();
        assert_eq!(service.storage().len(), 1);
    }

    #[tokio::test]
    async fn test_send_after_recorder_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let mut observer = PlaybackObserver::new(ProgressKey::new(UserId::local(), 1), tx);
        observer.on_position(0.0).await.unwrap();
        assert!(observer.on_position(1.0).await.is_err());
    }
}
