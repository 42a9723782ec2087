//! Completion calculation.

use lectrack_core::WatchedSet;

/// Fraction of the lecture covered by `watched`, in `[0, 1]`.
///
/// `watched` must already be normalized (a [`WatchedSet`] always is), so
/// summing span lengths never counts a second twice. A duration that is not
/// yet known (zero, negative or non-finite) yields `0`. The result is
/// clamped to `1` when the watched total exceeds the duration, which happens
/// when the duration estimate shrinks after intervals were recorded.
pub fn calculate_progress(watched: &WatchedSet, total_duration: f64) -> f64 {
    if watched.is_empty() || !total_duration.is_finite() || total_duration <= 0.0 {
        return 0.0;
    }

    (watched.total_watched() / total_duration).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectrack_core::{merge, Interval};

    fn set(pairs: &[(f64, f64)]) -> WatchedSet {
        merge(
            pairs
                .iter()
                .map(|&(s, e)| Interval::new(s, e).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_two_spans() {
        let watched = set(&[(0.0, 15.0), (20.0, 25.0)]);
        assert!((calculate_progress(&watched, 100.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(calculate_progress(&WatchedSet::new(), 100.0), 0.0);
    }

    #[test]
    fn test_unknown_duration() {
        let watched = set(&[(0.0, 10.0)]);
        assert_eq!(calculate_progress(&watched, 0.0), 0.0);
        assert_eq!(calculate_progress(&watched, -5.0), 0.0);
        assert_eq!(calculate_progress(&watched, f64::NAN), 0.0);
    }

    #[test]
    fn test_clamped_to_one() {
        let watched = set(&[(0.0, 120.0)]);
        assert_eq!(calculate_progress(&watched, 100.0), 1.0);
    }

    #[test]
    fn test_zero_length_spans_count_nothing() {
        let watched = set(&[(40.0, 40.0)]);
        assert_eq!(calculate_progress(&watched, 100.0), 0.0);
    }
}
