//! Watched set - the normalized union of everything a viewer has seen.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Widest gap between two spans that still coalesces them.
///
/// Playback is sampled once per second, so consecutive samples such as
/// `[0, 5]` and `[6, 10]` are contiguous playback, not a skipped second.
pub const MERGE_TOLERANCE: f64 = 1.0;

/// Sorted, disjoint set of watched intervals.
///
/// Invariants, held by every value of this type:
/// - intervals are sorted by start ascending;
/// - consecutive intervals are separated by more than the merge tolerance
///   that produced the set.
///
/// Values come out of [`merge`] / [`merge_with_tolerance`]. Converting from
/// a plain list (including deserializing) only sorts and joins spans that
/// overlap or touch: a set normalized under any tolerance comes back
/// exactly as it was stored, and overlapping input written by hand is
/// repaired without adding time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct WatchedSet {
    intervals: Vec<Interval>,
}

impl WatchedSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized intervals, ascending.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Iterate the intervals in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Number of disjoint spans.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// No coverage at all.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Seconds of unique coverage.
    pub fn total_watched(&self) -> f64 {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Whether second `t` has been watched.
    pub fn covers(&self, t: f64) -> bool {
        // Sorted and disjoint: the candidate is the last span starting at or before t.
        let idx = self.intervals.partition_point(|i| i.start() <= t);
        idx > 0 && self.intervals[idx - 1].contains(t)
    }

    /// New set with `interval` folded in. `self` is left untouched.
    pub fn with(&self, interval: Interval, tolerance: f64) -> Self {
        let mut all = Vec::with_capacity(self.intervals.len() + 1);
        all.extend_from_slice(&self.intervals);
        all.push(interval);
        merge_with_tolerance(all, tolerance)
    }

    /// Consume into the raw interval list.
    pub fn into_intervals(self) -> Vec<Interval> {
        self.intervals
    }
}

impl From<Vec<Interval>> for WatchedSet {
    fn from(intervals: Vec<Interval>) -> Self {
        merge_with_tolerance(intervals, 0.0)
    }
}

impl From<WatchedSet> for Vec<Interval> {
    fn from(set: WatchedSet) -> Self {
        set.intervals
    }
}

impl<'a> IntoIterator for &'a WatchedSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// Normalize intervals with the default [`MERGE_TOLERANCE`].
pub fn merge(intervals: impl IntoIterator<Item = Interval>) -> WatchedSet {
    merge_with_tolerance(intervals, MERGE_TOLERANCE)
}

/// Normalize intervals into the minimal sorted, disjoint [`WatchedSet`].
///
/// An interval is folded into the running span when it starts no later than
/// `running.end + tolerance`; otherwise the running span is closed. Input
/// order does not matter. Zero-length intervals keep their own slot unless
/// a neighbour absorbs them.
///
/// A negative or non-finite tolerance is treated as zero.
pub fn merge_with_tolerance(
    intervals: impl IntoIterator<Item = Interval>,
    tolerance: f64,
) -> WatchedSet {
    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        0.0
    };

    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    // Stable; equal starts keep their relative order and are folded together anyway.
    sorted.sort_by(|a, b| a.start().total_cmp(&b.start()));

    let mut result: Vec<Interval> = Vec::with_capacity(sorted.len());
    let mut iter = sorted.into_iter();
    let Some(mut current) = iter.next() else {
        return WatchedSet { intervals: result };
    };

    for next in iter {
        if next.start() <= current.end() + tolerance {
            current.extend_to(next.end());
        } else {
            result.push(current);
            current = next;
        }
    }
    result.push(current);

    WatchedSet { intervals: result }
}
