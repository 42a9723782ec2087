//! Interval model - one contiguous span of confirmed playback.

use serde::{Deserialize, Serialize};

/// Why an interval was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntervalError {
    /// A bound is NaN or infinite
    #[error("invalid interval: bound is not finite ({start}, {end})")]
    NonFinite { start: f64, end: f64 },

    /// A bound lies before the start of the media
    #[error("invalid interval: negative bound ({start}, {end})")]
    Negative { start: f64, end: f64 },

    /// End comes before start
    #[error("invalid interval: start {start} is after end {end}")]
    Reversed { start: f64, end: f64 },
}

/// A closed span `[start, end]` of media time in seconds.
///
/// Bounds are finite, non-negative and ordered. The only way to obtain an
/// `Interval` is through [`Interval::new`] (or deserialization, which goes
/// through the same checks), so every value in circulation is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Interval {
    start: f64,
    end: f64,
}

impl Interval {
    /// Validate and build an interval. Malformed bounds are rejected, never clamped.
    pub fn new(start: f64, end: f64) -> Result<Self, IntervalError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(IntervalError::NonFinite { start, end });
        }
        if start < 0.0 || end < 0.0 {
            return Err(IntervalError::Negative { start, end });
        }
        if start > end {
            return Err(IntervalError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the span.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the span.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length in seconds (zero for a point).
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// True when `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `t` lies inside the closed span.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    pub(crate) fn extend_to(&mut self, end: f64) {
        if end > self.end {
            self.end = end;
        }
    }
}

impl TryFrom<(f64, f64)> for Interval {
    type Error = IntervalError;

    fn try_from((start, end): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl From<Interval> for (f64, f64) {
    fn from(interval: Interval) -> Self {
        (interval.start, interval.end)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_interval() {
        let interval = Interval::new(2.0, 7.5).unwrap();
        assert_eq!(interval.start(), 2.0);
        assert_eq!(interval.end(), 7.5);
        assert_eq!(interval.len(), 5.5);
        assert!(interval.contains(7.5));
        assert!(!interval.contains(8.0));
    }

    #[test]
    fn test_zero_length_is_valid() {
        let interval = Interval::new(4.0, 4.0).unwrap();
        assert!(interval.is_empty());
        assert_eq!(interval.len(), 0.0);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            Interval::new(5.0, 1.0),
            Err(IntervalError::Reversed { .. })
        ));
        assert!(matches!(
            Interval::new(-1.0, 1.0),
            Err(IntervalError::Negative { .. })
        ));
        assert!(matches!(
            Interval::new(0.0, f64::NAN),
            Err(IntervalError::NonFinite { .. })
        ));
        assert!(matches!(
            Interval::new(0.0, f64::INFINITY),
            Err(IntervalError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_serde_as_pair() {
        let interval = Interval::new(0.0, 10.0).unwrap();
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, "[0.0,10.0]");

        let parsed: Interval = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(parsed, Interval::new(3.0, 4.0).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_reversed() {
        let parsed: Result<Interval, _> = serde_json::from_str("[9, 4]");
        assert!(parsed.is_err());
    }
}
