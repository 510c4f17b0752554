//! Statistical summaries of aligned series

use serde::{Deserialize, Serialize};

use crate::series::AlignedSeries;

/// Summary of a series' finite samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Number of finite samples
    pub samples: usize,
    pub min: f64,
    /// Arithmetic mean
    pub avg: f64,
    pub max: f64,
    /// Value at the latest timestamp
    pub last: f64,
}

/// Summarize a series, ignoring NaN and infinite values
///
/// Returns `None` when no finite value remains, which is distinct from the
/// stats of a series of zeros.
pub fn summarize(series: &AlignedSeries) -> Option<SeriesStats> {
    let mut samples = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut last = None;

    // Ascending timestamps, so the final finite value seen is the latest one
    for value in series.values().filter(|v| v.is_finite()) {
        samples += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
        last = Some(value);
    }

    let last = last?;
    // min <= avg <= max must hold under float rounding
    let avg = (sum / samples as f64).clamp(min, max);

    Some(SeriesStats {
        samples,
        min,
        avg,
        max,
        last,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, f64)]) -> AlignedSeries {
        points.iter().copied().collect()
    }

    #[test]
    fn test_single_sample() {
        let stats = summarize(&series(&[(1, 50.0)])).unwrap();
        assert_eq!(
            stats,
            SeriesStats {
                samples: 1,
                min: 50.0,
                avg: 50.0,
                max: 50.0,
                last: 50.0
            }
        );
    }

    #[test]
    fn test_known_values() {
        let stats = summarize(&series(&[(30, 3.0), (10, 1.0), (20, 8.0)])).unwrap();
        assert_eq!(stats.samples, 3);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 8.0);
        assert!((stats.avg - 4.0).abs() < 1e-12);
        // latest timestamp, not insertion order
        assert_eq!(stats.last, 3.0);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let stats = summarize(&series(&[
            (1, 2.0),
            (2, f64::NAN),
            (3, 4.0),
            (4, f64::INFINITY),
        ]))
        .unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.last, 4.0);
    }

    #[test]
    fn test_empty_or_non_finite_is_none() {
        assert!(summarize(&AlignedSeries::new()).is_none());
        assert!(summarize(&series(&[(1, f64::NAN), (2, f64::NEG_INFINITY)])).is_none());
    }

    #[test]
    fn test_zeros_are_not_none() {
        let stats = summarize(&series(&[(1, 0.0), (2, 0.0)])).unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.avg, 0.0);
    }

    #[test]
    fn test_ordering_invariant_and_idempotence() {
        let s = series(&[(1, 0.1), (2, 0.2), (3, 0.7), (4, 1e-9), (5, 12345.678)]);
        let first = summarize(&s).unwrap();
        assert!(first.min <= first.avg && first.avg <= first.max);
        assert_eq!(Some(first), summarize(&s));
    }
}
