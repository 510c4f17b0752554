//! Time-aligned series and the algebra over them
//!
//! Every series, raw or derived, is an [`AlignedSeries`]: epoch-millisecond
//! timestamps mapped to values, kept sorted by timestamp. Binary operations
//! only emit timestamps present in both inputs; partially covered instants
//! are dropped rather than zero-filled or interpolated.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

/// Nanocores per core, for CPU usage conversion
pub const NANOCORES_PER_CORE: f64 = 1e9;

/// One tagged series as returned by the provider: `(timestamp_ms, value)` pairs,
/// where a value may be missing
pub type TaggedPoints = Vec<(i64, Option<f64>)>;

/// Timestamp-keyed numeric series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    points: BTreeMap<i64, f64>,
}

impl AlignedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine the tagged series of one query into a single series
    ///
    /// Values sharing a timestamp are summed; a timestamp present in only some
    /// of the tagged series is summed over those that have it. Missing values
    /// are skipped.
    pub fn sum_tagged<I>(tagged: I) -> Self
    where
        I: IntoIterator<Item = TaggedPoints>,
    {
        let mut points = BTreeMap::new();
        for series in tagged {
            for (timestamp, value) in series {
                if let Some(value) = value {
                    *points.entry(timestamp).or_insert(0.0) += value;
                }
            }
        }
        Self { points }
    }

    pub fn get(&self, timestamp: i64) -> Option<f64> {
        self.points.get(&timestamp).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples in ascending timestamp order
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.points.iter().map(|(t, v)| (*t, *v))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.values().copied()
    }

    /// Per-value map, used for unit conversion
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            points: self.points.iter().map(|(t, v)| (*t, f(*v))).collect(),
        }
    }

    /// Divide every value by `divisor`
    pub fn scale_down(&self, divisor: f64) -> Self {
        self.map(|v| v / divisor)
    }

    /// `(a[t] / b[t]) * multiplier` over shared timestamps with a non-zero divisor
    pub fn ratio(a: &Self, b: &Self, multiplier: f64) -> Self {
        let points = a
            .points
            .iter()
            .filter_map(|(t, num)| match b.points.get(t) {
                Some(den) if *den != 0.0 => Some((*t, (num / den) * multiplier)),
                _ => None,
            })
            .collect();
        Self { points }
    }

    /// `a[t] - b[t]` over shared timestamps
    pub fn difference(a: &Self, b: &Self) -> Self {
        let points = a
            .points
            .iter()
            .filter_map(|(t, x)| b.points.get(t).map(|y| (*t, x - y)))
            .collect();
        Self { points }
    }

    /// Samples as `(ISO 8601 timestamp, value)` pairs, sorted by time
    pub fn to_iso_pairs(&self) -> Vec<(String, f64)> {
        self.iter()
            .map(|(t, v)| (format_timestamp_ms(t), v))
            .collect()
    }
}

impl FromIterator<(i64, f64)> for AlignedSeries {
    fn from_iter<T: IntoIterator<Item = (i64, f64)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Render an epoch-millisecond timestamp as RFC 3339 (UTC, millisecond precision)
pub fn format_timestamp_ms(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| timestamp.to_string())
}
