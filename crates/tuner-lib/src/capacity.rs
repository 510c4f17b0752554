//! Peak-ratio location and capacity planning
//!
//! Finds the instant where a numerator series is largest relative to its
//! denominator and projects how large the denominator must be to bring
//! that peak down to a target ratio.

use serde::{Deserialize, Serialize};

use crate::series::{format_timestamp_ms, AlignedSeries};

/// Target ratios reported by default
pub const DEFAULT_TARGETS: [f64; 2] = [0.8, 0.7];

/// The sample with the highest numerator/denominator ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakRatio {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub ratio: f64,
    pub numerator: f64,
    pub denominator: f64,
}

impl PeakRatio {
    pub fn timestamp_iso(&self) -> String {
        format_timestamp_ms(self.timestamp)
    }
}

/// Locate the peak ratio between two series
///
/// Timestamps are scanned in ascending order; a timestamp counts only when the
/// denominator has a finite, non-zero value there. Ties keep the earliest
/// timestamp.
pub fn locate_peak(
    numerator: &AlignedSeries,
    denominator: &AlignedSeries,
    multiplier: f64,
) -> Option<PeakRatio> {
    let mut peak: Option<PeakRatio> = None;

    for (timestamp, num) in numerator.iter() {
        let Some(den) = denominator.get(timestamp) else {
            continue;
        };
        if !den.is_finite() || den == 0.0 {
            continue;
        }
        let ratio = (num / den) * multiplier;
        if !ratio.is_finite() {
            continue;
        }
        if peak.map_or(true, |p| ratio > p.ratio) {
            peak = Some(PeakRatio {
                timestamp,
                ratio,
                numerator: num,
                denominator: den,
            });
        }
    }

    peak
}

/// Resource a capacity plan is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanResource {
    Cpu,
    Memory,
}

/// Denominator required to hold the peak at one target ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityTarget {
    pub target: f64,
    pub required_denominator: f64,
    pub scale_factor: f64,
}

/// Peak-based capacity projection for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPlan {
    pub resource: PlanResource,
    pub peak: PeakRatio,
    pub targets: Vec<CapacityTarget>,
}

impl CapacityPlan {
    /// Build a plan from a located peak, evaluated at each target ratio
    pub fn from_peak(resource: PlanResource, peak: PeakRatio, targets: &[f64]) -> Self {
        let mut plan = Self {
            resource,
            peak,
            targets: Vec::with_capacity(targets.len()),
        };
        plan.targets = targets
            .iter()
            .filter(|t| t.is_finite() && **t > 0.0)
            .map(|&target| CapacityTarget {
                target,
                required_denominator: plan.required_denominator(target),
                scale_factor: plan.scale_factor(target),
            })
            .collect();
        plan
    }

    /// Denominator at which the peak numerator sits exactly at `target`
    pub fn required_denominator(&self, target: f64) -> f64 {
        self.peak.numerator / target
    }

    /// Multiple of the peak-time denominator needed to reach `target`
    pub fn scale_factor(&self, target: f64) -> f64 {
        self.required_denominator(target) / self.peak.denominator
    }
}

/// Capacity plans computed in incident mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CapacityPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<CapacityPlan>,
}

impl CapacityReport {
    pub fn plans(&self) -> impl Iterator<Item = &CapacityPlan> {
        self.cpu.iter().chain(self.memory.iter())
    }
}
