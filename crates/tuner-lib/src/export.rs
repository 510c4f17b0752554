//! Structured export of a completed analysis

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::analysis::Analysis;
use crate::capacity::CapacityReport;
use crate::error::AnalysisError;
use crate::models::{Metric, Mode, Scope, TimeWindow};
use crate::recommend::Recommendation;
use crate::series::AlignedSeries;
use crate::stats::SeriesStats;

/// Series rendered as `[isoTimestamp, value]` pairs
pub type ExportedSeries = Vec<(String, f64)>;

/// The export document written by `--out` and printed by `--format json`
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub mode: Mode,
    pub window: &'a TimeWindow,
    pub scope: &'a Scope,
    pub metrics: &'a BTreeMap<Metric, Option<SeriesStats>>,
    pub queries: BTreeMap<Metric, String>,
    pub raw: BTreeMap<Metric, ExportedSeries>,
    pub derived: BTreeMap<Metric, ExportedSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<&'a CapacityReport>,
    pub recommendations: &'a [Recommendation],
}

fn export_series(series: &BTreeMap<Metric, AlignedSeries>) -> BTreeMap<Metric, ExportedSeries> {
    series
        .iter()
        .map(|(metric, s)| (*metric, s.to_iso_pairs()))
        .collect()
}

impl<'a> ExportDocument<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        let result = &analysis.result;
        Self {
            mode: result.mode,
            window: &result.window,
            scope: &result.scope,
            metrics: &result.metrics,
            queries: analysis.catalog.expressions(),
            raw: export_series(&result.raw),
            derived: export_series(&result.derived),
            capacity: result.capacity.as_ref(),
            recommendations: &analysis.recommendations,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, AnalysisError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the document, returning the number of bytes written
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<usize, AnalysisError> {
        let json = self.to_json(pretty)?;
        std::fs::write(path, &json)?;
        Ok(json.len())
    }
}
