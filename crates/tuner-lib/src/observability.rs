//! Structured logging for analysis runs
//!
//! Every event carries the run's mode and cluster so JSON log lines from
//! concurrent query tasks can be correlated.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{Metric, Mode, Scope, TimeWindow};

/// Structured logger for analysis events
#[derive(Clone)]
pub struct StructuredLogger {
    mode: Mode,
    cluster: String,
}

impl StructuredLogger {
    pub fn new(mode: Mode, scope: &Scope) -> Self {
        Self {
            mode,
            cluster: scope.cluster.clone(),
        }
    }

    /// Log the start of a run
    pub fn log_run_started(&self, window: &TimeWindow, queries: usize) {
        info!(
            event = "run_started",
            mode = %self.mode,
            cluster = %self.cluster,
            window_start = %window.start().to_rfc3339(),
            window_end = %window.end().to_rfc3339(),
            queries = queries,
            "Starting capacity analysis"
        );
    }

    /// Log a query being handed to the provider
    pub fn log_query_dispatched(&self, metric: Metric, query: &str) {
        debug!(
            event = "query_dispatched",
            mode = %self.mode,
            cluster = %self.cluster,
            metric = %metric,
            query = %query,
            "Dispatching metric query"
        );
    }

    /// Log a completed query
    pub fn log_query_completed(
        &self,
        metric: Metric,
        tagged_series: usize,
        points: usize,
        elapsed: Duration,
    ) {
        if tagged_series == 0 {
            warn!(
                event = "query_empty",
                mode = %self.mode,
                cluster = %self.cluster,
                metric = %metric,
                elapsed_ms = elapsed.as_millis() as u64,
                "Query matched no series"
            );
        } else {
            info!(
                event = "query_completed",
                mode = %self.mode,
                cluster = %self.cluster,
                metric = %metric,
                tagged_series = tagged_series,
                points = points,
                elapsed_ms = elapsed.as_millis() as u64,
                "Metric query completed"
            );
        }
    }

    /// Log a failed query; the run aborts after this
    pub fn log_query_failed(&self, metric: Metric, error: &str) {
        warn!(
            event = "query_failed",
            mode = %self.mode,
            cluster = %self.cluster,
            metric = %metric,
            error = %error,
            "Metric query failed, aborting remaining queries"
        );
    }

    /// Log the end of the analysis stage
    pub fn log_analysis_complete(&self, metrics: usize, without_data: usize, recommendations: usize) {
        info!(
            event = "analysis_complete",
            mode = %self.mode,
            cluster = %self.cluster,
            metrics = metrics,
            without_data = without_data,
            recommendations = recommendations,
            "Capacity analysis complete"
        );
    }

    /// Log the export file being written
    pub fn log_export_written(&self, path: &str, bytes: usize) {
        info!(
            event = "export_written",
            mode = %self.mode,
            cluster = %self.cluster,
            path = %path,
            bytes = bytes,
            "Analysis export written"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_logger_creation() {
        let scope = Scope::new("prod", "default", None, None).unwrap();
        let logger = StructuredLogger::new(Mode::Incident, &scope);
        assert_eq!(logger.cluster, "prod");
        assert_eq!(logger.mode, Mode::Incident);
    }
}
