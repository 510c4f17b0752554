//! Concurrent query dispatch
//!
//! Fans the catalog out as one task per query on a [`JoinSet`] and gathers
//! every result before analysis begins. The first failure aborts the
//! remaining tasks; no partial result is ever returned.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::catalog::QueryCatalog;
use crate::config::DEFAULT_TIMEOUT;
use crate::error::{AnalysisError, ProviderError};
use crate::models::{Metric, TimeWindow};
use crate::observability::StructuredLogger;
use crate::provider::TelemetrySource;
use crate::series::AlignedSeries;

/// Raw series per catalog entry
pub type RawSeriesSet = BTreeMap<Metric, AlignedSeries>;

/// Outcome of one query task
struct QueryOutcome {
    metric: Metric,
    result: Result<(AlignedSeries, usize), ProviderError>,
    elapsed: Duration,
}

/// Dispatches catalog queries against a telemetry source
pub struct QueryOrchestrator {
    source: Arc<dyn TelemetrySource>,
    timeout: Duration,
    logger: StructuredLogger,
}

impl QueryOrchestrator {
    pub fn new(source: Arc<dyn TelemetrySource>, logger: StructuredLogger) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
            logger,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every catalog query over the window
    pub async fn run(
        &self,
        catalog: &QueryCatalog,
        window: &TimeWindow,
    ) -> Result<RawSeriesSet, AnalysisError> {
        let mut tasks = JoinSet::new();

        for entry in catalog.iter() {
            let source = Arc::clone(&self.source);
            let metric = entry.name;
            let query = entry.query.clone();
            let window = *window;
            let timeout = self.timeout;

            self.logger.log_query_dispatched(metric, &query);

            tasks.spawn(async move {
                let started = Instant::now();
                let result = match tokio::time::timeout(timeout, source.query(&query, &window)).await
                {
                    Ok(Ok(tagged)) => {
                        let count = tagged.len();
                        Ok((AlignedSeries::sum_tagged(tagged), count))
                    }
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(ProviderError::Timeout(timeout)),
                };
                QueryOutcome {
                    metric,
                    result,
                    elapsed: started.elapsed(),
                }
            });
        }

        let mut raw = RawSeriesSet::new();

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tasks.abort_all();
                    return Err(AnalysisError::TaskFailed(e.to_string()));
                }
            };

            match outcome.result {
                Ok((series, tagged_series)) => {
                    self.logger.log_query_completed(
                        outcome.metric,
                        tagged_series,
                        series.len(),
                        outcome.elapsed,
                    );
                    raw.insert(outcome.metric, series);
                }
                Err(e) => {
                    self.logger
                        .log_query_failed(outcome.metric, &e.to_string());
                    tasks.abort_all();
                    return Err(e.into_analysis_error(outcome.metric.as_str()));
                }
            }
        }

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::models::{Mode, Scope};
    use crate::provider::async_trait;
    use crate::series::TaggedPoints;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    /// Source answering from a fixed table, keyed by query substring
    struct StaticSource {
        answers: HashMap<&'static str, Vec<TaggedPoints>>,
        fail_on: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new() -> Self {
            Self {
                answers: HashMap::new(),
                fail_on: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn answer(mut self, needle: &'static str, tagged: Vec<TaggedPoints>) -> Self {
            self.answers.insert(needle, tagged);
            self
        }

        fn failing_on(mut self, needle: &'static str) -> Self {
            self.fail_on = Some(needle);
            self
        }
    }

    #[async_trait]
    impl TelemetrySource for StaticSource {
        async fn query(
            &self,
            query: &str,
            _window: &TimeWindow,
        ) -> Result<Vec<TaggedPoints>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.is_some_and(|needle| query.contains(needle)) {
                return Err(ProviderError::Status {
                    status: 403,
                    body: "{\"errors\":[\"Forbidden\"]}".to_string(),
                });
            }
            Ok(self
                .answers
                .iter()
                .find(|(needle, _)| query.contains(*needle))
                .map(|(_, tagged)| tagged.clone())
                .unwrap_or_default())
        }
    }

    /// Source that never answers
    struct StalledSource;

    #[async_trait]
    impl TelemetrySource for StalledSource {
        async fn query(
            &self,
            _query: &str,
            _window: &TimeWindow,
        ) -> Result<Vec<TaggedPoints>, ProviderError> {
            std::future::pending::<()>().await;
            Ok(Vec::new())
        }
    }

    fn window() -> TimeWindow {
        let end = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        TimeWindow::new(end - chrono::Duration::minutes(30), end).unwrap()
    }

    fn scope() -> Scope {
        Scope::new("prod", "default", None, None).unwrap()
    }

    fn orchestrator(source: Arc<dyn TelemetrySource>) -> QueryOrchestrator {
        QueryOrchestrator::new(source, StructuredLogger::new(Mode::Audit, &scope()))
    }

    #[tokio::test]
    async fn test_gathers_every_catalog_entry() {
        let source = Arc::new(
            StaticSource::new()
                .answer(
                    "node.cpu_allocatable",
                    vec![
                        vec![(1_000, Some(4.0)), (2_000, Some(4.0))],
                        vec![(1_000, Some(8.0))],
                    ],
                )
                .answer("kubernetes.cpu.requests", vec![vec![(1_000, Some(3.0))]]),
        );
        let catalog = catalog::build(&scope(), Mode::Audit);

        let raw = assert_ok!(orchestrator(source.clone()).run(&catalog, &window()).await);

        assert_eq!(raw.len(), catalog.len());
        assert_eq!(source.calls.load(Ordering::SeqCst), catalog.len());

        let allocatable = &raw[&Metric::ClusterCpuAllocatable];
        assert_eq!(allocatable.get(1_000), Some(12.0));
        assert_eq!(allocatable.get(2_000), Some(4.0));
        assert_eq!(raw[&Metric::ClusterCpuRequested].get(1_000), Some(3.0));
        // no series matched: empty, not an error
        assert!(raw[&Metric::ClusterNodeCount].is_empty());
    }

    #[tokio::test]
    async fn test_single_failure_fails_the_run() {
        let source = Arc::new(StaticSource::new().failing_on("memory_allocatable"));
        let catalog = catalog::build(&scope(), Mode::Audit);

        let err = assert_err!(orchestrator(source).run(&catalog, &window()).await);

        match err {
            AnalysisError::ProviderQueryFailed { name, status, body } => {
                assert_eq!(name, "cluster_mem_allocatable");
                assert_eq!(status, 403);
                assert!(body.contains("Forbidden"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_reported_per_query() {
        let catalog = catalog::build(&scope(), Mode::Audit);
        let orchestrator =
            orchestrator(Arc::new(StalledSource)).with_timeout(Duration::from_millis(20));

        let err = assert_err!(orchestrator.run(&catalog, &window()).await);
        assert!(matches!(err, AnalysisError::ProviderUnavailable { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_empty_catalog_yields_empty_set() {
        let raw = assert_ok!(
            orchestrator(Arc::new(StaticSource::new()))
                .run(&QueryCatalog::default(), &window())
                .await
        );
        assert!(raw.is_empty());
    }
}
