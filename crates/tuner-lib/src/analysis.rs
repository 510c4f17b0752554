//! Analysis assembly
//!
//! Converts raw series to target units, derives utilization and waste
//! ratios, summarizes every series and, in incident mode, builds the
//! peak-based capacity plans. [`run`] chains the whole pipeline from catalog
//! to recommendations.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::capacity::{locate_peak, CapacityPlan, CapacityReport, PlanResource, DEFAULT_TARGETS};
use crate::catalog::{self, QueryCatalog};
use crate::error::AnalysisError;
use crate::models::{Metric, Mode, Scope, TimeWindow};
use crate::observability::StructuredLogger;
use crate::orchestrator::{QueryOrchestrator, RawSeriesSet};
use crate::recommend::{recommend, Recommendation, Thresholds};
use crate::series::{AlignedSeries, NANOCORES_PER_CORE};
use crate::stats::{summarize, SeriesStats};

/// Everything computed for one run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub mode: Mode,
    pub window: TimeWindow,
    pub scope: Scope,
    /// Stats for every raw and derived series; `None` when a series has no data
    pub metrics: BTreeMap<Metric, Option<SeriesStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<CapacityReport>,
    #[serde(skip)]
    pub raw: RawSeriesSet,
    #[serde(skip)]
    pub derived: BTreeMap<Metric, AlignedSeries>,
}

impl AnalysisResult {
    /// Stats for a metric, `None` when absent from the run or without data
    pub fn stats(&self, metric: Metric) -> Option<&SeriesStats> {
        self.metrics.get(&metric).and_then(|s| s.as_ref())
    }

    /// Number of metrics whose series held no finite sample
    pub fn without_data(&self) -> usize {
        self.metrics.values().filter(|s| s.is_none()).count()
    }
}

/// Build the analysis result from gathered raw series
pub fn analyze(mode: Mode, window: TimeWindow, scope: Scope, raw: RawSeriesSet) -> AnalysisResult {
    let derived = derive(&raw);

    let metrics = raw
        .iter()
        .chain(derived.iter())
        .map(|(metric, series)| (*metric, summarize(series)))
        .collect();

    let capacity = match mode {
        Mode::Incident => Some(capacity_report(&raw)),
        Mode::Audit => None,
    };

    AnalysisResult {
        mode,
        window,
        scope,
        metrics,
        capacity,
        raw,
        derived,
    }
}

fn ratio_of(
    a: Option<&AlignedSeries>,
    b: Option<&AlignedSeries>,
    multiplier: f64,
) -> Option<AlignedSeries> {
    Some(AlignedSeries::ratio(a?, b?, multiplier))
}

fn difference_of(a: Option<&AlignedSeries>, b: Option<&AlignedSeries>) -> Option<AlignedSeries> {
    Some(AlignedSeries::difference(a?, b?))
}

/// Derived series computable from the raw set
///
/// A derived metric is present whenever its inputs were queried, even if
/// they came back empty, so it is reported as "no data" rather than omitted.
fn derive(raw: &RawSeriesSet) -> BTreeMap<Metric, AlignedSeries> {
    let get = |metric: Metric| raw.get(&metric);

    let cluster_cpu_cores = get(Metric::ClusterCpuUsageNanocores)
        .map(|s| s.scale_down(NANOCORES_PER_CORE));
    let cluster_cpu_used = ratio_of(
        cluster_cpu_cores.as_ref(),
        get(Metric::ClusterCpuAllocatable),
        100.0,
    );
    let cluster_cpu_requested = ratio_of(
        get(Metric::ClusterCpuRequested),
        get(Metric::ClusterCpuAllocatable),
        100.0,
    );
    let cluster_cpu_waste = difference_of(cluster_cpu_requested.as_ref(), cluster_cpu_used.as_ref());

    let cluster_mem_used = ratio_of(
        get(Metric::ClusterMemUsage),
        get(Metric::ClusterMemAllocatable),
        100.0,
    );
    let cluster_mem_requested = ratio_of(
        get(Metric::ClusterMemRequested),
        get(Metric::ClusterMemAllocatable),
        100.0,
    );
    let cluster_mem_waste = difference_of(cluster_mem_requested.as_ref(), cluster_mem_used.as_ref());

    let deployment_cpu_cores = get(Metric::DeploymentCpuUsageNanocores)
        .map(|s| s.scale_down(NANOCORES_PER_CORE));
    let deployment_cpu_vs_requests = ratio_of(
        deployment_cpu_cores.as_ref(),
        get(Metric::DeploymentCpuRequested),
        100.0,
    );
    let deployment_mem_vs_requests = ratio_of(
        get(Metric::DeploymentMemUsage),
        get(Metric::DeploymentMemRequested),
        100.0,
    );
    let deployment_unavailable = ratio_of(
        get(Metric::DeploymentReplicasUnavailable),
        get(Metric::DeploymentReplicasDesired),
        100.0,
    );

    let hpa_range = difference_of(get(Metric::HpaMaxReplicas), get(Metric::HpaMinReplicas));
    let hpa_gap = difference_of(
        get(Metric::HpaDesiredReplicas),
        get(Metric::HpaCurrentReplicas),
    );

    [
        (Metric::ClusterCpuUsageCores, cluster_cpu_cores),
        (Metric::ClusterCpuUsedPct, cluster_cpu_used),
        (Metric::ClusterCpuRequestedPct, cluster_cpu_requested),
        (Metric::ClusterCpuWastePct, cluster_cpu_waste),
        (Metric::ClusterMemUsedPct, cluster_mem_used),
        (Metric::ClusterMemRequestedPct, cluster_mem_requested),
        (Metric::ClusterMemWastePct, cluster_mem_waste),
        (Metric::DeploymentCpuUsageCores, deployment_cpu_cores),
        (Metric::DeploymentCpuUsageVsRequestsPct, deployment_cpu_vs_requests),
        (Metric::DeploymentMemUsageVsRequestsPct, deployment_mem_vs_requests),
        (Metric::DeploymentUnavailablePct, deployment_unavailable),
        (Metric::HpaReplicaRange, hpa_range),
        (Metric::HpaReplicaGap, hpa_gap),
    ]
    .into_iter()
    .filter_map(|(metric, series)| series.map(|s| (metric, s)))
    .collect()
}

/// Requested-vs-allocatable peak plans for CPU and memory
fn capacity_report(raw: &RawSeriesSet) -> CapacityReport {
    let plan = |resource, requested: Metric, allocatable: Metric| {
        let peak = locate_peak(raw.get(&requested)?, raw.get(&allocatable)?, 1.0)?;
        Some(CapacityPlan::from_peak(resource, peak, &DEFAULT_TARGETS))
    };

    CapacityReport {
        cpu: plan(
            PlanResource::Cpu,
            Metric::ClusterCpuRequested,
            Metric::ClusterCpuAllocatable,
        ),
        memory: plan(
            PlanResource::Memory,
            Metric::ClusterMemRequested,
            Metric::ClusterMemAllocatable,
        ),
    }
}

/// Catalog, result and recommendations of a completed run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub catalog: QueryCatalog,
    pub result: AnalysisResult,
    pub recommendations: Vec<Recommendation>,
}

/// Run the full pipeline: catalog, gather, analyze, recommend
pub async fn run(
    mode: Mode,
    scope: Scope,
    window: TimeWindow,
    orchestrator: &QueryOrchestrator,
    thresholds: &Thresholds,
    logger: &StructuredLogger,
) -> Result<Analysis, AnalysisError> {
    let catalog = catalog::build(&scope, mode);
    logger.log_run_started(&window, catalog.len());

    let raw = orchestrator.run(&catalog, &window).await?;
    let result = analyze(mode, window, scope, raw);
    let recommendations = recommend(&result, thresholds);

    logger.log_analysis_complete(
        result.metrics.len(),
        result.without_data(),
        recommendations.len(),
    );

    Ok(Analysis {
        catalog,
        result,
        recommendations,
    })
}
