//! Core data models for the capacity tuner

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Analysis mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Wide-window cluster-wide waste discovery
    Audit,
    /// Narrow-window post-event capacity and stability analysis
    Incident,
}

impl Mode {
    /// Relative window used when no explicit bounds are given
    pub fn default_window(&self) -> &'static str {
        match self {
            Mode::Audit => "24h",
            Mode::Incident => "30m",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Audit => "audit",
            Mode::Incident => "incident",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open analysis window `[start, end)`
///
/// The only way to build one is [`TimeWindow::new`], which enforces `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AnalysisError> {
        if start >= end {
            return Err(AnalysisError::InvalidWindow(format!(
                "start ({}) must be before end ({})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Workload scope the queries are filtered by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub cluster: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hpa: Option<String>,
}

impl Scope {
    /// Build a scope, rejecting an empty cluster name
    ///
    /// An autoscaler name defaults to the deployment name when only the
    /// deployment is given.
    pub fn new(
        cluster: impl Into<String>,
        namespace: impl Into<String>,
        deployment: Option<String>,
        hpa: Option<String>,
    ) -> Result<Self, AnalysisError> {
        let cluster = cluster.into();
        if cluster.trim().is_empty() {
            return Err(AnalysisError::MissingScope("cluster"));
        }

        let namespace = namespace.into();
        let namespace = if namespace.trim().is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            namespace
        };

        let deployment = deployment.filter(|d| !d.trim().is_empty());
        let hpa = hpa
            .filter(|h| !h.trim().is_empty())
            .or_else(|| deployment.clone());

        Ok(Self {
            cluster,
            namespace,
            deployment,
            hpa,
        })
    }
}

/// Namespace used when none is given
pub const DEFAULT_NAMESPACE: &str = "default";

/// Logical metric names, raw and derived
///
/// Raw variants are the keys of the query catalog; derived variants are
/// computed from them by the analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    // Raw, cluster scope
    ClusterCpuUsageNanocores,
    ClusterCpuAllocatable,
    ClusterCpuRequested,
    ClusterMemUsage,
    ClusterMemAllocatable,
    ClusterMemRequested,
    ClusterNodeCount,
    // Raw, deployment scope
    DeploymentCpuUsageNanocores,
    DeploymentCpuRequested,
    DeploymentMemUsage,
    DeploymentMemRequested,
    DeploymentReplicasUnavailable,
    DeploymentReplicasDesired,
    PendingPods,
    // Raw, autoscaler scope
    HpaCurrentReplicas,
    HpaDesiredReplicas,
    HpaMinReplicas,
    HpaMaxReplicas,
    // Derived
    ClusterCpuUsageCores,
    ClusterCpuUsedPct,
    ClusterCpuRequestedPct,
    ClusterCpuWastePct,
    ClusterMemUsedPct,
    ClusterMemRequestedPct,
    ClusterMemWastePct,
    DeploymentCpuUsageCores,
    DeploymentCpuUsageVsRequestsPct,
    DeploymentMemUsageVsRequestsPct,
    DeploymentUnavailablePct,
    HpaReplicaRange,
    HpaReplicaGap,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::ClusterCpuUsageNanocores => "cluster_cpu_usage_nanocores",
            Metric::ClusterCpuAllocatable => "cluster_cpu_allocatable",
            Metric::ClusterCpuRequested => "cluster_cpu_requested",
            Metric::ClusterMemUsage => "cluster_mem_usage",
            Metric::ClusterMemAllocatable => "cluster_mem_allocatable",
            Metric::ClusterMemRequested => "cluster_mem_requested",
            Metric::ClusterNodeCount => "cluster_node_count",
            Metric::DeploymentCpuUsageNanocores => "deployment_cpu_usage_nanocores",
            Metric::DeploymentCpuRequested => "deployment_cpu_requested",
            Metric::DeploymentMemUsage => "deployment_mem_usage",
            Metric::DeploymentMemRequested => "deployment_mem_requested",
            Metric::DeploymentReplicasUnavailable => "deployment_replicas_unavailable",
            Metric::DeploymentReplicasDesired => "deployment_replicas_desired",
            Metric::PendingPods => "pending_pods",
            Metric::HpaCurrentReplicas => "hpa_current_replicas",
            Metric::HpaDesiredReplicas => "hpa_desired_replicas",
            Metric::HpaMinReplicas => "hpa_min_replicas",
            Metric::HpaMaxReplicas => "hpa_max_replicas",
            Metric::ClusterCpuUsageCores => "cluster_cpu_usage_cores",
            Metric::ClusterCpuUsedPct => "cluster_cpu_used_pct",
            Metric::ClusterCpuRequestedPct => "cluster_cpu_requested_pct",
            Metric::ClusterCpuWastePct => "cluster_cpu_waste_pct",
            Metric::ClusterMemUsedPct => "cluster_mem_used_pct",
            Metric::ClusterMemRequestedPct => "cluster_mem_requested_pct",
            Metric::ClusterMemWastePct => "cluster_mem_waste_pct",
            Metric::DeploymentCpuUsageCores => "deployment_cpu_usage_cores",
            Metric::DeploymentCpuUsageVsRequestsPct => "deployment_cpu_usage_vs_requests_pct",
            Metric::DeploymentMemUsageVsRequestsPct => "deployment_mem_usage_vs_requests_pct",
            Metric::DeploymentUnavailablePct => "deployment_unavailable_pct",
            Metric::HpaReplicaRange => "hpa_replica_range",
            Metric::HpaReplicaGap => "hpa_replica_gap",
        }
    }

    /// Whether the value is a memory quantity in bytes
    pub fn is_bytes(&self) -> bool {
        matches!(
            self,
            Metric::ClusterMemUsage
                | Metric::ClusterMemAllocatable
                | Metric::ClusterMemRequested
                | Metric::DeploymentMemUsage
                | Metric::DeploymentMemRequested
        )
    }

    /// Whether the value is a percentage
    pub fn is_percent(&self) -> bool {
        self.as_str().ends_with("_pct")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named provider query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricQuery {
    pub name: Metric,
    pub query: String,
}
