//! Query catalog construction
//!
//! Maps each logical [`Metric`] to the Datadog query that produces it for a
//! given scope and mode. Building the catalog performs no I/O.

use std::collections::BTreeMap;

use crate::models::{Metric, MetricQuery, Mode, Scope};

/// Logical metric name to provider query, ordered by metric
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCatalog {
    queries: BTreeMap<Metric, MetricQuery>,
}

impl QueryCatalog {
    fn insert(&mut self, name: Metric, query: String) {
        self.queries.insert(name, MetricQuery { name, query });
    }

    pub fn get(&self, name: Metric) -> Option<&MetricQuery> {
        self.queries.get(&name)
    }

    pub fn contains(&self, name: Metric) -> bool {
        self.queries.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricQuery> {
        self.queries.values()
    }

    /// Query expressions keyed by metric, as exported
    pub fn expressions(&self) -> BTreeMap<Metric, String> {
        self.queries
            .iter()
            .map(|(name, q)| (*name, q.query.clone()))
            .collect()
    }
}

/// Build the catalog for a scope and mode
pub fn build(scope: &Scope, mode: Mode) -> QueryCatalog {
    let mut catalog = QueryCatalog::default();
    let cluster = format!("kube_cluster_name:{}", scope.cluster);
    let namespaced = format!("{},kube_namespace:{}", cluster, scope.namespace);

    catalog.insert(
        Metric::ClusterCpuUsageNanocores,
        format!("sum:kubernetes.cpu.usage.total{{{}}}", cluster),
    );
    catalog.insert(
        Metric::ClusterCpuAllocatable,
        format!("sum:kubernetes_state.node.cpu_allocatable{{{}}}", cluster),
    );
    catalog.insert(
        Metric::ClusterCpuRequested,
        format!("sum:kubernetes.cpu.requests{{{}}}", cluster),
    );
    catalog.insert(
        Metric::ClusterMemUsage,
        format!("sum:kubernetes.memory.usage{{{}}}", cluster),
    );
    catalog.insert(
        Metric::ClusterMemAllocatable,
        format!("sum:kubernetes_state.node.memory_allocatable{{{}}}", cluster),
    );
    catalog.insert(
        Metric::ClusterMemRequested,
        format!("sum:kubernetes.memory.requests{{{}}}", cluster),
    );

    if let Some(deployment) = &scope.deployment {
        let filter = format!("{},kube_deployment:{}", namespaced, deployment);
        catalog.insert(
            Metric::DeploymentCpuUsageNanocores,
            format!("sum:kubernetes.cpu.usage.total{{{}}}", filter),
        );
        catalog.insert(
            Metric::DeploymentCpuRequested,
            format!("sum:kubernetes.cpu.requests{{{}}}", filter),
        );
        catalog.insert(
            Metric::DeploymentMemUsage,
            format!("sum:kubernetes.memory.usage{{{}}}", filter),
        );
        catalog.insert(
            Metric::DeploymentMemRequested,
            format!("sum:kubernetes.memory.requests{{{}}}", filter),
        );

        if mode == Mode::Incident {
            catalog.insert(
                Metric::DeploymentReplicasUnavailable,
                format!(
                    "sum:kubernetes_state.deployment.replicas_unavailable{{{}}}",
                    filter
                ),
            );
            catalog.insert(
                Metric::DeploymentReplicasDesired,
                format!("sum:kubernetes_state.deployment.replicas_desired{{{}}}", filter),
            );
        }
    }

    if let Some(hpa) = &scope.hpa {
        let filter = format!("{},horizontalpodautoscaler:{}", namespaced, hpa);
        for (name, metric) in [
            (Metric::HpaCurrentReplicas, "current_replicas"),
            (Metric::HpaDesiredReplicas, "desired_replicas"),
            (Metric::HpaMinReplicas, "min_replicas"),
            (Metric::HpaMaxReplicas, "max_replicas"),
        ] {
            catalog.insert(
                name,
                format!("max:kubernetes_state.hpa.{}{{{}}}", metric, filter),
            );
        }
    }

    match mode {
        Mode::Audit => {
            catalog.insert(
                Metric::ClusterNodeCount,
                format!("sum:kubernetes_state.node.count{{{}}}", cluster),
            );
        }
        Mode::Incident => {
            catalog.insert(
                Metric::PendingPods,
                format!(
                    "sum:kubernetes_state.pod.status_phase{{{},pod_phase:pending}}",
                    namespaced
                ),
            );
        }
    }

    catalog
}
