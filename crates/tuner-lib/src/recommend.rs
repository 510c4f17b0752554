//! Threshold-based recommendation rules
//!
//! Rules are evaluated in a fixed order and never short-circuit each other.
//! Audit rules only emit when they fire; incident mode always reports its
//! five tuning steps, each either an action or "unchanged".

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::models::{Metric, Mode};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Headroom applied to observed peaks when sizing requests
const REQUEST_HEADROOM: f64 = 1.2;

/// Audit-mode thresholds, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditThresholds {
    pub cpu_waste_high_pct: f64,
    pub cpu_waste_moderate_pct: f64,
    pub mem_waste_high_pct: f64,
    /// Deployment usage/requests below this is considered oversized
    pub deployment_usage_low_pct: f64,
}

impl Default for AuditThresholds {
    fn default() -> Self {
        Self {
            cpu_waste_high_pct: 30.0,
            cpu_waste_moderate_pct: 15.0,
            mem_waste_high_pct: 25.0,
            deployment_usage_low_pct: 50.0,
        }
    }
}

/// Incident-mode thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncidentThresholds {
    /// Peak memory usage/requests, percent
    pub memory_peak_pct: f64,
    /// Peak CPU usage/requests, percent
    pub cpu_peak_pct: f64,
    /// Peak unavailable replicas/desired, percent
    pub unavailable_peak_pct: f64,
    /// Desired-minus-current replica gap
    pub replica_gap: f64,
    /// Multiplier applied to a saturated maximum replica count
    pub max_replica_headroom: f64,
    /// Requested/allocatable ratio the capacity plan is quoted at
    pub capacity_target: f64,
}

impl Default for IncidentThresholds {
    fn default() -> Self {
        Self {
            memory_peak_pct: 90.0,
            cpu_peak_pct: 80.0,
            unavailable_peak_pct: 10.0,
            replica_gap: 1.0,
            max_replica_headroom: 1.5,
            capacity_target: 0.8,
        }
    }
}

/// Thresholds for both modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub audit: AuditThresholds,
    pub incident: IncidentThresholds,
}

/// Identifies the rule that produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    CpuWasteHigh,
    CpuWasteModerate,
    MemoryWasteHigh,
    DeploymentCpuOversized,
    DeploymentMemoryOversized,
    ReplicasConstant,
    MemoryTarget,
    CpuTarget,
    ScaleUpPolicy,
    BaselineReplicas,
    MaxReplicas,
    NoActionNeeded,
}

/// One tuning suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule: RuleId,
    /// False for informational entries ("unchanged", "no action needed")
    pub action: bool,
    pub message: String,
}

impl Recommendation {
    fn action(rule: RuleId, message: String) -> Self {
        Self {
            rule,
            action: true,
            message,
        }
    }

    fn unchanged(rule: RuleId, label: &str, detail: Option<String>) -> Self {
        let message = match detail {
            Some(detail) => format!("{}: unchanged ({})", label, detail),
            None => format!("{}: unchanged (no data)", label),
        };
        Self {
            rule,
            action: false,
            message,
        }
    }
}

/// Evaluate the rules for the result's mode
pub fn recommend(result: &AnalysisResult, thresholds: &Thresholds) -> Vec<Recommendation> {
    match result.mode {
        Mode::Audit => audit_recommendations(result, &thresholds.audit),
        Mode::Incident => incident_recommendations(result, &thresholds.incident),
    }
}

/// Number recommendations for display, starting at 1
pub fn numbered(recommendations: &[Recommendation]) -> Vec<String> {
    recommendations
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r.message))
        .collect()
}

/// Audit rules in priority order
pub fn audit_recommendations(
    result: &AnalysisResult,
    thresholds: &AuditThresholds,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if let Some(waste) = result.stats(Metric::ClusterCpuWastePct) {
        let reclaim = result
            .stats(Metric::ClusterCpuAllocatable)
            .map(|alloc| {
                format!(
                    "; about {:.1} cores of requests could be released",
                    waste.avg / 100.0 * alloc.avg
                )
            })
            .unwrap_or_default();

        if waste.avg > thresholds.cpu_waste_high_pct {
            out.push(Recommendation::action(
                RuleId::CpuWasteHigh,
                format!(
                    "Cluster CPU waste averages {:.1}% of allocatable (> {:.0}%): reduce CPU requests broadly{}",
                    waste.avg, thresholds.cpu_waste_high_pct, reclaim
                ),
            ));
        } else if waste.avg > thresholds.cpu_waste_moderate_pct {
            out.push(Recommendation::action(
                RuleId::CpuWasteModerate,
                format!(
                    "Cluster CPU waste averages {:.1}% of allocatable ({:.0}-{:.0}%): review the top CPU-requesting workloads",
                    waste.avg, thresholds.cpu_waste_moderate_pct, thresholds.cpu_waste_high_pct
                ),
            ));
        }
    }

    if let Some(waste) = result.stats(Metric::ClusterMemWastePct) {
        if waste.avg > thresholds.mem_waste_high_pct {
            let reclaim = result
                .stats(Metric::ClusterMemAllocatable)
                .map(|alloc| {
                    format!(
                        " (about {:.1} GiB)",
                        waste.avg / 100.0 * alloc.avg / BYTES_PER_GIB
                    )
                })
                .unwrap_or_default();
            out.push(Recommendation::action(
                RuleId::MemoryWasteHigh,
                format!(
                    "Cluster memory waste averages {:.1}% of allocatable (> {:.0}%): reduce memory requests{}, and watch for OOM evictions afterwards",
                    waste.avg, thresholds.mem_waste_high_pct, reclaim
                ),
            ));
        }
    }

    let deployment = result.scope.deployment.as_deref().unwrap_or("deployment");

    if let Some(usage) = result.stats(Metric::DeploymentCpuUsageVsRequestsPct) {
        if usage.avg < thresholds.deployment_usage_low_pct {
            let sizing = result
                .stats(Metric::DeploymentCpuUsageCores)
                .map(|cores| {
                    format!(
                        "; peak usage was {:.2} cores, so about {:.2} cores would keep {:.0}% headroom",
                        cores.max,
                        cores.max * REQUEST_HEADROOM,
                        (REQUEST_HEADROOM - 1.0) * 100.0
                    )
                })
                .unwrap_or_default();
            out.push(Recommendation::action(
                RuleId::DeploymentCpuOversized,
                format!(
                    "{} uses {:.1}% of its CPU requests on average (< {:.0}%): CPU requests can shrink{}",
                    deployment, usage.avg, thresholds.deployment_usage_low_pct, sizing
                ),
            ));
        }
    }

    if let Some(usage) = result.stats(Metric::DeploymentMemUsageVsRequestsPct) {
        if usage.avg < thresholds.deployment_usage_low_pct {
            let sizing = result
                .stats(Metric::DeploymentMemUsage)
                .map(|mem| {
                    format!(
                        "; peak usage was {:.2} GiB, so about {:.2} GiB would keep {:.0}% headroom",
                        mem.max / BYTES_PER_GIB,
                        mem.max * REQUEST_HEADROOM / BYTES_PER_GIB,
                        (REQUEST_HEADROOM - 1.0) * 100.0
                    )
                })
                .unwrap_or_default();
            out.push(Recommendation::action(
                RuleId::DeploymentMemoryOversized,
                format!(
                    "{} uses {:.1}% of its memory requests on average (< {:.0}%): memory requests can shrink{}",
                    deployment, usage.avg, thresholds.deployment_usage_low_pct, sizing
                ),
            ));
        }
    }

    if let Some(range) = result.stats(Metric::HpaReplicaRange) {
        if range.min == 0.0 && range.max == 0.0 {
            let hpa = result.scope.hpa.as_deref().unwrap_or("autoscaler");
            let floor = result
                .stats(Metric::HpaMinReplicas)
                .map(|min| format!(" at {:.0}", min.last))
                .unwrap_or_default();
            out.push(Recommendation::action(
                RuleId::ReplicasConstant,
                format!(
                    "Autoscaler {} has min == max replicas{} for the whole window: replicas are constant, reconsider the minimum replica floor",
                    hpa, floor
                ),
            ));
        }
    }

    if out.is_empty() {
        out.push(Recommendation {
            rule: RuleId::NoActionNeeded,
            action: false,
            message: "No action needed: all metrics are within thresholds".to_string(),
        });
    }

    out
}

/// Incident tuning steps, always five entries in fixed order
pub fn incident_recommendations(
    result: &AnalysisResult,
    thresholds: &IncidentThresholds,
) -> Vec<Recommendation> {
    vec![
        memory_target_step(result, thresholds),
        cpu_target_step(result, thresholds),
        scale_up_policy_step(result, thresholds),
        baseline_replicas_step(result, thresholds),
        max_replicas_step(result, thresholds),
    ]
}

fn memory_target_step(result: &AnalysisResult, t: &IncidentThresholds) -> Recommendation {
    const LABEL: &str = "Memory target";
    let Some(ratio) = result.stats(Metric::DeploymentMemUsageVsRequestsPct) else {
        return Recommendation::unchanged(RuleId::MemoryTarget, LABEL, None);
    };

    if ratio.max > t.memory_peak_pct {
        let sizing = result
            .stats(Metric::DeploymentMemUsage)
            .map(|mem| {
                format!(
                    " to at least {:.2} GiB",
                    mem.max * REQUEST_HEADROOM / BYTES_PER_GIB
                )
            })
            .unwrap_or_default();
        Recommendation::action(
            RuleId::MemoryTarget,
            format!(
                "{}: peak memory reached {:.1}% of requests (> {:.0}%): raise memory requests and limits{}",
                LABEL, ratio.max, t.memory_peak_pct, sizing
            ),
        )
    } else {
        Recommendation::unchanged(
            RuleId::MemoryTarget,
            LABEL,
            Some(format!("peak {:.1}% of requests", ratio.max)),
        )
    }
}

fn cpu_target_step(result: &AnalysisResult, t: &IncidentThresholds) -> Recommendation {
    const LABEL: &str = "CPU target";
    let Some(ratio) = result.stats(Metric::DeploymentCpuUsageVsRequestsPct) else {
        return Recommendation::unchanged(RuleId::CpuTarget, LABEL, None);
    };

    if ratio.max > t.cpu_peak_pct {
        Recommendation::action(
            RuleId::CpuTarget,
            format!(
                "{}: peak CPU reached {:.1}% of requests (> {:.0}%): lower the autoscaler CPU utilization target or raise CPU requests",
                LABEL, ratio.max, t.cpu_peak_pct
            ),
        )
    } else {
        Recommendation::unchanged(
            RuleId::CpuTarget,
            LABEL,
            Some(format!("peak {:.1}% of requests", ratio.max)),
        )
    }
}

fn scale_up_policy_step(result: &AnalysisResult, t: &IncidentThresholds) -> Recommendation {
    const LABEL: &str = "Scale-up policy";
    let unavailable = result.stats(Metric::DeploymentUnavailablePct);
    let pending = result.stats(Metric::PendingPods);
    if unavailable.is_none() && pending.is_none() {
        return Recommendation::unchanged(RuleId::ScaleUpPolicy, LABEL, None);
    }

    let unavailable_peak = unavailable.map(|s| s.max).unwrap_or(0.0);
    let pending_peak = pending.map(|s| s.max).unwrap_or(0.0);

    if unavailable_peak > t.unavailable_peak_pct || pending_peak > 0.0 {
        let mut evidence = Vec::new();
        if unavailable_peak > 0.0 {
            evidence.push(format!(
                "up to {:.1}% of replicas were unavailable",
                unavailable_peak
            ));
        }
        if pending_peak > 0.0 {
            evidence.push(format!("{:.0} pods were pending", pending_peak));
        }
        Recommendation::action(
            RuleId::ScaleUpPolicy,
            format!(
                "{}: {}: shorten the scale-up stabilization window and allow larger scale-up steps",
                LABEL,
                evidence.join(" and ")
            ),
        )
    } else {
        Recommendation::unchanged(
            RuleId::ScaleUpPolicy,
            LABEL,
            Some(format!("peak unavailable {:.1}%", unavailable_peak)),
        )
    }
}

fn baseline_replicas_step(result: &AnalysisResult, t: &IncidentThresholds) -> Recommendation {
    const LABEL: &str = "Baseline replicas";
    let Some(gap) = result.stats(Metric::HpaReplicaGap) else {
        return Recommendation::unchanged(RuleId::BaselineReplicas, LABEL, None);
    };

    if gap.max >= t.replica_gap {
        let target = result
            .stats(Metric::HpaDesiredReplicas)
            .map(|desired| format!(" to at least {:.0}", desired.avg.ceil()))
            .unwrap_or_default();
        let current_min = result
            .stats(Metric::HpaMinReplicas)
            .map(|min| format!(" from {:.0}", min.last))
            .unwrap_or_default();
        Recommendation::action(
            RuleId::BaselineReplicas,
            format!(
                "{}: desired replicas ran up to {:.0} ahead of current: raise minReplicas{}{}",
                LABEL, gap.max, current_min, target
            ),
        )
    } else {
        Recommendation::unchanged(
            RuleId::BaselineReplicas,
            LABEL,
            Some(format!("max gap {:.0}", gap.max)),
        )
    }
}

fn max_replicas_step(result: &AnalysisResult, t: &IncidentThresholds) -> Recommendation {
    const LABEL: &str = "Maximum replicas";
    let (Some(current), Some(max)) = (
        result.stats(Metric::HpaCurrentReplicas),
        result.stats(Metric::HpaMaxReplicas),
    ) else {
        return Recommendation::unchanged(RuleId::MaxReplicas, LABEL, None);
    };

    if max.max > 0.0 && current.max >= max.max {
        let suggested = (max.max * t.max_replica_headroom).ceil();
        let capacity = result
            .capacity
            .as_ref()
            .and_then(|c| c.cpu.as_ref())
            .map(|plan| plan.scale_factor(t.capacity_target))
            .filter(|factor| *factor > 1.0)
            .map(|factor| {
                format!(
                    "; cluster allocatable CPU must grow {:.2}x to keep peak requests at {:.0}%",
                    factor,
                    t.capacity_target * 100.0
                )
            })
            .unwrap_or_default();
        Recommendation::action(
            RuleId::MaxReplicas,
            format!(
                "{}: the autoscaler hit its ceiling of {:.0} replicas: raise maxReplicas to {:.0}{}",
                LABEL, max.max, suggested, capacity
            ),
        )
    } else {
        Recommendation::unchanged(
            RuleId::MaxReplicas,
            LABEL,
            Some(format!("peak {:.0} of {:.0}", current.max, max.max)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::capacity::{CapacityPlan, CapacityReport, PeakRatio, PlanResource};
    use crate::models::{Scope, TimeWindow};
    use crate::orchestrator::RawSeriesSet;
    use crate::series::AlignedSeries;
    use chrono::{TimeZone, Utc};

    fn window() -> TimeWindow {
        let end = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        TimeWindow::new(end - chrono::Duration::hours(1), end).unwrap()
    }

    fn constant(value: f64) -> AlignedSeries {
        (0..4).map(|i| (i * 60_000, value)).collect()
    }

    fn scope() -> Scope {
        Scope::new("prod", "shop", Some("web".to_string()), None).unwrap()
    }

    fn audit(raw: RawSeriesSet) -> Vec<Recommendation> {
        let result = analyze(Mode::Audit, window(), scope(), raw);
        recommend(&result, &Thresholds::default())
    }

    fn cpu_cluster(requested: f64, used_cores: f64) -> RawSeriesSet {
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::ClusterCpuAllocatable, constant(100.0));
        raw.insert(Metric::ClusterCpuRequested, constant(requested));
        raw.insert(Metric::ClusterCpuUsageNanocores, constant(used_cores * 1e9));
        raw
    }

    fn rules(recs: &[Recommendation]) -> Vec<RuleId> {
        recs.iter().map(|r| r.rule).collect()
    }

    #[test]
    fn test_cpu_waste_brackets() {
        assert_eq!(rules(&audit(cpu_cluster(90.0, 40.0))), vec![RuleId::CpuWasteHigh]);
        assert_eq!(rules(&audit(cpu_cluster(80.0, 50.0))), vec![RuleId::CpuWasteModerate]);
        assert_eq!(rules(&audit(cpu_cluster(65.0, 50.0))), vec![RuleId::NoActionNeeded]);
    }

    #[test]
    fn test_high_cpu_waste_estimates_reclaimable_cores() {
        let recs = audit(cpu_cluster(90.0, 40.0));
        assert!(recs[0].message.contains("50.0 cores"), "{}", recs[0].message);
    }

    #[test]
    fn test_rules_accumulate_in_order() {
        let mut raw = cpu_cluster(90.0, 40.0);
        raw.insert(Metric::ClusterMemAllocatable, constant(100.0 * BYTES_PER_GIB));
        raw.insert(Metric::ClusterMemRequested, constant(80.0 * BYTES_PER_GIB));
        raw.insert(Metric::ClusterMemUsage, constant(20.0 * BYTES_PER_GIB));
        raw.insert(Metric::DeploymentCpuUsageNanocores, constant(0.2e9));
        raw.insert(Metric::DeploymentCpuRequested, constant(1.0));
        raw.insert(Metric::DeploymentMemUsage, constant(BYTES_PER_GIB));
        raw.insert(Metric::DeploymentMemRequested, constant(4.0 * BYTES_PER_GIB));
        raw.insert(Metric::HpaMinReplicas, constant(3.0));
        raw.insert(Metric::HpaMaxReplicas, constant(3.0));

        let recs = audit(raw);
        assert_eq!(
            rules(&recs),
            vec![
                RuleId::CpuWasteHigh,
                RuleId::MemoryWasteHigh,
                RuleId::DeploymentCpuOversized,
                RuleId::DeploymentMemoryOversized,
                RuleId::ReplicasConstant,
            ]
        );
        assert!(recs.iter().all(|r| r.action));
        assert!(recs[1].message.contains("60.0 GiB"), "{}", recs[1].message);
        assert!(recs[4].message.contains("at 3"), "{}", recs[4].message);

        let lines = numbered(&recs);
        assert!(lines[0].starts_with("1. Cluster CPU waste"));
        assert!(lines[4].starts_with("5. Autoscaler web"));
    }

    #[test]
    fn test_inverted_replica_range_is_not_constant() {
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::HpaMinReplicas, constant(5.0));
        raw.insert(Metric::HpaMaxReplicas, constant(3.0));
        assert_eq!(rules(&audit(raw)), vec![RuleId::NoActionNeeded]);
    }

    #[test]
    fn test_audit_thresholds_are_strict() {
        // requested 50%, used 25%: waste exactly 25
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::ClusterMemAllocatable, constant(4.0 * BYTES_PER_GIB));
        raw.insert(Metric::ClusterMemRequested, constant(2.0 * BYTES_PER_GIB));
        raw.insert(Metric::ClusterMemUsage, constant(BYTES_PER_GIB));
        // deployment at exactly 50% of requests
        raw.insert(Metric::DeploymentCpuUsageNanocores, constant(0.5e9));
        raw.insert(Metric::DeploymentCpuRequested, constant(1.0));
        raw.insert(Metric::DeploymentMemUsage, constant(BYTES_PER_GIB));
        raw.insert(Metric::DeploymentMemRequested, constant(2.0 * BYTES_PER_GIB));

        let result = analyze(Mode::Audit, window(), scope(), raw);
        assert_eq!(result.stats(Metric::ClusterMemWastePct).unwrap().avg, 25.0);
        assert_eq!(
            result.stats(Metric::DeploymentCpuUsageVsRequestsPct).unwrap().avg,
            50.0
        );
        assert_eq!(
            result.stats(Metric::DeploymentMemUsageVsRequestsPct).unwrap().avg,
            50.0
        );

        let recs = recommend(&result, &Thresholds::default());
        assert_eq!(rules(&recs), vec![RuleId::NoActionNeeded]);
    }

    #[test]
    fn test_missing_stats_never_fire() {
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::ClusterCpuAllocatable, AlignedSeries::new());
        raw.insert(Metric::ClusterCpuRequested, AlignedSeries::new());
        raw.insert(Metric::ClusterCpuUsageNanocores, AlignedSeries::new());
        let recs = audit(raw);
        assert_eq!(rules(&recs), vec![RuleId::NoActionNeeded]);
        assert!(!recs[0].action);
    }

    fn incident(raw: RawSeriesSet) -> AnalysisResult {
        analyze(Mode::Incident, window(), scope(), raw)
    }

    #[test]
    fn test_incident_steps_are_fixed_and_unchanged_without_data() {
        let recs = recommend(&incident(RawSeriesSet::new()), &Thresholds::default());
        assert_eq!(
            rules(&recs),
            vec![
                RuleId::MemoryTarget,
                RuleId::CpuTarget,
                RuleId::ScaleUpPolicy,
                RuleId::BaselineReplicas,
                RuleId::MaxReplicas,
            ]
        );
        assert!(recs.iter().all(|r| !r.action));
        assert!(recs[0].message.ends_with("unchanged (no data)"));
    }

    #[test]
    fn test_incident_steps_fire_on_stress() {
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::DeploymentMemUsage, constant(0.95 * BYTES_PER_GIB));
        raw.insert(Metric::DeploymentMemRequested, constant(BYTES_PER_GIB));
        raw.insert(Metric::DeploymentCpuUsageNanocores, constant(0.5e9));
        raw.insert(Metric::DeploymentCpuRequested, constant(1.0));
        raw.insert(Metric::DeploymentReplicasUnavailable, constant(2.0));
        raw.insert(Metric::DeploymentReplicasDesired, constant(10.0));
        raw.insert(Metric::PendingPods, constant(0.0));
        raw.insert(Metric::HpaCurrentReplicas, constant(10.0));
        raw.insert(Metric::HpaDesiredReplicas, constant(12.0));
        raw.insert(Metric::HpaMinReplicas, constant(2.0));
        raw.insert(Metric::HpaMaxReplicas, constant(10.0));

        let mut result = incident(raw);
        result.capacity = Some(CapacityReport {
            cpu: Some(CapacityPlan::from_peak(
                PlanResource::Cpu,
                PeakRatio {
                    timestamp: 0,
                    ratio: 0.96,
                    numerator: 96.0,
                    denominator: 100.0,
                },
                &[0.8],
            )),
            memory: None,
        });

        let recs = recommend(&result, &Thresholds::default());
        let fired: Vec<bool> = recs.iter().map(|r| r.action).collect();
        assert_eq!(fired, vec![true, false, true, true, true]);
        assert!(recs[1].message.contains("unchanged (peak 50.0% of requests)"));
        assert!(recs[2].message.contains("20.0% of replicas"));
        assert!(recs[3].message.contains("from 2 to at least 12"));
        assert!(recs[4].message.contains("raise maxReplicas to 15"));
        assert!(recs[4].message.contains("1.20x"), "{}", recs[4].message);
    }

    #[test]
    fn test_incident_thresholds_are_strict() {
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::DeploymentMemUsage, constant(9.0));
        raw.insert(Metric::DeploymentMemRequested, constant(10.0));
        raw.insert(Metric::DeploymentCpuUsageNanocores, constant(0.8e9));
        raw.insert(Metric::DeploymentCpuRequested, constant(1.0));
        raw.insert(Metric::DeploymentReplicasUnavailable, constant(1.0));
        raw.insert(Metric::DeploymentReplicasDesired, constant(10.0));
        raw.insert(Metric::PendingPods, constant(0.0));

        let result = incident(raw);
        assert_eq!(result.stats(Metric::DeploymentMemUsageVsRequestsPct).unwrap().max, 90.0);
        assert_eq!(result.stats(Metric::DeploymentCpuUsageVsRequestsPct).unwrap().max, 80.0);
        assert_eq!(result.stats(Metric::DeploymentUnavailablePct).unwrap().max, 10.0);

        let recs = recommend(&result, &Thresholds::default());
        for rec in &recs[..3] {
            assert!(!rec.action, "{}", rec.message);
            assert!(rec.message.contains("unchanged ("), "{}", rec.message);
        }
        assert!(recs[0].message.contains("peak 90.0%"));
        assert!(recs[1].message.contains("peak 80.0%"));
        assert!(recs[2].message.contains("peak unavailable 10.0%"));
    }

    #[test]
    fn test_pending_pods_alone_trigger_scale_up_policy() {
        let mut raw = RawSeriesSet::new();
        raw.insert(Metric::PendingPods, constant(3.0));
        let recs = recommend(&incident(raw), &Thresholds::default());
        assert!(recs[2].action);
        assert!(recs[2].message.contains("3 pods were pending"));
    }
}
