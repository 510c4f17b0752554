//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tuner_lib::capacity::{CapacityPlan, PlanResource};
use tuner_lib::{Analysis, Metric, Mode, Recommendation, SeriesStats};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON export document
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Row for the metric summary table
#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Samples")]
    samples: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Avg")]
    avg: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Last")]
    last: String,
}

impl MetricRow {
    fn new(metric: Metric, stats: Option<&SeriesStats>) -> Self {
        let cell = |pick: fn(&SeriesStats) -> f64| format_stat(metric, stats.map(pick));
        Self {
            metric: metric.to_string(),
            samples: stats
                .map(|s| s.samples.to_string())
                .unwrap_or_else(|| "0".to_string()),
            min: cell(|s| s.min),
            avg: cell(|s| s.avg),
            max: cell(|s| s.max),
            last: cell(|s| s.last),
        }
    }
}

/// Row for the capacity plan table
#[derive(Tabled)]
struct CapacityRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Peak At")]
    peak_at: String,
    #[tabled(rename = "Requested/Allocatable")]
    peak: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Allocatable Needed")]
    required: String,
    #[tabled(rename = "Scale")]
    scale: String,
}

fn capacity_rows(plan: &CapacityPlan) -> Vec<CapacityRow> {
    let resource = match plan.resource {
        PlanResource::Cpu => "cpu",
        PlanResource::Memory => "memory",
    };
    let amount = |value: f64| match plan.resource {
        PlanResource::Cpu => format!("{:.2} cores", value),
        PlanResource::Memory => format_bytes(value),
    };

    plan.targets
        .iter()
        .map(|t| CapacityRow {
            resource: resource.to_string(),
            peak_at: plan.peak.timestamp_iso(),
            peak: format!(
                "{:.1}% ({} / {})",
                plan.peak.ratio * 100.0,
                amount(plan.peak.numerator),
                amount(plan.peak.denominator)
            ),
            target: format!("{:.0}%", t.target * 100.0),
            required: amount(t.required_denominator),
            scale: format!("x{:.2}", t.scale_factor),
        })
        .collect()
}

/// Print the human-readable report for a completed analysis
pub fn print_report(analysis: &Analysis) {
    let result = &analysis.result;
    let title = match result.mode {
        Mode::Audit => "Capacity Audit",
        Mode::Incident => "Incident Analysis",
    };

    let mut scope = format!(
        "cluster {} · namespace {}",
        result.scope.cluster, result.scope.namespace
    );
    if let Some(deployment) = &result.scope.deployment {
        scope.push_str(&format!(" · deployment {}", deployment));
    }

    println!("{} {}", title.bold(), scope.dimmed());
    println!(
        "Window: {} → {} ({} min)",
        result.window.start().to_rfc3339(),
        result.window.end().to_rfc3339(),
        result.window.duration().num_minutes()
    );
    println!();

    let rows: Vec<MetricRow> = result
        .metrics
        .iter()
        .map(|(metric, stats)| MetricRow::new(*metric, stats.as_ref()))
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    let missing = result.without_data();
    if missing > 0 {
        print_warning(&format!("{} metric(s) returned no data", missing));
    }

    if let Some(capacity) = &result.capacity {
        let rows: Vec<CapacityRow> = capacity.plans().flat_map(capacity_rows).collect();
        if !rows.is_empty() {
            println!();
            println!("{}", "Capacity Plan".bold());
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }

    println!();
    println!("{}", "Recommendations".bold());
    print_recommendations(&analysis.recommendations);
}

fn print_recommendations(recommendations: &[Recommendation]) {
    let lines = tuner_lib::recommend::numbered(recommendations);
    for (line, rec) in lines.iter().zip(recommendations) {
        if rec.action {
            println!("  {} {}", "●".yellow().bold(), line);
        } else {
            println!("  {} {}", "●".green(), line.dimmed());
        }
    }
}

/// Render one statistic for its metric's unit; `n/a` when there was no data
pub fn format_stat(metric: Metric, value: Option<f64>) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) if metric.is_bytes() => format_bytes(v),
        Some(v) if metric.is_percent() => format!("{:.1}%", v),
        Some(v) => format!("{:.2}", v),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let abs = bytes.abs();
    if abs >= GB {
        format!("{:.2}Gi", bytes / GB)
    } else if abs >= MB {
        format!("{:.2}Mi", bytes / MB)
    } else if abs >= KB {
        format!("{:.2}Ki", bytes / KB)
    } else {
        format!("{:.0}B", bytes)
    }
}
