//! The `audit` and `incident` commands
//!
//! Both share one argument set and one pipeline; the mode only changes the
//! default window, the catalog contents and the rules applied.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tuner_lib::analysis;
use tuner_lib::{
    window, DatadogClient, ExportDocument, Mode, QueryOrchestrator, Scope, StructuredLogger,
    TelemetryConfig, Thresholds, DEFAULT_NAMESPACE,
};

use crate::config::Config;
use crate::output::{print_report, print_success, OutputFormat};

/// Scope, window and export options shared by both modes
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Cluster name (kube_cluster_name tag)
    #[arg(long)]
    pub cluster: Option<String>,

    /// Namespace of the deployment
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Deployment to analyze
    #[arg(long, short)]
    pub deployment: Option<String>,

    /// Horizontal pod autoscaler name (defaults to the deployment name)
    #[arg(long)]
    pub hpa: Option<String>,

    /// Window start (RFC 3339 or "YYYY-MM-DD HH:MM:SS", UTC)
    #[arg(long)]
    pub from: Option<String>,

    /// Window end (defaults to now)
    #[arg(long)]
    pub to: Option<String>,

    /// Relative window such as 30m, 6h or 7d
    #[arg(long, conflicts_with = "from")]
    pub window: Option<String>,

    /// Datadog site, e.g. datadoghq.eu
    #[arg(long, env = "DD_SITE")]
    pub site: Option<String>,

    /// Write the JSON export document to this file
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Resolve inputs, run the analysis and render or export the result
pub async fn run(
    mode: Mode,
    args: AnalyzeArgs,
    user_config: &Config,
    format: OutputFormat,
    timeout: Duration,
) -> Result<()> {
    // Everything below is validated before the first network call
    let cluster = args
        .cluster
        .or_else(|| user_config.default_cluster.clone())
        .unwrap_or_default();
    let namespace = args
        .namespace
        .or_else(|| user_config.default_namespace.clone())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let scope = Scope::new(cluster, namespace, args.deployment, args.hpa)?;

    let relative = args.window.as_deref().unwrap_or(mode.default_window());
    let window = window::resolve(args.from.as_deref(), args.to.as_deref(), relative, Utc::now())?;

    let telemetry = TelemetryConfig::from_env()?
        .with_site(args.site.or_else(|| user_config.site.clone()))
        .with_timeout(timeout);

    let logger = StructuredLogger::new(mode, &scope);
    let client = DatadogClient::new(&telemetry)?;
    let orchestrator = QueryOrchestrator::new(Arc::new(client), logger.clone()).with_timeout(timeout);

    let analysis = analysis::run(
        mode,
        scope,
        window,
        &orchestrator,
        &Thresholds::default(),
        &logger,
    )
    .await?;

    let document = ExportDocument::new(&analysis);

    if let Some(path) = &args.out {
        let bytes = document
            .write_to(path, args.pretty)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        logger.log_export_written(&path.display().to_string(), bytes);
    }

    match format {
        OutputFormat::Json => println!("{}", document.to_json(args.pretty)?),
        OutputFormat::Table => {
            print_report(&analysis);
            if let Some(path) = &args.out {
                println!();
                print_success(&format!("Export written to {}", path.display()));
            }
        }
    }

    Ok(())
}
