//! Cluster capacity tuner CLI
//!
//! Audits cluster and workload resource efficiency over a long window, or
//! analyzes a short incident window, using Datadog metrics.

mod commands;
mod config;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tuner_lib::Mode;

use commands::analyze::{self, AnalyzeArgs};
use output::{print_error, LogFormat, OutputFormat};

/// Cluster capacity tuner
#[derive(Parser)]
#[command(name = "ctune")]
#[command(author, version, about = "Capacity audits and incident analysis for Kubernetes clusters", long_about = None)]
pub struct Cli {
    /// Output format (defaults to the config file setting, then table)
    #[arg(long, short, global = true)]
    pub format: Option<OutputFormat>,

    /// Per-query timeout in seconds
    #[arg(long, global = true, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit resource efficiency over a long window (default 24h)
    Audit(AnalyzeArgs),

    /// Analyze a short incident window (default 30m)
    Incident(AnalyzeArgs),
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let user_config = config::Config::load()?;

    let format = cli
        .format
        .or_else(|| {
            user_config
                .default_format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
        })
        .unwrap_or_default();
    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Audit(args) => {
            analyze::run(Mode::Audit, args, &user_config, format, timeout).await
        }
        Commands::Incident(args) => {
            analyze::run(Mode::Incident, args, &user_config, format, timeout).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    if let Err(err) = run(cli).await {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
