//! Capacity tuning analysis engine
//!
//! This crate provides the core functionality for:
//! - Resolving the analysis time window
//! - Building the metric query catalog for a scope and mode
//! - Dispatching queries concurrently against the telemetry provider
//! - Time-aligned series algebra and statistical summaries
//! - Peak-ratio capacity planning
//! - Threshold-based tuning recommendations and structured export

pub mod analysis;
pub mod capacity;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod provider;
pub mod recommend;
pub mod series;
pub mod stats;
pub mod window;

pub use analysis::{analyze, Analysis, AnalysisResult};
pub use capacity::{locate_peak, CapacityPlan, CapacityReport, PeakRatio};
pub use catalog::QueryCatalog;
pub use config::TelemetryConfig;
pub use error::{AnalysisError, ProviderError};
pub use export::ExportDocument;
pub use models::*;
pub use observability::StructuredLogger;
pub use orchestrator::{QueryOrchestrator, RawSeriesSet};
pub use provider::{DatadogClient, TelemetrySource};
pub use recommend::{Recommendation, RuleId, Thresholds};
pub use series::AlignedSeries;
pub use stats::{summarize, SeriesStats};
