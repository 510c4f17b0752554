//! Telemetry providers
//!
//! The orchestrator talks to the outside world only through
//! [`TelemetrySource`]. The production implementation is the Datadog metrics
//! query API client.

mod datadog;

pub use datadog::DatadogClient;

use crate::error::ProviderError;
use crate::models::TimeWindow;
use crate::series::TaggedPoints;

pub use async_trait::async_trait;

/// Trait for time-series query backends
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Run one query over the window
    ///
    /// Returns every tagged series the provider matched, possibly none.
    async fn query(
        &self,
        query: &str,
        window: &TimeWindow,
    ) -> Result<Vec<TaggedPoints>, ProviderError>;
}
