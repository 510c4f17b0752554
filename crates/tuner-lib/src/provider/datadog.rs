//! Datadog metrics query API client

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{async_trait, TelemetrySource};
use crate::config::TelemetryConfig;
use crate::error::{AnalysisError, ProviderError};
use crate::models::TimeWindow;
use crate::series::TaggedPoints;

const QUERY_PATH: &str = "api/v1/query";

/// Client for `GET /api/v1/query`
pub struct DatadogClient {
    client: Client,
    query_url: Url,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    /// Create a new client from provider settings
    pub fn new(config: &TelemetryConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::ProviderUnavailable {
                name: "http-client".to_string(),
                reason: e.to_string(),
            })?;

        let query_url = config
            .base_url()?
            .join(QUERY_PATH)
            .map_err(|e| AnalysisError::InvalidConfig(format!("invalid site: {}", e)))?;

        Ok(Self {
            client,
            query_url,
            api_key: config.api_key.clone(),
            app_key: config.app_key.clone(),
        })
    }
}

#[async_trait]
impl TelemetrySource for DatadogClient {
    async fn query(
        &self,
        query: &str,
        window: &TimeWindow,
    ) -> Result<Vec<TaggedPoints>, ProviderError> {
        let from = window.start().timestamp().to_string();
        let to = window.end().timestamp().to_string();

        let response = self
            .client
            .get(self.query_url.clone())
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .query(&[("from", from.as_str()), ("to", to.as_str()), ("query", query)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        if parsed.status.as_deref() == Some("error") {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: parsed.error.unwrap_or(body),
            });
        }

        debug!(query = %query, series = parsed.series.len(), "Datadog query answered");

        Ok(parsed
            .series
            .into_iter()
            .map(|s| {
                s.pointlist
                    .into_iter()
                    .map(|(ts, value)| (ts as i64, value))
                    .collect()
            })
            .collect())
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    series: Vec<ResponseSeries>,
}

#[derive(Debug, Deserialize)]
struct ResponseSeries {
    /// `[timestamp_ms, value]` pairs; value may be null
    #[serde(default)]
    pointlist: Vec<(f64, Option<f64>)>,
}
