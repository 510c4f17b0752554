//! Error types for the analysis engine

use thiserror::Error;

/// Errors that abort an analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed or inconsistent time bounds
    #[error("invalid time window: {0}")]
    InvalidWindow(String),

    /// A required scope identifier is missing
    #[error("missing required scope: --{0}")]
    MissingScope(&'static str),

    /// Provider credentials are absent from the environment
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Settings are present but unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A provider query returned a non-success status
    #[error("query `{name}` failed ({status}): {body}")]
    ProviderQueryFailed {
        name: String,
        status: u16,
        body: String,
    },

    /// A provider query could not be completed (transport, timeout, decoding)
    #[error("query `{name}` could not be completed: {reason}")]
    ProviderUnavailable { name: String, reason: String },

    /// A query task panicked or was cancelled
    #[error("query task failed: {0}")]
    TaskFailed(String),

    /// Writing the export file failed
    #[error("failed to write export: {0}")]
    Export(#[from] std::io::Error),

    /// Serializing the export document failed
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised at the telemetry provider seam
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be understood
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The request exceeded its deadline
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl ProviderError {
    /// Attach the logical metric name this error belongs to
    pub fn into_analysis_error(self, name: &str) -> AnalysisError {
        match self {
            ProviderError::Status { status, body } => AnalysisError::ProviderQueryFailed {
                name: name.to_string(),
                status,
                body,
            },
            other => AnalysisError::ProviderUnavailable {
                name: name.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
