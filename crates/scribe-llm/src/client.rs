//! The [`AnalysisClient`] trait and its error type.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use scribe_core::{AnalysisResult, MediaPayload, ScribeError};

/// Errors from one analysis call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential problem: 401/403 from the service, or an error body that
    /// mentions the API key.
    #[error("authentication failed: {message}")]
    Auth {
        /// Service-provided detail.
        message: String,
    },

    /// Any other API-level failure.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service-provided detail.
        message: String,
        /// Service error code (e.g. `"RESOURCE_EXHAUSTED"`), when present.
        code: Option<String>,
    },

    /// The call succeeded but produced no text.
    #[error("the model returned no text")]
    EmptyResponse,

    /// The returned text was not a valid report.
    #[error("response did not match the report schema: {message}")]
    Parse {
        /// Parser failure description.
        message: String,
    },

    /// The call was cancelled before completing.
    #[error("analysis call cancelled")]
    Cancelled,
}

impl From<ClientError> for ScribeError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => Self::Analysis {
                message: e.to_string(),
            },
            ClientError::Auth { message } => Self::Configuration { message },
            ClientError::Api { message, .. } => Self::Analysis { message },
            ClientError::EmptyResponse => Self::EmptyResponse,
            ClientError::Parse { message } => Self::Parse { message },
            ClientError::Cancelled => Self::Cancelled,
        }
    }
}

/// A service that turns an encoded media payload into a structured report.
///
/// Implemented by [`GeminiClient`](crate::GeminiClient) in production and by
/// stubs in orchestrator tests.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Analyze one payload. Exactly one remote call; cancellation aborts it.
    async fn analyze(
        &self,
        payload: &MediaPayload,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, ClientError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
