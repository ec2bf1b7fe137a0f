//! Gemini implementation of [`AnalysisClient`].
//!
//! API-key auth only: the key is injected at construction and travels as the
//! `key` query parameter, never in a header. One POST to
//! `{base}/models/{model}:generateContent` per call.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use scribe_core::{AnalysisResult, MediaPayload};

use crate::client::{AnalysisClient, ClientError};
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default request timeout. Media analysis of a large file is slow; the
/// ceiling exists so a wedged call cannot hang an attempt forever.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for [`GeminiClient`].
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key, resolved by settings before construction.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Endpoint base URL (overridable for tests).
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Config with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gemini analysis client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build the client. Fails only if the HTTP client cannot be
    /// constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key,
        )
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(
        &self,
        payload: &MediaPayload,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let request = GenerateContentRequest::for_payload(payload);

        debug!(
            model = %self.config.model,
            mime = %payload.mime_type,
            size_bytes = payload.size_bytes,
            "sending generateContent request"
        );

        let send = self.client.post(self.endpoint()).json(&request).send();
        let response = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = send => result?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generateContent failed");
            return Err(classify_failure(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = response.json() => result?,
        };

        let text = body.text().ok_or(ClientError::EmptyResponse)?;
        serde_json::from_str(&text).map_err(|e| ClientError::Parse {
            message: e.to_string(),
        })
    }
}

/// Map a non-success response to a [`ClientError`].
///
/// 401/403, or an error body that mentions the API key, means the
/// credential is wrong. Everything else (including 400, which the service
/// also returns for bad media) keeps its own message.
fn classify_failure(status: u16, body: &str) -> ClientError {
    let (message, code) = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.status),
        Err(_) => {
            let raw = body.trim();
            let message = if raw.is_empty() {
                format!("HTTP {status}")
            } else {
                raw.to_string()
            };
            (message, None)
        }
    };

    let mentions_key = message.to_ascii_lowercase().contains("api key")
        || message.contains("API_KEY");
    if matches!(status, 401 | 403) || mentions_key {
        ClientError::Auth { message }
    } else {
        ClientError::Api {
            status,
            message,
            code,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
