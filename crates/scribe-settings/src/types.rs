//! Settings type definitions with compiled defaults.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings object, shaped like `~/.scribe/settings.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeSettings {
    pub api: ApiSettings,
    pub limits: LimitSettings,
    pub pacing: PacingSettings,
    pub server: ServerSettings,
}

/// Inference service settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// API key. Usually supplied via environment rather than the file.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Endpoint base URL.
    pub base_url: String,
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_ms: 120_000,
        }
    }
}

/// Input limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum accepted media size in bytes.
    pub max_media_bytes: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_media_bytes: 104_857_600,
        }
    }
}

/// Pacing for the simulated phase transitions. The single network call
/// exposes no upload/inference split; these delays keep the timeline legible
/// and are zeroed in tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// How long the upload phase stays active after the call starts.
    pub upload_settle_ms: u64,
    /// How long the finalize phase holds before completion.
    pub finalize_hold_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            upload_settle_ms: 1_000,
            finalize_hold_ms: 800,
        }
    }
}

/// HTTP server bind settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl ScribeSettings {
    /// Startup validation: a credential must exist before any attempt runs.
    pub fn validate(&self) -> Result<()> {
        match self.api.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(SettingsError::MissingApiKey),
        }
        if self.api.timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "api.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.limits.max_media_bytes == 0 {
            return Err(SettingsError::InvalidValue(
                "limits.max_media_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
