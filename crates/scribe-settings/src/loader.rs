//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ScribeSettings::default()`]
//! 2. If `~/.scribe/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::ScribeSettings;

/// Resolve the path to the settings file (`~/.scribe/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".scribe").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ScribeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<ScribeSettings> {
    let defaults = serde_json::to_value(ScribeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: ScribeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Integers must be valid and within range; invalid values are silently
/// ignored (fall back to file/default). `SCRIBE_API_KEY` wins over
/// `GEMINI_API_KEY`.
pub fn apply_env_overrides(settings: &mut ScribeSettings) {
    // ── API settings ────────────────────────────────────────────────
    if let Some(v) = read_env_string("SCRIBE_API_KEY").or_else(|| read_env_string("GEMINI_API_KEY"))
    {
        settings.api.api_key = Some(v);
    }
    if let Some(v) = read_env_string("SCRIBE_MODEL") {
        settings.api.model = v;
    }
    if let Some(v) = read_env_string("SCRIBE_BASE_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read_env_u64("SCRIBE_TIMEOUT_MS", 1_000, 3_600_000) {
        settings.api.timeout_ms = v;
    }

    // ── Limits and pacing ───────────────────────────────────────────
    if let Some(v) = read_env_u64("SCRIBE_MAX_MEDIA_BYTES", 1024, 1_073_741_824) {
        settings.limits.max_media_bytes = v;
    }
    if let Some(v) = read_env_u64("SCRIBE_UPLOAD_SETTLE_MS", 0, 60_000) {
        settings.pacing.upload_settle_ms = v;
    }
    if let Some(v) = read_env_u64("SCRIBE_FINALIZE_HOLD_MS", 0, 60_000) {
        settings.pacing.finalize_hold_ms = v;
    }

    // ── Server settings ─────────────────────────────────────────────
    if let Some(v) = read_env_string("SCRIBE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("SCRIBE_PORT", 1, 65535) {
        settings.server.port = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_simple_override() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": 10});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 10);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "api": {"model": "gemini-3-flash-preview", "timeout_ms": 120000}
        });
        let source = serde_json::json!({
            "api": {"timeout_ms": 30000}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["api"]["timeout_ms"], 30000);
        assert_eq!(merged["api"]["model"], "gemini-3-flash-preview");
    }

    #[test]
    fn merge_skips_nulls() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"a": null, "b": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_replaces_arrays_entirely() {
        let target = serde_json::json!({"xs": [1, 2, 3]});
        let source = serde_json::json!({"xs": [9]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["xs"], serde_json::json!([9]));
    }

    // ── file loading ────────────────────────────────────────────────

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings_from_path(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.server.port, 8787);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api": {{"model": "gemini-other"}}, "server": {{"port": 9999}}}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let settings = load_settings_from_path(file.path()).unwrap();
        assert_eq!(settings.api.model, "gemini-other");
        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.api.timeout_ms, 120_000);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();
        assert!(load_settings_from_path(file.path()).is_err());
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn u16_range_parsing() {
        assert_eq!(parse_u16_range("8080", 1, 65535), Some(8080));
        assert_eq!(parse_u16_range("0", 1, 65535), None);
        assert_eq!(parse_u16_range("abc", 1, 65535), None);
        assert_eq!(parse_u16_range("-1", 1, 65535), None);
    }

    #[test]
    fn u64_range_parsing() {
        assert_eq!(parse_u64_range("1000", 0, 60_000), Some(1000));
        assert_eq!(parse_u64_range("60001", 0, 60_000), None);
        assert_eq!(parse_u64_range("", 0, 60_000), None);
    }
}
