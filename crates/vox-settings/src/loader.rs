//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`VoxSettings::default()`]
//! 2. If `~/.vox/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `VOX_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{SignatureDigest, VoxSettings};

/// Resolve the path to the settings file (`~/.vox/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".vox").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<VoxSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<VoxSettings> {
    let defaults = serde_json::to_value(VoxSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: VoxSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
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
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut VoxSettings) {
    // ── Auth ────────────────────────────────────────────────────────
    if let Some(v) = read_env_u64("VOX_TIMESTAMP_TOLERANCE_SECS", 1, 3_600) {
        settings.auth.timestamp_tolerance_secs = v;
    }
    if let Some(v) = read_env_u64("VOX_CERT_FETCH_TIMEOUT_MS", 100, 120_000) {
        settings.auth.certificate_fetch_timeout_ms = v;
    }
    if let Some(v) = read_env_string("VOX_SIGNATURE_DIGEST") {
        match SignatureDigest::parse(&v) {
            Some(digest) => settings.auth.signature_digest = digest,
            None => tracing::warn!(key = "VOX_SIGNATURE_DIGEST", value = %v, "unknown digest, ignoring"),
        }
    }
    if let Some(v) = read_env_string("VOX_TRUST_HOST") {
        settings.auth.trust_anchor.host = v;
    }
    if let Some(v) = read_env_string("VOX_TRUST_COMMON_NAME") {
        settings.auth.trust_anchor.common_name = v;
    }

    // ── Progressive responses ───────────────────────────────────────
    if let Some(v) = read_env_u64("VOX_PROGRESSIVE_TIMEOUT_MS", 100, 60_000) {
        settings.progressive.timeout_ms = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("VOX_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_merge_nested_objects() {
        let target = json!({"auth": {"a": 1, "b": 2}});
        let source = json!({"auth": {"b": 3}});
        let merged = deep_merge(target, source);
        assert_eq!(merged, json!({"auth": {"a": 1, "b": 3}}));
    }

    #[test]
    fn deep_merge_skips_null() {
        let merged = deep_merge(json!({"a": 1}), json!({"a": null}));
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn deep_merge_replaces_arrays() {
        let merged = deep_merge(json!({"a": [1, 2]}), json!({"a": [3]}));
        assert_eq!(merged["a"], json!([3]));
    }

    #[test]
    fn parse_u64_in_range() {
        assert_eq!(parse_u64_range("150", 1, 3600), Some(150));
        assert_eq!(parse_u64_range("0", 1, 3600), None);
        assert_eq!(parse_u64_range("abc", 1, 3600), None);
        assert_eq!(parse_u64_range("-5", 1, 3600), None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.auth.trust_anchor.host, "s3.amazonaws.com");
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"auth": {"trustAnchor": {"pathPrefix": "/certs/"}}, "progressive": {"maxSpeechChars": 300}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.auth.trust_anchor.path_prefix, "/certs/");
        assert_eq!(settings.auth.trust_anchor.scheme, "https");
        assert_eq!(settings.progressive.max_speech_chars, 300);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_settings_from_path(&path).unwrap_err();
        assert!(matches!(err, crate::SettingsError::Json(_)));
    }
}
