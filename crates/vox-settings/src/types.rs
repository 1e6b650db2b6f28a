//! Settings types.
//!
//! Every struct uses `#[serde(default)]` so a partial user file only needs
//! the keys it overrides.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoxSettings {
    /// Request authentication.
    pub auth: AuthSettings,
    /// Out-of-band progressive responses.
    pub progressive: ProgressiveSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Request authentication settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// Maximum distance between the request timestamp and now, in seconds.
    pub timestamp_tolerance_secs: u64,
    /// Timeout for fetching a signing certificate, in milliseconds.
    pub certificate_fetch_timeout_ms: u64,
    /// Where signing certificates must come from.
    pub trust_anchor: TrustAnchor,
    /// Digest used to verify RSA body signatures.
    pub signature_digest: SignatureDigest,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            timestamp_tolerance_secs: 150,
            certificate_fetch_timeout_ms: 10_000,
            trust_anchor: TrustAnchor::default(),
            signature_digest: SignatureDigest::default(),
        }
    }
}

/// Digest of the platform's body signature.
///
/// Applies to RSA certificates. EC certificates always verify with P-256
/// and SHA-256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureDigest {
    /// PKCS#1 v1.5 with SHA-1, what the platform signs with.
    #[default]
    Sha1,
    /// PKCS#1 v1.5 with SHA-256.
    Sha256,
}

impl SignatureDigest {
    /// Parse `"sha1"` or `"sha256"` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// The fixed authority a signing certificate URL and subject must match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustAnchor {
    /// Required URL scheme.
    pub scheme: String,
    /// Required host name (compared case-insensitively).
    pub host: String,
    /// Required prefix of the normalized URL path.
    pub path_prefix: String,
    /// Required port when one is given explicitly.
    pub port: u16,
    /// Required certificate subject common name.
    pub common_name: String,
}

impl Default for TrustAnchor {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "s3.amazonaws.com".to_string(),
            path_prefix: "/echo.api/".to_string(),
            port: 443,
            common_name: "echo-api.amazon.com".to_string(),
        }
    }
}

/// Progressive response settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressiveSettings {
    /// HTTP timeout for the directive POST, in milliseconds.
    pub timeout_ms: u64,
    /// Maximum spoken characters per progressive directive.
    pub max_speech_chars: usize,
}

impl Default for ProgressiveSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_speech_chars: 600,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level passed to the `tracing` filter.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
