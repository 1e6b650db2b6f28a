//! Auth error types.
//!
//! These never leave the crate's public boolean checks; they drive the
//! `debug` diagnostics and decide whether a certificate verdict is cached.

/// Why one authentication stage failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Certificate download failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Timestamp was not an RFC 3339 instant.
    #[error("invalid timestamp {value:?}: {message}")]
    Timestamp {
        /// Raw timestamp.
        value: String,
        /// Parse failure.
        message: String,
    },

    /// Certificate URL does not match the trust anchor.
    #[error("untrusted certificate URL: {0}")]
    UntrustedUrl(String),

    /// Certificate bytes could not be parsed.
    #[error("certificate parse error: {0}")]
    Certificate(String),

    /// Certificate `notAfter` is in the past.
    #[error("certificate expired at unix time {not_after}")]
    Expired {
        /// Expiry, seconds since the epoch.
        not_after: i64,
    },

    /// Certificate subject common name is not the trust anchor's.
    #[error("certificate subject {actual:?} does not match {expected}")]
    SubjectMismatch {
        /// Required common name.
        expected: String,
        /// Common name found, if any.
        actual: Option<String>,
    },

    /// Public key algorithm is neither RSA nor EC.
    #[error("unsupported public key algorithm")]
    UnsupportedKey,

    /// Signature was not base64 or did not verify.
    #[error("signature rejected: {0}")]
    Signature(String),
}

impl AuthError {
    /// Short stage name for diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Http(_) => "fetch",
            Self::Timestamp { .. } => "freshness",
            Self::UntrustedUrl(_) => "url",
            Self::Certificate(_) | Self::UnsupportedKey => "parse",
            Self::Expired { .. } => "expiry",
            Self::SubjectMismatch { .. } => "subject",
            Self::Signature(_) => "signature",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_mismatch_display() {
        let err = AuthError::SubjectMismatch {
            expected: "echo-api.amazon.com".into(),
            actual: Some("evil.example".into()),
        };
        assert_eq!(
            err.to_string(),
            "certificate subject Some(\"evil.example\") does not match echo-api.amazon.com"
        );
        assert_eq!(err.stage(), "subject");
    }

    #[test]
    fn stages_are_distinct_per_check() {
        assert_eq!(AuthError::UntrustedUrl("x".into()).stage(), "url");
        assert_eq!(AuthError::Expired { not_after: 0 }.stage(), "expiry");
        assert_eq!(AuthError::Signature("bad".into()).stage(), "signature");
        assert_eq!(AuthError::UnsupportedKey.stage(), "parse");
    }
}
