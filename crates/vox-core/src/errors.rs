//! Error taxonomy for the request pipeline.
//!
//! Each pipeline stage owns one error kind:
//!
//! - [`DecodeError`]: the inbound payload could not be turned into a typed event
//! - [`DispatchError`]: no registered skill matches the event's application
//! - [`ResponseError`]: a response node violated a size or shape constraint
//!   while being marshalled
//!
//! [`SkillError`] wraps all of them and adds the two boundary failures:
//! rejected authentication and a handler that produced no response.

use thiserror::Error;

// ── Error code constants ────────────────────────────────────────────

/// Request failed authentication.
pub const AUTHENTICATION_FAILED: &str = "AUTHENTICATION_FAILED";
/// Inbound payload could not be decoded.
pub const DECODE_FAILED: &str = "DECODE_FAILED";
/// Event could not be routed to a skill.
pub const DISPATCH_FAILED: &str = "DISPATCH_FAILED";
/// Response graph violated a platform constraint.
pub const RESPONSE_SHAPE_INVALID: &str = "RESPONSE_SHAPE_INVALID";
/// Handler did not return a response builder.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

// ─────────────────────────────────────────────────────────────────────────────
// DecodeError
// ─────────────────────────────────────────────────────────────────────────────

/// Failure to decode an inbound payload into a typed event.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The request object has no `type` field.
    #[error("unable to get request type from request data")]
    MissingDiscriminator,

    /// The `type` field names a request kind with no registered decoder.
    #[error("invalid request type: {request_type}")]
    UnknownVariant {
        /// Discriminator found in the payload.
        request_type: String,
    },

    /// A required field was missing or had the wrong shape.
    #[error("invalid {context}: {source}")]
    InvalidPayload {
        /// Which part of the payload was being decoded.
        context: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Wrap a serde failure with the payload section it occurred in.
    pub fn invalid(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidPayload {
            context: context.into(),
            source,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DispatchError
// ─────────────────────────────────────────────────────────────────────────────

/// Failure to route a decoded event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No skill is registered under the event's application id.
    #[error("no skill exists for application ID: {application_id}")]
    ApplicationNotFound {
        /// Application id resolved from the event.
        application_id: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// ResponseError
// ─────────────────────────────────────────────────────────────────────────────

/// A response node failed validation at the serialization boundary.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A field exceeded its character budget.
    #[error("{field} limit exceeded {limit} characters: {actual}")]
    SizeExceeded {
        /// Human-readable field name.
        field: &'static str,
        /// Maximum permitted characters.
        limit: usize,
        /// Actual character count.
        actual: usize,
    },

    /// A cross-field invariant was violated.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// More than one audio directive was present in a response.
    #[error("too many audio directives: {count}")]
    TooManyAudioDirectives {
        /// Number of audio directives found.
        count: usize,
    },

    /// The node graph could not be converted to JSON.
    #[error("response serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResponseError {
    /// Check a text field against a character budget.
    pub fn check_size(field: &'static str, value: &str, limit: usize) -> Result<(), Self> {
        let actual = value.chars().count();
        if actual > limit {
            return Err(Self::SizeExceeded {
                field,
                limit,
                actual,
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SkillError: top-level
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level error for processing one inbound request.
///
/// Authentication failures never carry detail: every failing check collapses
/// into [`SkillError::AuthenticationFailed`].
#[derive(Debug, Error)]
pub enum SkillError {
    /// The request is stale, unsigned, or signed by an untrusted certificate.
    #[error("request failed authentication")]
    AuthenticationFailed,

    /// Payload decode error.
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// Routing error.
    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    /// Response validation error.
    #[error("{0}")]
    Response(#[from] ResponseError),

    /// A handler returned something other than a response builder.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl SkillError {
    /// Machine-readable error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => AUTHENTICATION_FAILED,
            Self::Decode(_) => DECODE_FAILED,
            Self::Dispatch(_) => DISPATCH_FAILED,
            Self::Response(_) => RESPONSE_SHAPE_INVALID,
            Self::InvalidResponse(_) => INVALID_RESPONSE,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unknown_variant_display() {
        let err = DecodeError::UnknownVariant {
            request_type: "Not.A.Real.Type".into(),
        };
        assert_eq!(err.to_string(), "invalid request type: Not.A.Real.Type");
    }

    #[test]
    fn invalid_payload_names_context() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err = DecodeError::invalid("session", json_err);
        assert!(err.to_string().starts_with("invalid session:"));
    }

    #[test]
    fn size_exceeded_names_limit_and_actual() {
        let err = ResponseError::SizeExceeded {
            field: "Speech",
            limit: 8000,
            actual: 8001,
        };
        assert_eq!(err.to_string(), "Speech limit exceeded 8000 characters: 8001");
    }

    #[test]
    fn check_size_at_limit_passes() {
        let s = "x".repeat(10);
        assert!(ResponseError::check_size("Token", &s, 10).is_ok());
    }

    #[test]
    fn check_size_over_limit_fails() {
        let s = "x".repeat(11);
        let err = ResponseError::check_size("Token", &s, 10).unwrap_err();
        assert_matches!(
            err,
            ResponseError::SizeExceeded {
                field: "Token",
                limit: 10,
                actual: 11
            }
        );
    }

    #[test]
    fn check_size_counts_chars_not_bytes() {
        // 4 chars, 8 bytes
        assert!(ResponseError::check_size("Speech", "éééé", 4).is_ok());
    }

    #[test]
    fn skill_error_codes() {
        assert_eq!(SkillError::AuthenticationFailed.code(), AUTHENTICATION_FAILED);
        assert_eq!(
            SkillError::from(DecodeError::MissingDiscriminator).code(),
            DECODE_FAILED
        );
        assert_eq!(
            SkillError::from(DispatchError::ApplicationNotFound {
                application_id: "x".into()
            })
            .code(),
            DISPATCH_FAILED
        );
        assert_eq!(
            SkillError::from(ResponseError::TooManyAudioDirectives { count: 2 }).code(),
            RESPONSE_SHAPE_INVALID
        );
        assert_eq!(
            SkillError::InvalidResponse("none".into()).code(),
            INVALID_RESPONSE
        );
    }

    #[test]
    fn authentication_failed_hides_detail() {
        assert_eq!(
            SkillError::AuthenticationFailed.to_string(),
            "request failed authentication"
        );
    }

    #[test]
    fn dispatch_error_display() {
        let err = DispatchError::ApplicationNotFound {
            application_id: "amzn1.ask.skill.123".into(),
        };
        assert!(err.to_string().contains("amzn1.ask.skill.123"));
    }
}
