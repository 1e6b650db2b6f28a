//! The decoded inbound event.

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use vox_core::{ApplicationId, DecodeError};

use crate::context::Context;
use crate::registry::RequestRegistry;
use crate::request::Request;
use crate::session::Session;

/// One inbound platform event, decoded and immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Protocol version string.
    pub version: String,
    /// The polymorphic request.
    pub request: Request,
    /// Session, for session-scoped request kinds.
    pub session: Option<Session>,
    /// Platform and device snapshot.
    pub context: Option<Context>,
}

/// Top-level envelope before the nested parts are decoded.
#[derive(Deserialize)]
struct Envelope {
    version: String,
    request: Value,
    #[serde(default)]
    session: Option<Value>,
    #[serde(default)]
    context: Option<Value>,
}

impl Event {
    /// Decode an event from raw body bytes.
    pub fn from_slice(body: &[u8], registry: &RequestRegistry) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| DecodeError::invalid("event", e))?;
        Self::decode(&value, registry)
    }

    /// Decode an event from a parsed JSON object.
    ///
    /// The `request` object is decoded through `registry`; `session` and
    /// `context` are optional and treated as absent when `null` or empty.
    #[instrument(skip_all)]
    pub fn decode(value: &Value, registry: &RequestRegistry) -> Result<Self, DecodeError> {
        let envelope =
            Envelope::deserialize(value).map_err(|e| DecodeError::invalid("event", e))?;

        let request = registry.decode(&envelope.request)?;

        let session = match envelope.session.filter(is_present) {
            Some(v) => Some(
                Session::deserialize(&v).map_err(|e| DecodeError::invalid("session", e))?,
            ),
            None => None,
        };

        let context = match envelope.context.filter(is_present) {
            Some(v) => Some(
                Context::deserialize(&v).map_err(|e| DecodeError::invalid("context", e))?,
            ),
            None => None,
        };

        Ok(Self {
            version: envelope.version,
            request,
            session,
            context,
        })
    }

    /// The application this event is addressed to.
    ///
    /// The session's application wins; the context's system application is
    /// the fallback for requests sent outside a session.
    pub fn application_id(&self) -> Option<&ApplicationId> {
        self.session
            .as_ref()
            .map(|s| &s.application.application_id)
            .or_else(|| {
                self.context
                    .as_ref()
                    .map(|c| &c.system.application.application_id)
            })
    }

    /// Whether this event opens a new session.
    pub fn is_new_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_new)
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::LAUNCH_REQUEST;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn launch() -> Value {
        json!({
            "type": "LaunchRequest",
            "requestId": "req-1",
            "locale": "en-US",
            "timestamp": "2024-05-01T12:00:00Z"
        })
    }

    fn session(app: &str, is_new: bool) -> Value {
        json!({
            "new": is_new,
            "sessionId": "s-1",
            "application": {"applicationId": app},
            "attributes": {"visits": 3},
            "user": {"userId": "u-1"}
        })
    }

    fn context(app: &str) -> Value {
        json!({
            "System": {
                "application": {"applicationId": app},
                "user": {"userId": "u-1"},
                "device": {"supportedInterfaces": {}}
            }
        })
    }

    #[test]
    fn decodes_full_event() {
        let reg = RequestRegistry::default();
        let event = Event::decode(
            &json!({
                "version": "1.0",
                "session": session("app-session", true),
                "context": context("app-context"),
                "request": launch()
            }),
            &reg,
        )
        .unwrap();

        assert_eq!(event.version, "1.0");
        assert_eq!(event.request.request_type(), LAUNCH_REQUEST);
        assert!(event.is_new_session());
        assert_eq!(event.session.as_ref().unwrap().attributes["visits"], 3);
        assert!(event.context.is_some());
    }

    #[test]
    fn session_application_wins_over_context() {
        let reg = RequestRegistry::default();
        let event = Event::decode(
            &json!({
                "version": "1.0",
                "session": session("app-session", false),
                "context": context("app-context"),
                "request": launch()
            }),
            &reg,
        )
        .unwrap();
        assert_eq!(event.application_id().unwrap().as_str(), "app-session");
    }

    #[test]
    fn context_application_is_fallback() {
        let reg = RequestRegistry::default();
        let event = Event::decode(
            &json!({"version": "1.0", "context": context("app-context"), "request": launch()}),
            &reg,
        )
        .unwrap();
        assert!(event.session.is_none());
        assert!(!event.is_new_session());
        assert_eq!(event.application_id().unwrap().as_str(), "app-context");
    }

    #[test]
    fn no_session_or_context_has_no_application() {
        let reg = RequestRegistry::default();
        let event = Event::decode(&json!({"version": "1.0", "request": launch()}), &reg).unwrap();
        assert!(event.application_id().is_none());
    }

    #[test]
    fn empty_session_is_absent() {
        let reg = RequestRegistry::default();
        let event = Event::decode(
            &json!({"version": "1.0", "session": {}, "context": null, "request": launch()}),
            &reg,
        )
        .unwrap();
        assert!(event.session.is_none());
        assert!(event.context.is_none());
    }

    #[test]
    fn missing_version_is_invalid() {
        let reg = RequestRegistry::default();
        let err = Event::decode(&json!({"request": launch()}), &reg).unwrap_err();
        assert_matches!(err, DecodeError::InvalidPayload { context, .. } if context == "event");
    }

    #[test]
    fn request_without_type_fails() {
        let reg = RequestRegistry::default();
        let err = Event::decode(
            &json!({"version": "1.0", "request": {"requestId": "r"}}),
            &reg,
        )
        .unwrap_err();
        assert_matches!(err, DecodeError::MissingDiscriminator);
    }

    #[test]
    fn malformed_session_is_invalid() {
        let reg = RequestRegistry::default();
        let err = Event::decode(
            &json!({"version": "1.0", "session": {"new": true}, "request": launch()}),
            &reg,
        )
        .unwrap_err();
        assert_matches!(err, DecodeError::InvalidPayload { context, .. } if context == "session");
    }

    #[test]
    fn from_slice_rejects_non_json() {
        let reg = RequestRegistry::default();
        let err = Event::from_slice(b"not json", &reg).unwrap_err();
        assert_matches!(err, DecodeError::InvalidPayload { .. });
    }
}
