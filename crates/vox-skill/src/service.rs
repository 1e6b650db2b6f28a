//! The request pipeline: authenticate, decode, dispatch, marshal.

use serde_json::{Map, Value};
use tracing::{debug, instrument};
use vox_auth::Authenticator;
use vox_core::SkillError;
use vox_request::{Event, RequestRegistry};
use vox_response::to_wire;
use vox_settings::VoxSettings;

use crate::dispatcher::Dispatcher;

/// Owns every piece of per-process state the pipeline needs.
pub struct SkillService {
    registry: RequestRegistry,
    dispatcher: Dispatcher,
    authenticator: Authenticator,
}

impl SkillService {
    /// Create a service with the standard request types and no skills.
    pub fn new(settings: &VoxSettings) -> Self {
        Self::from_parts(
            RequestRegistry::with_standard_types(),
            Dispatcher::new(),
            Authenticator::new(settings.auth.clone()),
        )
    }

    /// Assemble a service from explicit parts.
    pub fn from_parts(
        registry: RequestRegistry,
        dispatcher: Dispatcher,
        authenticator: Authenticator,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            authenticator,
        }
    }

    /// The request type registry.
    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    /// Mutable access for registering extra request types.
    pub fn registry_mut(&mut self) -> &mut RequestRegistry {
        &mut self.registry
    }

    /// The application registry.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The request authenticator.
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Whether `body` is fresh and signed by the trusted platform.
    ///
    /// The timestamp is read from `request.timestamp` in the body; a body
    /// that is not JSON or lacks it is not valid.
    pub async fn is_request_valid(&self, body: &[u8], certificate_url: &str, signature: &str) -> bool {
        let Some(timestamp) = request_timestamp(body) else {
            debug!(stage = "freshness", "request has no timestamp");
            return false;
        };
        self.authenticator
            .is_request_authentic(body, certificate_url, signature, &timestamp)
            .await
    }

    /// Decode `body`, route it, and return the wire form of the response
    /// package. Performs no authentication.
    ///
    /// The package carries the inbound session attributes with the
    /// handler's attribute updates merged over them.
    #[instrument(skip_all)]
    pub async fn get_response(&self, body: &[u8]) -> Result<Map<String, Value>, SkillError> {
        let event = Event::from_slice(body, &self.registry)?;

        let Some(builder) = self.dispatcher.dispatch(&event).await? else {
            return Err(SkillError::InvalidResponse(format!(
                "handler for {} returned no response builder",
                event.request.request_type()
            )));
        };

        let attributes = event
            .session
            .as_ref()
            .map(|s| s.attributes.clone())
            .unwrap_or_default();
        let package = builder.into_package(attributes);
        to_wire(&package).map_err(SkillError::from)
    }

    /// Authenticate `body`, then [`get_response`](Self::get_response).
    pub async fn handle(
        &self,
        body: &[u8],
        certificate_url: &str,
        signature: &str,
    ) -> Result<Map<String, Value>, SkillError> {
        if !self.is_request_valid(body, certificate_url, signature).await {
            return Err(SkillError::AuthenticationFailed);
        }
        self.get_response(body).await
    }
}

fn request_timestamp(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("request")?
        .get("timestamp")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::skill::Skill;
    use assert_matches::assert_matches;
    use serde_json::json;
    use vox_core::{DecodeError, DispatchError, ResponseError};
    use vox_response::{Directive, ResponseBuilder};

    fn body(app: &str, request_type: &str, attributes: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "version": "1.0",
            "session": {
                "new": true,
                "sessionId": "s-1",
                "application": {"applicationId": app},
                "attributes": attributes,
                "user": {"userId": "u-1"}
            },
            "request": {
                "type": request_type,
                "requestId": "req-1",
                "locale": "en-US",
                "timestamp": "2024-05-01T12:00:00Z"
            }
        }))
        .unwrap()
    }

    fn service() -> SkillService {
        let service = SkillService::new(&VoxSettings::default());
        service.dispatcher().add_skill(
            Skill::new("app-1")
                .on_launch(handler_fn(|_| Some(ResponseBuilder::new().speech("Hello", None))))
                .on_intent(
                    ["CountIntent"],
                    handler_fn(|event| {
                        let count = event
                            .session
                            .as_ref()
                            .and_then(|s| s.attributes.get("count"))
                            .and_then(Value::as_u64)
                            .unwrap_or(0);
                        Some(
                            ResponseBuilder::new()
                                .speech("Counted", None)
                                .session_attribute("count", count + 1)
                                .session_attribute("lastIntent", "CountIntent"),
                        )
                    }),
                )
                .on_session_ended(handler_fn(|_| None))
                .on_request(
                    "AudioPlayer.PlaybackStopped",
                    handler_fn(|_| {
                        Some(
                            ResponseBuilder::new()
                                .stop_audio()
                                .add_directive(Directive::Stop),
                        )
                    }),
                ),
        );
        service
    }

    #[tokio::test]
    async fn launch_produces_package() {
        let wire = service()
            .get_response(&body("app-1", "LaunchRequest", json!({})))
            .await
            .unwrap();
        assert_eq!(
            Value::Object(wire),
            json!({
                "version": "1.0",
                "sessionAttributes": {},
                "response": {
                    "outputSpeech": {"type": "PlainText", "text": "Hello"},
                    "shouldEndSession": true,
                    "directives": []
                }
            })
        );
    }

    #[tokio::test]
    async fn session_attributes_are_carried_forward() {
        let wire = service()
            .get_response(&body("app-1", "LaunchRequest", json!({"count": 4})))
            .await
            .unwrap();
        assert_eq!(wire["sessionAttributes"], json!({"count": 4}));
    }

    #[tokio::test]
    async fn handler_attributes_reach_the_wire() {
        let mut raw: Value =
            serde_json::from_slice(&body("app-1", "IntentRequest", json!({"count": 4, "user": "ada"})))
                .unwrap();
        raw["request"]["intent"] = json!({"name": "CountIntent"});
        let wire = service()
            .get_response(&serde_json::to_vec(&raw).unwrap())
            .await
            .unwrap();
        assert_eq!(
            wire["sessionAttributes"],
            json!({"count": 5, "user": "ada", "lastIntent": "CountIntent"})
        );
    }

    #[tokio::test]
    async fn handler_without_builder_is_invalid_response() {
        let err = service()
            .get_response(&body("app-1", "SessionEndedRequest", json!({})))
            .await
            .unwrap_err();
        assert_matches!(err, SkillError::InvalidResponse(_));
        assert_eq!(err.code(), vox_core::errors::INVALID_RESPONSE);
    }

    #[tokio::test]
    async fn unknown_application_is_dispatch_error() {
        let err = service()
            .get_response(&body("app-x", "LaunchRequest", json!({})))
            .await
            .unwrap_err();
        assert_matches!(err, SkillError::Dispatch(DispatchError::ApplicationNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_request_type_is_decode_error() {
        let err = service()
            .get_response(&body("app-1", "Not.A.Real.Type", json!({})))
            .await
            .unwrap_err();
        assert_matches!(err, SkillError::Decode(DecodeError::UnknownVariant { .. }));
    }

    #[tokio::test]
    async fn invalid_response_graph_fails_at_marshal() {
        let mut raw: Value = serde_json::from_slice(&body("app-1", "AudioPlayer.PlaybackStopped", json!({}))).unwrap();
        raw["request"]["token"] = json!("t");
        raw["request"]["offsetInMilliseconds"] = json!(10);
        let err = service()
            .get_response(&serde_json::to_vec(&raw).unwrap())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            SkillError::Response(ResponseError::TooManyAudioDirectives { count: 2 })
        );
    }

    #[tokio::test]
    async fn body_without_timestamp_is_not_valid() {
        let svc = service();
        assert!(
            !svc.is_request_valid(br#"{"version":"1.0"}"#, "https://s3.amazonaws.com/echo.api/c.pem", "AAAA")
                .await
        );
        assert!(!svc.is_request_valid(b"not json", "u", "s").await);
    }

    #[tokio::test]
    async fn stale_request_fails_authentication() {
        let err = service()
            .handle(
                &body("app-1", "LaunchRequest", json!({})),
                "https://s3.amazonaws.com/echo.api/cert.pem",
                "AAAA",
            )
            .await
            .unwrap_err();
        assert_matches!(err, SkillError::AuthenticationFailed);
    }

    #[test]
    fn extra_request_types_can_be_registered() {
        let mut svc = SkillService::new(&VoxSettings::default());
        svc.registry_mut().register_generic("Connections.Response");
        assert!(svc.registry().has_request_type("Connections.Response"));
        assert_eq!(svc.authenticator().settings().timestamp_tolerance_secs, 150);
    }
}
