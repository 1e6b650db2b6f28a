//! One application's handler tables.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use vox_core::ApplicationId;
use vox_request::{Event, LAUNCH_REQUEST, SESSION_ENDED_REQUEST};
use vox_response::ResponseBuilder;

use crate::handler::{RequestHandler, handler_fn};

/// Spoken by the default failsafe handler.
pub const FAILSAFE_SPEECH: &str = "This skill is unable to respond to this request. Sorry!";

type SessionStartedFn = Arc<dyn Fn(&Event) -> Map<String, Value> + Send + Sync>;

/// Handlers for one registered application.
///
/// Lookup order for an event: intent name (intent requests only), then
/// request type, then the failsafe. A new session first fires the
/// session-started callback, whose attributes seed the response.
pub struct Skill {
    application_id: ApplicationId,
    intent_handlers: HashMap<String, Arc<dyn RequestHandler>>,
    request_handlers: HashMap<String, Arc<dyn RequestHandler>>,
    session_started: Option<SessionStartedFn>,
    failsafe: Arc<dyn RequestHandler>,
}

impl Skill {
    /// Create a skill with no handlers and the default failsafe.
    pub fn new(application_id: impl Into<ApplicationId>) -> Self {
        Self {
            application_id: application_id.into(),
            intent_handlers: HashMap::new(),
            request_handlers: HashMap::new(),
            session_started: None,
            failsafe: Arc::new(handler_fn(|_| {
                Some(ResponseBuilder::new().speech(FAILSAFE_SPEECH, None))
            })),
        }
    }

    /// The application this skill answers for.
    pub fn application_id(&self) -> &ApplicationId {
        &self.application_id
    }

    /// Handle `LaunchRequest`.
    #[must_use]
    pub fn on_launch(self, handler: impl RequestHandler + 'static) -> Self {
        self.on_request(LAUNCH_REQUEST, handler)
    }

    /// Handle `SessionEndedRequest`.
    #[must_use]
    pub fn on_session_ended(self, handler: impl RequestHandler + 'static) -> Self {
        self.on_request(SESSION_ENDED_REQUEST, handler)
    }

    /// Handle one or more intents by name. Replaces earlier handlers for the
    /// same names.
    #[must_use]
    pub fn on_intent<I, S>(mut self, names: I, handler: impl RequestHandler + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handler: Arc<dyn RequestHandler> = Arc::new(handler);
        for name in names {
            let _ = self
                .intent_handlers
                .insert(name.into(), Arc::clone(&handler));
        }
        self
    }

    /// Handle a request type. Replaces an earlier handler for it.
    #[must_use]
    pub fn on_request(
        mut self,
        request_type: impl Into<String>,
        handler: impl RequestHandler + 'static,
    ) -> Self {
        let _ = self
            .request_handlers
            .insert(request_type.into(), Arc::new(handler));
        self
    }

    /// Run `callback` before routing whenever a session starts.
    ///
    /// The returned attributes initialize the session. The handler's own
    /// attributes win on conflicting keys.
    #[must_use]
    pub fn on_session_started<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Event) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.session_started = Some(Arc::new(callback));
        self
    }

    /// Replace the handler used when nothing else matches.
    #[must_use]
    pub fn on_failsafe(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.failsafe = Arc::new(handler);
        self
    }

    /// Registered intent names (sorted).
    pub fn intent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.intent_handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Request types with a handler (sorted).
    pub fn request_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.request_handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Route `event` to exactly one handler.
    pub async fn handle(&self, event: &Event) -> Option<ResponseBuilder> {
        let seeded = match &self.session_started {
            Some(callback) if event.is_new_session() => callback(event),
            _ => Map::new(),
        };

        let builder = self.route(event).await;
        if seeded.is_empty() {
            builder
        } else {
            builder.map(|b| b.default_session_attributes(seeded))
        }
    }

    async fn route(&self, event: &Event) -> Option<ResponseBuilder> {
        if let Some(intent) = event.request.intent() {
            if let Some(handler) = self.intent_handlers.get(&intent.name) {
                debug!(intent = %intent.name, "routing by intent");
                return handler.handle(event).await;
            }
        }

        let request_type = event.request.request_type();
        if let Some(handler) = self.request_handlers.get(request_type) {
            debug!(request_type, "routing by request type");
            return handler.handle(event).await;
        }

        debug!(request_type, "routing to failsafe");
        self.failsafe.handle(event).await
    }
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("application_id", &self.application_id)
            .field("intents", &self.intent_names())
            .field("request_types", &self.request_types())
            .field("session_started", &self.session_started.is_some())
            .finish_non_exhaustive()
    }
}
