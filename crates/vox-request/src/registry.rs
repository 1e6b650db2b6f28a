//! Discriminator registry for polymorphic request decoding.
//!
//! Maps the `type` string of a request object to the function that builds
//! the matching [`Request`] arm. Built-in kinds are registered by
//! [`RequestRegistry::with_standard_types`]; applications add their own with
//! [`RequestRegistry::register`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use vox_core::DecodeError;

use crate::request::{
    GenericRequest, INTENT_REQUEST, LAUNCH_REQUEST, PLAYBACK_CONTROLLER_NEXT,
    PLAYBACK_CONTROLLER_PAUSE, PLAYBACK_CONTROLLER_PLAY, PLAYBACK_CONTROLLER_PREVIOUS,
    PLAYBACK_FAILED, PLAYBACK_FINISHED, PLAYBACK_NEARLY_FINISHED, PLAYBACK_STARTED,
    PLAYBACK_STOPPED, Request, RequestCommon, SESSION_ENDED_REQUEST,
    SYSTEM_EXCEPTION_ENCOUNTERED,
};

/// Builds a typed request from the full request JSON object.
pub type DecodeFn = Arc<dyn Fn(&Value) -> Result<Request, DecodeError> + Send + Sync>;

/// Registry mapping request discriminators to decode functions.
pub struct RequestRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl RequestRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Create a registry with every built-in request kind registered.
    pub fn with_standard_types() -> Self {
        let mut reg = Self::new();

        reg.register(LAUNCH_REQUEST, |v| Ok(Request::Launch(parse(v, LAUNCH_REQUEST)?)));
        reg.register(INTENT_REQUEST, |v| Ok(Request::Intent(parse(v, INTENT_REQUEST)?)));
        reg.register(SESSION_ENDED_REQUEST, |v| {
            Ok(Request::SessionEnded(parse(v, SESSION_ENDED_REQUEST)?))
        });

        reg.register(PLAYBACK_STARTED, |v| {
            Ok(Request::PlaybackStarted(parse(v, PLAYBACK_STARTED)?))
        });
        reg.register(PLAYBACK_FINISHED, |v| {
            Ok(Request::PlaybackFinished(parse(v, PLAYBACK_FINISHED)?))
        });
        reg.register(PLAYBACK_STOPPED, |v| {
            Ok(Request::PlaybackStopped(parse(v, PLAYBACK_STOPPED)?))
        });
        reg.register(PLAYBACK_NEARLY_FINISHED, |v| {
            Ok(Request::PlaybackNearlyFinished(parse(v, PLAYBACK_NEARLY_FINISHED)?))
        });
        reg.register(PLAYBACK_FAILED, |v| {
            Ok(Request::PlaybackFailed(parse(v, PLAYBACK_FAILED)?))
        });
        reg.register(SYSTEM_EXCEPTION_ENCOUNTERED, |v| {
            Ok(Request::SystemExceptionEncountered(parse(
                v,
                SYSTEM_EXCEPTION_ENCOUNTERED,
            )?))
        });

        reg.register(PLAYBACK_CONTROLLER_NEXT, |v| {
            Ok(Request::PlaybackControllerNext(parse(v, PLAYBACK_CONTROLLER_NEXT)?))
        });
        reg.register(PLAYBACK_CONTROLLER_PAUSE, |v| {
            Ok(Request::PlaybackControllerPause(parse(v, PLAYBACK_CONTROLLER_PAUSE)?))
        });
        reg.register(PLAYBACK_CONTROLLER_PLAY, |v| {
            Ok(Request::PlaybackControllerPlay(parse(v, PLAYBACK_CONTROLLER_PLAY)?))
        });
        reg.register(PLAYBACK_CONTROLLER_PREVIOUS, |v| {
            Ok(Request::PlaybackControllerPrevious(parse(
                v,
                PLAYBACK_CONTROLLER_PREVIOUS,
            )?))
        });

        reg
    }

    /// Register a decode function for a discriminator.
    ///
    /// Re-registering a discriminator replaces the previous function.
    pub fn register<F>(&mut self, request_type: &str, decode: F)
    where
        F: Fn(&Value) -> Result<Request, DecodeError> + Send + Sync + 'static,
    {
        let _ = self
            .decoders
            .insert(request_type.to_owned(), Arc::new(decode));
    }

    /// Register a discriminator decoded as a [`GenericRequest`].
    pub fn register_generic(&mut self, request_type: &str) {
        self.register(request_type, decode_generic);
    }

    /// Decode a request object by its `type` discriminator.
    pub fn decode(&self, request: &Value) -> Result<Request, DecodeError> {
        let Some(request_type) = request.get("type").and_then(Value::as_str) else {
            return Err(DecodeError::MissingDiscriminator);
        };

        let Some(decode) = self.decoders.get(request_type) else {
            debug!(request_type, "no decoder registered");
            return Err(DecodeError::UnknownVariant {
                request_type: request_type.to_owned(),
            });
        };

        decode(request)
    }

    /// List all registered discriminators (sorted).
    pub fn registered_request_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.decoders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a discriminator is registered.
    pub fn has_request_type(&self, request_type: &str) -> bool {
        self.decoders.contains_key(request_type)
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::with_standard_types()
    }
}

/// Decode any request object into a [`GenericRequest`], keeping the raw body.
pub fn decode_generic(request: &Value) -> Result<Request, DecodeError> {
    let Some(request_type) = request.get("type").and_then(Value::as_str) else {
        return Err(DecodeError::MissingDiscriminator);
    };
    let common: RequestCommon = parse(request, request_type)?;
    Ok(Request::Other(GenericRequest {
        request_type: request_type.to_owned(),
        common,
        body: request.clone(),
    }))
}

fn parse<T: DeserializeOwned>(request: &Value, request_type: &str) -> Result<T, DecodeError> {
    T::deserialize(request).map_err(|e| DecodeError::invalid(format!("{request_type} request"), e))
}
