//! Fluent response construction.
//!
//! The builder never validates. A builder may hold states the platform would
//! reject (an oversized speech, two audio directives appended by hand); those
//! surface from [`to_wire`](crate::marshal::to_wire) when the package is
//! serialized.

use serde_json::{Map, Value};

use crate::card::{Card, Permission, PermissionsConsentCard};
use crate::directive::{
    ClearBehavior, ClearQueueDirective, Directive, PlayBehavior, PlayDirective, Stream,
};
use crate::response::{Response, ResponsePackage};
use crate::speech::{OutputSpeech, Reprompt};

/// Builds a [`Response`] one piece at a time.
///
/// Session attributes set here are merged over the inbound session's
/// attributes when the package is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseBuilder {
    response: Response,
    session_attributes: Map<String, Value>,
}

impl ResponseBuilder {
    /// An empty response that ends the session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak `message`. A reprompt keeps the session open.
    #[must_use]
    pub fn speech(mut self, message: impl Into<String>, reprompt: Option<String>) -> Self {
        self.set_speech(message.into(), reprompt, false);
        self
    }

    /// Speak an SSML document. A reprompt (also SSML) keeps the session open.
    #[must_use]
    pub fn ssml(mut self, ssml: impl Into<String>, reprompt: Option<String>) -> Self {
        self.set_speech(ssml.into(), reprompt, true);
        self
    }

    fn set_speech(&mut self, message: String, reprompt: Option<String>, as_ssml: bool) {
        self.response.output_speech = Some(OutputSpeech::new(message, as_ssml));
        if let Some(reprompt) = reprompt {
            self.response.reprompt = Some(Reprompt::new(OutputSpeech::new(reprompt, as_ssml)));
            self.response.should_end_session = false;
        }
    }

    /// Attach a simple card.
    #[must_use]
    pub fn simple_card(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.response.card = Some(Card::simple(title, content));
        self
    }

    /// Attach a standard card with an image.
    #[must_use]
    pub fn standard_card(
        mut self,
        title: impl Into<String>,
        text: impl Into<String>,
        small_image_url: impl Into<String>,
        large_image_url: Option<String>,
    ) -> Self {
        self.response.card = Some(Card::standard(title, text, small_image_url, large_image_url));
        self
    }

    /// Attach an account-linking card.
    #[must_use]
    pub fn link_account_card(mut self) -> Self {
        self.response.card = Some(Card::LinkAccount);
        self
    }

    /// Attach a permissions consent card.
    #[must_use]
    pub fn permissions_consent_card(mut self, permissions: Vec<Permission>) -> Self {
        self.response.card = Some(Card::AskForPermissionsConsent(PermissionsConsentCard {
            permissions,
        }));
        self
    }

    /// Play a stream, replacing any audio directive already present.
    ///
    /// An `expected_previous_token` implies [`PlayBehavior::Enqueue`];
    /// without one the queue is replaced.
    #[must_use]
    pub fn play_audio(
        self,
        url: impl Into<String>,
        token: impl Into<String>,
        expected_previous_token: Option<String>,
        offset_in_milliseconds: u64,
    ) -> Self {
        let expected_previous_token = expected_previous_token.filter(|t| !t.is_empty());
        let behavior = if expected_previous_token.is_some() {
            PlayBehavior::Enqueue
        } else {
            PlayBehavior::ReplaceAll
        };
        let stream = Stream {
            token: token.into(),
            url: url.into(),
            offset_in_milliseconds,
            expected_previous_token,
        };
        self.play(PlayDirective::new(behavior, stream))
    }

    /// Use a fully specified play directive, replacing any audio directive.
    #[must_use]
    pub fn play(self, directive: PlayDirective) -> Self {
        self.replace_audio(Directive::Play(directive))
    }

    /// Stop playback, replacing any audio directive already present.
    #[must_use]
    pub fn stop_audio(self) -> Self {
        self.replace_audio(Directive::Stop)
    }

    /// Clear the queue, replacing any audio directive already present.
    #[must_use]
    pub fn clear_audio_queue(self, clear_all: bool) -> Self {
        let clear_behavior = if clear_all {
            ClearBehavior::ClearAll
        } else {
            ClearBehavior::ClearEnqueued
        };
        self.replace_audio(Directive::ClearQueue(ClearQueueDirective { clear_behavior }))
    }

    /// Append a directive as-is. No audio replacement happens here.
    #[must_use]
    pub fn add_directive(mut self, directive: Directive) -> Self {
        self.response.directives.push(directive);
        self
    }

    /// Set whether the session ends after this response.
    #[must_use]
    pub fn end_session(mut self, should_end: bool) -> Self {
        self.response.should_end_session = should_end;
        self
    }

    /// Set one session attribute for the next turn.
    #[must_use]
    pub fn session_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.session_attributes.insert(key.into(), value.into());
        self
    }

    /// Set several session attributes, overwriting keys already set.
    #[must_use]
    pub fn session_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.session_attributes.extend(attributes);
        self
    }

    /// Set session attributes only where this builder has not set the key.
    #[must_use]
    pub fn default_session_attributes(mut self, defaults: Map<String, Value>) -> Self {
        for (key, value) in defaults {
            let _ = self.session_attributes.entry(key).or_insert(value);
        }
        self
    }

    /// Session attributes set on this builder.
    pub fn session_attribute_updates(&self) -> &Map<String, Value> {
        &self.session_attributes
    }

    fn replace_audio(mut self, directive: Directive) -> Self {
        self.response.directives.retain(|d| !d.is_audio());
        self.response.directives.push(directive);
        self
    }

    /// The response under construction.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Finish building.
    pub fn build(self) -> Response {
        self.response
    }

    /// Finish building and wrap in a package.
    ///
    /// `inbound` is the session's current attributes; keys set on the builder
    /// replace them.
    pub fn into_package(self, inbound: Map<String, Value>) -> ResponsePackage {
        let mut attributes = inbound;
        attributes.extend(self.session_attributes);
        ResponsePackage::new(self.response, attributes)
    }
}
