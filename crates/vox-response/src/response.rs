//! The response node and its outer envelope.

use serde::Serialize;
use serde_json::{Map, Value};
use vox_core::ResponseError;

use crate::card::Card;
use crate::directive::Directive;
use crate::marshal::Validate;
use crate::speech::{OutputSpeech, Reprompt};

/// Protocol version written into every response package.
pub const RESPONSE_VERSION: &str = "1.0";

/// The top-level response node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// What the device says.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    /// Card for the companion app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// What the device says if the user stays silent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    /// Whether the session closes after this response.
    pub should_end_session: bool,
    /// Side effects, in order. Always present on the wire.
    pub directives: Vec<Directive>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            output_speech: None,
            card: None,
            reprompt: None,
            should_end_session: true,
            directives: Vec::new(),
        }
    }
}

impl Response {
    /// Number of audio-player directives in the list.
    pub fn audio_directive_count(&self) -> usize {
        self.directives.iter().filter(|d| d.is_audio()).count()
    }
}

impl Validate for Response {
    fn children(&self) -> Vec<&dyn Validate> {
        vec![
            &self.output_speech as &dyn Validate,
            &self.card,
            &self.reprompt,
            &self.directives,
        ]
    }

    fn check(&self) -> Result<(), ResponseError> {
        let count = self.audio_directive_count();
        if count > 1 {
            return Err(ResponseError::TooManyAudioDirectives { count });
        }
        Ok(())
    }
}

/// Outermost envelope: version, carried-forward session attributes, response.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePackage {
    /// Protocol version.
    pub version: String,
    /// Session attributes to persist into the next request.
    pub session_attributes: Map<String, Value>,
    /// The response graph.
    pub response: Response,
}

impl ResponsePackage {
    /// Wrap a response with the session attributes to carry forward.
    pub fn new(response: Response, session_attributes: Map<String, Value>) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes,
            response,
        }
    }
}

impl Validate for ResponsePackage {
    fn children(&self) -> Vec<&dyn Validate> {
        vec![&self.response as &dyn Validate]
    }
}
