//! Spoken output.

use serde::Serialize;
use vox_core::ResponseError;

use crate::marshal::Validate;

/// Maximum characters in one speech payload.
pub const SPEECH_LIMIT: usize = 8_000;

/// Text the device speaks, as plain text or SSML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    /// Plain text.
    PlainText {
        /// The text to speak.
        text: String,
    },
    /// Speech Synthesis Markup Language.
    #[serde(rename = "SSML")]
    Ssml {
        /// The SSML document.
        ssml: String,
    },
}

impl OutputSpeech {
    /// Plain text speech.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    /// SSML speech.
    pub fn ssml(ssml: impl Into<String>) -> Self {
        Self::Ssml { ssml: ssml.into() }
    }

    /// Plain text or SSML depending on `as_ssml`.
    pub fn new(message: impl Into<String>, as_ssml: bool) -> Self {
        if as_ssml {
            Self::ssml(message)
        } else {
            Self::plain_text(message)
        }
    }

    /// The spoken payload, whichever form it is in.
    pub fn content(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
            Self::Ssml { ssml } => ssml,
        }
    }
}

impl Validate for OutputSpeech {
    fn check(&self) -> Result<(), ResponseError> {
        ResponseError::check_size("Speech", self.content(), SPEECH_LIMIT)
    }
}

/// Speech used when the user does not answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    /// What to say.
    pub output_speech: OutputSpeech,
}

impl Reprompt {
    /// Wrap a speech node.
    pub fn new(output_speech: OutputSpeech) -> Self {
        Self { output_speech }
    }
}

impl Validate for Reprompt {
    fn children(&self) -> Vec<&dyn Validate> {
        vec![&self.output_speech as &dyn Validate]
    }
}
