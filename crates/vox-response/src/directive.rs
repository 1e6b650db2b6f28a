//! Directives: side effects the device performs besides speaking.
//!
//! Audio directives drive the audio player; at most one may appear in a
//! response. Dialog directives hand multi-turn dialog control back to the
//! platform.

use serde::Serialize;
use vox_core::ResponseError;
use vox_request::Intent;

use crate::marshal::Validate;

/// Maximum characters in a stream token or expected previous token.
pub const TOKEN_LIMIT: usize = 1_024;
/// Maximum characters in a stream URL.
pub const STREAM_URL_LIMIT: usize = 8_000;

/// A response directive, discriminated by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Directive {
    /// Start or queue a stream.
    #[serde(rename = "AudioPlayer.Play")]
    Play(PlayDirective),
    /// Stop the current stream.
    #[serde(rename = "AudioPlayer.Stop")]
    Stop,
    /// Clear the playback queue.
    #[serde(rename = "AudioPlayer.ClearQueue")]
    ClearQueue(ClearQueueDirective),
    /// Let the platform pick the next dialog step.
    #[serde(rename = "Dialog.Delegate", rename_all = "camelCase")]
    DialogDelegate {
        /// Intent with slot values changed by the skill.
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_intent: Option<Intent>,
    },
    /// Ask the user for a slot value.
    #[serde(rename = "Dialog.ElicitSlot", rename_all = "camelCase")]
    DialogElicitSlot {
        /// Slot to ask for.
        slot_to_elicit: String,
        /// Intent with slot values changed by the skill.
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_intent: Option<Intent>,
    },
    /// Ask the user to confirm a slot value.
    #[serde(rename = "Dialog.ConfirmSlot", rename_all = "camelCase")]
    DialogConfirmSlot {
        /// Slot to confirm.
        slot_to_confirm: String,
        /// Intent with slot values changed by the skill.
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_intent: Option<Intent>,
    },
    /// Ask the user to confirm the whole intent.
    #[serde(rename = "Dialog.ConfirmIntent", rename_all = "camelCase")]
    DialogConfirmIntent {
        /// Intent with slot values changed by the skill.
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_intent: Option<Intent>,
    },
}

impl Directive {
    /// Whether this directive targets the audio player.
    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Play(_) | Self::Stop | Self::ClearQueue(_))
    }

    /// Wire `type` of this directive.
    pub fn directive_type(&self) -> &'static str {
        match self {
            Self::Play(_) => "AudioPlayer.Play",
            Self::Stop => "AudioPlayer.Stop",
            Self::ClearQueue(_) => "AudioPlayer.ClearQueue",
            Self::DialogDelegate { .. } => "Dialog.Delegate",
            Self::DialogElicitSlot { .. } => "Dialog.ElicitSlot",
            Self::DialogConfirmSlot { .. } => "Dialog.ConfirmSlot",
            Self::DialogConfirmIntent { .. } => "Dialog.ConfirmIntent",
        }
    }
}

impl Validate for Directive {
    fn children(&self) -> Vec<&dyn Validate> {
        match self {
            Self::Play(play) => vec![play as &dyn Validate],
            _ => Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AudioPlayer.Play
// ─────────────────────────────────────────────────────────────────────────────

/// How a play directive interacts with the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Stop current playback and replace the queue.
    #[default]
    ReplaceAll,
    /// Append to the end of the queue.
    Enqueue,
    /// Replace the queue but keep the current stream playing.
    ReplaceEnqueued,
}

/// Start or queue a stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayDirective {
    /// Queue behavior.
    pub play_behavior: PlayBehavior,
    /// What to play.
    pub audio_item: AudioItem,
}

impl PlayDirective {
    /// Play `stream` with the given queue behavior.
    pub fn new(play_behavior: PlayBehavior, stream: Stream) -> Self {
        Self {
            play_behavior,
            audio_item: AudioItem { stream },
        }
    }
}

impl Validate for PlayDirective {
    fn children(&self) -> Vec<&dyn Validate> {
        vec![&self.audio_item.stream as &dyn Validate]
    }

    fn check(&self) -> Result<(), ResponseError> {
        let has_expected = self.audio_item.stream.has_expected_previous_token();
        match (self.play_behavior, has_expected) {
            (PlayBehavior::Enqueue, false) => Err(ResponseError::InvalidResponseShape(
                "ENQUEUE play behavior requires an expected previous token".to_string(),
            )),
            (behavior, true) if behavior != PlayBehavior::Enqueue => {
                Err(ResponseError::InvalidResponseShape(format!(
                    "expected previous token is only allowed with ENQUEUE, not {behavior:?}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Container for the stream being played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AudioItem {
    /// The stream.
    pub stream: Stream,
}

/// An audio stream reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    /// Opaque token identifying the stream.
    pub token: String,
    /// HTTPS location of the audio.
    pub url: String,
    /// Where to start playback.
    pub offset_in_milliseconds: u64,
    /// Token of the stream this one should follow when enqueued.
    #[serde(skip_serializing_if = "is_blank")]
    pub expected_previous_token: Option<String>,
}

impl Stream {
    /// A stream starting at offset zero with no predecessor.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Whether a non-empty expected previous token is set.
    pub fn has_expected_previous_token(&self) -> bool {
        !is_blank(&self.expected_previous_token)
    }
}

impl Validate for Stream {
    fn check(&self) -> Result<(), ResponseError> {
        ResponseError::check_size("Stream token", &self.token, TOKEN_LIMIT)?;
        ResponseError::check_size("Stream URL", &self.url, STREAM_URL_LIMIT)?;
        if let Some(expected) = &self.expected_previous_token {
            ResponseError::check_size("Expected previous token", expected, TOKEN_LIMIT)?;
        }
        Ok(())
    }
}

#[allow(clippy::ref_option)]
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

// ─────────────────────────────────────────────────────────────────────────────
// AudioPlayer.ClearQueue
// ─────────────────────────────────────────────────────────────────────────────

/// What a clear-queue directive removes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearBehavior {
    /// Clear the queue, keep the current stream playing.
    #[default]
    ClearEnqueued,
    /// Clear the queue and stop the current stream.
    ClearAll,
}

/// Clear the playback queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearQueueDirective {
    /// What to clear.
    pub clear_behavior: ClearBehavior,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::to_wire;
    use assert_matches::assert_matches;
    use serde_json::{Value, json};

    fn play(behavior: PlayBehavior, expected: Option<&str>) -> Directive {
        let mut stream = Stream::new("https://cdn.example/a.mp3", "track-2");
        stream.expected_previous_token = expected.map(str::to_string);
        Directive::Play(PlayDirective::new(behavior, stream))
    }

    #[test]
    fn play_wire_form() {
        let map = to_wire(&play(PlayBehavior::ReplaceAll, None)).unwrap();
        assert_eq!(
            Value::Object(map),
            json!({
                "type": "AudioPlayer.Play",
                "playBehavior": "REPLACE_ALL",
                "audioItem": {
                    "stream": {
                        "token": "track-2",
                        "url": "https://cdn.example/a.mp3",
                        "offsetInMilliseconds": 0
                    }
                }
            })
        );
    }

    #[test]
    fn enqueue_without_expected_token_fails() {
        assert_matches!(
            to_wire(&play(PlayBehavior::Enqueue, None)),
            Err(ResponseError::InvalidResponseShape(_))
        );
    }

    #[test]
    fn enqueue_with_empty_expected_token_fails() {
        assert_matches!(
            to_wire(&play(PlayBehavior::Enqueue, Some(""))),
            Err(ResponseError::InvalidResponseShape(_))
        );
    }

    #[test]
    fn non_enqueue_with_expected_token_fails() {
        for behavior in [PlayBehavior::ReplaceAll, PlayBehavior::ReplaceEnqueued] {
            assert_matches!(
                to_wire(&play(behavior, Some("track-1"))),
                Err(ResponseError::InvalidResponseShape(_))
            );
        }
    }

    #[test]
    fn enqueue_with_expected_token_passes() {
        let map = to_wire(&play(PlayBehavior::Enqueue, Some("track-1"))).unwrap();
        assert_eq!(map["playBehavior"], "ENQUEUE");
        assert_eq!(map["audioItem"]["stream"]["expectedPreviousToken"], "track-1");
    }

    #[test]
    fn non_enqueue_with_empty_expected_token_passes_and_omits_it() {
        let map = to_wire(&play(PlayBehavior::ReplaceEnqueued, Some(""))).unwrap();
        assert!(
            !map["audioItem"]["stream"]
                .as_object()
                .unwrap()
                .contains_key("expectedPreviousToken")
        );
    }

    #[test]
    fn stream_size_limits() {
        let mut stream = Stream::new("https://cdn.example/a.mp3", "t".repeat(TOKEN_LIMIT + 1));
        assert_matches!(
            stream.validate(),
            Err(ResponseError::SizeExceeded { field: "Stream token", limit: 1024, .. })
        );

        stream.token = "ok".into();
        stream.url = "u".repeat(STREAM_URL_LIMIT + 1);
        assert_matches!(
            stream.validate(),
            Err(ResponseError::SizeExceeded { field: "Stream URL", limit: 8000, .. })
        );

        stream.url = "https://cdn.example/a.mp3".into();
        stream.expected_previous_token = Some("p".repeat(TOKEN_LIMIT + 1));
        assert_matches!(
            stream.validate(),
            Err(ResponseError::SizeExceeded { field: "Expected previous token", .. })
        );
    }

    #[test]
    fn oversized_stream_reports_before_shape() {
        let mut stream = Stream::new("https://cdn.example/a.mp3", "t".repeat(TOKEN_LIMIT + 1));
        stream.expected_previous_token = None;
        let directive = Directive::Play(PlayDirective::new(PlayBehavior::Enqueue, stream));
        assert_matches!(to_wire(&directive), Err(ResponseError::SizeExceeded { .. }));
    }

    #[test]
    fn stop_and_clear_queue_wire_form() {
        let stop = to_wire(&Directive::Stop).unwrap();
        assert_eq!(Value::Object(stop), json!({"type": "AudioPlayer.Stop"}));

        let clear = to_wire(&Directive::ClearQueue(ClearQueueDirective {
            clear_behavior: ClearBehavior::ClearAll,
        }))
        .unwrap();
        assert_eq!(
            Value::Object(clear),
            json!({"type": "AudioPlayer.ClearQueue", "clearBehavior": "CLEAR_ALL"})
        );
    }

    #[test]
    fn dialog_directives_wire_form() {
        let elicit = to_wire(&Directive::DialogElicitSlot {
            slot_to_elicit: "city".into(),
            updated_intent: None,
        })
        .unwrap();
        assert_eq!(
            Value::Object(elicit),
            json!({"type": "Dialog.ElicitSlot", "slotToElicit": "city"})
        );

        let delegate = to_wire(&Directive::DialogDelegate {
            updated_intent: Some(Intent::new("BookTrip")),
        })
        .unwrap();
        assert_eq!(delegate["type"], "Dialog.Delegate");
        assert_eq!(delegate["updatedIntent"]["name"], "BookTrip");
        assert_eq!(delegate["updatedIntent"]["confirmationStatus"], "NONE");
    }

    #[test]
    fn audio_classification() {
        assert!(Directive::Stop.is_audio());
        assert!(play(PlayBehavior::ReplaceAll, None).is_audio());
        assert!(Directive::ClearQueue(ClearQueueDirective::default()).is_audio());
        assert!(
            !Directive::DialogConfirmIntent {
                updated_intent: None
            }
            .is_audio()
        );
        assert_eq!(Directive::Stop.directive_type(), "AudioPlayer.Stop");
    }
}
