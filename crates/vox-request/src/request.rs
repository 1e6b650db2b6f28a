//! Request kinds.
//!
//! Every request carries [`RequestCommon`]; concrete kinds add their own
//! fields. The `type` discriminator is not stored on the structs: it is
//! implied by the [`Request`] arm, except for [`GenericRequest`] which keeps
//! the string it was registered under.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::null_as_default;

// ── Discriminators ──────────────────────────────────────────────────

/// User invoked the skill without a specific intent.
pub const LAUNCH_REQUEST: &str = "LaunchRequest";
/// User invoked a specific intent.
pub const INTENT_REQUEST: &str = "IntentRequest";
/// The current session ended.
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";
/// Playback of a stream began.
pub const PLAYBACK_STARTED: &str = "AudioPlayer.PlaybackStarted";
/// A stream played to its end.
pub const PLAYBACK_FINISHED: &str = "AudioPlayer.PlaybackFinished";
/// Playback was stopped by the user or a directive.
pub const PLAYBACK_STOPPED: &str = "AudioPlayer.PlaybackStopped";
/// The current stream is nearly finished and the next one can be queued.
pub const PLAYBACK_NEARLY_FINISHED: &str = "AudioPlayer.PlaybackNearlyFinished";
/// The device failed to play a stream.
pub const PLAYBACK_FAILED: &str = "AudioPlayer.PlaybackFailed";
/// A previous response caused an error on the platform.
pub const SYSTEM_EXCEPTION_ENCOUNTERED: &str = "System.ExceptionEncountered";
/// The user pressed "next".
pub const PLAYBACK_CONTROLLER_NEXT: &str = "PlaybackController.NextCommandIssued";
/// The user pressed "pause".
pub const PLAYBACK_CONTROLLER_PAUSE: &str = "PlaybackController.PauseCommandIssued";
/// The user pressed "play".
pub const PLAYBACK_CONTROLLER_PLAY: &str = "PlaybackController.PlayCommandIssued";
/// The user pressed "previous".
pub const PLAYBACK_CONTROLLER_PREVIOUS: &str = "PlaybackController.PreviousCommandIssued";

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// Fields present on every request kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCommon {
    /// Unique identifier for this request.
    pub request_id: String,
    /// User locale, e.g. `en-US`.
    pub locale: String,
    /// ISO-8601 instant the platform sent the request.
    pub timestamp: String,
}

/// A decoded inbound request.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// `LaunchRequest`
    Launch(RequestCommon),
    /// `IntentRequest`
    Intent(IntentRequest),
    /// `SessionEndedRequest`
    SessionEnded(SessionEndedRequest),
    /// `AudioPlayer.PlaybackStarted`
    PlaybackStarted(AudioPlayerRequest),
    /// `AudioPlayer.PlaybackFinished`
    PlaybackFinished(AudioPlayerRequest),
    /// `AudioPlayer.PlaybackStopped`
    PlaybackStopped(AudioPlayerRequest),
    /// `AudioPlayer.PlaybackNearlyFinished`
    PlaybackNearlyFinished(AudioPlayerRequest),
    /// `AudioPlayer.PlaybackFailed`
    PlaybackFailed(PlaybackFailedRequest),
    /// `System.ExceptionEncountered`
    SystemExceptionEncountered(SystemExceptionRequest),
    /// `PlaybackController.NextCommandIssued`
    PlaybackControllerNext(RequestCommon),
    /// `PlaybackController.PauseCommandIssued`
    PlaybackControllerPause(RequestCommon),
    /// `PlaybackController.PlayCommandIssued`
    PlaybackControllerPlay(RequestCommon),
    /// `PlaybackController.PreviousCommandIssued`
    PlaybackControllerPrevious(RequestCommon),
    /// Any application-registered kind.
    Other(GenericRequest),
}

impl Request {
    /// The wire discriminator of this request.
    pub fn request_type(&self) -> &str {
        match self {
            Self::Launch(_) => LAUNCH_REQUEST,
            Self::Intent(_) => INTENT_REQUEST,
            Self::SessionEnded(_) => SESSION_ENDED_REQUEST,
            Self::PlaybackStarted(_) => PLAYBACK_STARTED,
            Self::PlaybackFinished(_) => PLAYBACK_FINISHED,
            Self::PlaybackStopped(_) => PLAYBACK_STOPPED,
            Self::PlaybackNearlyFinished(_) => PLAYBACK_NEARLY_FINISHED,
            Self::PlaybackFailed(_) => PLAYBACK_FAILED,
            Self::SystemExceptionEncountered(_) => SYSTEM_EXCEPTION_ENCOUNTERED,
            Self::PlaybackControllerNext(_) => PLAYBACK_CONTROLLER_NEXT,
            Self::PlaybackControllerPause(_) => PLAYBACK_CONTROLLER_PAUSE,
            Self::PlaybackControllerPlay(_) => PLAYBACK_CONTROLLER_PLAY,
            Self::PlaybackControllerPrevious(_) => PLAYBACK_CONTROLLER_PREVIOUS,
            Self::Other(r) => &r.request_type,
        }
    }

    /// Fields shared by every request kind.
    pub fn common(&self) -> &RequestCommon {
        match self {
            Self::Launch(c)
            | Self::PlaybackControllerNext(c)
            | Self::PlaybackControllerPause(c)
            | Self::PlaybackControllerPlay(c)
            | Self::PlaybackControllerPrevious(c) => c,
            Self::Intent(r) => &r.common,
            Self::SessionEnded(r) => &r.common,
            Self::PlaybackStarted(r)
            | Self::PlaybackFinished(r)
            | Self::PlaybackStopped(r)
            | Self::PlaybackNearlyFinished(r) => &r.common,
            Self::PlaybackFailed(r) => &r.common,
            Self::SystemExceptionEncountered(r) => &r.common,
            Self::Other(r) => &r.common,
        }
    }

    /// Request id.
    pub fn request_id(&self) -> &str {
        &self.common().request_id
    }

    /// User locale.
    pub fn locale(&self) -> &str {
        &self.common().locale
    }

    /// Raw ISO-8601 timestamp.
    pub fn timestamp(&self) -> &str {
        &self.common().timestamp
    }

    /// The intent, for intent requests.
    pub fn intent(&self) -> Option<&Intent> {
        match self {
            Self::Intent(r) => Some(&r.intent),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntentRequest
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the user confirmed or denied an intent or slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    /// No confirmation was requested.
    #[default]
    None,
    /// The user confirmed.
    Confirmed,
    /// The user denied.
    Denied,
}

/// An intent invocation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    /// Common request fields.
    #[serde(flatten)]
    pub common: RequestCommon,
    /// The invoked intent.
    pub intent: Intent,
    /// Multi-turn dialog state, when the skill uses a dialog model.
    #[serde(default)]
    pub dialog_state: Option<String>,
}

/// What the user asked for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Intent name from the interaction model.
    pub name: String,
    /// Slot values keyed by slot name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slots: BTreeMap<String, Slot>,
    /// Whole-intent confirmation.
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
}

impl Intent {
    /// Create an intent with no slots.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
            confirmation_status: ConfirmationStatus::None,
        }
    }

    /// Value of the named slot, if the user filled it.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|s| s.value.as_deref())
    }
}

/// One slot of an intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot name.
    pub name: String,
    /// Spoken value; absent when the user did not fill the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Slot-level confirmation.
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
}

// ─────────────────────────────────────────────────────────────────────────────
// SessionEndedRequest
// ─────────────────────────────────────────────────────────────────────────────

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEndedReason {
    /// The user explicitly ended the session.
    UserInitiated,
    /// An error occurred.
    Error,
    /// The user did not answer the reprompts.
    ExceededMaxReprompts,
    /// A reason this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// A session-ended notification.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    /// Common request fields.
    #[serde(flatten)]
    pub common: RequestCommon,
    /// Why the session ended.
    #[serde(default)]
    pub reason: Option<SessionEndedReason>,
    /// Error detail when `reason` is `ERROR`.
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// A `{type, message}` error object, shared by several request kinds.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorInfo {
    /// Error classification, e.g. `MEDIA_ERROR_UNKNOWN`.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable description.
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// AudioPlayer requests
// ─────────────────────────────────────────────────────────────────────────────

/// Playback lifecycle notification for one stream.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlayerRequest {
    /// Common request fields.
    #[serde(flatten)]
    pub common: RequestCommon,
    /// Token of the stream the notification is about.
    pub token: String,
    /// Track offset when the notification was sent.
    pub offset_in_milliseconds: i64,
}

/// Sent when the device could not play a stream.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackFailedRequest {
    /// Common request fields.
    #[serde(flatten)]
    pub common: RequestCommon,
    /// Token of the stream that failed.
    pub token: String,
    /// What went wrong.
    pub error: ErrorInfo,
    /// Player state at the time of the failure.
    pub current_playback_state: PlaybackState,
}

/// Last known state of the audio player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerActivity {
    /// Nothing has played yet.
    Idle,
    /// Playback is paused.
    Paused,
    /// A stream is playing.
    Playing,
    /// Playback stalled waiting for data.
    BufferUnderrun,
    /// The stream played to its end.
    Finished,
    /// Playback was stopped.
    Stopped,
    /// An activity this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Audio player snapshot, used both in `PlaybackFailed` and in the context.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Token of the current stream.
    #[serde(default)]
    pub token: Option<String>,
    /// Offset into the current stream.
    #[serde(default)]
    pub offset_in_milliseconds: Option<i64>,
    /// Current player activity.
    #[serde(default)]
    pub player_activity: Option<PlayerActivity>,
}

// ─────────────────────────────────────────────────────────────────────────────
// System.ExceptionEncountered
// ─────────────────────────────────────────────────────────────────────────────

/// Sent when a previous response caused a platform error.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemExceptionRequest {
    /// Common request fields.
    #[serde(flatten)]
    pub common: RequestCommon,
    /// What went wrong.
    pub error: ErrorInfo,
    /// The request whose response triggered the error.
    pub cause: ExceptionCause,
}

/// Pointer to the request that caused a system exception.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionCause {
    /// Id of the offending request.
    pub request_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// GenericRequest
// ─────────────────────────────────────────────────────────────────────────────

/// A request kind registered by the application rather than built in.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericRequest {
    /// Discriminator the request was decoded under.
    pub request_type: String,
    /// Common request fields.
    pub common: RequestCommon,
    /// The full request object as received.
    pub body: Value,
}
