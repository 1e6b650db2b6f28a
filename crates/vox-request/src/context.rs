//! Device and service snapshot sent with every request.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::request::PlaybackState;
use crate::session::{Application, User};

/// State of the platform and device at the time of the request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Context {
    /// Service, application, user and device information.
    #[serde(rename = "System")]
    pub system: System,
    /// Audio player state, for devices that support it.
    #[serde(rename = "AudioPlayer", default)]
    pub audio_player: Option<PlaybackState>,
}

/// The `System` object of the context.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    /// The skill the request is addressed to.
    pub application: Application,
    /// The user making the request.
    pub user: User,
    /// The device making the request.
    pub device: Device,
    /// Region-specific base URI for platform APIs.
    #[serde(default)]
    pub api_endpoint: Option<String>,
    /// Bearer token for platform API calls made on behalf of this request.
    #[serde(default)]
    pub api_access_token: Option<String>,
}

/// The device making the request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique device id.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Interfaces the device supports, keyed by interface name.
    pub supported_interfaces: Map<String, Value>,
}

impl Device {
    /// Whether the device advertises the named interface, e.g. `AudioPlayer`.
    pub fn supports(&self, interface: &str) -> bool {
        self.supported_interfaces.contains_key(interface)
    }
}
