//! Progressive responses: speech sent out of band while the real response is
//! still being computed.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument, warn};
use vox_core::ResponseError;
use vox_request::Event;
use vox_settings::ProgressiveSettings;

/// Sends `VoicePlayer.Speak` directives for one inbound request.
#[derive(Clone, Debug)]
pub struct ProgressiveResponse {
    client: reqwest::Client,
    request_id: String,
    directives_url: String,
    access_token: String,
    max_speech_chars: usize,
}

#[derive(Serialize)]
struct Envelope<'a> {
    header: Header<'a>,
    directive: Speak<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Header<'a> {
    request_id: &'a str,
}

#[derive(Serialize)]
struct Speak<'a> {
    #[serde(rename = "type")]
    directive_type: &'static str,
    speech: &'a str,
}

impl ProgressiveResponse {
    /// Prepare a sender for `event`.
    ///
    /// Returns `None` when the event's context carries no API endpoint or
    /// access token, in which case no progressive response is possible.
    pub fn from_event(event: &Event, settings: &ProgressiveSettings) -> Option<Self> {
        let system = &event.context.as_ref()?.system;
        let endpoint = system.api_endpoint.as_deref()?;
        let access_token = system.api_access_token.clone()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .unwrap_or_default();

        Some(Self {
            client,
            request_id: event.request.request_id().to_string(),
            directives_url: format!("{}/v1/directives", endpoint.trim_end_matches('/')),
            access_token,
            max_speech_chars: settings.max_speech_chars,
        })
    }

    /// Where directives are posted.
    pub fn directives_url(&self) -> &str {
        &self.directives_url
    }

    /// Send `speech` to the device.
    ///
    /// Fails only when `speech` is over the character budget. Otherwise
    /// returns whether the platform accepted it (HTTP 204); any other status
    /// or a transport error yields `false`.
    #[instrument(skip_all, fields(request_id = %self.request_id))]
    pub async fn send_speech(&self, speech: &str) -> Result<bool, ResponseError> {
        ResponseError::check_size("Progressive speech", speech, self.max_speech_chars)?;

        let body = Envelope {
            header: Header {
                request_id: &self.request_id,
            },
            directive: Speak {
                directive_type: "VoicePlayer.Speak",
                speech,
            },
        };

        let result = self
            .client
            .post(&self.directives_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();
                debug!(status, "progressive response sent");
                Ok(status == 204)
            }
            Err(e) => {
                warn!(error = %e, "progressive response failed");
                Ok(false)
            }
        }
    }
}
