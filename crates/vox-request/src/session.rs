//! Session, application, and user objects.
//!
//! A session is only present for session-scoped request kinds (launch,
//! intent, session-ended). Other kinds carry application and user data in
//! the [`Context`](crate::Context) instead.

use serde::Deserialize;
use serde_json::{Map, Value};
use vox_core::ApplicationId;

use crate::de::null_as_default;

/// Conversation state for session-scoped requests.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Whether this request starts a new session.
    #[serde(rename = "new")]
    pub is_new: bool,
    /// Stable id for the user's active session.
    pub session_id: String,
    /// The skill the session belongs to.
    pub application: Application,
    /// Skill-defined data carried across requests in the same session.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    /// The user making the request.
    pub user: User,
}

/// The skill a request is addressed to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Registered application id.
    pub application_id: ApplicationId,
}

/// The user making a request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Per-skill user id; regenerated when the skill is re-enabled.
    pub user_id: String,
    /// Linked-account token, when account linking is complete.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Consent granted for customer data.
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

/// Consent the user granted to the skill.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    /// Token authorizing access to consented data.
    pub consent_token: String,
}
