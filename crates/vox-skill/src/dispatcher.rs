//! Application registry and routing.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument};
use vox_core::{ApplicationId, DispatchError};
use vox_request::Event;
use vox_response::ResponseBuilder;

use crate::skill::Skill;

/// Registry mapping application ids to skills.
///
/// Reads take a shared lock only long enough to clone the skill handle;
/// handlers run with no lock held.
#[derive(Default)]
pub struct Dispatcher {
    skills: RwLock<HashMap<ApplicationId, Arc<Skill>>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill under its application id, replacing any previous one.
    pub fn add_skill(&self, skill: Skill) {
        let id = skill.application_id().clone();
        debug!(application_id = %id, "skill registered");
        let _ = self.skills.write().insert(id, Arc::new(skill));
    }

    /// Remove a skill. Returns whether one was registered.
    pub fn remove_skill(&self, application_id: &str) -> bool {
        self.skills.write().remove(application_id).is_some()
    }

    /// Look up a skill by application id.
    pub fn get_skill(&self, application_id: &str) -> Option<Arc<Skill>> {
        self.skills.read().get(application_id).cloned()
    }

    /// List all registered application ids (sorted).
    pub fn list_skills(&self) -> Vec<ApplicationId> {
        let mut ids: Vec<ApplicationId> = self.skills.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered skills.
    pub fn skill_count(&self) -> usize {
        self.skills.read().len()
    }

    /// Remove every skill.
    pub fn clear(&self) {
        self.skills.write().clear();
    }

    /// Route `event` to the skill registered for its application.
    ///
    /// The session's application id is used when a session is present,
    /// otherwise the context's. An event with neither never reaches a skill.
    #[instrument(skip_all, fields(request_type = event.request.request_type()))]
    pub async fn dispatch(&self, event: &Event) -> Result<Option<ResponseBuilder>, DispatchError> {
        let Some(application_id) = event.application_id().map(ApplicationId::as_str) else {
            debug!("event carries no application id");
            return Err(DispatchError::ApplicationNotFound {
                application_id: String::new(),
            });
        };

        let Some(skill) = self.get_skill(application_id) else {
            debug!(application_id, "no skill for application");
            return Err(DispatchError::ApplicationNotFound {
                application_id: application_id.to_string(),
            });
        };

        Ok(skill.handle(event).await)
    }
}
