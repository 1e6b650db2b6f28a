//! # vox-skill
//!
//! Routes authenticated, decoded events to application handlers.
//!
//! - [`Skill`]: one application's handler tables (by intent name, by request
//!   type, session-start callback, failsafe)
//! - [`Dispatcher`]: application id → [`Skill`] registry and lookup chain
//! - [`SkillService`]: the whole pipeline for one raw request body
//!
//! ```no_run
//! use vox_response::ResponseBuilder;
//! use vox_skill::{Skill, SkillService, handler_fn};
//!
//! # async fn run(body: &[u8]) -> Result<(), vox_core::SkillError> {
//! let service = SkillService::new(&vox_settings::VoxSettings::default());
//! service.dispatcher().add_skill(
//!     Skill::new("amzn1.ask.skill.example")
//!         .on_launch(handler_fn(|_| Some(ResponseBuilder::new().speech("Hello", None)))),
//! );
//! let wire = service.get_response(body).await?;
//! # Ok(()) }
//! ```

#![deny(unsafe_code)]

pub mod dispatcher;
pub mod handler;
pub mod service;
pub mod skill;

pub use dispatcher::Dispatcher;
pub use handler::{FnHandler, RequestHandler, handler_fn};
pub use service::SkillService;
pub use skill::{FAILSAFE_SPEECH, Skill};
