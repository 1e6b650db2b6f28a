//! # vox-core
//!
//! Foundation types shared by every vox crate:
//!
//! - **Errors**: the [`SkillError`] taxonomy and its per-stage kinds
//!   ([`DecodeError`], [`DispatchError`], [`ResponseError`])
//! - **Identifiers**: [`ApplicationId`], the dispatch key for registered skills
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;

pub use errors::{DecodeError, DispatchError, ResponseError, SkillError};
pub use ids::ApplicationId;
