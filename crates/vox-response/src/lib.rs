//! # vox-response
//!
//! Everything a skill sends back to the platform.
//!
//! - [`marshal`]: the [`Validate`] hook and [`to_wire`], which serializes a
//!   node graph and then validates it depth-first
//! - Nodes: [`OutputSpeech`], [`Reprompt`], [`Card`], [`Directive`],
//!   [`Response`], [`ResponsePackage`]
//! - [`ResponseBuilder`]: fluent construction; invalid intermediate states are
//!   allowed and rejected only at [`to_wire`]
//! - [`ProgressiveResponse`]: out-of-band `VoicePlayer.Speak` directive

#![deny(unsafe_code)]

pub mod builder;
pub mod card;
pub mod directive;
pub mod marshal;
pub mod progressive;
pub mod response;
pub mod speech;

pub use builder::ResponseBuilder;
pub use card::{Card, CardImage, Permission, PermissionsConsentCard, SimpleCard, StandardCard};
pub use directive::{
    AudioItem, ClearBehavior, ClearQueueDirective, Directive, PlayBehavior, PlayDirective, Stream,
};
pub use marshal::{Validate, to_wire};
pub use progressive::ProgressiveResponse;
pub use response::{RESPONSE_VERSION, Response, ResponsePackage};
pub use speech::{OutputSpeech, Reprompt};
