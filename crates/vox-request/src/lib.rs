//! # vox-request
//!
//! Typed model of an inbound voice-assistant event and the registry that
//! decodes its polymorphic `request` object.
//!
//! - [`Event`]: version + [`Request`] + optional [`Session`] and [`Context`]
//! - [`Request`]: one arm per request kind, selected by the `type` discriminator
//! - [`RequestRegistry`]: discriminator → decode function table
//!
//! ```no_run
//! use vox_request::{Event, RequestRegistry};
//!
//! let registry = RequestRegistry::default();
//! let body = br#"{"version":"1.0","request":{"type":"LaunchRequest","requestId":"r","locale":"en-US","timestamp":"2024-01-01T00:00:00Z"}}"#;
//! let event = Event::from_slice(body, &registry).unwrap();
//! assert_eq!(event.request.request_type(), "LaunchRequest");
//! ```

#![deny(unsafe_code)]

pub mod context;
pub mod event;
pub mod registry;
pub mod request;
pub mod session;

mod de;

pub use context::{Context, Device, System};
pub use event::Event;
pub use registry::{DecodeFn, RequestRegistry, decode_generic};
pub use request::*;
pub use session::{Application, Permissions, Session, User};
