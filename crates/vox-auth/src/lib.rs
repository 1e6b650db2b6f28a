//! # vox-auth
//!
//! Proves an inbound request came from the platform.
//!
//! Two independent checks, both required:
//! - **Freshness** ([`timestamp`]): the request timestamp is within the
//!   tolerance window of now
//! - **Signature** ([`certificate`], [`validator`]): the signing certificate
//!   URL is pinned to the trust anchor, the certificate is current and issued
//!   to the expected subject, and the body signature verifies against its key
//!
//! [`Authenticator`] combines them behind a single boolean. Which check failed
//! is logged at `debug` and never returned.

#![deny(unsafe_code)]

pub mod certificate;
pub mod errors;
pub mod fetch;
pub mod timestamp;
pub mod trust;
pub mod validator;

#[cfg(test)]
mod testing;

pub use certificate::SigningCertificate;
pub use errors::AuthError;
pub use fetch::{CertificateFetcher, HttpCertificateFetcher};
pub use timestamp::{is_timestamp_valid, is_timestamp_valid_at};
pub use trust::check_certificate_url;
pub use validator::{Authenticator, CertificateValidator};
