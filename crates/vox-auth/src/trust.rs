//! Signing certificate URL pinning.

use url::Url;
use vox_settings::TrustAnchor;

use crate::errors::AuthError;

/// Check that `certificate_url` points inside the trust anchor.
///
/// The URL is parsed and its path normalized first, so dot segments cannot
/// escape the required prefix. An explicit port must equal the anchor's.
pub fn check_certificate_url(certificate_url: &str, anchor: &TrustAnchor) -> Result<(), AuthError> {
    let untrusted = |why: &str| AuthError::UntrustedUrl(format!("{certificate_url}: {why}"));

    let url = Url::parse(certificate_url).map_err(|e| untrusted(&e.to_string()))?;

    if url.scheme() != anchor.scheme {
        return Err(untrusted("scheme"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(untrusted("credentials"));
    }
    let host_matches = url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(&anchor.host));
    if !host_matches {
        return Err(untrusted("host"));
    }
    if !url.path().starts_with(&anchor.path_prefix) {
        return Err(untrusted("path"));
    }
    if let Some(port) = url.port() {
        if port != anchor.port {
            return Err(untrusted("port"));
        }
    }
    Ok(())
}
