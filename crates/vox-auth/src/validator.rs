//! Per-URL certificate validators and the top-level authenticator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use vox_settings::{AuthSettings, SignatureDigest, TrustAnchor};

use crate::certificate::SigningCertificate;
use crate::errors::AuthError;
use crate::fetch::{CertificateFetcher, HttpCertificateFetcher};
use crate::timestamp::is_timestamp_valid;
use crate::trust::check_certificate_url;

/// Verdict for one certificate URL, computed once.
///
/// `Some` holds a certificate that passed URL pinning, expiry, and subject
/// checks. `None` means the URL or certificate was rejected. A failed fetch
/// leaves the cell empty so a later request retries.
pub struct CertificateValidator {
    certificate_url: String,
    anchor: TrustAnchor,
    verdict: OnceCell<Option<Arc<SigningCertificate>>>,
}

impl CertificateValidator {
    /// Create an unchecked validator for `certificate_url`.
    pub fn new(certificate_url: impl Into<String>, anchor: TrustAnchor) -> Self {
        Self {
            certificate_url: certificate_url.into(),
            anchor,
            verdict: OnceCell::new(),
        }
    }

    /// Whether a verdict has been cached.
    pub fn is_checked(&self) -> bool {
        self.verdict.initialized()
    }

    /// The trusted signing certificate, checking it on first use.
    pub async fn signing_certificate(
        &self,
        fetcher: &dyn CertificateFetcher,
    ) -> Option<Arc<SigningCertificate>> {
        let verdict = self
            .verdict
            .get_or_try_init(|| self.evaluate(fetcher))
            .await;
        match verdict {
            Ok(cert) => cert.clone(),
            Err(e) => {
                debug!(stage = e.stage(), error = %e, url = %self.certificate_url, "certificate unavailable");
                None
            }
        }
    }

    async fn evaluate(
        &self,
        fetcher: &dyn CertificateFetcher,
    ) -> Result<Option<Arc<SigningCertificate>>, AuthError> {
        if let Err(e) = check_certificate_url(&self.certificate_url, &self.anchor) {
            debug!(stage = e.stage(), error = %e, "certificate rejected");
            return Ok(None);
        }

        let pem = fetcher.fetch(&self.certificate_url).await?;

        let checked = SigningCertificate::from_pem(&pem).and_then(|cert| {
            cert.check_trusted(&self.anchor.common_name, Utc::now())?;
            Ok(cert)
        });
        match checked {
            Ok(cert) => Ok(Some(Arc::new(cert))),
            Err(e) => {
                debug!(stage = e.stage(), error = %e, "certificate rejected");
                Ok(None)
            }
        }
    }

    /// Whether `signature` over `body` verifies against the trusted certificate.
    pub async fn is_valid(
        &self,
        fetcher: &dyn CertificateFetcher,
        body: &[u8],
        signature: &str,
        digest: SignatureDigest,
    ) -> bool {
        let Some(cert) = self.signing_certificate(fetcher).await else {
            return false;
        };
        match cert.verify(body, signature, digest) {
            Ok(()) => true,
            Err(e) => {
                debug!(stage = e.stage(), error = %e, "signature rejected");
                false
            }
        }
    }
}

/// Authenticates inbound requests.
///
/// Owns the per-URL validator cache. The cache grows by one entry per
/// distinct certificate URL and is never evicted.
pub struct Authenticator {
    settings: AuthSettings,
    fetcher: Arc<dyn CertificateFetcher>,
    validators: DashMap<String, Arc<CertificateValidator>>,
}

impl Authenticator {
    /// Create an authenticator that downloads certificates over HTTP.
    pub fn new(settings: AuthSettings) -> Self {
        let timeout = Duration::from_millis(settings.certificate_fetch_timeout_ms);
        Self::with_fetcher(settings, Arc::new(HttpCertificateFetcher::new(timeout)))
    }

    /// Create an authenticator with a custom certificate source.
    pub fn with_fetcher(settings: AuthSettings, fetcher: Arc<dyn CertificateFetcher>) -> Self {
        Self {
            settings,
            fetcher,
            validators: DashMap::new(),
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Whether both the freshness and the signature checks pass.
    #[instrument(skip_all, fields(certificate_url = %certificate_url))]
    pub async fn is_request_authentic(
        &self,
        raw_body: &[u8],
        certificate_url: &str,
        signature: &str,
        timestamp: &str,
    ) -> bool {
        if !is_timestamp_valid(timestamp, self.settings.timestamp_tolerance_secs) {
            debug!(stage = "freshness", timestamp, "request rejected");
            return false;
        }
        self.is_request_certified(raw_body, certificate_url, signature)
            .await
    }

    /// Whether `signature` over `raw_body` verifies against the certificate
    /// at `certificate_url`.
    pub async fn is_request_certified(
        &self,
        raw_body: &[u8],
        certificate_url: &str,
        signature: &str,
    ) -> bool {
        let validator = self.validator(certificate_url);
        validator
            .is_valid(
                self.fetcher.as_ref(),
                raw_body,
                signature,
                self.settings.signature_digest,
            )
            .await
    }

    /// Number of certificate URLs seen so far.
    pub fn cached_validator_count(&self) -> usize {
        self.validators.len()
    }

    fn validator(&self, certificate_url: &str) -> Arc<CertificateValidator> {
        let entry = self
            .validators
            .entry(certificate_url.to_string())
            .or_insert_with(|| {
                Arc::new(CertificateValidator::new(
                    certificate_url,
                    self.settings.trust_anchor.clone(),
                ))
            });
        Arc::clone(entry.value())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
