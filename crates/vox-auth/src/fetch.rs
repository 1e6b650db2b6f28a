//! Certificate download.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AuthError;

/// Downloads signing certificate bytes.
///
/// An `Err` means the certificate could not be obtained at all (network
/// failure, non-success status). Such failures are not cached; the next
/// request for the same URL tries again.
#[async_trait]
pub trait CertificateFetcher: Send + Sync {
    /// Fetch the PEM bytes at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AuthError>;
}

/// [`CertificateFetcher`] backed by `reqwest`.
pub struct HttpCertificateFetcher {
    client: reqwest::Client,
}

impl HttpCertificateFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl CertificateFetcher for HttpCertificateFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AuthError> {
        debug!(url, "fetching signing certificate");
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echo.api/cert.pem"))
            .respond_with(ResponseTemplate::new(200).set_body_string("PEM"))
            .mount(&server)
            .await;

        let fetcher = HttpCertificateFetcher::new(Duration::from_secs(5));
        let body = fetcher
            .fetch(&format!("{}/echo.api/cert.pem", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"PEM");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpCertificateFetcher::new(Duration::from_secs(5));
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err.stage(), "fetch");
    }
}
