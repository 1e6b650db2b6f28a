//! Throw-away signing certificates for tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rcgen::{CertificateParams, DnType, KeyPair};
use ring::rand::SystemRandom;
use ring::signature::{ECDSA_P256_SHA256_ASN1_SIGNING, EcdsaKeyPair};

/// Self-signed RSA-2048 certificate for `echo-api.amazon.com`, valid until 2126.
pub(crate) const RSA_CERT_PEM: &str = include_str!("testdata/rsa-cert.pem");
/// Body signed with the key behind [`RSA_CERT_PEM`].
pub(crate) const RSA_SIGNED_BODY: &[u8] = include_bytes!("testdata/signed-body.json");
/// `openssl dgst -sha1 -sign` over [`RSA_SIGNED_BODY`], base64.
pub(crate) const RSA_SIGNATURE_SHA1: &str = include_str!("testdata/signed-body.sha1.b64");
/// `openssl dgst -sha256 -sign` over [`RSA_SIGNED_BODY`], base64.
pub(crate) const RSA_SIGNATURE_SHA256: &str = include_str!("testdata/signed-body.sha256.b64");

/// A self-signed P-256 certificate and the key that signs with it.
pub(crate) struct TestSigner {
    pub pem: String,
    key: EcdsaKeyPair,
    rng: SystemRandom,
}

impl TestSigner {
    pub fn new(common_name: &str) -> Self {
        Self::build(common_name, false)
    }

    pub fn expired(common_name: &str) -> Self {
        Self::build(common_name, true)
    }

    fn build(common_name: &str, expired: bool) -> Self {
        let key_pair = KeyPair::generate().unwrap();
        let mut params = CertificateParams::default();
        params
            .distinguished_name
            .push(DnType::CommonName, common_name);
        if expired {
            params.not_before = rcgen::date_time_ymd(2000, 1, 1);
            params.not_after = rcgen::date_time_ymd(2001, 1, 1);
        }
        let cert = params.self_signed(&key_pair).unwrap();

        let rng = SystemRandom::new();
        let key = EcdsaKeyPair::from_pkcs8(
            &ECDSA_P256_SHA256_ASN1_SIGNING,
            &key_pair.serialize_der(),
            &rng,
        )
        .unwrap();

        Self {
            pem: cert.pem(),
            key,
            rng,
        }
    }

    /// Base64 signature over `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let sig = self.key.sign(&self.rng, body).unwrap();
        STANDARD.encode(sig.as_ref())
    }
}
