//! Signing certificate parsing and signature verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use ring::signature::{
    ECDSA_P256_SHA256_ASN1, RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
    RSA_PKCS1_2048_8192_SHA256, UnparsedPublicKey, VerificationAlgorithm,
};
use vox_settings::SignatureDigest;
use x509_parser::pem::parse_x509_pem;
use x509_parser::public_key::PublicKey;

use crate::errors::AuthError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyKind {
    Rsa,
    EcdsaP256,
}

/// The parts of a signing certificate needed after it is parsed.
#[derive(Clone, Debug)]
pub struct SigningCertificate {
    common_name: Option<String>,
    not_after: i64,
    key_kind: KeyKind,
    public_key: Vec<u8>,
}

impl SigningCertificate {
    /// Parse the first certificate in a PEM document.
    pub fn from_pem(pem: &[u8]) -> Result<Self, AuthError> {
        let (_, pem) = parse_x509_pem(pem).map_err(|e| AuthError::Certificate(e.to_string()))?;
        let cert = pem
            .parse_x509()
            .map_err(|e| AuthError::Certificate(e.to_string()))?;

        let common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(str::to_string);

        let spki = cert.public_key();
        let key_kind = match spki.parsed() {
            Ok(PublicKey::RSA(_)) => KeyKind::Rsa,
            Ok(PublicKey::EC(_)) => KeyKind::EcdsaP256,
            _ => return Err(AuthError::UnsupportedKey),
        };

        Ok(Self {
            common_name,
            not_after: cert.validity().not_after.timestamp(),
            key_kind,
            public_key: spki.subject_public_key.data.to_vec(),
        })
    }

    /// Subject common name, if the certificate has one.
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    /// Check expiry against `now` and the subject against `expected_common_name`.
    pub fn check_trusted(
        &self,
        expected_common_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        if self.not_after < now.timestamp() {
            return Err(AuthError::Expired {
                not_after: self.not_after,
            });
        }
        if self.common_name.as_deref() != Some(expected_common_name) {
            return Err(AuthError::SubjectMismatch {
                expected: expected_common_name.to_string(),
                actual: self.common_name.clone(),
            });
        }
        Ok(())
    }

    /// Verify a base64 signature over `body`.
    ///
    /// `digest` selects the RSA scheme; EC keys always use P-256 with SHA-256.
    pub fn verify(
        &self,
        body: &[u8],
        signature: &str,
        digest: SignatureDigest,
    ) -> Result<(), AuthError> {
        let signature = STANDARD
            .decode(signature.trim())
            .map_err(|e| AuthError::Signature(e.to_string()))?;

        let algorithm: &'static dyn VerificationAlgorithm = match (self.key_kind, digest) {
            (KeyKind::Rsa, SignatureDigest::Sha1) => &RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
            (KeyKind::Rsa, SignatureDigest::Sha256) => &RSA_PKCS1_2048_8192_SHA256,
            (KeyKind::EcdsaP256, _) => &ECDSA_P256_SHA256_ASN1,
        };
        UnparsedPublicKey::new(algorithm, &self.public_key)
            .verify(body, &signature)
            .map_err(|_| AuthError::Signature("verification failed".to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
