//! RSA signature over precomputed digests.
use super::constants::{RSA_SHA256_URI, RSA_SHA384_URI, RSA_SHA512_URI};
use super::hasher::DigestAlgorithm;
use super::{SignerError, encoder};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};
use std::{fmt, str::FromStr};

/// `SignatureMethod` of the signed info.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    RsaSha256,
    RsaSha384,
    #[default]
    RsaSha512,
}

impl SignatureAlgorithm {
    pub const fn uri(self) -> &'static str {
        match self {
            SignatureAlgorithm::RsaSha256 => RSA_SHA256_URI,
            SignatureAlgorithm::RsaSha384 => RSA_SHA384_URI,
            SignatureAlgorithm::RsaSha512 => RSA_SHA512_URI,
        }
    }

    /// Digest applied to the canonical signed info before signing.
    pub const fn digest_algorithm(self) -> DigestAlgorithm {
        match self {
            SignatureAlgorithm::RsaSha256 => DigestAlgorithm::Sha256,
            SignatureAlgorithm::RsaSha384 => DigestAlgorithm::Sha384,
            SignatureAlgorithm::RsaSha512 => DigestAlgorithm::Sha512,
        }
    }

    pub fn from_uri(uri: &str) -> Result<Self, SignerError> {
        match uri {
            RSA_SHA256_URI => Ok(SignatureAlgorithm::RsaSha256),
            RSA_SHA384_URI => Ok(SignatureAlgorithm::RsaSha384),
            RSA_SHA512_URI => Ok(SignatureAlgorithm::RsaSha512),
            _ => Err(SignerError::UnsupportedAlgorithm {
                uri: uri.to_string(),
            }),
        }
    }

    fn padding(self) -> Pkcs1v15Sign {
        match self {
            SignatureAlgorithm::RsaSha256 => Pkcs1v15Sign::new::<Sha256>(),
            SignatureAlgorithm::RsaSha384 => Pkcs1v15Sign::new::<Sha384>(),
            SignatureAlgorithm::RsaSha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }

    fn check_digest_len(self, digest: &[u8]) -> Result<(), SignerError> {
        let expected = self.digest_algorithm().output_len();
        if digest.len() != expected {
            return Err(SignerError::SigningOperation(format!(
                "{} expects a {expected}-byte digest, got {} bytes",
                self.uri(),
                digest.len()
            )));
        }
        Ok(())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SignerError;

    fn from_str(value: &str) -> Result<Self, SignerError> {
        match value.to_ascii_lowercase().as_str() {
            "rsa-sha256" => Ok(SignatureAlgorithm::RsaSha256),
            "rsa-sha384" => Ok(SignatureAlgorithm::RsaSha384),
            "rsa-sha512" => Ok(SignatureAlgorithm::RsaSha512),
            _ => SignatureAlgorithm::from_uri(value),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Signs an already computed digest and returns the base64 signature value.
pub fn sign(
    key: &RsaPrivateKey,
    digest: &[u8],
    algorithm: SignatureAlgorithm,
) -> Result<String, SignerError> {
    algorithm.check_digest_len(digest)?;
    let signature = key
        .sign(algorithm.padding(), digest)
        .map_err(|e| SignerError::SigningOperation(format!("RSA signature failed: {e}")))?;
    Ok(encoder::encode(&signature))
}

pub fn sign_with_uri(key: &RsaPrivateKey, digest: &[u8], uri: &str) -> Result<String, SignerError> {
    sign(key, digest, SignatureAlgorithm::from_uri(uri)?)
}

/// Checks a base64 signature value against a digest.
pub fn verify(
    key: &RsaPublicKey,
    digest: &[u8],
    signature_b64: &str,
    algorithm: SignatureAlgorithm,
) -> Result<(), SignerError> {
    algorithm.check_digest_len(digest)?;
    let signature = encoder::decode(signature_b64).map_err(|e| {
        SignerError::SigningOperation(format!("signature value is not base64: {e}"))
    })?;
    key.verify(algorithm.padding(), digest, &signature)
        .map_err(|e| SignerError::SigningOperation(format!("signature does not verify: {e}")))
}
