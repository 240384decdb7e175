//! Digest computation keyed by XML-DSig algorithm URIs.
use super::constants::{SHA256_URI, SHA384_URI, SHA512_URI};
use super::{SignerError, encoder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::{fmt, str::FromStr};

/// Digest algorithm used for references, the certificate digest and the signed info.
///
/// # Examples
/// ```rust
/// use std::str::FromStr;
/// use facturark_core::signer::hasher::DigestAlgorithm;
///
/// let algorithm = DigestAlgorithm::from_str("http://www.w3.org/2001/04/xmlenc#sha512")?;
/// assert_eq!(algorithm, DigestAlgorithm::Sha512);
/// assert_eq!(DigestAlgorithm::from_str("sha256")?, DigestAlgorithm::Sha256);
/// # Ok::<(), facturark_core::SignerError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    #[default]
    Sha512,
}

impl DigestAlgorithm {
    pub const fn uri(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => SHA256_URI,
            DigestAlgorithm::Sha384 => SHA384_URI,
            DigestAlgorithm::Sha512 => SHA512_URI,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length in bytes of the raw digest.
    pub const fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn from_uri(uri: &str) -> Result<Self, SignerError> {
        match uri {
            SHA256_URI => Ok(DigestAlgorithm::Sha256),
            SHA384_URI => Ok(DigestAlgorithm::Sha384),
            SHA512_URI => Ok(DigestAlgorithm::Sha512),
            _ => Err(SignerError::UnsupportedAlgorithm {
                uri: uri.to_string(),
            }),
        }
    }

    pub fn compute(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(bytes).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(bytes).to_vec(),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SignerError;

    fn from_str(value: &str) -> Result<Self, SignerError> {
        match value.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(DigestAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            _ => DigestAlgorithm::from_uri(value),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Digest of `bytes`, base64 encoded.
pub fn digest(bytes: &[u8], algorithm: DigestAlgorithm) -> String {
    encoder::encode(&algorithm.compute(bytes))
}

/// Same as [`digest`] with the algorithm named by its URI.
pub fn digest_with_uri(bytes: &[u8], uri: &str) -> Result<String, SignerError> {
    Ok(digest(bytes, DigestAlgorithm::from_uri(uri)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_of_known_input() {
        assert_eq!(
            digest(b"<a>x</a>", DigestAlgorithm::Sha512),
            "mZ4nImPjWMewSpnNhIJscj6TS4kqvu8MGfV2q1cRIlebvDt+Jwimg0gsbIIcaXDcSAUuLQHfBBnlagVED4sqGQ=="
        );
        assert_eq!(
            digest(b"", DigestAlgorithm::Sha512),
            "z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg/SpIdNs6c5H0NE8XYXysP+DGNKHfuwvY7kxvUdBeoGlODJ6+SfaPg=="
        );
    }

    #[test]
    fn algorithm_is_selected_by_uri() {
        let by_uri = digest_with_uri(b"payload", SHA256_URI).expect("sha256");
        assert_eq!(by_uri, digest(b"payload", DigestAlgorithm::Sha256));
        assert_ne!(by_uri, digest(b"payload", DigestAlgorithm::Sha512));
    }

    #[test]
    fn unknown_uri_is_rejected() {
        let err = digest_with_uri(b"payload", "http://www.w3.org/2000/09/xmldsig#md5")
            .expect_err("md5 is not supported");
        assert!(matches!(err, SignerError::UnsupportedAlgorithm { .. }));
    }

    #[test]
    fn flipping_a_byte_changes_the_digest() {
        let canonical = b"<fe:Invoice xmlns:fe=\"urn:x\"><cbc:ID>1</cbc:ID></fe:Invoice>".to_vec();
        let original = digest(&canonical, DigestAlgorithm::Sha512);
        for index in 0..canonical.len() {
            let mut tampered = canonical.clone();
            tampered[index] ^= 0x01;
            assert_ne!(original, digest(&tampered, DigestAlgorithm::Sha512), "byte {index}");
        }
    }

    #[test]
    fn output_len_matches_computed_digest() {
        for algorithm in [
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            assert_eq!(algorithm.compute(b"abc").len(), algorithm.output_len());
            assert_eq!(DigestAlgorithm::from_str(algorithm.uri()).expect("uri"), algorithm);
            assert_eq!(DigestAlgorithm::from_str(algorithm.name()).expect("name"), algorithm);
        }
    }
}
