//! Signer and validation configuration.
use crate::signer::constants::{
    DIAN_CLAIMED_ROLE, DIAN_POLICY_DESCRIPTION, DIAN_POLICY_DIGEST, DIAN_POLICY_IDENTIFIER,
};
use crate::signer::engine::SignatureAlgorithm;
use crate::signer::hasher::DigestAlgorithm;
use crate::signer::resolver::XADES_BES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Signature policy referenced from `SignaturePolicyIdentifier`.
///
/// The digest is precomputed over the published policy document and is never recomputed at
/// signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicy {
    pub identifier: String,
    pub description: String,
    pub digest_algorithm: DigestAlgorithm,
    pub digest_value: String,
}

impl SignaturePolicy {
    /// Current DIAN signing policy (`politicadefirmav2.pdf`).
    pub fn dian() -> Self {
        Self {
            identifier: DIAN_POLICY_IDENTIFIER.to_string(),
            description: DIAN_POLICY_DESCRIPTION.to_string(),
            digest_algorithm: DigestAlgorithm::Sha512,
            digest_value: DIAN_POLICY_DIGEST.to_string(),
        }
    }
}

impl Default for SignaturePolicy {
    fn default() -> Self {
        Self::dian()
    }
}

/// Algorithms and profile used by a [`Signer`](crate::signer::Signer).
///
/// # Examples
/// ```rust
/// use std::str::FromStr;
/// use facturark_core::config::SignerConfig;
/// use facturark_core::signer::hasher::DigestAlgorithm;
///
/// let config = SignerConfig {
///     digest_algorithm: DigestAlgorithm::from_str("sha256")?,
///     ..SignerConfig::default()
/// };
/// assert_eq!(config.profile, "xades-bes");
/// # Ok::<(), facturark_core::SignerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Digest of the three references and of the signing certificate.
    pub digest_algorithm: DigestAlgorithm,
    pub signature_algorithm: SignatureAlgorithm,
    /// Name of the composer profile, see
    /// [`ComposerResolver`](crate::signer::resolver::ComposerResolver).
    pub profile: String,
    pub policy: SignaturePolicy,
    /// `ClaimedRole` written under `SignerRole`; omitted when `None`.
    pub claimed_role: Option<String>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            digest_algorithm: DigestAlgorithm::Sha512,
            signature_algorithm: SignatureAlgorithm::RsaSha512,
            profile: XADES_BES.to_string(),
            policy: SignaturePolicy::dian(),
            claimed_role: Some(DIAN_CLAIMED_ROLE.to_string()),
        }
    }
}

/// Signer configuration together with the schema used to validate invoices.
///
/// # Examples
/// ```rust
/// use facturark_core::config::{Config, SignerConfig};
///
/// let config = Config::new(SignerConfig::default(), "path/to/DIAN_UBL.xsd");
/// assert!(config.xsd_invoice_path().ends_with("DIAN_UBL.xsd"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    signer: SignerConfig,
    xsd_invoice_path: PathBuf,
}

impl Config {
    pub fn new(signer: SignerConfig, xsd_invoice_path: impl Into<PathBuf>) -> Self {
        Self {
            signer,
            xsd_invoice_path: xsd_invoice_path.into(),
        }
    }

    pub fn signer(&self) -> &SignerConfig {
        &self.signer
    }

    pub fn xsd_invoice_path(&self) -> &Path {
        &self.xsd_invoice_path
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            signer: SignerConfig::default(),
            xsd_invoice_path: PathBuf::from("./assets/schemas/DIAN/DIAN_UBL.xsd"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_dian() {
        let config = SignerConfig::default();
        assert_eq!(config.digest_algorithm, DigestAlgorithm::Sha512);
        assert_eq!(config.signature_algorithm, SignatureAlgorithm::RsaSha512);
        assert_eq!(
            config.policy.digest_value,
            "Zcjw1Z9nGQn2j6NyGx8kAaLbOfJGd/fJxRTCeirlqAg7zRG27piJkJOpflGu7XACpMj9hC6dVMcCyzqHxxPZeQ=="
        );
        assert_eq!(config.policy.digest_algorithm, DigestAlgorithm::Sha512);
        assert_eq!(config.claimed_role.as_deref(), Some("supplier"));
    }

    #[test]
    fn default_config_points_at_bundled_schema() {
        let config = Config::default();
        assert_eq!(
            config.xsd_invoice_path(),
            Path::new("./assets/schemas/DIAN/DIAN_UBL.xsd")
        );
        assert_eq!(config.signer(), &SignerConfig::default());
    }
}
