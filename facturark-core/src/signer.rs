//! XAdES-BES signing of DIAN invoice documents.
//!
//! The [`Signer`] owns certificate material parsed once from a PKCS#12 container and the composer
//! set resolved from its configured profile. Each call to [`Signer::sign`] runs the signing
//! pipeline against a parsed document and, only when every stage succeeds, appends the
//! `ds:Signature` element to the document root.
pub mod canonicalizer;
pub mod certificate;
pub mod composers;
pub mod constants;
pub mod encoder;
pub mod engine;
pub mod hasher;
pub mod identifier;
mod pipeline;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::SignerConfig;
use certificate::CertificateMaterial;
use chrono::{DateTime, FixedOffset, Utc};
use hasher::DigestAlgorithm;
use libxml::{parser::Parser, tree::Document};
use pipeline::Pipeline;
use resolver::{ComposerResolver, ComposerSet};
use thiserror::Error;
use x509_cert::Certificate;

pub use pipeline::Stage;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("certificate error: {0}")]
    CertificateParse(String),
    #[error("unsupported algorithm: {uri}")]
    UnsupportedAlgorithm { uri: String },
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
    #[error("signing failed: {0}")]
    SigningOperation(String),
    #[error("unable to compose signature element: {0}")]
    Composition(String),
    #[error("unknown signature profile: {name}")]
    UnknownProfile { name: String },
}

/// Signs invoice documents with one certificate and configuration.
///
/// A `Signer` only holds read-only state, so one instance can be shared between threads and
/// used to sign distinct documents concurrently.
///
/// # Examples
/// ```rust,no_run
/// use facturark_core::config::SignerConfig;
/// use facturark_core::signer::Signer;
///
/// let container = std::fs::read("certificate.p12")?;
/// let signer = Signer::from_pkcs12(&container, "passphrase", SignerConfig::default())?;
/// let signed = signer.sign_xml(&std::fs::read_to_string("invoice.xml")?)?;
/// std::fs::write("invoice.signed.xml", signed)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Signer {
    config: SignerConfig,
    material: CertificateMaterial,
    composers: ComposerSet,
}

impl Signer {
    /// Builds a signer whose composers come from the built-in profiles.
    pub fn new(material: CertificateMaterial, config: SignerConfig) -> Result<Self, SignerError> {
        Self::with_resolver(material, config, &ComposerResolver::default())
    }

    /// Builds a signer resolving its profile against a caller-supplied registry.
    pub fn with_resolver(
        material: CertificateMaterial,
        config: SignerConfig,
        resolver: &ComposerResolver,
    ) -> Result<Self, SignerError> {
        let composers = resolver.resolve(&config.profile)?;
        Ok(Self {
            config,
            material,
            composers,
        })
    }

    pub fn from_pkcs12(
        container: &[u8],
        passphrase: &str,
        config: SignerConfig,
    ) -> Result<Self, SignerError> {
        let material = certificate::parse(container, passphrase)?;
        Self::new(material, config)
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn material(&self) -> &CertificateMaterial {
        &self.material
    }

    pub fn certificate(&self) -> &Certificate {
        self.material.certificate()
    }

    /// Base64 digest of the configured signature policy document.
    pub fn policy_hash(&self) -> &str {
        &self.config.policy.digest_value
    }

    /// Signs `document` in place, stamping the current time as `SigningTime`.
    pub fn sign(&self, document: &mut Document) -> Result<(), SignerError> {
        self.sign_at(document, Utc::now().fixed_offset())
    }

    /// Signs `document` in place with an explicit `SigningTime`.
    ///
    /// On error the document is left untouched.
    pub fn sign_at(
        &self,
        document: &mut Document,
        signing_time: DateTime<FixedOffset>,
    ) -> Result<(), SignerError> {
        let pipeline = Pipeline::new(&self.config, &self.material, &self.composers, signing_time);
        let span = tracing::debug_span!("sign", signature_id = %pipeline.signature_id());
        let _guard = span.enter();

        let signature = pipeline.run(document)?;
        pipeline::insert(document, signature)?;

        tracing::debug!(profile = %self.config.profile, "document signed");
        Ok(())
    }

    /// Parses `xml`, signs it and returns the serialized signed document.
    pub fn sign_xml(&self, xml: &str) -> Result<String, SignerError> {
        let mut document = Parser::default()
            .parse_string(xml)
            .map_err(|e| SignerError::MissingElement(format!("XML parse error: {e:?}")))?;
        self.sign(&mut document)?;
        Ok(document.to_string())
    }

    /// Consumes the signer, zeroing its private key.
    pub fn dispose(self) {
        self.material.dispose();
    }
}

/// One-shot signing: parses the container, signs `document` and discards the key material.
pub fn sign_document(
    document: &mut Document,
    container: &[u8],
    passphrase: &str,
    config: SignerConfig,
) -> Result<(), SignerError> {
    let signer = Signer::from_pkcs12(container, passphrase, config)?;
    let result = signer.sign(document);
    signer.dispose();
    result
}

/// Digest carried by the document reference: exclusive canonical form of the whole document.
pub fn document_digest(
    document: &Document,
    algorithm: DigestAlgorithm,
) -> Result<String, SignerError> {
    let canonical = canonicalizer::canonicalize(document)?;
    Ok(hasher::digest(canonical.as_bytes(), algorithm))
}
