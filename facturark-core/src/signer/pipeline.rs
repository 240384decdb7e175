use super::certificate::{self, CertificateMaterial};
use super::composers::{
    Fragment, KeyInfoData, Reference, SignatureParts, SignedInfoData, SignedPropertiesData,
};
use super::constants::{CBC_NS, SIGNATURE_NAMESPACES};
use super::identifier::Identifier;
use super::resolver::ComposerSet;
use super::{SignerError, document_digest, engine};
use crate::config::SignerConfig;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use libxml::tree::{Document, Namespace, Node};
use std::fmt;

/// Steps of a signing operation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    ParseCertificate,
    PrepareKeyInfo,
    PrepareSignedProperties,
    PrepareDocument,
    PrepareSignedInfo,
    PrepareSignatureValue,
    AssembleSignature,
    Insert,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::ParseCertificate,
        Stage::PrepareKeyInfo,
        Stage::PrepareSignedProperties,
        Stage::PrepareDocument,
        Stage::PrepareSignedInfo,
        Stage::PrepareSignatureValue,
        Stage::AssembleSignature,
        Stage::Insert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ParseCertificate => "parse-certificate",
            Stage::PrepareKeyInfo => "prepare-key-info",
            Stage::PrepareSignedProperties => "prepare-signed-properties",
            Stage::PrepareDocument => "prepare-document",
            Stage::PrepareSignedInfo => "prepare-signed-info",
            Stage::PrepareSignatureValue => "prepare-signature-value",
            Stage::AssembleSignature => "assemble-signature",
            Stage::Insert => "insert",
        }
    }

    pub(crate) fn enter(self) {
        tracing::trace!(stage = %self, "entering stage");
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one signing operation; stages 2 to 7 never touch the caller's document.
pub(crate) struct Pipeline<'a> {
    config: &'a SignerConfig,
    material: &'a CertificateMaterial,
    composers: &'a ComposerSet,
    signing_time: DateTime<FixedOffset>,
    ids: Identifier,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(
        config: &'a SignerConfig,
        material: &'a CertificateMaterial,
        composers: &'a ComposerSet,
        signing_time: DateTime<FixedOffset>,
    ) -> Self {
        Self::with_identifier(config, material, composers, signing_time, Identifier::new())
    }

    pub(crate) fn with_identifier(
        config: &'a SignerConfig,
        material: &'a CertificateMaterial,
        composers: &'a ComposerSet,
        signing_time: DateTime<FixedOffset>,
        ids: Identifier,
    ) -> Self {
        Self {
            config,
            material,
            composers,
            signing_time,
            ids,
        }
    }

    pub(crate) fn signature_id(&self) -> &str {
        self.ids.base()
    }

    pub(crate) fn prepare_key_info(&mut self) -> Result<(Reference, Fragment), SignerError> {
        Stage::PrepareKeyInfo.enter();
        let id = self.ids.generate("keyinfo");
        let key_info = self.composers.key_info.compose(&KeyInfoData {
            id: id.clone(),
            certificate: certificate::serialize_certificate(self.material.certificate())?,
        })?;
        let digest = key_info.digest(self.config.digest_algorithm)?;
        Ok((
            Reference::key_info(&id, digest, self.config.digest_algorithm),
            key_info,
        ))
    }

    pub(crate) fn prepare_signed_properties(
        &mut self,
    ) -> Result<(Reference, Fragment), SignerError> {
        Stage::PrepareSignedProperties.enter();
        let id = self.ids.generate("signedprops");
        let cert = self.material.certificate();
        let data = SignedPropertiesData {
            id: id.clone(),
            signing_time: self
                .signing_time
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            certificate_digest_algorithm: self.config.digest_algorithm,
            certificate_digest: certificate::certificate_digest(
                cert,
                self.config.digest_algorithm,
            )?,
            issuer_name: certificate::issuer_name(cert),
            serial_number: certificate::serial_number(cert),
            policy: &self.config.policy,
            claimed_role: self.config.claimed_role.as_deref(),
        };
        let signed_properties = self.composers.signed_properties.compose(&data)?;
        let digest = signed_properties.digest(self.config.digest_algorithm)?;
        Ok((
            Reference::signed_properties(&id, digest, self.config.digest_algorithm),
            signed_properties,
        ))
    }

    pub(crate) fn prepare_document(&self, document: &Document) -> Result<Reference, SignerError> {
        Stage::PrepareDocument.enter();
        let root = document
            .get_root_element()
            .ok_or_else(|| SignerError::MissingElement("document has no root element".into()))?;
        let name = root.get_name();
        if !name.ends_with("Invoice") {
            return Err(SignerError::MissingElement(format!(
                "expected an Invoice root element, found {name}"
            )));
        }

        let document_id = basic_component(&root, "UUID")
            .or_else(|| basic_component(&root, "ID"))
            .ok_or_else(|| {
                SignerError::MissingElement("invoice has neither cbc:UUID nor cbc:ID".into())
            })?;
        let digest = document_digest(document, self.config.digest_algorithm)?;
        Ok(Reference::document(
            document_id,
            digest,
            self.config.digest_algorithm,
        ))
    }

    pub(crate) fn prepare_signed_info(
        &self,
        references: Vec<Reference>,
    ) -> Result<Fragment, SignerError> {
        Stage::PrepareSignedInfo.enter();
        self.composers.signed_info.compose(&SignedInfoData {
            signature_algorithm: self.config.signature_algorithm,
            references,
        })
    }

    pub(crate) fn prepare_signature_value(
        &mut self,
        signed_info: &Fragment,
    ) -> Result<Fragment, SignerError> {
        Stage::PrepareSignatureValue.enter();
        let algorithm = self.config.signature_algorithm;
        let canonical = signed_info.canonicalize()?;
        let digest = algorithm.digest_algorithm().compute(canonical.as_bytes());
        let value = engine::sign(self.material.private_key(), &digest, algorithm)?;
        let id = self.ids.generate("signaturevalue");
        self.composers.signature_value.compose(&id, &value)
    }

    pub(crate) fn assemble_signature(
        &self,
        signed_info: Fragment,
        signature_value: Fragment,
        key_info: Fragment,
        signed_properties: Fragment,
    ) -> Result<Fragment, SignerError> {
        Stage::AssembleSignature.enter();
        let signature_id = self.signature_id().to_string();
        let qualifying = self
            .composers
            .qualifying_properties
            .compose(signed_properties, &signature_id)?;
        let object = self.composers.object.compose(qualifying)?;
        self.composers.signature.compose(SignatureParts {
            id: signature_id,
            signed_info,
            signature_value,
            key_info,
            object,
        })
    }

    /// Runs every stage up to the assembled `Signature` without modifying `document`.
    pub(crate) fn run(mut self, document: &Document) -> Result<Fragment, SignerError> {
        let (key_info_reference, key_info) = self.prepare_key_info()?;
        let (signed_properties_reference, signed_properties) = self.prepare_signed_properties()?;
        let document_reference = self.prepare_document(document)?;

        let signed_info = self.prepare_signed_info(vec![
            document_reference,
            key_info_reference,
            signed_properties_reference,
        ])?;
        let signature_value = self.prepare_signature_value(&signed_info)?;
        self.assemble_signature(signed_info, signature_value, key_info, signed_properties)
    }
}

// Trimmed text of the first `cbc:<name>` child of the root, if not empty.
fn basic_component(root: &Node, name: &str) -> Option<String> {
    root.get_child_elements()
        .into_iter()
        .filter(|child| child.get_name() == name)
        .find(|child| {
            child
                .get_namespace()
                .is_some_and(|ns| ns.get_href() == CBC_NS)
        })
        .map(|child| child.get_content().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Appends `signature` to the document root, declaring `ds` and `xades` there if needed.
pub(crate) fn insert(document: &mut Document, signature: Fragment) -> Result<(), SignerError> {
    Stage::Insert.enter();
    let mut root = document
        .get_root_element()
        .ok_or_else(|| SignerError::MissingElement("document has no root element".into()))?;
    let mut node = signature.root()?;
    node.unlink();
    let mut imported = document
        .import_node(&mut node)
        .map_err(|e| SignerError::Composition(format!("failed to import signature: {e:?}")))?;

    root.add_child(&mut imported)
        .map_err(|e| SignerError::Composition(format!("failed to append signature: {e:?}")))?;

    let declared = root.get_namespace_declarations();
    for (prefix, href) in SIGNATURE_NAMESPACES {
        if declared.iter().any(|ns| ns.get_prefix() == prefix) {
            continue;
        }
        if let Err(e) = Namespace::new(prefix, href, &mut root) {
            imported.unlink();
            return Err(SignerError::Composition(format!(
                "failed to declare namespace {prefix}: {e:?}"
            )));
        }
    }
    Ok(())
}
