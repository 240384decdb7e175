//! Builders for the elements of the signature block.
//!
//! Every composer returns a [`Fragment`]: a standalone document whose root is the composed
//! element. Exclusive canonicalization ignores the context an element is later placed in, so a
//! fragment digests the same before and after it is assembled into the signature.
pub mod dsig;
pub mod xades;

use super::constants::{DS_NS, DS_PREFIX, ENVELOPED_SIGNATURE, EXC_C14N, SIGNED_PROPERTIES_TYPE};
use super::constants::{XADES_NS, XADES_PREFIX};
use super::engine::SignatureAlgorithm;
use super::hasher::{self, DigestAlgorithm};
use super::{SignerError, canonicalizer};
use crate::config::SignaturePolicy;
use libxml::tree::{Document, Namespace, Node};
use std::fmt;

pub use dsig::{
    KeyInfoComposer, ObjectComposer, SignatureValueComposer, XmlDsigSignatureComposer,
    XmlDsigSignedInfoComposer,
};
pub use xades::{XadesQualifyingPropertiesComposer, XadesSignedPropertiesComposer};

/// A composed element held as the root of its own document.
pub struct Fragment {
    document: Document,
}

impl Fragment {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> Result<Node, SignerError> {
        self.document
            .get_root_element()
            .ok_or_else(|| SignerError::MissingElement("fragment has no root element".into()))
    }

    /// Local name of the root element.
    pub fn name(&self) -> Option<String> {
        self.document.get_root_element().map(|root| root.get_name())
    }

    /// Value of the root's `Id` attribute.
    pub fn id(&self) -> Option<String> {
        self.document
            .get_root_element()
            .and_then(|root| root.get_attribute("Id"))
    }

    pub fn canonicalize(&self) -> Result<String, SignerError> {
        canonicalizer::canonicalize(&self.document)
    }

    /// Base64 digest of the canonical form.
    pub fn digest(&self, algorithm: DigestAlgorithm) -> Result<String, SignerError> {
        Ok(hasher::digest(self.canonicalize()?.as_bytes(), algorithm))
    }

    /// Serialized element, without XML declaration.
    pub fn to_xml(&self) -> String {
        match self.document.get_root_element() {
            Some(root) => self.document.node_to_string(&root),
            None => String::new(),
        }
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("xml", &self.to_xml())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ns {
    Ds,
    Xades,
}

impl Ns {
    fn prefix_and_href(self) -> (&'static str, &'static str) {
        match self {
            Ns::Ds => (DS_PREFIX, DS_NS),
            Ns::Xades => (XADES_PREFIX, XADES_NS),
        }
    }
}

/// Incremental construction of a [`Fragment`].
///
/// Namespaces are declared on the root the first time an element uses them.
pub(crate) struct FragmentBuilder {
    document: Document,
    root: Node,
    ds: Option<Namespace>,
    xades: Option<Namespace>,
}

impl FragmentBuilder {
    pub(crate) fn new(ns: Ns, name: &str) -> Result<Self, SignerError> {
        let mut document = Document::new()
            .map_err(|e| SignerError::Composition(format!("failed to create document: {e:?}")))?;
        let root = Node::new(name, None, &document)
            .map_err(|e| SignerError::Composition(format!("failed to create {name}: {e:?}")))?;
        document.set_root_element(&root);

        let mut builder = Self {
            document,
            root,
            ds: None,
            xades: None,
        };
        let namespace = builder.namespace(ns)?;
        builder
            .root
            .set_namespace(&namespace)
            .map_err(|e| SignerError::Composition(format!("failed to qualify {name}: {e:?}")))?;
        Ok(builder)
    }

    fn namespace(&mut self, ns: Ns) -> Result<Namespace, SignerError> {
        let slot = match ns {
            Ns::Ds => &mut self.ds,
            Ns::Xades => &mut self.xades,
        };
        if let Some(declared) = slot {
            return Ok(declared.clone());
        }
        let (prefix, href) = ns.prefix_and_href();
        let declared = Namespace::new(prefix, href, &mut self.root).map_err(|e| {
            SignerError::Composition(format!("failed to declare namespace {prefix}: {e:?}"))
        })?;
        *slot = Some(declared.clone());
        Ok(declared)
    }

    pub(crate) fn root(&self) -> Node {
        self.root.clone()
    }

    pub(crate) fn element(
        &mut self,
        parent: &mut Node,
        ns: Ns,
        name: &str,
    ) -> Result<Node, SignerError> {
        let namespace = self.namespace(ns)?;
        parent
            .new_child(Some(namespace), name)
            .map_err(|e| SignerError::Composition(format!("failed to create {name}: {e:?}")))
    }

    /// Child element holding `text`; markup characters are escaped.
    pub(crate) fn text_element(
        &mut self,
        parent: &mut Node,
        ns: Ns,
        name: &str,
        text: &str,
    ) -> Result<Node, SignerError> {
        let namespace = self.namespace(ns)?;
        parent
            .add_text_child(Some(namespace), name, text)
            .map_err(|e| SignerError::Composition(format!("failed to create {name}: {e:?}")))
    }

    /// Child element with a single `Algorithm` attribute, e.g. `ds:DigestMethod`.
    pub(crate) fn algorithm_element(
        &mut self,
        parent: &mut Node,
        name: &str,
        algorithm: &str,
    ) -> Result<Node, SignerError> {
        let mut node = self.element(parent, Ns::Ds, name)?;
        set_attribute(&mut node, "Algorithm", algorithm)?;
        Ok(node)
    }

    /// Moves the root of `fragment` under `parent`.
    pub(crate) fn adopt(
        &mut self,
        parent: &mut Node,
        fragment: Fragment,
    ) -> Result<Node, SignerError> {
        let mut node = fragment.root()?;
        node.unlink();
        let mut imported = self
            .document
            .import_node(&mut node)
            .map_err(|e| SignerError::Composition(format!("failed to import fragment: {e:?}")))?;
        parent
            .add_child(&mut imported)
            .map_err(|e| SignerError::Composition(format!("failed to attach fragment: {e:?}")))?;
        Ok(imported)
    }

    pub(crate) fn finish(self) -> Fragment {
        Fragment {
            document: self.document,
        }
    }
}

pub(crate) fn set_attribute(node: &mut Node, name: &str, value: &str) -> Result<(), SignerError> {
    node.set_attribute(name, value)
        .map_err(|e| SignerError::Composition(format!("failed to set {name}: {e:?}")))
}

/// What a reference points at; decides its transforms and `Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Document,
    KeyInfo,
    SignedProperties,
}

/// One `ds:Reference` of the signed info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub id: Option<String>,
    /// Empty for the enclosing document, `#<element id>` otherwise.
    pub uri: String,
    pub digest_algorithm: DigestAlgorithm,
    pub digest_value: String,
}

impl Reference {
    /// Reference to the whole enclosing document, tagged with the document's own identifier.
    pub fn document(
        document_id: impl Into<String>,
        digest_value: impl Into<String>,
        digest_algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            kind: ReferenceKind::Document,
            id: Some(document_id.into()),
            uri: String::new(),
            digest_algorithm,
            digest_value: digest_value.into(),
        }
    }

    pub fn key_info(
        element_id: &str,
        digest_value: impl Into<String>,
        digest_algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            kind: ReferenceKind::KeyInfo,
            id: None,
            uri: format!("#{element_id}"),
            digest_algorithm,
            digest_value: digest_value.into(),
        }
    }

    pub fn signed_properties(
        element_id: &str,
        digest_value: impl Into<String>,
        digest_algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            kind: ReferenceKind::SignedProperties,
            id: None,
            uri: format!("#{element_id}"),
            digest_algorithm,
            digest_value: digest_value.into(),
        }
    }

    /// Transform algorithms, in application order.
    pub fn transforms(&self) -> &'static [&'static str] {
        match self.kind {
            ReferenceKind::Document => &[ENVELOPED_SIGNATURE, EXC_C14N],
            ReferenceKind::KeyInfo | ReferenceKind::SignedProperties => &[EXC_C14N],
        }
    }

    pub fn reference_type(&self) -> Option<&'static str> {
        match self.kind {
            ReferenceKind::SignedProperties => Some(SIGNED_PROPERTIES_TYPE),
            ReferenceKind::Document | ReferenceKind::KeyInfo => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfoData {
    pub id: String,
    /// Base64 DER certificate.
    pub certificate: String,
}

#[derive(Debug, Clone)]
pub struct SignedPropertiesData<'a> {
    pub id: String,
    /// RFC 3339 timestamp with offset, second precision.
    pub signing_time: String,
    pub certificate_digest_algorithm: DigestAlgorithm,
    pub certificate_digest: String,
    pub issuer_name: String,
    pub serial_number: String,
    pub policy: &'a SignaturePolicy,
    pub claimed_role: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct SignedInfoData {
    pub signature_algorithm: SignatureAlgorithm,
    /// In document, key-info, signed-properties order.
    pub references: Vec<Reference>,
}

/// Elements assembled into `ds:Signature`.
#[derive(Debug)]
pub struct SignatureParts {
    pub id: String,
    pub signed_info: Fragment,
    pub signature_value: Fragment,
    pub key_info: Fragment,
    pub object: Fragment,
}

pub trait SignedPropertiesComposer: Send + Sync {
    fn compose(&self, data: &SignedPropertiesData<'_>) -> Result<Fragment, SignerError>;
}

pub trait QualifyingPropertiesComposer: Send + Sync {
    /// Wraps `signed_properties`; `target` is the id of the signature being built.
    fn compose(&self, signed_properties: Fragment, target: &str) -> Result<Fragment, SignerError>;
}

pub trait SignedInfoComposer: Send + Sync {
    fn compose(&self, data: &SignedInfoData) -> Result<Fragment, SignerError>;
}

pub trait SignatureComposer: Send + Sync {
    fn compose(&self, parts: SignatureParts) -> Result<Fragment, SignerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_declares_namespaces_where_first_used() {
        let mut builder = FragmentBuilder::new(Ns::Xades, "Outer").expect("builder");
        let mut root = builder.root();
        builder
            .text_element(&mut root, Ns::Ds, "Value", "a < b & c")
            .expect("child");
        set_attribute(&mut root, "Id", "outer-1").expect("attribute");
        let fragment = builder.finish();

        assert_eq!(fragment.name().as_deref(), Some("Outer"));
        assert_eq!(fragment.id().as_deref(), Some("outer-1"));
        assert_eq!(
            fragment.canonicalize().expect("c14n"),
            "<xades:Outer xmlns:xades=\"http://uri.etsi.org/01903/v1.3.2#\" Id=\"outer-1\">\
             <ds:Value xmlns:ds=\"http://www.w3.org/2000/09/xmldsig#\">a &lt; b &amp; c</ds:Value>\
             </xades:Outer>"
        );
    }

    #[test]
    fn adopted_fragment_keeps_its_canonical_form() {
        let mut inner = FragmentBuilder::new(Ns::Ds, "Inner").expect("builder");
        let mut inner_root = inner.root();
        inner
            .text_element(&mut inner_root, Ns::Ds, "Leaf", "1")
            .expect("leaf");
        let inner = inner.finish();
        let before = inner.canonicalize().expect("c14n");

        let mut outer = FragmentBuilder::new(Ns::Xades, "Outer").expect("builder");
        let mut outer_root = outer.root();
        let adopted = outer.adopt(&mut outer_root, inner).expect("adopt");
        let outer = outer.finish();

        let after = canonicalizer::canonicalize_element(outer.document(), &adopted).expect("c14n");
        assert_eq!(before, after);
    }

    #[test]
    fn reference_shapes_follow_their_kind() {
        let document = Reference::document("ABC123", "digest", DigestAlgorithm::Sha512);
        assert_eq!(document.uri, "");
        assert_eq!(document.id.as_deref(), Some("ABC123"));
        assert_eq!(document.transforms(), &[ENVELOPED_SIGNATURE, EXC_C14N]);
        assert_eq!(document.reference_type(), None);

        let key_info = Reference::key_info("keyinfo", "digest", DigestAlgorithm::Sha512);
        assert_eq!(key_info.uri, "#keyinfo");
        assert_eq!(key_info.id, None);
        assert_eq!(key_info.transforms(), &[EXC_C14N]);

        let props = Reference::signed_properties("signed_props", "digest", DigestAlgorithm::Sha512);
        assert_eq!(props.uri, "#signed_props");
        assert_eq!(props.reference_type(), Some(SIGNED_PROPERTIES_TYPE));
    }
}
