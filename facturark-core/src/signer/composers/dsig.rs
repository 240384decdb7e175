//! XML-DSig elements: `KeyInfo`, `Object`, `SignatureValue`, `SignedInfo` and `Signature`.
use super::{
    Fragment, FragmentBuilder, KeyInfoData, Ns, SignatureComposer, SignatureParts,
    SignedInfoComposer, SignedInfoData, set_attribute,
};
use crate::signer::SignerError;
use crate::signer::constants::EXC_C14N;

/// `ds:KeyInfo[@Id]/ds:X509Data/ds:X509Certificate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyInfoComposer;

impl KeyInfoComposer {
    pub fn compose(&self, data: &KeyInfoData) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Ds, "KeyInfo")?;
        let mut root = builder.root();
        set_attribute(&mut root, "Id", &data.id)?;

        let mut x509_data = builder.element(&mut root, Ns::Ds, "X509Data")?;
        builder.text_element(&mut x509_data, Ns::Ds, "X509Certificate", &data.certificate)?;
        Ok(builder.finish())
    }
}

/// `ds:Object` wrapping the qualifying properties.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectComposer;

impl ObjectComposer {
    pub fn compose(&self, qualifying_properties: Fragment) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Ds, "Object")?;
        let mut root = builder.root();
        builder.adopt(&mut root, qualifying_properties)?;
        Ok(builder.finish())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureValueComposer;

impl SignatureValueComposer {
    pub fn compose(&self, id: &str, value: &str) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Ds, "SignatureValue")?;
        let mut root = builder.root();
        set_attribute(&mut root, "Id", id)?;
        root.set_content(value)
            .map_err(|e| SignerError::Composition(format!("failed to set SignatureValue: {e:?}")))?;
        Ok(builder.finish())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlDsigSignedInfoComposer;

impl SignedInfoComposer for XmlDsigSignedInfoComposer {
    fn compose(&self, data: &SignedInfoData) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Ds, "SignedInfo")?;
        let mut root = builder.root();
        builder.algorithm_element(&mut root, "CanonicalizationMethod", EXC_C14N)?;
        builder.algorithm_element(&mut root, "SignatureMethod", data.signature_algorithm.uri())?;

        for reference in &data.references {
            let mut node = builder.element(&mut root, Ns::Ds, "Reference")?;
            if let Some(id) = &reference.id {
                set_attribute(&mut node, "Id", id)?;
            }
            set_attribute(&mut node, "URI", &reference.uri)?;
            if let Some(reference_type) = reference.reference_type() {
                set_attribute(&mut node, "Type", reference_type)?;
            }

            let mut transforms = builder.element(&mut node, Ns::Ds, "Transforms")?;
            for transform in reference.transforms() {
                builder.algorithm_element(&mut transforms, "Transform", transform)?;
            }
            builder.algorithm_element(&mut node, "DigestMethod", reference.digest_algorithm.uri())?;
            builder.text_element(&mut node, Ns::Ds, "DigestValue", &reference.digest_value)?;
        }
        Ok(builder.finish())
    }
}

/// `ds:Signature[@Id]` with its four children in schema order.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlDsigSignatureComposer;

impl SignatureComposer for XmlDsigSignatureComposer {
    fn compose(&self, parts: SignatureParts) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Ds, "Signature")?;
        let mut root = builder.root();
        set_attribute(&mut root, "Id", &parts.id)?;

        builder.adopt(&mut root, parts.signed_info)?;
        builder.adopt(&mut root, parts.signature_value)?;
        builder.adopt(&mut root, parts.key_info)?;
        builder.adopt(&mut root, parts.object)?;
        Ok(builder.finish())
    }
}
