//! XAdES qualifying properties for the BES level.
use super::{
    Fragment, FragmentBuilder, Ns, QualifyingPropertiesComposer, SignedPropertiesComposer,
    SignedPropertiesData, set_attribute,
};
use crate::signer::SignerError;

#[derive(Debug, Default, Clone, Copy)]
pub struct XadesSignedPropertiesComposer;

impl SignedPropertiesComposer for XadesSignedPropertiesComposer {
    fn compose(&self, data: &SignedPropertiesData<'_>) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Xades, "SignedProperties")?;
        let mut root = builder.root();
        set_attribute(&mut root, "Id", &data.id)?;

        let mut properties = builder.element(&mut root, Ns::Xades, "SignedSignatureProperties")?;
        builder.text_element(&mut properties, Ns::Xades, "SigningTime", &data.signing_time)?;

        let mut signing_certificate =
            builder.element(&mut properties, Ns::Xades, "SigningCertificate")?;
        let mut cert = builder.element(&mut signing_certificate, Ns::Xades, "Cert")?;
        let mut cert_digest = builder.element(&mut cert, Ns::Xades, "CertDigest")?;
        builder.algorithm_element(
            &mut cert_digest,
            "DigestMethod",
            data.certificate_digest_algorithm.uri(),
        )?;
        builder.text_element(&mut cert_digest, Ns::Ds, "DigestValue", &data.certificate_digest)?;
        let mut issuer_serial = builder.element(&mut cert, Ns::Xades, "IssuerSerial")?;
        builder.text_element(&mut issuer_serial, Ns::Ds, "X509IssuerName", &data.issuer_name)?;
        builder.text_element(
            &mut issuer_serial,
            Ns::Ds,
            "X509SerialNumber",
            &data.serial_number,
        )?;

        let mut policy_identifier =
            builder.element(&mut properties, Ns::Xades, "SignaturePolicyIdentifier")?;
        let mut policy_id =
            builder.element(&mut policy_identifier, Ns::Xades, "SignaturePolicyId")?;
        let mut sig_policy_id = builder.element(&mut policy_id, Ns::Xades, "SigPolicyId")?;
        builder.text_element(
            &mut sig_policy_id,
            Ns::Xades,
            "Identifier",
            &data.policy.identifier,
        )?;
        builder.text_element(
            &mut sig_policy_id,
            Ns::Xades,
            "Description",
            &data.policy.description,
        )?;
        let mut policy_hash = builder.element(&mut policy_id, Ns::Xades, "SigPolicyHash")?;
        builder.algorithm_element(
            &mut policy_hash,
            "DigestMethod",
            data.policy.digest_algorithm.uri(),
        )?;
        builder.text_element(&mut policy_hash, Ns::Ds, "DigestValue", &data.policy.digest_value)?;

        if let Some(role) = data.claimed_role {
            let mut signer_role = builder.element(&mut properties, Ns::Xades, "SignerRole")?;
            let mut claimed_roles = builder.element(&mut signer_role, Ns::Xades, "ClaimedRoles")?;
            builder.text_element(&mut claimed_roles, Ns::Xades, "ClaimedRole", role)?;
        }

        Ok(builder.finish())
    }
}

/// `xades:QualifyingProperties[@Target]` around the signed properties.
#[derive(Debug, Default, Clone, Copy)]
pub struct XadesQualifyingPropertiesComposer;

impl QualifyingPropertiesComposer for XadesQualifyingPropertiesComposer {
    fn compose(&self, signed_properties: Fragment, target: &str) -> Result<Fragment, SignerError> {
        let mut builder = FragmentBuilder::new(Ns::Xades, "QualifyingProperties")?;
        let mut root = builder.root();
        set_attribute(&mut root, "Target", &format!("#{target}"))?;
        builder.adopt(&mut root, signed_properties)?;
        Ok(builder.finish())
    }
}
