//! Namespaces and algorithm identifiers used by the signature block.
pub const DS_NS: &str = "http://www.w3.org/2000/09/xmldsig#";
pub const XADES_NS: &str = "http://uri.etsi.org/01903/v1.3.2#";
pub const DS_PREFIX: &str = "ds";
pub const XADES_PREFIX: &str = "xades";

/// Namespaces declared on the invoice root when the signature is inserted.
pub const SIGNATURE_NAMESPACES: [(&str, &str); 2] = [(DS_PREFIX, DS_NS), (XADES_PREFIX, XADES_NS)];

pub(crate) const CBC_NS: &str =
    "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";

pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
pub const SIGNED_PROPERTIES_TYPE: &str = "http://uri.etsi.org/01903#SignedProperties";

pub const SHA256_URI: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const SHA384_URI: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
pub const SHA512_URI: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

pub const RSA_SHA256_URI: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const RSA_SHA384_URI: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";
pub const RSA_SHA512_URI: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";

pub const DIAN_POLICY_IDENTIFIER: &str =
    "https://facturaelectronica.dian.gov.co/politicadefirma/v1/politicadefirmav2.pdf";
pub const DIAN_POLICY_DESCRIPTION: &str =
    "Política de firma para facturas electrónicas de la República de Colombia";
/// SHA-512 of the published DIAN signing-policy document.
pub const DIAN_POLICY_DIGEST: &str =
    "Zcjw1Z9nGQn2j6NyGx8kAaLbOfJGd/fJxRTCeirlqAg7zRG27piJkJOpflGu7XACpMj9hC6dVMcCyzqHxxPZeQ==";
pub const DIAN_CLAIMED_ROLE: &str = "supplier";
