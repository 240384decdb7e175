//! Certificate container parsing and certificate rendering helpers.
use super::hasher::{self, DigestAlgorithm};
use super::{SignerError, Stage, encoder};
use openssl::pkcs12::Pkcs12;
use openssl::pkey::Id;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use x509_cert::{
    Certificate,
    der::{Decode, DecodePem, Encode, Tag, Tagged, asn1::Any},
    name::Name,
};
use zeroize::Zeroizing;

/// Certificate and RSA private key taken from a PKCS#12 container.
///
/// The key is zeroed when the material is dropped or [`dispose`](Self::dispose)d.
pub struct CertificateMaterial {
    certificate: Certificate,
    certificate_der: Vec<u8>,
    private_key: RsaPrivateKey,
}

impl CertificateMaterial {
    /// Opens a PKCS#12 container protected by `passphrase`.
    pub fn from_pkcs12(container: &[u8], passphrase: &str) -> Result<Self, SignerError> {
        let pkcs12 = Pkcs12::from_der(container).map_err(|e| {
            SignerError::CertificateParse(format!("malformed PKCS#12 container: {e}"))
        })?;
        let parsed = pkcs12.parse2(passphrase).map_err(|e| {
            SignerError::CertificateParse(format!(
                "unable to open PKCS#12 container (wrong passphrase?): {e}"
            ))
        })?;
        let certificate = parsed.cert.ok_or_else(|| {
            SignerError::CertificateParse("container holds no certificate".into())
        })?;
        let key = parsed.pkey.ok_or_else(|| {
            SignerError::CertificateParse("container holds no private key".into())
        })?;
        if key.id() != Id::RSA {
            return Err(SignerError::CertificateParse(format!(
                "unsupported private key type {:?}, expected RSA",
                key.id()
            )));
        }

        let certificate_der = certificate.to_der().map_err(|e| {
            SignerError::CertificateParse(format!("certificate DER encoding error: {e}"))
        })?;
        let key_der = Zeroizing::new(key.private_key_to_der().map_err(|e| {
            SignerError::CertificateParse(format!("private key DER encoding error: {e}"))
        })?);
        let private_key = RsaPrivateKey::from_pkcs1_der(&key_der).map_err(|e| {
            SignerError::CertificateParse(format!("private key parse error: {e}"))
        })?;

        Self::from_parts(&certificate_der, private_key)
    }

    /// Builds the material from a DER certificate and a PKCS#8 DER private key.
    pub fn from_der(cert_der: &[u8], private_key_der: &[u8]) -> Result<Self, SignerError> {
        let private_key = RsaPrivateKey::from_pkcs8_der(private_key_der).map_err(|e| {
            SignerError::CertificateParse(format!("private key parse error: {e}"))
        })?;
        Self::from_parts(cert_der, private_key)
    }

    /// Builds the material from a PEM certificate and a PKCS#8 PEM private key.
    pub fn from_pem(cert_pem: &str, private_key_pem: &str) -> Result<Self, SignerError> {
        let certificate = Certificate::from_pem(cert_pem.as_bytes()).map_err(|e| {
            SignerError::CertificateParse(format!("certificate parse error: {e}"))
        })?;
        let cert_der = certificate.to_der().map_err(|e| {
            SignerError::CertificateParse(format!("certificate DER encoding error: {e}"))
        })?;
        let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem).map_err(|e| {
            SignerError::CertificateParse(format!("private key parse error: {e}"))
        })?;
        Self::from_parts(&cert_der, private_key)
    }

    fn from_parts(cert_der: &[u8], private_key: RsaPrivateKey) -> Result<Self, SignerError> {
        let certificate = Certificate::from_der(cert_der).map_err(|e| {
            SignerError::CertificateParse(format!("certificate parse error: {e}"))
        })?;

        let certificate_spki = certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| {
                SignerError::CertificateParse(format!("certificate public key error: {e}"))
            })?;
        let key_spki = private_key
            .to_public_key()
            .to_public_key_der()
            .map_err(|e| SignerError::CertificateParse(format!("public key error: {e}")))?;
        if certificate_spki != key_spki.as_bytes() {
            return Err(SignerError::CertificateParse(
                "private key does not belong to the certificate".into(),
            ));
        }

        Ok(Self {
            certificate,
            certificate_der: cert_der.to_vec(),
            private_key,
        })
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate_der
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Releases the material; the private key is zeroed before its memory is freed.
    pub fn dispose(self) {
        drop(self);
    }
}

impl fmt::Debug for CertificateMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateMaterial")
            .field("issuer", &issuer_name(&self.certificate))
            .field("serial_number", &serial_number(&self.certificate))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Parses a PKCS#12 container into certificate material.
pub fn parse(container: &[u8], passphrase: &str) -> Result<CertificateMaterial, SignerError> {
    Stage::ParseCertificate.enter();
    CertificateMaterial::from_pkcs12(container, passphrase)
}

/// DER form of the certificate, base64 encoded, without PEM armor.
pub fn serialize_certificate(cert: &Certificate) -> Result<String, SignerError> {
    let der = cert.to_der().map_err(|e| {
        SignerError::CertificateParse(format!("certificate DER encoding error: {e}"))
    })?;
    Ok(encoder::encode(&der))
}

/// Digest of the DER certificate, used as the XAdES `CertDigest`.
pub fn certificate_digest(
    cert: &Certificate,
    algorithm: DigestAlgorithm,
) -> Result<String, SignerError> {
    let der = cert.to_der().map_err(|e| {
        SignerError::CertificateParse(format!("certificate DER encoding error: {e}"))
    })?;
    Ok(hasher::digest(&der, algorithm))
}

/// Issuer distinguished name, most specific attribute first, e.g.
/// `emailAddress=...,CN=...,OU=...,O=...,L=...,ST=...,C=...`.
pub fn issuer_name(cert: &Certificate) -> String {
    render_name(&cert.tbs_certificate.issuer)
}

/// Certificate serial number in decimal.
pub fn serial_number(cert: &Certificate) -> String {
    serial_bytes_to_decimal_string(cert.tbs_certificate.serial_number.as_bytes())
}

fn render_name(name: &Name) -> String {
    name.0
        .iter()
        .rev()
        .map(|rdn| {
            rdn.0
                .iter()
                .map(|atv| {
                    format!(
                        "{}={}",
                        attribute_short_name(&atv.oid.to_string()),
                        attribute_value(&atv.value)
                    )
                })
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn attribute_short_name(oid: &str) -> String {
    let name = match oid {
        "2.5.4.3" => "CN",
        "2.5.4.4" => "SN",
        "2.5.4.5" => "serialNumber",
        "2.5.4.6" => "C",
        "2.5.4.7" => "L",
        "2.5.4.8" => "ST",
        "2.5.4.9" => "street",
        "2.5.4.10" => "O",
        "2.5.4.11" => "OU",
        "2.5.4.12" => "title",
        "2.5.4.42" => "GN",
        "1.2.840.113549.1.9.1" => "emailAddress",
        "0.9.2342.19200300.100.1.1" => "UID",
        "0.9.2342.19200300.100.1.25" => "DC",
        other => other,
    };
    name.to_string()
}

fn attribute_value(value: &Any) -> String {
    match value.tag() {
        Tag::Utf8String
        | Tag::PrintableString
        | Tag::Ia5String
        | Tag::TeletexString
        | Tag::VisibleString => String::from_utf8_lossy(value.value()).into_owned(),
        Tag::BmpString => {
            let units = value
                .value()
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect::<Vec<_>>();
            String::from_utf16_lossy(&units)
        }
        // RFC 4514 hexstring: the whole BER encoding, tag and length included
        _ => {
            let encoded = value.to_der().unwrap_or_else(|_| value.value().to_vec());
            let mut rendered = String::from("#");
            for byte in encoded {
                rendered.push_str(&format!("{byte:02x}"));
            }
            rendered
        }
    }
}

fn serial_bytes_to_decimal_string(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "0".to_string();
    }

    let mut digits: Vec<u8> = vec![0];
    for &byte in bytes {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let value = (*digit as u32) * 256 + carry;
            *digit = (value % 10) as u8;
            carry = value / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }

    while digits.len() > 1 && matches!(digits.last(), Some(0)) {
        digits.pop();
    }

    digits.iter().rev().map(|d| (b'0' + *d) as char).collect()
}
