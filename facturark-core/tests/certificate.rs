mod common;

use facturark_core::signer::SignerError;
use facturark_core::signer::certificate::{
    self, CertificateMaterial, certificate_digest, issuer_name, serial_number,
    serialize_certificate,
};
use facturark_core::signer::encoder;
use facturark_core::signer::hasher::DigestAlgorithm;

const CERTIFICATE_DIGEST: &str =
    "irCNcGNtkpWoOTwCyZmvD/SMPhLzkvBfa67cKsknz44x/i9D0nQbdd+tVwJ/UqyeMCXuxVOovkUI6jHey0az7A==";

fn material() -> CertificateMaterial {
    certificate::parse(&common::pkcs12_container(), common::PASSPHRASE).expect("parse p12")
}

#[test]
fn serialized_certificate_round_trips_through_base64() {
    let material = material();
    let serialized = serialize_certificate(material.certificate()).expect("serialize");

    assert!(!serialized.contains("BEGIN CERTIFICATE"));
    assert_eq!(serialized.len(), 1452);
    let decoded = encoder::decode(&serialized).expect("base64");
    assert_eq!(decoded, material.certificate_der());
    assert_eq!(encoder::encode(&decoded), serialized);
}

#[test]
fn certificate_digest_matches_fixture() {
    let material = material();
    assert_eq!(
        certificate_digest(material.certificate(), DigestAlgorithm::Sha512).expect("digest"),
        CERTIFICATE_DIGEST
    );
}

#[test]
fn issuer_and_serial_are_rendered_for_issuer_serial() {
    let material = material();
    assert_eq!(
        issuer_name(material.certificate()),
        "emailAddress=firma@facturark.test,CN=firma.facturark.test,OU=Firma Electronica,\
         O=Facturark Pruebas SAS,L=Medellin,ST=Antioquia,C=CO"
    );
    assert_eq!(serial_number(material.certificate()), "4660");
}

#[test]
fn pem_material_matches_container() {
    let from_pem = CertificateMaterial::from_pem(
        &common::read_fixture("certificates/signer.pem"),
        &common::read_fixture("certificates/signer.key.pem"),
    )
    .expect("pem material");
    let from_container = material();

    assert_eq!(from_pem.certificate_der(), from_container.certificate_der());
    assert_eq!(from_pem.public_key(), from_container.public_key());
}

#[test]
fn key_must_belong_to_the_certificate() {
    let err = CertificateMaterial::from_pem(
        &common::read_fixture("certificates/signer.pem"),
        &common::read_fixture("certificates/other.key.pem"),
    )
    .expect_err("mismatched key");
    assert!(matches!(err, SignerError::CertificateParse(_)));
}

#[test]
fn unusable_containers_are_certificate_errors() {
    let wrong_passphrase = certificate::parse(&common::pkcs12_container(), "wrong");
    assert!(matches!(wrong_passphrase, Err(SignerError::CertificateParse(_))));

    let garbage = certificate::parse(b"definitely not pkcs12", common::PASSPHRASE);
    assert!(matches!(garbage, Err(SignerError::CertificateParse(_))));

    let ec_container = std::fs::read(common::fixture("certificates/ec_signer.p12")).expect("read");
    let ec = certificate::parse(&ec_container, common::PASSPHRASE);
    assert!(matches!(ec, Err(SignerError::CertificateParse(_))));
}

#[test]
fn disposed_material_can_be_parsed_again() {
    let first = material();
    let der = first.certificate_der().to_vec();
    first.dispose();

    assert_eq!(material().certificate_der(), der.as_slice());
}
