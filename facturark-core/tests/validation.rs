mod common;

use facturark_core::XmlValidationError;
use facturark_core::config::{Config, SignerConfig};
use facturark_core::signer::Signer;
use facturark_core::validation::{validate_xml_document, validate_xml_file, validate_xml_str};

fn config() -> Config {
    Config::new(
        SignerConfig::default(),
        common::fixture("schemas/invoice-lax.xsd"),
    )
}

#[test]
fn unsigned_fixture_is_valid() {
    let result = validate_xml_file(&common::fixture("invoices/unsigned_invoice.xml"), &config());
    if let Err(err) = result {
        panic!("XML validation failed: {err}");
    }
}

#[test]
fn signed_invoice_is_still_valid() {
    let signer = Signer::from_pkcs12(
        &common::pkcs12_container(),
        common::PASSPHRASE,
        config().signer().clone(),
    )
    .expect("signer");
    let mut document = common::unsigned_invoice();
    signer.sign(&mut document).expect("sign");

    validate_xml_document(&document, &config()).expect("signed invoice validates");
}

#[test]
fn foreign_root_is_invalid() {
    let err = validate_xml_str(r#"<Invoice xmlns="urn:other"/>"#, &config())
        .expect_err("root outside the invoice namespace");
    assert!(matches!(err, XmlValidationError::Invalid(messages) if !messages.is_empty()));
}

#[test]
fn missing_files_are_reported() {
    let err = validate_xml_file(&common::fixture("invoices/missing.xml"), &config())
        .expect_err("missing invoice");
    assert!(matches!(err, XmlValidationError::FileNotFound { .. }));

    let config = Config::new(SignerConfig::default(), common::fixture("schemas/missing.xsd"));
    let err = validate_xml_file(&common::fixture("invoices/unsigned_invoice.xml"), &config)
        .expect_err("missing schema");
    assert!(
        matches!(err, XmlValidationError::FileNotFound { path } if path.ends_with("missing.xsd"))
    );
}
