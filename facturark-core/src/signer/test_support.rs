use super::certificate::{self, CertificateMaterial};
use libxml::{parser::Parser, tree::Document};
use std::path::{Path, PathBuf};

pub(crate) const PASSPHRASE: &str = "facturark-test";

pub(crate) fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

pub(crate) fn pkcs12_container() -> Vec<u8> {
    std::fs::read(fixture("certificates/signer.p12")).expect("read p12 fixture")
}

pub(crate) fn material() -> CertificateMaterial {
    certificate::parse(&pkcs12_container(), PASSPHRASE).expect("parse p12 fixture")
}

pub(crate) fn invoice_xml() -> String {
    std::fs::read_to_string(fixture("invoices/unsigned_invoice.xml")).expect("read invoice")
}

pub(crate) fn invoice_document() -> Document {
    Parser::default()
        .parse_string(&invoice_xml())
        .expect("parse invoice")
}
