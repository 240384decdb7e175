use chrono::{DateTime, FixedOffset};
use facturark_core::signer::constants::{DS_NS, XADES_NS};
use libxml::parser::Parser;
use libxml::tree::{Document, Node};
use libxml::xpath;
use std::path::{Path, PathBuf};

#[allow(dead_code)]
pub const PASSPHRASE: &str = "facturark-test";

pub fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

#[allow(dead_code)]
pub fn pkcs12_container() -> Vec<u8> {
    std::fs::read(fixture("certificates/signer.p12")).expect("read p12 fixture")
}

#[allow(dead_code)]
pub fn read_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture(relative)).expect("read fixture")
}

#[allow(dead_code)]
pub fn unsigned_invoice() -> Document {
    parse(&read_fixture("invoices/unsigned_invoice.xml"))
}

pub fn parse(xml: &str) -> Document {
    Parser::default().parse_string(xml).expect("parse xml")
}

#[allow(dead_code)]
pub fn signing_time() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2018-09-12T10:00:00-05:00").expect("signing time")
}

/// Nodes matching `expr`, with `ds` and `xades` prefixes registered.
#[allow(dead_code)]
pub fn select(document: &Document, expr: &str) -> Vec<Node> {
    let ctx = xpath::Context::new(document).expect("xpath context");
    ctx.register_namespace("ds", DS_NS).expect("ds ns");
    ctx.register_namespace("xades", XADES_NS).expect("xades ns");
    ctx.evaluate(expr).expect("xpath").get_nodes_as_vec()
}

#[allow(dead_code)]
pub fn select_one(document: &Document, expr: &str) -> Node {
    let mut nodes = select(document, expr);
    assert_eq!(nodes.len(), 1, "expected exactly one match for {expr}");
    nodes.remove(0)
}
