//! XSD validation of invoice documents.
use std::path::Path;

use crate::config::Config;
use libxml::{
    error::StructuredError,
    parser::Parser,
    schemas::{SchemaParserContext, SchemaValidationContext},
    tree::Document,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlValidationError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },
    #[error("invalid XML path: {path}")]
    InvalidXmlPath { path: String },
    #[error("unable to load schema {path}: {}", messages.join("; "))]
    Schema { path: String, messages: Vec<String> },
    #[error("failed to parse XML: {0}")]
    Parse(String),
    #[error("document does not conform to the schema: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

fn format_validation_errors(errors: Vec<StructuredError>) -> Vec<String> {
    errors
        .into_iter()
        .map(|se| format!("{se:?}"))
        .collect::<Vec<String>>()
}

fn path_str(path: &Path) -> Result<&str, XmlValidationError> {
    path.to_str().ok_or_else(|| XmlValidationError::InvalidXmlPath {
        path: path.display().to_string(),
    })
}

fn build_validation_context(
    config: &Config,
) -> Result<SchemaValidationContext, XmlValidationError> {
    let xsd_path = config.xsd_invoice_path();
    // libxml only reports a generic I/O failure for a missing schema
    if !xsd_path.exists() {
        return Err(XmlValidationError::FileNotFound {
            path: xsd_path.display().to_string(),
        });
    }

    let xsd = path_str(xsd_path)?;
    let mut parser_ctx = SchemaParserContext::from_file(xsd);
    SchemaValidationContext::from_parser(&mut parser_ctx).map_err(|errors| {
        XmlValidationError::Schema {
            path: xsd.to_string(),
            messages: format_validation_errors(errors),
        }
    })
}

/// Validates an invoice file against the configured schema.
pub fn validate_xml_file(path: &Path, config: &Config) -> Result<(), XmlValidationError> {
    if !path.exists() {
        return Err(XmlValidationError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let xml_path = path_str(path)?;
    let mut validation_ctx = build_validation_context(config)?;
    validation_ctx
        .validate_file(xml_path)
        .map_err(|errors| XmlValidationError::Invalid(format_validation_errors(errors)))
}

/// Validates an already parsed invoice, signed or not.
pub fn validate_xml_document(
    document: &Document,
    config: &Config,
) -> Result<(), XmlValidationError> {
    let mut validation_ctx = build_validation_context(config)?;
    validation_ctx
        .validate_document(document)
        .map_err(|errors| XmlValidationError::Invalid(format_validation_errors(errors)))
}

pub fn validate_xml_str(xml: &str, config: &Config) -> Result<(), XmlValidationError> {
    let document = Parser::default()
        .parse_string(xml)
        .map_err(|e| XmlValidationError::Parse(format!("{e:?}")))?;
    validate_xml_document(&document, config)
}
