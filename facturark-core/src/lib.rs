//! Rust toolkit for signing DIAN electronic invoices (XAdES-BES over XML-DSig).
//!
//! # Examples
//! ```rust,no_run
//! use facturark_core::config::SignerConfig;
//! use facturark_core::signer::Signer;
//! use libxml::parser::Parser;
//!
//! let container = std::fs::read("certificate.p12")?;
//! let signer = Signer::from_pkcs12(&container, "passphrase", SignerConfig::default())?;
//!
//! let xml = std::fs::read_to_string("unsigned_invoice.xml")?;
//! let mut document = Parser::default()
//!     .parse_string(&xml)
//!     .map_err(|e| format!("XML parse error: {e:?}"))?;
//! signer.sign(&mut document)?;
//! println!("{}", document.to_string());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod config;
pub mod signer;
pub mod validation;

use thiserror::Error;

pub use signer::{Signer, SignerError};
pub use validation::XmlValidationError;

/// Top-level error wrapper for core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Signer(#[from] signer::SignerError),
    #[error(transparent)]
    XmlValidation(#[from] validation::XmlValidationError),
}
