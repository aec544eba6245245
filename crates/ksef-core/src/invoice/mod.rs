//! KSeF invoice XML extraction.

mod parser;
mod scope;
pub mod tables;

pub use parser::KsefXmlParser;
pub use scope::Scope;
pub use tables::{payment_method_label, PAYMENT_METHODS, VAT_RATE_FIELDS};

use std::path::Path;

use crate::error::{ExtractionError, KsefError};
use crate::models::invoice::NormalizedInvoice;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice extractors.
pub trait InvoiceExtractor {
    /// Extract a normalized invoice from an XML document.
    fn extract(&self, xml: &str) -> Result<NormalizedInvoice>;

    /// Read a file and extract the invoice it contains.
    fn extract_file(&self, path: &Path) -> crate::Result<NormalizedInvoice> {
        let xml = std::fs::read_to_string(path)?;
        self.extract(&xml).map_err(KsefError::from)
    }
}
