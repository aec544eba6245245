//! Core library for rendering KSeF e-invoices as PDF.
//!
//! This crate provides:
//! - Tolerant extraction of FA(1), FA(2) and FA(3) invoice XML
//! - A normalized invoice model shared by every output
//! - A4 layout with page breaks and VAT summary reconciliation
//! - Deterministic PDF serialization

pub mod error;
pub mod invoice;
pub mod models;
pub mod render;

#[cfg(test)]
mod test_support;

pub use error::{ExtractionError, KsefError, RenderError, Result};
pub use invoice::{payment_method_label, InvoiceExtractor, KsefXmlParser};
pub use models::config::{ExtractionConfig, KsefConfig, RenderConfig};
pub use models::invoice::{
    AdditionalDescription, Footer, InvoiceHeader, LineItem, NormalizedInvoice, OrderReference,
    PaidStatus, Party, Payment, SchemaVersion, VatBucket, VatRateLabel,
};
pub use render::{format_amount, DocumentRenderer, InvoiceRenderer, LaidOutDocument};

use tracing::debug;

/// Convert KSeF XML into PDF bytes with default settings.
pub fn convert(xml: &str) -> Result<Vec<u8>> {
    convert_with_config(xml, &KsefConfig::default())
}

/// Convert KSeF XML into PDF bytes.
///
/// Nothing is returned unless both extraction and rendering succeed.
pub fn convert_with_config(xml: &str, config: &KsefConfig) -> Result<Vec<u8>> {
    let invoice = KsefXmlParser::with_config(config.extraction.clone()).extract(xml)?;
    debug!(
        "Extracted {} invoice {:?} with {} line item(s)",
        invoice.schema,
        invoice.invoice_number,
        invoice.line_items.len()
    );

    let pdf = InvoiceRenderer::with_config(config.render.clone())?.render(&invoice)?;
    Ok(pdf)
}
