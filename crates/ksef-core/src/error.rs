//! Error types for the ksef-core library.

use thiserror::Error;

/// Main error type for the ksef library.
#[derive(Error, Debug)]
pub enum KsefError {
    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// PDF rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning KSeF XML into a normalized invoice.
///
/// Both variants are fatal: nothing is rendered once either is returned.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input is not well-formed XML, or it carries a DTD
    /// (entity declarations are refused outright), or it exceeds the
    /// configured node limit.
    #[error("malformed XML document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    /// The root element namespace is not one of the known KSeF schemas.
    #[error("unrecognized KSeF schema namespace: {0:?}")]
    UnrecognizedSchema(String),
}

/// Errors raised while loading fonts or serializing laid-out pages to PDF.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A bundled font program could not be parsed.
    #[error("failed to load font: {0}")]
    Font(String),

    /// The PDF object graph could not be encoded or written.
    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

/// Result type for the ksef library.
pub type Result<T> = std::result::Result<T, KsefError>;
