//! Error types for document text extraction

use thiserror::Error;

/// Error type for extraction operations
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF parser rejected the file
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Word package is not a readable zip archive
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Word document body is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Extension has no extraction routine
    #[error("Unsupported extension: {0:?}")]
    UnsupportedExtension(String),
}

