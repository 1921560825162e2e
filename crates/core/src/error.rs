//! Error types for deck text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting text from a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error (PPTX is a ZIP container).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error inside the PPTX.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Failed to extract text from a slide.
    #[error("Text extraction error: {0}")]
    Extraction(String),
}
