//! Error types for slide extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting slides from a document.
#[derive(Error, Debug)]
pub enum Error {
    /// The filename suffix does not name a supported format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The PPTX package structure is broken.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// The PDF could not be loaded.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// An embedded picture could not be decoded.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),

    /// The OCR engine failed on a decoded image.
    #[error("OCR error: {0}")]
    OcrError(String),
}

impl Error {
    /// Whether the error comes from the document content itself rather
    /// than from the host environment.
    pub fn is_invalid_document(&self) -> bool {
        matches!(
            self,
            Error::PptxParseError(_) | Error::PdfError(_) | Error::ZipError(_) | Error::XmlError(_)
        )
    }
}
