//! The seam between slide extraction and optical character recognition.

use crate::Result;

/// Produces text from raw image bytes.
///
/// Callers treat any `Err` as "no text" and carry on; implementations
/// should not panic on undecodable input.
pub trait ImageTextExtractor: Send + Sync {
    /// Recognize text in an encoded image (PNG, JPEG, ...).
    fn extract_text(&self, image: &[u8]) -> Result<String>;
}
