//! OCR engine implementation.

use deck_core::{Error, ImageTextExtractor, Result};
use rusty_tesseract::{image, Args, Image};

/// Default Tesseract language pack.
pub const DEFAULT_LANG: &str = "eng";

/// OCR engine driving the system `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    /// Tesseract language code(s), e.g. "eng" or "eng+deu".
    lang: String,
}

impl TesseractOcr {
    /// Create an engine for the default language without probing for the binary.
    pub fn new() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Set the Tesseract language code(s).
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// The configured language code(s).
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Probe for a usable Tesseract installation.
    ///
    /// Returns `None` when the binary cannot be run, in which case callers
    /// extract slides without OCR.
    pub fn detect() -> Option<Self> {
        match rusty_tesseract::get_tesseract_version() {
            Ok(version) => {
                log::info!(
                    "OCR enabled: {}",
                    version.lines().next().unwrap_or_default().trim()
                );
                Some(Self::new())
            }
            Err(e) => {
                log::warn!("tesseract not found - picture text will be skipped ({})", e);
                None
            }
        }
    }

    /// Decode and recognize an encoded image.
    pub fn recognize(&self, bytes: &[u8]) -> Result<String> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::ImageDecodeError(e.to_string()))?;

        let img = Image::from_dynamic_image(&decoded)
            .map_err(|e| Error::OcrError(format!("Failed to stage image: {}", e)))?;

        let args = Args {
            lang: self.lang.clone(),
            ..Args::default()
        };

        let text = rusty_tesseract::image_to_string(&img, &args)
            .map_err(|e| Error::OcrError(e.to_string()))?;

        Ok(text.trim().to_string())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageTextExtractor for TesseractOcr {
    fn extract_text(&self, image: &[u8]) -> Result<String> {
        self.recognize(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lang() {
        assert_eq!(TesseractOcr::new().lang(), "eng");
        assert_eq!(TesseractOcr::default().with_lang("eng+deu").lang(), "eng+deu");
    }

    #[test]
    fn test_undecodable_image_is_decode_error() {
        let ocr = TesseractOcr::new();
        let err = ocr.recognize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::ImageDecodeError(_)));
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let ocr = TesseractOcr::new();
        assert!(ocr.extract_text(&[]).is_err());
    }
}
