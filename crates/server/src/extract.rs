//! Picks the backend for a document and runs it.

use deck_core::{DocumentFormat, ImageTextExtractor, Result, SlideRecord};
use deck_pdf::PdfParser;
use deck_pptx::PptxParser;
use std::sync::Arc;

/// Both format backends, ready to run.
#[derive(Default)]
pub struct Extractor {
    pptx: PptxParser,
    pdf: PdfParser,
}

impl Extractor {
    /// Create an extractor; without an OCR engine, slide pictures are skipped.
    pub fn new(ocr: Option<Arc<dyn ImageTextExtractor>>) -> Self {
        let pptx = match ocr {
            Some(ocr) => PptxParser::new().with_ocr(ocr),
            None => PptxParser::new(),
        };
        Self {
            pptx,
            pdf: PdfParser::new(),
        }
    }

    pub fn has_ocr(&self) -> bool {
        self.pptx.has_ocr()
    }

    /// Extract slide records from a whole document held in memory.
    pub fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<Vec<SlideRecord>> {
        match format {
            DocumentFormat::Pptx => {
                log::debug!("Parsing as PPTX");
                self.pptx.parse_bytes(bytes)
            }
            DocumentFormat::Pdf => {
                log::debug!("Parsing as PDF");
                self.pdf.parse(bytes)
            }
        }
    }
}
