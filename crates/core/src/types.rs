//! Domain types for representing extracted slide content.

use serde::{Deserialize, Serialize};

use crate::text::{split_bullets, split_lines};

/// The JSON body returned for a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Slides in document order.
    pub slides: Vec<SlideRecord>,

    /// Number of slides, always `slides.len()`.
    pub count: usize,
}

impl ExtractionResponse {
    pub fn new(slides: Vec<SlideRecord>) -> Self {
        let count = slides.len();
        Self { slides, count }
    }
}

impl From<Vec<SlideRecord>> for ExtractionResponse {
    fn from(slides: Vec<SlideRecord>) -> Self {
        Self::new(slides)
    }
}

/// The format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// Slide deck (Office Open XML).
    Pptx,
    /// Portable Document Format, one record per page.
    Pdf,
}

impl DocumentFormat {
    /// Detect format from a bare file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect format from a filename suffix, ignoring case.
    ///
    /// Only the suffix matters: `deck.PPTX` is a slide deck whatever its
    /// content, and a name without an extension is never supported.
    pub fn from_filename(filename: &str) -> Option<Self> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
        }
    }
}

/// A single extracted slide (or PDF page).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// 1-based slide number.
    pub slide: usize,

    /// Text of the first shape when it carries text. Always empty for PDF pages.
    pub title: String,

    /// Non-empty text fragments in reading order.
    pub bullets: Vec<String>,

    /// Speaker notes, empty when the slide has none.
    pub notes: String,

    /// OCR text, one entry per picture that yielded text.
    pub images_text: Vec<String>,
}

impl SlideRecord {
    /// Create an empty record with the given number.
    pub fn new(slide: usize) -> Self {
        Self {
            slide,
            ..Self::default()
        }
    }

    /// Build a PDF page record from its raw text layer.
    pub fn from_page_text(slide: usize, text: &str) -> Self {
        Self {
            slide,
            bullets: split_lines(text),
            ..Self::default()
        }
    }

    /// Split shape text into bullet fragments and append them.
    pub fn add_bullets(&mut self, text: &str) {
        self.bullets.extend(split_bullets(text));
    }

    /// Append OCR output, ignoring whitespace-only results.
    pub fn add_image_text(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.images_text.push(text.to_string());
        }
    }

    /// Whether the record carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.bullets.is_empty()
            && self.notes.is_empty()
            && self.images_text.is_empty()
    }
}
