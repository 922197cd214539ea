//! PPTX file parser implementation.

use deck_core::{Error, ImageTextExtractor, Result, SlideRecord};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::rels::{rel_types, rels_path_for, Relationships};
use crate::shapes::{read_shapes, Shape};
use crate::xml::{attr_value, local_name};

/// Fallback location of the main presentation part.
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Parser for PPTX (Office Open XML) files.
#[derive(Clone, Default)]
pub struct PptxParser {
    /// OCR engine for picture shapes; pictures are skipped without one.
    ocr: Option<Arc<dyn ImageTextExtractor>>,
}

impl PptxParser {
    /// Create a new PPTX parser without OCR.
    pub fn new() -> Self {
        Self { ocr: None }
    }

    /// Run picture shapes through the given OCR engine.
    pub fn with_ocr(mut self, ocr: Arc<dyn ImageTextExtractor>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Whether picture shapes will be run through OCR.
    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Parse PPTX bytes held in memory.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<SlideRecord>> {
        self.parse(Cursor::new(bytes))
    }

    /// Parse a PPTX package from a reader, one record per slide.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Vec<SlideRecord>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let presentation_part = self.main_part(&mut archive)?;
        let slide_order = self.get_slide_order(&mut archive, &presentation_part)?;
        log::debug!("PPTX has {} slides", slide_order.len());

        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            slides.push(slide);
        }

        Ok(slides)
    }

    /// Locate the presentation part through the package relationships.
    fn main_part<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<String> {
        let Some(rels_content) = self.try_read_file(archive, "_rels/.rels")? else {
            return Ok(DEFAULT_PRESENTATION_PART.to_string());
        };

        let rels = Relationships::parse(&rels_content, "")?;
        Ok(rels
            .target_of_type(rel_types::OFFICE_DOCUMENT)
            .unwrap_or(DEFAULT_PRESENTATION_PART)
            .to_string())
    }

    /// Slide part names in presentation order (`p:sldIdLst`).
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        presentation_part: &str,
    ) -> Result<Vec<String>> {
        let content = self.read_file_from_archive(archive, presentation_part)?;
        let rels = self.read_relationships(archive, presentation_part)?;

        let mut slide_ids = Vec::new();
        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldId" =>
                {
                    if let Some(id) = attr_value(e, b"id", true) {
                        slide_ids.push(id);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing '{}': {}",
                        presentation_part, e
                    )));
                }
                _ => {}
            }
        }

        slide_ids
            .iter()
            .map(|id| {
                rels.target(id).map(str::to_string).ok_or_else(|| {
                    Error::PptxParseError(format!("Slide relationship '{}' not found", id))
                })
            })
            .collect()
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<SlideRecord> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let shapes = read_shapes(&content)?;
        let rels = self.read_relationships(archive, slide_path)?;

        let mut slide = SlideRecord::new(slide_number);

        for (idx, shape) in shapes.iter().enumerate() {
            match shape {
                Shape::Text { text, .. } => {
                    let text = text.trim();
                    if idx == 0 && slide.title.is_empty() {
                        slide.title = text.to_string();
                    } else {
                        slide.add_bullets(text);
                    }
                }
                Shape::Picture { embed: Some(embed) } => {
                    let Some(ocr) = self.ocr.as_deref() else {
                        continue;
                    };
                    match self.picture_text(archive, &rels, embed, ocr) {
                        Ok(text) => slide.add_image_text(&text),
                        Err(e) => {
                            log::debug!(
                                "Skipping picture {} on slide {}: {}",
                                embed,
                                slide_number,
                                e
                            );
                        }
                    }
                }
                Shape::Picture { embed: None } | Shape::Other => {}
            }
        }

        if let Some(notes_path) = rels.target_of_type(rel_types::NOTES_SLIDE) {
            slide.notes = self.notes_text(archive, notes_path);
        }

        Ok(slide)
    }

    /// Run OCR over the image a picture shape embeds.
    fn picture_text<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        rels: &Relationships,
        embed: &str,
        ocr: &dyn ImageTextExtractor,
    ) -> Result<String> {
        let image_path = rels.target(embed).ok_or_else(|| {
            Error::PptxParseError(format!("Image relationship '{}' not found", embed))
        })?;
        let bytes = self.read_bytes_from_archive(archive, image_path)?;
        ocr.extract_text(&bytes)
    }

    /// Trimmed text of the notes page's body placeholder.
    ///
    /// An unreadable notes part leaves the notes empty.
    fn notes_text<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, notes_path: &str) -> String {
        let shapes = match self
            .read_file_from_archive(archive, notes_path)
            .and_then(|content| read_shapes(&content))
        {
            Ok(shapes) => shapes,
            Err(e) => {
                log::warn!("Ignoring notes part '{}': {}", notes_path, e);
                return String::new();
            }
        };

        shapes
            .into_iter()
            .find(|shape| shape.is_placeholder("body"))
            .and_then(|shape| match shape {
                Shape::Text { text, .. } => Some(text.trim().to_string()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Relationships of a part; a part without a `.rels` file has none.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        part: &str,
    ) -> Result<Relationships> {
        match self.try_read_file(archive, &rels_path_for(part))? {
            Some(content) => Relationships::parse(&content, part),
            None => Ok(Relationships::default()),
        }
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        self.try_read_file(archive, path)?.ok_or_else(|| {
            Error::PptxParseError(format!("File not found in archive '{}'", path))
        })
    }

    /// Read a text file, returning `None` when it is absent.
    fn try_read_file<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Option<String>> {
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::ZipError(format!("Failed to open '{}': {}", path, e)));
            }
        };

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(Some(content))
    }

    /// Read a binary file (media) from the ZIP archive.
    fn read_bytes_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Vec<u8>> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{picture, placeholder_picture, text_box, video, DeckBuilder, SlideSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// OCR stub returning a fixed string for every image it sees.
    struct FixedOcr {
        text: &'static str,
        calls: AtomicUsize,
    }

    impl FixedOcr {
        fn new(text: &'static str) -> Self {
            Self {
                text,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ImageTextExtractor for FixedOcr {
        fn extract_text(&self, _image: &[u8]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    /// OCR stub that fails like an undecodable image would.
    struct FailingOcr;

    impl ImageTextExtractor for FailingOcr {
        fn extract_text(&self, _image: &[u8]) -> Result<String> {
            Err(Error::ImageDecodeError("unsupported image format".to_string()))
        }
    }

    #[test]
    fn test_title_and_bullets() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![
                text_box(&["Q1 Results"]),
                text_box(&["Revenue", "• Up 10%", "- Costs down"]),
            ]))
            .build();

        let slides = PptxParser::new().parse_bytes(&deck).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].slide, 1);
        assert_eq!(slides[0].title, "Q1 Results");
        assert_eq!(slides[0].bullets, vec!["Revenue", "Up 10%", "Costs down"]);
    }

    #[test]
    fn test_title_only_slide() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![text_box(&["Welcome"])]))
            .build();

        let slides = PptxParser::new().parse_bytes(&deck).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Welcome");
        assert!(slides[0].bullets.is_empty());
        assert!(slides[0].notes.is_empty());
        assert!(slides[0].images_text.is_empty());
    }

    #[test]
    fn test_first_shape_not_text_means_no_title() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![
                picture("rId2"),
                text_box(&["Caption"]),
            ]))
            .build();

        let slides = PptxParser::new().parse_bytes(&deck).unwrap();
        assert!(slides[0].title.is_empty());
        assert_eq!(slides[0].bullets, vec!["Caption"]);
    }

    #[test]
    fn test_slide_order_follows_presentation() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![text_box(&["First"])]))
            .slide(SlideSpec::new(vec![]))
            .slide(SlideSpec::new(vec![text_box(&["Third"])]))
            .reversed_parts()
            .build();

        let slides = PptxParser::new().parse_bytes(&deck).unwrap();
        let numbers: Vec<usize> = slides.iter().map(|s| s.slide).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(slides[0].title, "First");
        assert!(slides[1].is_empty());
        assert_eq!(slides[2].title, "Third");
    }

    #[test]
    fn test_notes() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![text_box(&["Agenda"])]).notes("  Mention the budget.  "))
            .build();

        let slides = PptxParser::new().parse_bytes(&deck).unwrap();
        assert_eq!(slides[0].notes, "Mention the budget.");
    }

    #[test]
    fn test_picture_ocr() {
        let deck = DeckBuilder::new()
            .slide(
                SlideSpec::new(vec![text_box(&["Chart"]), picture("rId2")])
                    .image("rId2", b"png bytes"),
            )
            .build();

        let ocr = Arc::new(FixedOcr::new("  Sales by region \n"));
        let parser = PptxParser::new().with_ocr(ocr.clone());
        let slides = parser.parse_bytes(&deck).unwrap();

        assert_eq!(slides[0].images_text, vec!["Sales by region"]);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_placeholder_and_video_pictures_skip_ocr() {
        let deck = DeckBuilder::new()
            .slide(
                SlideSpec::new(vec![
                    text_box(&["Launch"]),
                    placeholder_picture("rId2"),
                    video("rId3"),
                    picture("rId4"),
                ])
                .image("rId2", b"placeholder png")
                .image("rId3", b"poster png")
                .image("rId4", b"diagram png"),
            )
            .build();

        let ocr = Arc::new(FixedOcr::new("Roadmap"));
        let parser = PptxParser::new().with_ocr(ocr.clone());
        let slides = parser.parse_bytes(&deck).unwrap();

        assert_eq!(slides[0].title, "Launch");
        assert_eq!(slides[0].images_text, vec!["Roadmap"]);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_blank_ocr_output_dropped() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![picture("rId2")]).image("rId2", b"png bytes"))
            .build();

        let parser = PptxParser::new().with_ocr(Arc::new(FixedOcr::new(" \n ")));
        let slides = parser.parse_bytes(&deck).unwrap();
        assert!(slides[0].images_text.is_empty());
    }

    #[test]
    fn test_ocr_failure_is_swallowed() {
        let deck = DeckBuilder::new()
            .slide(
                SlideSpec::new(vec![text_box(&["Title"]), picture("rId2"), picture("rId7")])
                    .image("rId2", b"not an image"),
            )
            .build();

        let parser = PptxParser::new().with_ocr(Arc::new(FailingOcr));
        let slides = parser.parse_bytes(&deck).unwrap();
        assert_eq!(slides[0].title, "Title");
        assert!(slides[0].images_text.is_empty());
    }

    #[test]
    fn test_without_ocr_pictures_skipped() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![picture("rId2")]).image("rId2", b"png bytes"))
            .build();

        let parser = PptxParser::new();
        assert!(!parser.has_ocr());
        let slides = parser.parse_bytes(&deck).unwrap();
        assert_eq!(slides.len(), 1);
        assert!(slides[0].images_text.is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        let err = PptxParser::new().parse_bytes(b"plain text").unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
        assert!(err.is_invalid_document());
    }

    #[test]
    fn test_zip_without_presentation() {
        let deck = DeckBuilder::new().without_presentation().build();
        let err = PptxParser::new().parse_bytes(&deck).unwrap_err();
        assert!(matches!(err, Error::PptxParseError(_)));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let deck = DeckBuilder::new()
            .slide(SlideSpec::new(vec![text_box(&["A"]), text_box(&["b • c"])]).notes("n"))
            .slide(SlideSpec::new(vec![text_box(&["D"])]))
            .build();

        let parser = PptxParser::new();
        assert_eq!(parser.parse_bytes(&deck).unwrap(), parser.parse_bytes(&deck).unwrap());
    }
}
