//! PDF file parser implementation.

use deck_core::{Error, Result, SlideRecord};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Parser for PDF documents.
pub struct PdfParser;

impl PdfParser {
    /// Create a new PDF parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse PDF bytes into one record per page, in page order.
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<SlideRecord>> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| Error::PdfError(format!("Failed to load PDF: {}", e)))?;

        if doc.is_encrypted() {
            log::warn!("PDF is encrypted; page text may be unavailable");
        }

        let pages = doc.get_pages();
        log::debug!("PDF has {} pages", pages.len());

        let mut records = Vec::with_capacity(pages.len());
        for (idx, (page_number, page_id)) in pages.iter().enumerate() {
            let text = self.page_text(&doc, *page_number, *page_id);
            records.push(SlideRecord::from_page_text(idx + 1, &text));
        }

        Ok(records)
    }

    /// Extract the text layer of one page.
    ///
    /// A page that cannot be decoded still yields a record, so failures
    /// here are logged and treated as an empty page.
    fn page_text(&self, doc: &Document, page_number: u32, page_id: ObjectId) -> String {
        match read_page_text(doc, page_id) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to extract text from page {}: {}", page_number, e);
                String::new()
            }
        }
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a page's content stream and collect shown text, one line per
/// text line on the page.
///
/// A line ends at `ET`, at `T*`, `'` and `"`, at a `Td`/`TD` that moves
/// vertically, and at a `Tm` that sets a new baseline.
fn read_page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, &str> = doc
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut text = String::new();
    let mut encoding = None;
    let mut baseline: Option<f32> = None;

    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "Td" | "TD" => {
                if number(operands.get(1)).is_some_and(|ty| ty != 0.0) {
                    end_line(&mut text);
                }
            }
            "Tm" => {
                let y = number(operands.get(5));
                if y != baseline {
                    end_line(&mut text);
                }
                baseline = y;
            }
            "T*" => end_line(&mut text),
            "'" | "\"" => {
                end_line(&mut text);
                show_text(&mut text, encoding, &operands[operands.len().saturating_sub(1)..]);
            }
            "Tj" | "TJ" => show_text(&mut text, encoding, operands),
            "ET" => end_line(&mut text),
            _ => {}
        }
    }

    Ok(text)
}

fn number(operand: Option<&Object>) -> Option<f32> {
    operand.and_then(|o| o.as_float().ok())
}

fn end_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// Append the strings of a `Tj`/`TJ` operand list. Large negative kerning
/// inside a `TJ` array is a word gap.
fn show_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)),
            Object::Array(items) => show_text(text, encoding, items),
            Object::Integer(i) if *i < -100 => text.push(' '),
            Object::Real(r) if *r < -100.0 => text.push(' '),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_pdf, build_pdf_from_operations, single_block};
    use lopdf::content::Operation;

    #[test]
    fn test_one_record_per_page() {
        let bytes = build_pdf(&[&["Quarterly Review", "Revenue up"], &[], &["Questions"]]);
        let records = PdfParser::new().parse(&bytes).unwrap();

        assert_eq!(records.len(), 3);
        let numbers: Vec<usize> = records.iter().map(|r| r.slide).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(records[1].bullets.is_empty());
        assert_eq!(records[2].bullets, vec!["Questions"]);
    }

    #[test]
    fn test_page_fields() {
        let bytes = build_pdf(&[&["Quarterly Review", "Revenue up"]]);
        let records = PdfParser::new().parse(&bytes).unwrap();
        let page = &records[0];

        assert!(page.title.is_empty());
        assert!(page.notes.is_empty());
        assert!(page.images_text.is_empty());
        assert_eq!(page.bullets, vec!["Quarterly Review", "Revenue up"]);
    }

    #[test]
    fn test_lines_in_one_text_block() {
        let bytes = build_pdf_from_operations(vec![single_block(&["Agenda", "Budget", "Hiring"])]);
        let records = PdfParser::new().parse(&bytes).unwrap();
        assert_eq!(records[0].bullets, vec!["Agenda", "Budget", "Hiring"]);
    }

    #[test]
    fn test_next_line_operators() {
        let page = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Goals")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("Ship v2")]),
            Operation::new("'", vec![Object::string_literal("Hire two")]),
            Operation::new(
                "\"",
                vec![0.into(), 0.into(), Object::string_literal("Close Q3")],
            ),
            Operation::new("ET", vec![]),
        ];
        let records = PdfParser::new()
            .parse(&build_pdf_from_operations(vec![page]))
            .unwrap();
        assert_eq!(
            records[0].bullets,
            vec!["Goals", "Ship v2", "Hire two", "Close Q3"]
        );
    }

    fn set_matrix(x: i64, y: i64) -> Operation {
        let operands = [1, 0, 0, 1, x, y].into_iter().map(Object::Integer).collect();
        Operation::new("Tm", operands)
    }

    #[test]
    fn test_same_line_runs_stay_together() {
        let page = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            set_matrix(72, 700),
            Operation::new("Tj", vec![Object::string_literal("Net ")]),
            Operation::new("Td", vec![40.into(), 0.into()]),
            Operation::new("Tj", vec![Object::string_literal("margin ")]),
            set_matrix(200, 700),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("up"),
                    (-250).into(),
                    Object::string_literal("4%"),
                ])],
            ),
            set_matrix(72, 660),
            Operation::new("Tj", vec![Object::string_literal("Flat costs")]),
            Operation::new("ET", vec![]),
        ];
        let records = PdfParser::new()
            .parse(&build_pdf_from_operations(vec![page]))
            .unwrap();
        assert_eq!(records[0].bullets, vec!["Net margin up 4%", "Flat costs"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let bytes = build_pdf(&[&["Alpha"], &["Beta"]]);
        let parser = PdfParser::new();
        assert_eq!(parser.parse(&bytes).unwrap(), parser.parse(&bytes).unwrap());
    }

    #[test]
    fn test_garbage_is_pdf_error() {
        let err = PdfParser::new().parse(b"%PDF-1.4 truncated").unwrap_err();
        assert!(matches!(err, Error::PdfError(_)));
        assert!(err.is_invalid_document());
    }
}
