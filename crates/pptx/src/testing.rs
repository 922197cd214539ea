//! In-memory PPTX packages for tests.
//!
//! Builds the minimum set of parts the parser reads: package and
//! presentation relationships, `presentation.xml`, slides, notes pages,
//! and media.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A text box whose paragraphs are `lines`.
pub fn text_box(lines: &[&str]) -> String {
    let paragraphs: String = lines
        .iter()
        .map(|line| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", escape(line)))
        .collect();
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"TextBox\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>",
        paragraphs
    )
}

/// A picture shape embedding the image behind relationship `embed`.
pub fn picture(embed: &str) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"3\" name=\"Picture\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
<p:blipFill><a:blip r:embed=\"{}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>",
        embed
    )
}

/// A picture that fills a content placeholder.
pub fn placeholder_picture(embed: &str) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"5\" name=\"Content Placeholder 4\"/><p:cNvPicPr/>\
<p:nvPr><p:ph idx=\"1\"/></p:nvPr></p:nvPicPr>\
<p:blipFill><a:blip r:embed=\"{}\"/></p:blipFill><p:spPr/></p:pic>",
        embed
    )
}

/// An embedded video; the blip is its poster frame.
pub fn video(poster: &str) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"6\" name=\"clip.mp4\"/><p:cNvPicPr/>\
<p:nvPr><a:videoFile r:link=\"rId90\"/></p:nvPr></p:nvPicPr>\
<p:blipFill><a:blip r:embed=\"{}\"/></p:blipFill><p:spPr/></p:pic>",
        poster
    )
}

/// One slide: its shapes in tree order, optional notes, embedded media.
#[derive(Debug, Clone, Default)]
pub struct SlideSpec {
    shapes: Vec<String>,
    notes: Option<String>,
    images: Vec<(String, Vec<u8>)>,
}

impl SlideSpec {
    pub fn new(shapes: Vec<String>) -> Self {
        Self {
            shapes,
            ..Self::default()
        }
    }

    /// Attach a notes page; `\n` separates paragraphs.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Add a media part reachable through relationship `id`.
    pub fn image(mut self, id: &str, bytes: &[u8]) -> Self {
        self.images.push((id.to_string(), bytes.to_vec()));
        self
    }
}

/// Builder for a whole package.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    slides: Vec<SlideSpec>,
    reversed_parts: bool,
    with_presentation: bool,
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            reversed_parts: false,
            with_presentation: true,
        }
    }

    pub fn slide(mut self, slide: SlideSpec) -> Self {
        self.slides.push(slide);
        self
    }

    /// Store slides in part names opposite to presentation order.
    pub fn reversed_parts(mut self) -> Self {
        self.reversed_parts = true;
        self
    }

    /// Leave out `ppt/presentation.xml`, producing a broken package.
    pub fn without_presentation(mut self) -> Self {
        self.with_presentation = false;
        self
    }

    /// Write the package to bytes.
    pub fn build(self) -> Vec<u8> {
        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
        let count = self.slides.len();

        parts.push((
            "[Content_Types].xml".to_string(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/></Types>"#
                .to_vec(),
        ));
        parts.push((
            "_rels/.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#,
                REL_BASE
            )
            .into_bytes(),
        ));

        let mut sld_ids = String::new();
        let mut presentation_rels = String::new();

        for (idx, slide) in self.slides.iter().enumerate() {
            let part_number = if self.reversed_parts { count - idx } else { idx + 1 };
            let rel_id = format!("rId{}", 100 + part_number);

            sld_ids.push_str(&format!(
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                256 + idx,
                rel_id
            ));
            presentation_rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
                rel_id, REL_BASE, part_number
            ));

            let mut slide_rels = format!(
                r#"<Relationship Id="rId1" Type="{}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
                REL_BASE
            );
            for (image_idx, (id, bytes)) in slide.images.iter().enumerate() {
                let media = format!("image{}_{}.png", part_number, image_idx + 1);
                slide_rels.push_str(&format!(
                    r#"<Relationship Id="{}" Type="{}/image" Target="../media/{}"/>"#,
                    id, REL_BASE, media
                ));
                parts.push((format!("ppt/media/{}", media), bytes.clone()));
            }
            if let Some(notes) = &slide.notes {
                slide_rels.push_str(&format!(
                    r#"<Relationship Id="rId99" Type="{}/notesSlide" Target="../notesSlides/notesSlide{}.xml"/>"#,
                    REL_BASE, part_number
                ));
                parts.push((
                    format!("ppt/notesSlides/notesSlide{}.xml", part_number),
                    notes_xml(notes).into_bytes(),
                ));
            }

            parts.push((
                format!("ppt/slides/slide{}.xml", part_number),
                slide_xml(&slide.shapes).into_bytes(),
            ));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", part_number),
                relationships_xml(&slide_rels).into_bytes(),
            ));
        }

        if self.with_presentation {
            parts.push((
                "ppt/presentation.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {}><p:sldMasterIdLst/><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#,
                    NS, sld_ids
                )
                .into_bytes(),
            ));
        }
        parts.push((
            "ppt/_rels/presentation.xml.rels".to_string(),
            relationships_xml(&presentation_rels).into_bytes(),
        ));

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in parts {
            zip.start_file(name, FileOptions::default())
                .expect("start zip entry");
            zip.write_all(&bytes).expect("write zip entry");
        }
        zip.finish().expect("finish zip").into_inner()
    }
}

fn slide_xml(shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
        NS,
        shapes.concat()
    )
}

fn notes_xml(notes: &str) -> String {
    let paragraphs: String = notes
        .split('\n')
        .map(|line| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", escape(line)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#,
        NS, paragraphs
    )
}

fn relationships_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        body
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
