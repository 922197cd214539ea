//! Package relationships (`_rels/*.rels`) and part-name resolution.

use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::xml::local_name;

/// Relationship type suffixes we follow.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "/officeDocument";
    pub const NOTES_SLIDE: &str = "/notesSlide";
}

/// One `Relationship` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Target resolved to a package part name (no leading slash).
    pub target: String,
    /// `TargetMode="External"`; such targets are URLs, not parts.
    pub external: bool,
}

/// The relationships of a single source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` document belonging to `source_part`.
    ///
    /// Pass `""` as the source for the package-level `_rels/.rels`.
    pub fn parse(xml: &str, source_part: &str) -> Result<Self> {
        let base_dir = part_dir(source_part);
        let mut rels = Vec::new();

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Type" => {
                                rel_type = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"Target" => {
                                target = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"Id" => {
                                id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"TargetMode" => {
                                external = attr.value.as_ref() == b"External";
                            }
                            _ => {}
                        }
                    }

                    let target = if external {
                        target
                    } else {
                        resolve_target(base_dir, &target)
                    };

                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships of '{}': {}",
                        source_part, e
                    )));
                }
                _ => {}
            }
        }

        Ok(Self { rels })
    }

    /// Resolve a relationship id to an internal part name.
    pub fn target(&self, id: &str) -> Option<&str> {
        self.rels
            .iter()
            .find(|r| r.id == id && !r.external)
            .map(|r| r.target.as_str())
    }

    /// First internal target whose relationship type ends with `type_suffix`.
    pub fn target_of_type(&self, type_suffix: &str) -> Option<&str> {
        self.rels
            .iter()
            .find(|r| !r.external && r.rel_type.ends_with(type_suffix))
            .map(|r| r.target.as_str())
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

/// The `.rels` part holding relationships for `part`.
///
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Folder containing a part, without trailing slash.
fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the source part's folder.
///
/// A leading `/` makes the target package-absolute; `.` and `..` segments
/// are collapsed.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if base_dir.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", base_dir, target)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide1.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve_target("ppt", "slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
        assert_eq!(resolve_target("ppt/slides", "./slide3.xml"), "ppt/slides/slide3.xml");
    }

    #[test]
    fn test_parse_slide_rels() {
        let rels = Relationships::parse(SLIDE_RELS, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels.len(), 4);
        assert_eq!(rels.target("rId2"), Some("ppt/media/image1.png"));
        assert_eq!(
            rels.target_of_type(rel_types::NOTES_SLIDE),
            Some("ppt/notesSlides/notesSlide1.xml")
        );
        assert_eq!(rels.target("rId4"), None);
        assert_eq!(rels.target("rId9"), None);
    }

    #[test]
    fn test_slide_type_does_not_match_layout() {
        let rels = Relationships::parse(SLIDE_RELS, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels.target_of_type("/slide"), None);
    }
}
