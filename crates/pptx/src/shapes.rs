//! Reading the top-level shape tree of a slide or notes part.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::xml::{attr_value, local_name};

/// A top-level element of a slide's shape tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// An auto shape, text box, or placeholder (`p:sp`).
    Text {
        /// Paragraphs joined with `\n`; empty when the shape has no text body.
        text: String,
        /// Placeholder type (`title`, `body`, ...) when the shape is one.
        placeholder: Option<String>,
    },
    /// A picture (`p:pic`) and the relationship id of its image, if embedded.
    Picture { embed: Option<String> },
    /// Graphic frames, groups, connectors, content parts, picture
    /// placeholders and media posters.
    Other,
}

impl Shape {
    /// Whether this is a placeholder of the given type.
    pub fn is_placeholder(&self, kind: &str) -> bool {
        matches!(self, Shape::Text { placeholder: Some(p), .. } if p == kind)
    }
}

/// Which kind of shape is being collected.
enum Pending {
    Text {
        paragraphs: Vec<String>,
        placeholder: Option<String>,
        in_run_text: bool,
    },
    Picture {
        embed: Option<String>,
        /// Set by a placeholder or a video/audio reference in `nvPr`.
        not_picture: bool,
    },
    Other,
}

impl Pending {
    fn start(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Pending::Text {
                paragraphs: Vec::new(),
                placeholder: None,
                in_run_text: false,
            }),
            b"pic" => Some(Pending::Picture {
                embed: None,
                not_picture: false,
            }),
            b"grpSp" | b"graphicFrame" | b"cxnSp" | b"contentPart" => Some(Pending::Other),
            _ => None,
        }
    }

    /// Handle a start or empty element inside the shape.
    fn element(&mut self, e: &BytesStart, is_empty: bool) {
        let name = e.name();
        let local = local_name(name.as_ref());

        match self {
            Pending::Text {
                paragraphs,
                placeholder,
                in_run_text,
            } => match local {
                b"ph" => {
                    *placeholder =
                        Some(attr_value(e, b"type", false).unwrap_or_else(|| "obj".to_string()));
                }
                b"p" => paragraphs.push(String::new()),
                // Soft line breaks split bullets like paragraph ends do.
                b"br" => {
                    if let Some(current) = paragraphs.last_mut() {
                        current.push('\n');
                    }
                }
                b"t" if !is_empty => *in_run_text = true,
                _ => {}
            },
            Pending::Picture { embed, not_picture } => match local {
                b"blip" if embed.is_none() => *embed = attr_value(e, b"embed", true),
                b"ph" | b"videoFile" | b"audioFile" => *not_picture = true,
                _ => {}
            },
            Pending::Other => {}
        }
    }

    fn end(&mut self, local: &[u8]) {
        if let Pending::Text { in_run_text, .. } = self {
            if local == b"t" {
                *in_run_text = false;
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Pending::Text {
            paragraphs,
            in_run_text: true,
            ..
        } = self
        {
            match paragraphs.last_mut() {
                Some(current) => current.push_str(text),
                None => paragraphs.push(text.to_string()),
            }
        }
    }

    fn finish(self) -> Shape {
        match self {
            Pending::Text {
                paragraphs,
                placeholder,
                ..
            } => Shape::Text {
                text: paragraphs.join("\n"),
                placeholder,
            },
            Pending::Picture {
                not_picture: true, ..
            } => Shape::Other,
            Pending::Picture { embed, .. } => Shape::Picture { embed },
            Pending::Other => Shape::Other,
        }
    }
}

/// Read the direct children of the part's `spTree`, in document order.
///
/// Shapes nested inside a group are not returned; the group itself is a
/// single [`Shape::Other`].
pub fn read_shapes(xml: &str) -> Result<Vec<Shape>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml);

    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut current: Option<(Pending, usize)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = e.name();
                let local = local_name(name.as_ref());

                if let Some((pending, _)) = current.as_mut() {
                    pending.element(e, false);
                } else if let Some(tree) = tree_depth {
                    if depth == tree + 1 {
                        current = Pending::start(local).map(|p| (p, depth));
                    }
                } else if local == b"spTree" {
                    tree_depth = Some(depth);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if let Some((pending, _)) = current.as_mut() {
                    pending.element(e, true);
                } else if tree_depth.is_some_and(|tree| depth == tree) {
                    if let Some(pending) = Pending::start(local) {
                        shapes.push(pending.finish());
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some((pending, _)) = current.as_mut() {
                    match e.unescape() {
                        Ok(text) => pending.text(&text),
                        Err(err) => log::debug!("Skipping undecodable text run: {}", err),
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                match current.take() {
                    Some((pending, start_depth)) if start_depth == depth => {
                        shapes.push(pending.finish());
                    }
                    Some((mut pending, start_depth)) => {
                        pending.end(local);
                        current = Some((pending, start_depth));
                    }
                    None => {
                        if tree_depth == Some(depth) {
                            tree_depth = None;
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(shapes)
}
