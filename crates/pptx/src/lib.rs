//! PPTX (Office Open XML) backend for slide extraction.
//!
//! Parses .pptx files, which are ZIP archives of XML parts, into one slide
//! record per slide. Picture shapes are handed to an optional OCR engine.

pub mod parser;
pub mod rels;
pub mod shapes;
mod xml;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use parser::PptxParser;
pub use shapes::Shape;
