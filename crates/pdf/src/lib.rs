//! PDF backend for slide extraction.
//!
//! Each page's text layer becomes one slide record whose bullets are the
//! page's non-empty lines.

pub mod parser;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use parser::PdfParser;
