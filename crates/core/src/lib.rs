//! Core domain types, format detection, and text splitting for slide
//! extraction.

pub mod error;
pub mod image_text;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use image_text::ImageTextExtractor;
pub use types::{DocumentFormat, ExtractionResponse, SlideRecord};
