//! Tesseract-backed image text extraction.
//!
//! Pictures embedded in slides are decoded with the `image` crate and handed
//! to the `tesseract` binary. The engine is optional at runtime: use
//! [`TesseractOcr::detect`] to find out whether it can be invoked at all.

pub mod engine;

pub use engine::TesseractOcr;
