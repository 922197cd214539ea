//! HTTP service extracting slide text from uploaded PPTX and PDF files.
//!
//! `POST /extract` takes a multipart upload in the `file` field and answers
//! with `{"slides": [...], "count": N}`.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

pub use config::ServerArgs;
pub use error::ApiError;
pub use extract::Extractor;
pub use routes::{router, AppState};
