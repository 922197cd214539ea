//! HTTP routes.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use deck_core::{DocumentFormat, ExtractionResponse};
use serde::Serialize;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::ApiError;
use crate::extract::Extractor;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    ocr: bool,
}

/// An uploaded file read fully into memory.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/extract", post(extract))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ocr: state.extractor.has_ocr(),
    })
}

/// POST /extract - multipart upload, field `file`
async fn extract(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::FileMissing);
    };

    let upload = read_upload(&mut multipart)
        .await?
        .ok_or(ApiError::FileMissing)?;

    let format =
        DocumentFormat::from_filename(&upload.filename).ok_or(ApiError::Unsupported)?;

    let extractor = state.extractor.clone();
    let Upload { filename, bytes } = upload;
    let size = bytes.len();

    let slides = tokio::task::spawn_blocking(move || extractor.extract(format, &bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {}", e)))??;

    log::info!(
        "Extracted {} slides from {} ({}, {} bytes)",
        slides.len(),
        filename,
        format.as_str(),
        size
    );

    Ok(Json(ExtractionResponse::new(slides)))
}

/// Find the first file part named `file`.
///
/// A part without a filename is a plain form value, not a file; a file
/// part with an empty filename counts as no file at all.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Ok(None);
        }

        let bytes = field.bytes().await?;
        return Ok(Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
