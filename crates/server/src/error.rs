//! Error responses for the HTTP surface.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Everything a request can fail with, mapped to a status and JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// No `file` part in the upload.
    FileMissing,
    /// Filename suffix is neither `.pptx` nor `.pdf`.
    Unsupported,
    /// The extension matched but the content could not be decoded.
    InvalidDocument(String),
    /// The multipart body itself was unreadable (truncated, too large).
    Upload { status: StatusCode, message: String },
    /// Anything else; details go to the log only.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::FileMissing | ApiError::Unsupported | ApiError::InvalidDocument(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upload { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<deck_core::Error> for ApiError {
    fn from(e: deck_core::Error) -> Self {
        if e.is_invalid_document() {
            ApiError::InvalidDocument(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Upload {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::FileMissing => json!({ "error": "file missing" }),
            ApiError::Unsupported => json!({ "error": "unsupported" }),
            ApiError::InvalidDocument(detail) => {
                log::info!("Rejected invalid document: {}", detail);
                json!({ "error": "invalid document", "detail": detail })
            }
            ApiError::Upload { message, .. } => {
                log::info!("Rejected upload: {}", message);
                json!({ "error": "invalid upload", "detail": message })
            }
            ApiError::Internal(detail) => {
                log::error!("Extraction failed: {}", detail);
                json!({ "error": "internal error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(ApiError::FileMissing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unsupported.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = deck_core::Error::ZipError("bad header".to_string()).into();
        assert!(matches!(err, ApiError::InvalidDocument(_)));

        let err: ApiError = deck_core::Error::OcrError("tesseract crashed".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
