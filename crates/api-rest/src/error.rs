//! Mapping of core failures onto HTTP responses.
//!
//! Handlers return `(StatusCode, &'static str)` on failure; the detailed error goes to the log.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use docvault_core::{BookingError, DocumentError, UploadError};

pub type ApiError = (StatusCode, &'static str);

pub(crate) const INTERNAL: ApiError = (StatusCode::INTERNAL_SERVER_ERROR, "Internal error");

pub(crate) fn document_status(err: &DocumentError) -> ApiError {
    match err {
        DocumentError::NotFound(_) => (StatusCode::NOT_FOUND, "Document not found"),
        DocumentError::InvalidFilename(_) => (StatusCode::BAD_REQUEST, "Invalid filename"),
        DocumentError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        DocumentError::Upload(UploadError::SizeLimitExceeded { .. }) => {
            (StatusCode::PAYLOAD_TOO_LARGE, "Upload exceeds size limit")
        }
        DocumentError::Upload(UploadError::StreamReadFailed(_)) => {
            (StatusCode::BAD_REQUEST, "Failed to read upload")
        }
        DocumentError::Upload(UploadError::StoreUnavailable(_)) | DocumentError::Store(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable")
        }
        DocumentError::Conflict(_) => (StatusCode::CONFLICT, "Conflicting document"),
        DocumentError::FileWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file"),
        DocumentError::FileRead(e) if e.is_not_found() => {
            (StatusCode::NOT_FOUND, "Document file not found")
        }
        DocumentError::FileRead(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file"),
    }
}

pub(crate) fn document_failure(context: &str, err: DocumentError) -> ApiError {
    let status = document_status(&err);
    if status.0.is_server_error() {
        tracing::error!("{} error: {:?}", context, err);
    } else {
        tracing::warn!("{} rejected: {}", context, err);
    }
    status
}

pub(crate) fn booking_failure(context: &str, err: BookingError) -> ApiError {
    let status = match &err {
        BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "Booking not found"),
        BookingError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        BookingError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "Booking store unavailable"),
    };
    if status.0.is_server_error() {
        tracing::error!("{} error: {:?}", context, err);
    } else {
        tracing::warn!("{} rejected: {}", context, err);
    }
    status
}

pub(crate) fn multipart_failure(err: MultipartError) -> ApiError {
    tracing::warn!("Multipart upload rejected: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        (StatusCode::PAYLOAD_TOO_LARGE, "Upload exceeds size limit")
    } else {
        (StatusCode::BAD_REQUEST, "Failed to read upload")
    }
}

pub(crate) fn invalid_request(context: &str, reason: String) -> ApiError {
    tracing::warn!("{} rejected: {}", context, reason);
    (StatusCode::BAD_REQUEST, "Invalid input")
}
