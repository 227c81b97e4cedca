//! Document and upload endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use utoipa::ToSchema;

use api_shared::{
    CreateDocumentReq, DocumentDetailRes, DocumentRes, MessageRes, UpdateDocumentReq, UploadRes,
};
use docvault_core::DocumentId;

use crate::error::{document_failure, invalid_request, multipart_failure, ApiError};
use crate::{run_blocking, AppState};

/// Multipart form accepted by `POST /api/v1/upload`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// The file to store; its filename becomes the document title.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/api/v1/document",
    responses(
        (status = 200, description = "All documents, ordered by id", body = [DocumentRes]),
        (status = 503, description = "Document store unavailable")
    )
)]
pub(crate) async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentRes>>, ApiError> {
    let documents = state.documents.clone();
    match run_blocking(move || documents.list()).await? {
        Ok(documents) => Ok(Json(documents.into_iter().map(Into::into).collect())),
        Err(e) => Err(document_failure("List documents", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/document",
    request_body = CreateDocumentReq,
    responses(
        (status = 201, description = "Document record created", body = DocumentRes),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Title already in use"),
        (status = 503, description = "Document store unavailable")
    )
)]
/// Create a metadata-only document record
///
/// No file is written; `hash` defaults to the digest of empty content and `version` to 1.0.
pub(crate) async fn create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentReq>,
) -> Result<(StatusCode, Json<DocumentRes>), ApiError> {
    let draft = req
        .into_draft()
        .map_err(|e| invalid_request("Create document", e))?;
    let documents = state.documents.clone();
    match run_blocking(move || documents.create(draft)).await? {
        Ok(document) => Ok((StatusCode::CREATED, Json(document.into()))),
        Err(e) => Err(document_failure("Create document", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/document/{id}",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document metadata and body", body = DocumentDetailRes),
        (status = 404, description = "Document not found"),
        (status = 503, description = "Document store unavailable")
    )
)]
/// Read a document together with its file content
///
/// If the file cannot be read the metadata is still returned, with an empty `body` and the
/// reason in `body_error`.
pub(crate) async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DocumentDetailRes>, ApiError> {
    let documents = state.documents.clone();
    match run_blocking(move || documents.get(DocumentId::new(id))).await? {
        Ok(retrieved) => Ok(Json(retrieved.into())),
        Err(e) => Err(document_failure("Get document", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/document/{id}/download",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 200, description = "Raw file content", content_type = "application/octet-stream"),
        (status = 404, description = "Document or file not found"),
        (status = 503, description = "Document store unavailable")
    )
)]
pub(crate) async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let documents = state.documents.clone();
    let downloaded = run_blocking(move || documents.download(DocumentId::new(id))).await?;
    let (document, bytes) = match downloaded {
        Ok(found) => found,
        Err(e) => return Err(document_failure("Download document", e)),
    };

    let disposition = HeaderValue::from_str(&format!("attachment; filename={:?}", document.title))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/document/{id}",
    params(("id" = i64, Path, description = "Document id")),
    request_body = UpdateDocumentReq,
    responses(
        (status = 200, description = "Document updated", body = DocumentRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Document not found"),
        (status = 409, description = "Title already in use"),
        (status = 503, description = "Document store unavailable")
    )
)]
pub(crate) async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDocumentReq>,
) -> Result<Json<DocumentRes>, ApiError> {
    let patch = req
        .into_patch()
        .map_err(|e| invalid_request("Update document", e))?;
    let documents = state.documents.clone();
    match run_blocking(move || documents.update(DocumentId::new(id), patch)).await? {
        Ok(document) => Ok(Json(document.into())),
        Err(e) => Err(document_failure("Update document", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/document/{id}",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document deleted", body = MessageRes),
        (status = 404, description = "Document not found"),
        (status = 503, description = "Document store unavailable")
    )
)]
pub(crate) async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageRes>, ApiError> {
    let documents = state.documents.clone();
    match run_blocking(move || documents.delete(DocumentId::new(id))).await? {
        Ok(_) => Ok(Json(MessageRes::new("Successfully deleted document"))),
        Err(e) => Err(document_failure("Delete document", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored as a new document or a new version", body = UploadRes),
        (status = 400, description = "Missing file field, unreadable stream or invalid filename"),
        (status = 409, description = "Title belongs to another document"),
        (status = 413, description = "Upload exceeds the configured size limit"),
        (status = 500, description = "File could not be written"),
        (status = 503, description = "Document store unavailable")
    )
)]
/// Upload a file
///
/// Identical content already on record continues that document's history (even under a new
/// name); new content under a known name becomes its next version; anything else is a new
/// document at version 1.0.
pub(crate) async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadRes>, ApiError> {
    let limit = state.documents.max_upload_bytes();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_failure)? {
        if field.name() != Some("file") {
            continue;
        }
        if upload.is_some() {
            tracing::warn!("Upload rejected: more than one file part");
            return Err((StatusCode::BAD_REQUEST, "Only one file per upload"));
        }

        let filename = field.file_name().map(str::to_string).unwrap_or_default();
        tracing::info!(filename = %filename, "receiving upload");

        let mut content = Vec::new();
        let mut oversized = false;
        while let Some(chunk) = field.chunk().await.map_err(multipart_failure)? {
            content.extend_from_slice(&chunk);
            // Keep one byte past the limit so the size check below sees the overflow.
            if content.len() as u64 > limit {
                oversized = true;
                break;
            }
        }
        upload = Some((filename, content));
        if oversized {
            break;
        }
    }

    let Some((filename, content)) = upload else {
        tracing::warn!("Upload rejected: missing multipart field 'file'");
        return Err((StatusCode::BAD_REQUEST, "Missing multipart field 'file'"));
    };

    let documents = state.documents.clone();
    match run_blocking(move || documents.upload(&filename, content.as_slice())).await? {
        Ok(uploaded) => Ok(Json(uploaded.into())),
        Err(e) => Err(document_failure("Upload", e)),
    }
}
