//! # API REST
//!
//! REST API implementation for DocVault.
//!
//! Handles:
//! - HTTP endpoints with axum, under `/api/v1`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON and multipart bodies, CORS, request logging)
//!
//! Handlers are thin: they translate HTTP into calls on the core services and run those calls
//! on the blocking thread pool. Uses `api-shared` for request/response bodies.

#![warn(rust_2018_idioms)]

mod bookings;
mod documents;
mod error;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    BookingRes, CreateBookingReq, CreateDocumentReq, CustomerDto, DocumentDetailRes, DocumentRes,
    HealthRes, HealthService, JobDto, MessageRes, UpdateBookingReq, UpdateDocumentReq, UploadRes,
};
use docvault_core::{BookingService, CoreConfig, Database, DocumentService, SqliteDocumentStore};
use docvault_files::FilesService;

pub use error::ApiError;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Application state for the REST API server
///
/// Cloned into every handler; the services share one database connection and storage root.
#[derive(Clone)]
pub struct AppState {
    pub documents: DocumentService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(documents: DocumentService, bookings: BookingService) -> Self {
        Self {
            documents,
            bookings,
        }
    }

    /// Open the database and storage root named by `cfg` and wire up the services.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated, or the storage root
    /// cannot be created.
    pub fn open(cfg: &CoreConfig) -> anyhow::Result<Self> {
        let db = Database::open(cfg.database_path())?;
        let files = FilesService::new(cfg.storage_root())?;
        let store = Arc::new(SqliteDocumentStore::new(db.clone()));

        Ok(Self::new(
            DocumentService::new(cfg, store, files),
            BookingService::new(db),
        ))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        documents::list_documents,
        documents::create_document,
        documents::get_document,
        documents::download_document,
        documents::update_document,
        documents::delete_document,
        documents::upload,
        bookings::list_bookings,
        bookings::create_booking,
        bookings::get_booking,
        bookings::update_booking,
        bookings::delete_booking,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        DocumentRes,
        DocumentDetailRes,
        UploadRes,
        CreateDocumentReq,
        UpdateDocumentReq,
        documents::UploadForm,
        BookingRes,
        CreateBookingReq,
        UpdateBookingReq,
        CustomerDto,
        JobDto,
    ))
)]
pub struct ApiDoc;

/// Build the DocVault router with all routes, middleware and Swagger UI.
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .documents
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let api = Router::new()
        .route("/health", get(health))
        .route(
            "/document",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/document/:id",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        .route("/document/:id/download", get(documents::download_document))
        .route("/upload", post(documents::upload))
        .route(
            "/booking",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/booking/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        );

    Router::new()
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Log every request once it has been handled.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        "handled request"
    );
    response
}

/// Run synchronous core work off the async executor.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("Blocking task failed: {:?}", e);
        error::INTERNAL
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// This endpoint is used for monitoring and load balancer health checks.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
