//! # DocVault Core
//!
//! Document management with content-addressed deduplication and versioning.
//!
//! An upload is hashed (SHA-256) and matched against existing documents: identical bytes
//! continue the lineage they already belong to (even under a new filename), a known title with
//! new bytes becomes that document's next version, and anything else is a new document at
//! version 1.0.
//!
//! ## Main components
//!
//! - [`UploadCoordinator`]: decides insert vs update for an upload
//! - [`DocumentService`]: commits uploads, serves retrieval, download and metadata CRUD
//! - [`BookingService`]: CRUD for instrument bookings
//! - [`store`]: the [`DocumentStore`] seam and its SQLite implementation
//! - [`CoreConfig`]: configuration resolved once at startup
//!
//! This crate is synchronous. The REST layer calls into it from blocking tasks.

pub mod bookings;
pub mod config;
pub mod constants;
pub mod documents;
pub mod error;
pub mod model;
pub mod store;
pub mod upload;

pub use bookings::BookingService;
pub use config::{ConfigError, CoreConfig};
pub use documents::{BodyStatus, DocumentService, Retrieved, Uploaded};
pub use error::{
    BookingError, BookingResult, DocumentError, DocumentResult, StoreError, StoreResult,
    UploadError,
};
pub use model::{
    Booking, BookingDraft, BookingId, BookingPatch, Customer, Document, DocumentDraft, DocumentId,
    DocumentPatch, Job, NewDocument,
};
pub use store::{Database, DocumentStore, SqliteDocumentStore};
pub use upload::{Action, Decision, Resolution, UploadCoordinator};

pub use docvault_types::{ContentHash, NonEmptyText, Version};
