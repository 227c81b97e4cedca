//! Persistence for documents and bookings.
//!
//! [`DocumentStore`] is the seam the upload coordinator and document service are written
//! against; [`SqliteDocumentStore`] is the production implementation. Bookings have no
//! alternative backend and are queried straight off [`Database`].

mod bookings;
mod database;
mod schema;
mod sqlite;

pub use database::Database;
pub use sqlite::SqliteDocumentStore;

use crate::error::StoreResult;
use crate::model::{Document, DocumentId, NewDocument};
use docvault_types::{ContentHash, Version};

/// Lookup and persistence of document records.
///
/// Absence is `Ok(None)` (or `Ok(false)` for deletes). Implementations must enforce that
/// no two documents share a title and report a violation as
/// [`StoreError::Conflict`](crate::error::StoreError::Conflict).
pub trait DocumentStore: Send + Sync {
    /// The most recently updated document whose content hash equals `hash`.
    fn find_by_hash(&self, hash: &ContentHash) -> StoreResult<Option<Document>>;

    fn find_by_title(&self, title: &str) -> StoreResult<Option<Document>>;

    /// Insert a new record; the store assigns `id` and both timestamps.
    fn insert(&self, document: &NewDocument) -> StoreResult<Document>;

    /// Overwrite every mutable field of `id`, refreshing `updated_at`.
    fn update_by_id(&self, id: DocumentId, document: &NewDocument)
        -> StoreResult<Option<Document>>;

    /// Like [`update_by_id`](Self::update_by_id), but only while the stored version is still
    /// `expected`. A row that has moved on is a
    /// [`StoreError::Conflict`](crate::error::StoreError::Conflict); a missing row is `Ok(None)`.
    fn update_if_version(
        &self,
        id: DocumentId,
        expected: Version,
        document: &NewDocument,
    ) -> StoreResult<Option<Document>>;

    fn get(&self, id: DocumentId) -> StoreResult<Option<Document>>;

    /// All documents in ascending id order.
    fn list(&self) -> StoreResult<Vec<Document>>;

    fn delete(&self, id: DocumentId) -> StoreResult<bool>;
}
