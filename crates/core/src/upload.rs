//! Upload resolution: decide whether incoming bytes create a document or version an existing one.
//!
//! Matching order:
//! 1. identical content (hash) anywhere in the store, so a renamed file keeps its lineage;
//! 2. the same title, so new content under a known name becomes its next version;
//! 3. otherwise a brand new document at version 1.0.
//!
//! The coordinator only decides. Committing the decision and writing the bytes is the job of
//! [`DocumentService`](crate::documents::DocumentService).

use std::io::Read;
use std::sync::Arc;

use docvault_files::{hash_bytes, FilesService};
use docvault_types::{NonEmptyText, Version};
use serde::Serialize;

use crate::error::{StoreError, UploadError};
use crate::model::{Document, DocumentId, NewDocument};
use crate::store::DocumentStore;

/// The persistence call an upload resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Insert,
    Update,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Insert => "insert",
            Action::Update => "update",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Insert {
        document: NewDocument,
    },
    Update {
        id: DocumentId,
        document: NewDocument,
        /// The record as it was before this upload; used to roll back a failed file write.
        previous: Document,
    },
}

/// Outcome of [`UploadCoordinator::resolve`]: the decision plus the validated upload bytes.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub decision: Decision,
    pub content: Vec<u8>,
}

impl Resolution {
    pub fn action(&self) -> Action {
        match self.decision {
            Decision::Insert { .. } => Action::Insert,
            Decision::Update { .. } => Action::Update,
        }
    }

    pub fn document(&self) -> &NewDocument {
        match &self.decision {
            Decision::Insert { document } | Decision::Update { document, .. } => document,
        }
    }
}

#[derive(Clone)]
pub struct UploadCoordinator {
    store: Arc<dyn DocumentStore>,
    files: FilesService,
    max_upload_bytes: u64,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, files: FilesService, max_upload_bytes: u64) -> Self {
        Self {
            store,
            files,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Read `stream` to its end (bounded by the upload limit) and resolve it.
    ///
    /// # Errors
    ///
    /// - [`UploadError::SizeLimitExceeded`] once more than the limit has been read; nothing is
    ///   hashed and the store is not consulted.
    /// - [`UploadError::StreamReadFailed`] if the stream errors.
    /// - [`UploadError::StoreUnavailable`] if a lookup fails.
    pub fn resolve<R: Read>(
        &self,
        filename: &NonEmptyText,
        stream: R,
    ) -> Result<Resolution, UploadError> {
        let mut content = Vec::new();
        stream
            .take(self.max_upload_bytes.saturating_add(1))
            .read_to_end(&mut content)
            .map_err(UploadError::StreamReadFailed)?;
        self.resolve_content(filename, content)
    }

    /// Resolve an upload whose bytes are already in memory.
    pub fn resolve_content(
        &self,
        filename: &NonEmptyText,
        content: Vec<u8>,
    ) -> Result<Resolution, UploadError> {
        if content.len() as u64 > self.max_upload_bytes {
            return Err(UploadError::SizeLimitExceeded {
                limit: self.max_upload_bytes,
            });
        }

        let hash = hash_bytes(&content);
        let path = self.files.path_for(filename).to_string_lossy().into_owned();
        let title = filename.as_str().to_string();

        let decision = if let Some(existing) = self.store.find_by_hash(&hash)? {
            let version = next_version(&existing)?;
            Decision::Update {
                id: existing.id,
                document: NewDocument {
                    path,
                    title,
                    version,
                    author: existing.author.clone(),
                    hash,
                },
                previous: existing,
            }
        } else if let Some(existing) = self.store.find_by_title(filename.as_str())? {
            let version = next_version(&existing)?;
            Decision::Update {
                id: existing.id,
                document: NewDocument {
                    path,
                    title,
                    version,
                    author: existing.author.clone(),
                    hash,
                },
                previous: existing,
            }
        } else {
            Decision::Insert {
                document: NewDocument {
                    path,
                    title,
                    version: Version::INITIAL,
                    author: String::new(),
                    hash,
                },
            }
        };

        tracing::debug!(
            title = filename.as_str(),
            size_bytes = content.len(),
            "resolved upload"
        );

        Ok(Resolution { decision, content })
    }
}

fn next_version(existing: &Document) -> Result<Version, UploadError> {
    existing.version.next().map_err(|_| {
        UploadError::StoreUnavailable(StoreError::unavailable(format!(
            "document {} is at the highest representable version",
            existing.id
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreResult;
    use crate::store::{Database, SqliteDocumentStore};
    use docvault_types::ContentHash;
    use std::io;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        store: Arc<SqliteDocumentStore>,
        coordinator: UploadCoordinator,
    }

    fn fixture(max_upload_bytes: u64) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let files = FilesService::new(tmp.path()).unwrap();
        let store = Arc::new(SqliteDocumentStore::new(Database::open_in_memory().unwrap()));
        let coordinator = UploadCoordinator::new(store.clone(), files, max_upload_bytes);
        Fixture {
            _tmp: tmp,
            store,
            coordinator,
        }
    }

    fn name(raw: &str) -> NonEmptyText {
        NonEmptyText::new(raw).unwrap()
    }

    fn commit(store: &SqliteDocumentStore, resolution: &Resolution) -> Document {
        match &resolution.decision {
            Decision::Insert { document } => store.insert(document).unwrap(),
            Decision::Update {
                id,
                document,
                previous,
            } => store
                .update_if_version(*id, previous.version, document)
                .unwrap()
                .unwrap(),
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"))
        }
    }

    struct UnavailableStore;

    impl DocumentStore for UnavailableStore {
        fn find_by_hash(&self, _hash: &ContentHash) -> StoreResult<Option<Document>> {
            Err(StoreError::unavailable("database offline"))
        }
        fn find_by_title(&self, _title: &str) -> StoreResult<Option<Document>> {
            Err(StoreError::unavailable("database offline"))
        }
        fn insert(&self, _document: &NewDocument) -> StoreResult<Document> {
            Err(StoreError::unavailable("database offline"))
        }
        fn update_by_id(
            &self,
            _id: DocumentId,
            _document: &NewDocument,
        ) -> StoreResult<Option<Document>> {
            Err(StoreError::unavailable("database offline"))
        }
        fn update_if_version(
            &self,
            _id: DocumentId,
            _expected: Version,
            _document: &NewDocument,
        ) -> StoreResult<Option<Document>> {
            Err(StoreError::unavailable("database offline"))
        }
        fn get(&self, _id: DocumentId) -> StoreResult<Option<Document>> {
            Err(StoreError::unavailable("database offline"))
        }
        fn list(&self) -> StoreResult<Vec<Document>> {
            Err(StoreError::unavailable("database offline"))
        }
        fn delete(&self, _id: DocumentId) -> StoreResult<bool> {
            Err(StoreError::unavailable("database offline"))
        }
    }

    #[test]
    fn unseen_upload_is_an_insert_at_version_one() {
        let fx = fixture(1024);
        let resolution = fx
            .coordinator
            .resolve(&name("report.pdf"), &b"alpha"[..])
            .unwrap();

        assert_eq!(resolution.action(), Action::Insert);
        let doc = resolution.document();
        assert_eq!(doc.version, Version::INITIAL);
        assert_eq!(doc.title, "report.pdf");
        assert_eq!(doc.author, "");
        assert_eq!(doc.hash, hash_bytes(b"alpha"));
        assert!(doc.path.ends_with("report.pdf"));
        assert_eq!(resolution.content, b"alpha");
    }

    #[test]
    fn rename_and_revise_scenario() {
        let fx = fixture(1024);

        let first = fx
            .coordinator
            .resolve(&name("report.pdf"), &b"content A"[..])
            .unwrap();
        assert_eq!(first.action(), Action::Insert);
        let v1 = commit(&fx.store, &first);
        assert_eq!(v1.version.to_string(), "1.0");

        let renamed = fx
            .coordinator
            .resolve(&name("summary.pdf"), &b"content A"[..])
            .unwrap();
        assert_eq!(renamed.action(), Action::Update);
        let v2 = commit(&fx.store, &renamed);
        assert_eq!(v2.id, v1.id);
        assert_eq!(v2.version.to_string(), "2.0");
        assert_eq!(v2.title, "summary.pdf");
        assert!(v2.path.ends_with("summary.pdf"));
        assert_eq!(v2.hash, v1.hash);

        let revised = fx
            .coordinator
            .resolve(&name("summary.pdf"), &b"content B"[..])
            .unwrap();
        assert_eq!(revised.action(), Action::Update);
        let v3 = commit(&fx.store, &revised);
        assert_eq!(v3.id, v1.id);
        assert_eq!(v3.version.to_string(), "3.0");
        assert_eq!(v3.hash, hash_bytes(b"content B"));
        assert_eq!(fx.store.list().unwrap().len(), 1);
    }

    #[test]
    fn hash_match_beats_title_match() {
        let fx = fixture(1024);
        let a = commit(
            &fx.store,
            &fx.coordinator.resolve(&name("a.txt"), &b"one"[..]).unwrap(),
        );
        let b = commit(
            &fx.store,
            &fx.coordinator.resolve(&name("b.txt"), &b"two"[..]).unwrap(),
        );

        // Upload a's bytes under b's name: the content lineage wins.
        let resolution = fx.coordinator.resolve(&name("b.txt"), &b"one"[..]).unwrap();
        match resolution.decision {
            Decision::Update { id, previous, .. } => {
                assert_eq!(id, a.id);
                assert_ne!(id, b.id);
                assert_eq!(previous, a);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn second_of_two_racing_updates_is_rejected() {
        let fx = fixture(1024);
        commit(
            &fx.store,
            &fx.coordinator.resolve(&name("a.txt"), &b"seed"[..]).unwrap(),
        );

        // Both resolve against 1.0 before either commits.
        let one = fx.coordinator.resolve(&name("a.txt"), &b"one"[..]).unwrap();
        let two = fx.coordinator.resolve(&name("a.txt"), &b"two"[..]).unwrap();
        assert_eq!(one.document().version.to_string(), "2.0");
        assert_eq!(two.document().version.to_string(), "2.0");

        let committed = commit(&fx.store, &one);
        assert_eq!(committed.version.to_string(), "2.0");

        let Decision::Update {
            id,
            document,
            previous,
        } = &two.decision
        else {
            panic!("expected update, got {:?}", two.decision);
        };
        let err = fx
            .store
            .update_if_version(*id, previous.version, document)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let current = fx.store.get(committed.id).unwrap().unwrap();
        assert_eq!(current.hash, hash_bytes(b"one"));
        assert_eq!(current.version.to_string(), "2.0");
    }

    #[test]
    fn update_keeps_existing_author() {
        let fx = fixture(1024);
        let doc = commit(
            &fx.store,
            &fx.coordinator.resolve(&name("a.txt"), &b"one"[..]).unwrap(),
        );
        let mut fields = doc.fields();
        fields.author = "ops".into();
        fx.store.update_by_id(doc.id, &fields).unwrap();

        let resolution = fx.coordinator.resolve(&name("a.txt"), &b"two"[..]).unwrap();
        assert_eq!(resolution.document().author, "ops");
    }

    #[test]
    fn zero_byte_upload_is_valid() {
        let fx = fixture(1024);
        let resolution = fx.coordinator.resolve(&name("empty.txt"), io::empty()).unwrap();
        assert_eq!(resolution.action(), Action::Insert);
        assert_eq!(
            resolution.document().hash.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(resolution.content.is_empty());
    }

    #[test]
    fn upload_at_exact_limit_is_accepted() {
        let fx = fixture(4);
        assert!(fx.coordinator.resolve(&name("a"), &b"1234"[..]).is_ok());
    }

    #[test]
    fn oversized_upload_fails_without_touching_the_store() {
        let tmp = TempDir::new().unwrap();
        let files = FilesService::new(tmp.path()).unwrap();
        let coordinator = UploadCoordinator::new(Arc::new(UnavailableStore), files, 4);

        let err = coordinator.resolve(&name("a"), &b"12345"[..]).unwrap_err();
        assert!(matches!(err, UploadError::SizeLimitExceeded { limit: 4 }));
    }

    #[test]
    fn failing_stream_is_reported() {
        let fx = fixture(1024);
        let err = fx
            .coordinator
            .resolve(&name("a"), FailingReader)
            .unwrap_err();
        assert!(matches!(err, UploadError::StreamReadFailed(_)));
        assert!(fx.store.list().unwrap().is_empty());
    }

    #[test]
    fn store_failure_is_store_unavailable() {
        let tmp = TempDir::new().unwrap();
        let files = FilesService::new(tmp.path()).unwrap();
        let coordinator = UploadCoordinator::new(Arc::new(UnavailableStore), files, 1024);

        let err = coordinator.resolve(&name("a"), &b"x"[..]).unwrap_err();
        assert!(matches!(err, UploadError::StoreUnavailable(_)));
    }
}
