//! Document operations exposed to the REST API and the CLI.
//!
//! [`DocumentService`] pairs the metadata store with the file storage. Uploads go through the
//! [`UploadCoordinator`]; everything else is plain CRUD over the store.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use docvault_files::{hash_bytes, FilesService};
use docvault_types::Version;

use crate::config::CoreConfig;
use crate::error::{DocumentError, DocumentResult, StoreError};
use crate::model::{Document, DocumentDraft, DocumentId, DocumentPatch, NewDocument};
use crate::store::DocumentStore;
use crate::upload::{Action, Decision, Resolution, UploadCoordinator};

/// A committed upload.
#[derive(Debug, Clone)]
pub struct Uploaded {
    pub document: Document,
    pub action: Action,
}

/// Whether a document's file could be read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyStatus {
    Loaded(Vec<u8>),
    /// The file is gone or unreadable; carries the reason.
    Missing(String),
}

impl BodyStatus {
    pub fn bytes(&self) -> &[u8] {
        match self {
            BodyStatus::Loaded(bytes) => bytes,
            BodyStatus::Missing(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BodyStatus::Loaded(_) => None,
            BodyStatus::Missing(reason) => Some(reason),
        }
    }
}

/// A document together with its (possibly unavailable) body.
#[derive(Debug, Clone)]
pub struct Retrieved {
    pub document: Document,
    pub body: BodyStatus,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    files: FilesService,
    coordinator: UploadCoordinator,
    delete_files: bool,
}

impl DocumentService {
    pub fn new(config: &CoreConfig, store: Arc<dyn DocumentStore>, files: FilesService) -> Self {
        let coordinator =
            UploadCoordinator::new(store.clone(), files.clone(), config.max_upload_bytes());
        Self {
            store,
            files,
            coordinator,
            delete_files: config.delete_files(),
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.coordinator.max_upload_bytes()
    }

    /// Store an uploaded file, creating a document or the next version of an existing one.
    ///
    /// Order is fixed: resolve, commit metadata, write bytes. A failed write undoes the
    /// metadata commit before the error is returned.
    ///
    /// Commits are conditional: an insert needs the title to be free and an update needs the
    /// record to still be at the version it was resolved against. If another upload got there
    /// first the bytes are resolved once more and the new decision is committed instead.
    ///
    /// A hash match normally becomes an update of that document. The one exception is a
    /// match whose new title already belongs to a different document: titles are unique, so
    /// that upload fails with `Conflict` and nothing changes.
    ///
    /// # Errors
    ///
    /// - `InvalidFilename` if nothing safe is left of `raw_filename`
    /// - `Upload` for oversize uploads, stream failures and lookup failures
    /// - `Conflict` if the title is taken by another document, or the commit is still
    ///   contended after one retry
    /// - `Store` if the commit fails
    /// - `FileWrite` if the bytes could not be written
    pub fn upload<R: Read>(&self, raw_filename: &str, stream: R) -> DocumentResult<Uploaded> {
        let filename = FilesService::sanitize_file_name(raw_filename)
            .map_err(|e| DocumentError::InvalidFilename(e.to_string()))?;

        let resolution = self.coordinator.resolve(&filename, stream)?;

        let (document, resolution) = match self.commit(&resolution) {
            Ok(document) => (document, resolution),
            Err(StoreError::Conflict(reason)) => {
                tracing::warn!(
                    title = filename.as_str(),
                    action = %resolution.action(),
                    %reason,
                    "upload lost a commit race, resolving again"
                );
                let retry = self
                    .coordinator
                    .resolve_content(&filename, resolution.content)?;
                let document = self.commit(&retry)?;
                (document, retry)
            }
            Err(err) => return Err(err.into()),
        };

        let action = resolution.action();
        let stored = match self.files.write(Path::new(&document.path), &resolution.content) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::error!(
                    id = %document.id,
                    path = %document.path,
                    error = %err,
                    "failed to write upload"
                );
                self.compensate(&document, &resolution.decision);
                return Err(DocumentError::FileWrite(err));
            }
        };

        tracing::info!(
            %action,
            id = %document.id,
            title = %document.title,
            version = %document.version,
            size_bytes = stored.size_bytes,
            media_type = stored.media_type.as_ref().map_or("unknown", |m| m.as_str()),
            "stored upload"
        );

        Ok(Uploaded { document, action })
    }

    fn commit(&self, resolution: &Resolution) -> Result<Document, StoreError> {
        match &resolution.decision {
            Decision::Insert { document } => self.store.insert(document),
            Decision::Update {
                id,
                document,
                previous,
            } => self
                .store
                .update_if_version(*id, previous.version, document)?
                .ok_or_else(|| {
                    StoreError::Conflict(format!("document {id} was removed during upload"))
                }),
        }
    }

    fn compensate(&self, document: &Document, decision: &Decision) {
        let outcome = match decision {
            Decision::Insert { .. } => self.store.delete(document.id).map(|_| ()),
            // Only undo our own commit; a newer one stays.
            Decision::Update { id, previous, .. } => self
                .store
                .update_if_version(*id, document.version, &previous.fields())
                .map(|_| ()),
        };
        if let Err(err) = outcome {
            tracing::error!(
                id = %document.id,
                error = %err,
                "failed to roll back document metadata"
            );
        }
    }

    /// Fetch a document and try to load its file.
    ///
    /// A file that cannot be read is reported through [`BodyStatus::Missing`]; only a missing
    /// record is an error.
    pub fn get(&self, id: DocumentId) -> DocumentResult<Retrieved> {
        let document = self.require(id)?;

        let body = match self.files.read(Path::new(&document.path)) {
            Ok(bytes) => BodyStatus::Loaded(bytes),
            Err(err) => {
                tracing::warn!(
                    id = %id,
                    path = %document.path,
                    error = %err,
                    "document body unavailable"
                );
                BodyStatus::Missing(err.to_string())
            }
        };

        Ok(Retrieved { document, body })
    }

    /// Fetch a document's bytes; unlike [`get`](Self::get) a missing file is an error.
    pub fn download(&self, id: DocumentId) -> DocumentResult<(Document, Vec<u8>)> {
        let document = self.require(id)?;
        let bytes = self
            .files
            .read(Path::new(&document.path))
            .map_err(DocumentError::FileRead)?;
        Ok((document, bytes))
    }

    pub fn list(&self) -> DocumentResult<Vec<Document>> {
        Ok(self.store.list()?)
    }

    /// Insert a metadata-only record.
    pub fn create(&self, draft: DocumentDraft) -> DocumentResult<Document> {
        let path = match draft.path {
            Some(path) => path,
            None => FilesService::sanitize_file_name(draft.title.as_str())
                .map(|name| self.files.path_for(&name).to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        let document = self.store.insert(&NewDocument {
            path,
            title: draft.title.into_inner(),
            version: draft.version.unwrap_or(Version::INITIAL),
            author: draft.author.unwrap_or_default(),
            hash: draft.hash.unwrap_or_else(|| hash_bytes(&[])),
        })?;

        tracing::info!(id = %document.id, title = %document.title, "created document");
        Ok(document)
    }

    /// Apply a partial metadata update.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the patch would lower the version.
    pub fn update(&self, id: DocumentId, patch: DocumentPatch) -> DocumentResult<Document> {
        let existing = self.require(id)?;
        let mut fields = existing.fields();

        if let Some(version) = patch.version {
            if version < existing.version {
                return Err(DocumentError::InvalidInput(format!(
                    "version may not decrease from {} to {}",
                    existing.version, version
                )));
            }
            fields.version = version;
        }
        if let Some(path) = patch.path {
            fields.path = path;
        }
        if let Some(title) = patch.title {
            fields.title = title.into_inner();
        }
        if let Some(author) = patch.author {
            fields.author = author;
        }

        let document = self
            .store
            .update_by_id(id, &fields)?
            .ok_or(DocumentError::NotFound(id))?;

        tracing::info!(id = %id, version = %document.version, "updated document");
        Ok(document)
    }

    /// Delete a document record, and its file when configured to.
    ///
    /// A file still referenced by another document is kept. File removal failures are logged.
    pub fn delete(&self, id: DocumentId) -> DocumentResult<Document> {
        let document = self.require(id)?;
        if !self.store.delete(id)? {
            return Err(DocumentError::NotFound(id));
        }

        if self.delete_files {
            self.remove_file(&document)?;
        }

        tracing::info!(id = %id, title = %document.title, "deleted document");
        Ok(document)
    }

    fn remove_file(&self, document: &Document) -> DocumentResult<()> {
        let shared = self
            .store
            .list()?
            .iter()
            .any(|other| other.path == document.path);
        if shared {
            tracing::debug!(path = %document.path, "file still referenced, keeping it");
            return Ok(());
        }

        match self.files.remove(Path::new(&document.path)) {
            Ok(true) => tracing::debug!(path = %document.path, "removed file"),
            Ok(false) => tracing::debug!(path = %document.path, "file already gone"),
            Err(err) => {
                tracing::warn!(path = %document.path, error = %err, "failed to remove file")
            }
        }
        Ok(())
    }

    fn require(&self, id: DocumentId) -> DocumentResult<Document> {
        self.store.get(id)?.ok_or(DocumentError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreResult, UploadError};
    use crate::store::{Database, SqliteDocumentStore};
    use docvault_types::{ContentHash, NonEmptyText};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    type Rival = Box<dyn FnOnce(&SqliteDocumentStore) + Send>;

    /// Wraps the real store to stage a competing request: `rival` runs against the inner store
    /// just before the first commit, and the first `forced_conflicts` inserts fail outright.
    struct ContendedStore {
        inner: SqliteDocumentStore,
        rival: Mutex<Option<Rival>>,
        forced_conflicts: AtomicUsize,
        inserts: AtomicUsize,
    }

    impl ContendedStore {
        fn new(inner: SqliteDocumentStore) -> Self {
            Self {
                inner,
                rival: Mutex::new(None),
                forced_conflicts: AtomicUsize::new(0),
                inserts: AtomicUsize::new(0),
            }
        }

        fn with_rival(self, rival: impl FnOnce(&SqliteDocumentStore) + Send + 'static) -> Self {
            *self.rival.lock().unwrap() = Some(Box::new(rival));
            self
        }

        fn with_forced_conflicts(self, count: usize) -> Self {
            self.forced_conflicts.store(count, Ordering::SeqCst);
            self
        }

        fn run_rival(&self) {
            if let Some(rival) = self.rival.lock().unwrap().take() {
                rival(&self.inner);
            }
        }
    }

    impl DocumentStore for ContendedStore {
        fn find_by_hash(&self, hash: &ContentHash) -> StoreResult<Option<Document>> {
            self.inner.find_by_hash(hash)
        }
        fn find_by_title(&self, title: &str) -> StoreResult<Option<Document>> {
            self.inner.find_by_title(title)
        }
        fn insert(&self, document: &NewDocument) -> StoreResult<Document> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.run_rival();
            let forced = self
                .forced_conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if forced {
                return Err(StoreError::Conflict("title already taken".into()));
            }
            self.inner.insert(document)
        }
        fn update_by_id(
            &self,
            id: DocumentId,
            document: &NewDocument,
        ) -> StoreResult<Option<Document>> {
            self.inner.update_by_id(id, document)
        }
        fn update_if_version(
            &self,
            id: DocumentId,
            expected: Version,
            document: &NewDocument,
        ) -> StoreResult<Option<Document>> {
            self.run_rival();
            self.inner.update_if_version(id, expected, document)
        }
        fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
            self.inner.get(id)
        }
        fn list(&self) -> StoreResult<Vec<Document>> {
            self.inner.list()
        }
        fn delete(&self, id: DocumentId) -> StoreResult<bool> {
            self.inner.delete(id)
        }
    }

    struct Fixture {
        tmp: TempDir,
        service: DocumentService,
    }

    impl Fixture {
        fn storage(&self) -> std::path::PathBuf {
            self.tmp.path().join("docs")
        }
    }

    fn fixture_over(
        store: Arc<dyn DocumentStore>,
        max_upload_bytes: u64,
        delete_files: bool,
    ) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let config = CoreConfig::new(
            tmp.path().join("docvault.db"),
            tmp.path().join("docs"),
            max_upload_bytes,
            delete_files,
        )
        .unwrap();
        let files = FilesService::new(config.storage_root()).unwrap();
        let service = DocumentService::new(&config, store, files);
        Fixture { tmp, service }
    }

    fn fixture_with(max_upload_bytes: u64, delete_files: bool) -> Fixture {
        let store = Arc::new(SqliteDocumentStore::new(Database::open_in_memory().unwrap()));
        fixture_over(store, max_upload_bytes, delete_files)
    }

    fn sqlite_store() -> SqliteDocumentStore {
        SqliteDocumentStore::new(Database::open_in_memory().unwrap())
    }

    fn rival_document(title: &str, content: &[u8]) -> NewDocument {
        NewDocument {
            path: format!("elsewhere/{title}"),
            title: title.to_string(),
            version: Version::INITIAL,
            author: String::new(),
            hash: hash_bytes(content),
        }
    }

    fn fixture() -> Fixture {
        fixture_with(1024, false)
    }

    #[test]
    fn upload_writes_file_and_inserts() {
        let fx = fixture();
        let uploaded = fx.service.upload("report.pdf", &b"%PDF-1.7"[..]).unwrap();

        assert_eq!(uploaded.action, Action::Insert);
        assert_eq!(uploaded.document.version.to_string(), "1.0");
        assert_eq!(
            fs::read(fx.storage().join("report.pdf")).unwrap(),
            b"%PDF-1.7"
        );
    }

    #[test]
    fn upload_strips_client_directories() {
        let fx = fixture();
        let uploaded = fx
            .service
            .upload(r"C:\Users\me\report.pdf", &b"data"[..])
            .unwrap();
        assert_eq!(uploaded.document.title, "report.pdf");
        assert!(fx.storage().join("report.pdf").exists());
    }

    #[test]
    fn upload_rejects_unusable_filenames() {
        let fx = fixture();
        for raw in ["", "docs/", "..", "a\0b"] {
            let err = fx.service.upload(raw, &b"data"[..]).unwrap_err();
            assert!(matches!(err, DocumentError::InvalidFilename(_)), "{raw:?}");
        }
        assert!(fx.service.list().unwrap().is_empty());
    }

    #[test]
    fn rename_and_revise_scenario_end_to_end() {
        let fx = fixture();
        let v1 = fx.service.upload("report.pdf", &b"A"[..]).unwrap().document;
        let v2 = fx.service.upload("summary.pdf", &b"A"[..]).unwrap();
        let v3 = fx.service.upload("summary.pdf", &b"B"[..]).unwrap();

        assert_eq!(v2.action, Action::Update);
        assert_eq!(v2.document.id, v1.id);
        assert_eq!(v2.document.version.to_string(), "2.0");
        assert_eq!(v2.document.hash, v1.hash);

        assert_eq!(v3.action, Action::Update);
        assert_eq!(v3.document.id, v1.id);
        assert_eq!(v3.document.version.to_string(), "3.0");
        assert_eq!(v3.document.hash, hash_bytes(b"B"));

        let retrieved = fx.service.get(v1.id).unwrap();
        assert_eq!(retrieved.body, BodyStatus::Loaded(b"B".to_vec()));
    }

    #[test]
    fn oversized_upload_leaves_no_trace() {
        let fx = fixture_with(3, false);
        let err = fx.service.upload("big.bin", &b"1234"[..]).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::Upload(UploadError::SizeLimitExceeded { limit: 3 })
        ));
        assert!(fx.service.list().unwrap().is_empty());
        assert!(!fx.storage().join("big.bin").exists());
    }

    #[test]
    fn failed_write_rolls_back_insert() {
        let fx = fixture();
        // A non-empty directory where the file should go makes the final rename fail.
        fs::create_dir(fx.storage().join("report.pdf")).unwrap();
        fs::write(fx.storage().join("report.pdf").join("keep"), b"x").unwrap();

        let err = fx.service.upload("report.pdf", &b"data"[..]).unwrap_err();
        assert!(matches!(err, DocumentError::FileWrite(_)));
        assert!(fx.service.list().unwrap().is_empty());
    }

    #[test]
    fn failed_write_restores_previous_version() {
        let fx = fixture();
        let original = fx.service.upload("a.txt", &b"one"[..]).unwrap().document;

        fs::create_dir(fx.storage().join("b.txt")).unwrap();
        fs::write(fx.storage().join("b.txt").join("keep"), b"x").unwrap();

        // Same bytes under a new name resolves to an update of `original`.
        let err = fx.service.upload("b.txt", &b"one"[..]).unwrap_err();
        assert!(matches!(err, DocumentError::FileWrite(_)));

        let restored = fx.service.get(original.id).unwrap().document;
        assert_eq!(restored.title, "a.txt");
        assert_eq!(restored.version, original.version);
        assert_eq!(restored.path, original.path);
    }

    #[test]
    fn update_into_another_lineage_title_conflicts() {
        let fx = fixture();
        fx.service.upload("a.txt", &b"one"[..]).unwrap();
        fx.service.upload("b.txt", &b"two"[..]).unwrap();

        // b's bytes under a's title: hash matches b, but "a.txt" belongs to a.
        let err = fx.service.upload("a.txt", &b"two"[..]).unwrap_err();
        assert!(matches!(err, DocumentError::Conflict(_)));
    }

    #[test]
    fn insert_beaten_to_the_title_becomes_an_update() {
        let store = Arc::new(ContendedStore::new(sqlite_store()).with_rival(|inner| {
            inner.insert(&rival_document("new.txt", b"theirs")).unwrap();
        }));
        let fx = fixture_over(store.clone(), 1024, false);

        let uploaded = fx.service.upload("new.txt", &b"ours"[..]).unwrap();

        assert_eq!(uploaded.action, Action::Update);
        assert_eq!(uploaded.document.version.to_string(), "2.0");
        assert_eq!(uploaded.document.hash, hash_bytes(b"ours"));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(fx.service.list().unwrap().len(), 1);
        assert_eq!(fs::read(fx.storage().join("new.txt")).unwrap(), b"ours");
    }

    #[test]
    fn insert_contended_twice_is_a_conflict() {
        let store = Arc::new(ContendedStore::new(sqlite_store()).with_forced_conflicts(2));
        let fx = fixture_over(store.clone(), 1024, false);

        let err = fx.service.upload("new.txt", &b"ours"[..]).unwrap_err();

        assert!(matches!(err, DocumentError::Conflict(_)));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
        assert!(fx.service.list().unwrap().is_empty());
        assert!(!fx.storage().join("new.txt").exists());
    }

    #[test]
    fn update_beaten_to_the_next_version_is_resolved_again() {
        let inner = sqlite_store();
        let seed = inner.insert(&rival_document("a.txt", b"one")).unwrap();
        let store = Arc::new(ContendedStore::new(inner).with_rival(move |inner| {
            let mut fields = seed.fields();
            fields.version = seed.version.next().unwrap();
            fields.hash = hash_bytes(b"theirs");
            inner
                .update_if_version(seed.id, seed.version, &fields)
                .unwrap();
        }));
        let fx = fixture_over(store, 1024, false);

        let uploaded = fx.service.upload("a.txt", &b"ours"[..]).unwrap();

        assert_eq!(uploaded.action, Action::Update);
        assert_eq!(uploaded.document.version.to_string(), "3.0");
        assert_eq!(uploaded.document.hash, hash_bytes(b"ours"));
        assert_eq!(fx.service.list().unwrap().len(), 1);
    }

    #[test]
    fn get_reports_missing_body_without_failing() {
        let fx = fixture();
        let doc = fx.service.upload("gone.txt", &b"data"[..]).unwrap().document;
        fs::remove_file(fx.storage().join("gone.txt")).unwrap();

        let retrieved = fx.service.get(doc.id).unwrap();
        assert_eq!(retrieved.document, doc);
        assert!(retrieved.body.bytes().is_empty());
        assert!(retrieved.body.error().is_some());

        assert!(matches!(
            fx.service.download(doc.id),
            Err(DocumentError::FileRead(_))
        ));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let fx = fixture();
        let id = DocumentId::new(99);
        assert!(matches!(fx.service.get(id), Err(DocumentError::NotFound(_))));
        assert!(matches!(fx.service.download(id), Err(DocumentError::NotFound(_))));
        assert!(matches!(fx.service.delete(id), Err(DocumentError::NotFound(_))));
        assert!(matches!(
            fx.service.update(id, DocumentPatch::default()),
            Err(DocumentError::NotFound(_))
        ));
    }

    #[test]
    fn create_applies_defaults() {
        let fx = fixture();
        let doc = fx
            .service
            .create(DocumentDraft {
                title: NonEmptyText::new("notes.txt").unwrap(),
                path: None,
                version: None,
                author: None,
                hash: None,
            })
            .unwrap();

        assert_eq!(doc.version, Version::INITIAL);
        assert_eq!(doc.author, "");
        assert_eq!(doc.hash, hash_bytes(b""));
        assert!(doc.path.ends_with("notes.txt"));
    }

    #[test]
    fn create_with_taken_title_conflicts() {
        let fx = fixture();
        fx.service.upload("a.txt", &b"one"[..]).unwrap();
        let err = fx
            .service
            .create(DocumentDraft {
                title: NonEmptyText::new("a.txt").unwrap(),
                path: None,
                version: None,
                author: None,
                hash: None,
            })
            .unwrap_err();
        assert!(matches!(err, DocumentError::Conflict(_)));
    }

    #[test]
    fn update_patches_fields_but_never_lowers_version() {
        let fx = fixture();
        fx.service.upload("a.txt", &b"one"[..]).unwrap();
        let doc = fx.service.upload("a.txt", &b"two"[..]).unwrap().document;

        let updated = fx
            .service
            .update(
                doc.id,
                DocumentPatch {
                    author: Some("ops".into()),
                    version: Some(Version::from_units(5).unwrap()),
                    ..DocumentPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.author, "ops");
        assert_eq!(updated.version.to_string(), "5.0");
        assert_eq!(updated.title, "a.txt");

        let err = fx
            .service
            .update(
                doc.id,
                DocumentPatch {
                    version: Some(Version::INITIAL),
                    ..DocumentPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidInput(_)));
    }

    #[test]
    fn delete_keeps_file_by_default() {
        let fx = fixture();
        let doc = fx.service.upload("a.txt", &b"one"[..]).unwrap().document;

        fx.service.delete(doc.id).unwrap();
        assert!(fx.service.list().unwrap().is_empty());
        assert!(fx.storage().join("a.txt").exists());
    }

    #[test]
    fn delete_removes_file_when_configured() {
        let fx = fixture_with(1024, true);
        let doc = fx.service.upload("a.txt", &b"one"[..]).unwrap().document;

        fx.service.delete(doc.id).unwrap();
        assert!(!fx.storage().join("a.txt").exists());
    }

    #[test]
    fn delete_keeps_file_still_referenced_elsewhere() {
        let fx = fixture_with(1024, true);
        let doc = fx.service.upload("a.txt", &b"one"[..]).unwrap().document;
        let twin = fx
            .service
            .create(DocumentDraft {
                title: NonEmptyText::new("a copy").unwrap(),
                path: Some(doc.path.clone()),
                version: None,
                author: None,
                hash: Some(doc.hash.clone()),
            })
            .unwrap();

        fx.service.delete(doc.id).unwrap();
        assert!(fx.storage().join("a.txt").exists());
        assert!(matches!(
            fx.service.get(twin.id).unwrap().body,
            BodyStatus::Loaded(_)
        ));
    }
}
