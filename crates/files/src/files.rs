//! Storage-root scoped file service
//!
//! [`FilesService`] is the file writer and reader behind document uploads and retrieval.
//!
//! # Storage Model
//!
//! - One flat storage root per service, created on construction if absent
//! - A document's path is `<storage_root>/<original filename>`
//! - Writes go to a scratch file in the same directory and are renamed into place, so a
//!   reader never observes a half-written file
//!
//! # Security Model
//!
//! - The storage root is canonicalised at construction time
//! - Filenames are reduced to their final component; `.`/`..`, NUL bytes and scratch-file
//!   names are rejected
//! - Every read, write and remove re-checks that the target sits directly inside the root,
//!   so a metadata row pointing at `/etc/passwd` cannot be used to read it

use crate::constants::PARTIAL_FILE_PREFIX;
use crate::FilesError;
use docvault_types::NonEmptyText;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Absolute path the bytes were written to
    pub path: PathBuf,

    /// Size of the file in bytes
    pub size_bytes: u64,

    /// Detected media type (MIME type), if available
    ///
    /// Best-effort sniffing of the leading bytes; not authoritative.
    pub media_type: Option<NonEmptyText>,
}

/// Best-effort media type detection from file content.
pub fn media_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

/// Service for managing uploaded files under a single storage root
#[derive(Debug, Clone)]
pub struct FilesService {
    /// Canonicalised root directory
    storage_root: PathBuf,
}

impl FilesService {
    /// Creates a new `FilesService` rooted at `storage_root`
    ///
    /// The directory is created (with parents) when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidRootDirectory` if:
    /// - The path exists but is not a directory
    /// - The directory cannot be created
    /// - Path canonicalisation fails
    pub fn new(storage_root: &Path) -> Result<Self, FilesError> {
        if storage_root.exists() && !storage_root.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                storage_root.display()
            )));
        }

        fs::create_dir_all(storage_root).map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot create storage root {}: {}",
                storage_root.display(),
                e
            ))
        })?;

        let storage_root = storage_root.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                storage_root.display(),
                e
            ))
        })?;

        Ok(Self { storage_root })
    }

    /// Returns the canonicalised storage root
    #[must_use]
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Reduces a client-supplied filename to a safe single path component
    ///
    /// Browsers usually send a bare name, but some clients send a full local path
    /// (`C:\Users\me\report.pdf`); only the final component is kept.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidPath` when nothing usable is left, or the name is `.`/`..`,
    /// contains NUL, or collides with the scratch-file prefix.
    pub fn sanitize_file_name(raw: &str) -> Result<NonEmptyText, FilesError> {
        let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

        let name = NonEmptyText::new(last)
            .map_err(|_| FilesError::InvalidPath(format!("empty filename in {raw:?}")))?;

        if matches!(name.as_str(), "." | "..")
            || name.as_str().contains('\0')
            || name.as_str().starts_with(PARTIAL_FILE_PREFIX)
        {
            return Err(FilesError::InvalidPath(format!("unsafe filename {raw:?}")));
        }

        Ok(name)
    }

    /// Returns `<storage_root>/<file_name>`
    #[must_use]
    pub fn path_for(&self, file_name: &NonEmptyText) -> PathBuf {
        self.storage_root.join(file_name.as_str())
    }

    /// Writes `bytes` to `path`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `path` is not directly inside the storage root
    /// - The scratch file cannot be created or written (I/O)
    /// - The rename into place fails (I/O)
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<StoredFile, FilesError> {
        let target = self.resolve_within_root(path)?;

        let mut scratch = tempfile::Builder::new()
            .prefix(PARTIAL_FILE_PREFIX)
            .tempfile_in(&self.storage_root)
            .map_err(|e| {
                FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create scratch file in {}: {}",
                        self.storage_root.display(),
                        e
                    ),
                ))
            })?;

        scratch.write_all(bytes)?;
        scratch.as_file().sync_all()?;

        scratch.persist(&target).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.error.kind(),
                format!("Failed to move file into {}: {}", target.display(), e.error),
            ))
        })?;

        tracing::debug!(path = %target.display(), size = bytes.len(), "stored file");

        Ok(StoredFile {
            path: target,
            size_bytes: bytes.len() as u64,
            media_type: media_type(bytes).and_then(|m| NonEmptyText::new(m).ok()),
        })
    }

    /// Reads the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `path` is not directly inside the storage root
    /// - The file does not exist or cannot be read (I/O)
    pub fn read(&self, path: &Path) -> Result<Vec<u8>, FilesError> {
        let target = self.resolve_within_root(path)?;

        fs::read(&target).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read file from {}: {}", target.display(), e),
            ))
        })
    }

    /// Removes the file at `path`
    ///
    /// # Returns
    ///
    /// `true` if a file was removed, `false` if there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if `path` is outside the storage root or removal fails.
    pub fn remove(&self, path: &Path) -> Result<bool, FilesError> {
        let target = self.resolve_within_root(path)?;

        match fs::remove_file(&target) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to remove {}: {}", target.display(), e),
            ))),
        }
    }

    /// Maps `path` onto the storage root, rejecting anything that is not a direct child
    fn resolve_within_root(&self, path: &Path) -> Result<PathBuf, FilesError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FilesError::InvalidPath(format!("no filename in {}", path.display())))?;
        let file_name = Self::sanitize_file_name(file_name)?;

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                FilesError::InvalidPath(format!("path is not absolute: {}", path.display()))
            })?;

        let parent = parent.canonicalize().map_err(|e| {
            FilesError::InvalidPath(format!("cannot resolve {}: {}", parent.display(), e))
        })?;

        if parent != self.storage_root {
            return Err(FilesError::InvalidPath(format!(
                "{} is outside the storage root {}",
                path.display(),
                self.storage_root.display()
            )));
        }

        Ok(parent.join(file_name.as_str()))
    }
}
