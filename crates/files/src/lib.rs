//! DocVault File Storage
//!
//! This crate owns everything DocVault does with raw bytes:
//!
//! - [`hash_bytes`] / [`hash_reader`]: the content hasher (SHA-256, lowercase hex)
//! - [`FilesService`]: writes uploaded files under the storage root, reads them back for
//!   retrieval and download, and removes them when deletion is configured to do so
//!
//! ## Storage Layout
//!
//! Files are stored flat under a single storage root, named after the uploaded file:
//!
//! ```text
//! <storage_root>/
//! ├── report.pdf
//! └── summary.pdf
//! ```
//!
//! Every path handed to the service is checked to lie directly inside the storage root, so
//! metadata records pointing elsewhere on disk are never read or written.
//!
//! ## Example Usage
//!
//! ```no_run
//! use docvault_files::{hash_bytes, FilesService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FilesService::new(Path::new("docs"))?;
//! let name = FilesService::sanitize_file_name("report.pdf")?;
//! let path = service.path_for(&name);
//! service.write(&path, b"%PDF-1.7")?;
//! assert_eq!(hash_bytes(&service.read(&path)?), hash_bytes(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;
mod hash;

pub use constants::READ_BUFFER_SIZE;
pub use files::{media_type, FilesService, StoredFile};
pub use hash::{hash_bytes, hash_reader};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Storage root could not be created, or exists but is not a directory
    #[error("Invalid storage root: {0}")]
    InvalidRootDirectory(String),

    /// Path validation failed (directory traversal, unsafe filename, outside the storage root)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilesError {
    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FilesError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
