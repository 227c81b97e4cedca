//! Constants used throughout the DocVault core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "docvault.db";

/// Default directory uploaded files are written to.
pub const DEFAULT_STORAGE_ROOT: &str = "docs";

/// Default maximum upload size: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 << 20;

/// Schema version written to `PRAGMA user_version` after migration.
pub const SCHEMA_VERSION: i64 = 1;

pub const ENV_DATABASE_PATH: &str = "DOCVAULT_DATABASE_PATH";
pub const ENV_STORAGE_ROOT: &str = "DOCVAULT_STORAGE_ROOT";
pub const ENV_MAX_UPLOAD_BYTES: &str = "DOCVAULT_MAX_UPLOAD_BYTES";
pub const ENV_DELETE_FILES: &str = "DOCVAULT_DELETE_FILES";
