//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads environment variables; the
//! binaries call [`CoreConfig::from_env`] (after `dotenvy` has loaded `.env`) and share the
//! result.

use crate::constants::{
    DEFAULT_DATABASE_PATH, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_STORAGE_ROOT, ENV_DATABASE_PATH,
    ENV_DELETE_FILES, ENV_MAX_UPLOAD_BYTES, ENV_STORAGE_ROOT,
};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    storage_root: PathBuf,
    max_upload_bytes: u64,
    delete_files: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `max_upload_bytes` is zero.
    pub fn new(
        database_path: PathBuf,
        storage_root: PathBuf,
        max_upload_bytes: u64,
        delete_files: bool,
    ) -> Result<Self, ConfigError> {
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: ENV_MAX_UPLOAD_BYTES,
                value: "0".into(),
                reason: "must be greater than zero",
            });
        }

        Ok(Self {
            database_path,
            storage_root,
            max_upload_bytes,
            delete_files,
        })
    }

    /// Resolve configuration from the process environment.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `DOCVAULT_DATABASE_PATH` | `docvault.db` |
    /// | `DOCVAULT_STORAGE_ROOT` | `docs` |
    /// | `DOCVAULT_MAX_UPLOAD_BYTES` | 10 MiB |
    /// | `DOCVAULT_DELETE_FILES` | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = std::env::var(ENV_DATABASE_PATH)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.into());
        let storage_root = std::env::var(ENV_STORAGE_ROOT)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_ROOT.into());

        Self::new(
            PathBuf::from(database_path),
            PathBuf::from(storage_root),
            max_upload_bytes_from_env_value(std::env::var(ENV_MAX_UPLOAD_BYTES).ok())?,
            flag_from_env_value(ENV_DELETE_FILES, std::env::var(ENV_DELETE_FILES).ok())?,
        )
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Whether deleting a document also removes its file from disk.
    pub fn delete_files(&self) -> bool {
        self.delete_files
    }
}

/// Parse the maximum upload size from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MAX_UPLOAD_BYTES`].
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> Result<u64, ConfigError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(raw) = value else {
        return Ok(DEFAULT_MAX_UPLOAD_BYTES);
    };

    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            name: ENV_MAX_UPLOAD_BYTES,
            value: raw,
            reason: "must be greater than zero",
        }),
        Ok(bytes) => Ok(bytes),
        Err(_) => Err(ConfigError::InvalidValue {
            name: ENV_MAX_UPLOAD_BYTES,
            value: raw,
            reason: "expected a whole number of bytes",
        }),
    }
}

/// Parse a boolean switch. Unset or empty means `false`.
pub fn flag_from_env_value(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None | Some("0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => Err(ConfigError::InvalidValue {
            name,
            value: other.to_string(),
            reason: "expected true/false",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_upload_defaults_when_unset_or_blank() {
        assert_eq!(
            max_upload_bytes_from_env_value(None).unwrap(),
            DEFAULT_MAX_UPLOAD_BYTES
        );
        assert_eq!(
            max_upload_bytes_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_MAX_UPLOAD_BYTES
        );
    }

    #[test]
    fn max_upload_parses_and_rejects() {
        assert_eq!(
            max_upload_bytes_from_env_value(Some(" 2048 ".into())).unwrap(),
            2048
        );
        assert!(max_upload_bytes_from_env_value(Some("0".into())).is_err());
        assert!(max_upload_bytes_from_env_value(Some("10MB".into())).is_err());
        assert!(max_upload_bytes_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn flags_parse() {
        assert!(!flag_from_env_value(ENV_DELETE_FILES, None).unwrap());
        assert!(!flag_from_env_value(ENV_DELETE_FILES, Some("off".into())).unwrap());
        assert!(flag_from_env_value(ENV_DELETE_FILES, Some("TRUE".into())).unwrap());
        assert!(flag_from_env_value(ENV_DELETE_FILES, Some("1".into())).unwrap());
        assert!(flag_from_env_value(ENV_DELETE_FILES, Some("maybe".into())).is_err());
    }

    #[test]
    fn new_rejects_zero_limit() {
        let result = CoreConfig::new("db".into(), "docs".into(), 0, false);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
