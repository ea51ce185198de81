//! Filesystem implementation of the `KeyValueStorage` trait.
//!
//! Each key is one file, `<data_dir>/<key>.json`. Writes land in a temporary
//! sibling first and are renamed into place, so a slot is either the old
//! value or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use worldlog_core::error::DomainError;
use worldlog_core::storage::KeyValueStorage;

/// Configuration for [`FileStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorageConfig {
    /// Directory holding one file per key.
    pub data_dir: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Directory-backed key-value storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Opens the storage, creating `config.data_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the directory cannot be created.
    pub fn open(config: FileStorageConfig) -> Result<Self, DomainError> {
        fs::create_dir_all(&config.data_dir).map_err(|e| {
            DomainError::Infrastructure(format!(
                "failed to create data directory {}: {e}",
                config.data_dir.display()
            ))
        })?;
        debug!(data_dir = %config.data_dir.display(), "opened file storage");
        Ok(Self {
            data_dir: config.data_dir,
        })
    }

    /// Directory holding the slots.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, DomainError> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is allowed.
fn validate_key(key: &str) -> Result<(), DomainError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "storage key {key:?} must be non-empty and contain only [A-Za-z0-9_-]"
        )))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Infrastructure(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).map_err(|e| {
            DomainError::Infrastructure(format!("failed to write {}: {e}", tmp.display()))
        })?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(DomainError::Infrastructure(format!(
                "failed to move {} into place: {e}",
                path.display()
            )));
        }

        debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}
