//! # Blob Storage
//!
//! The history log lives in a single string value under a fixed key. Any
//! key-value medium that can `get` and `set` a string can back it:
//!
//! - [`MemoryBlobStore`] keeps values in process (tests, embedding)
//! - [`FileBlobStore`] keeps one `<key>.json` file per key in a data directory
//!
//! File writes are atomic: the value is written to `<key>.json.tmp`, synced,
//! then renamed over the target, so an interrupted write never leaves a
//! half-written log behind. There is no locking; concurrent writers race
//! and the last rename wins.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{CostError, CostResult};

/// Minimal key-value capability the history store needs.
pub trait BlobStore {
    /// Read the value under `key`, `None` if nothing was ever stored.
    fn get(&self, key: &str) -> CostResult<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> CostResult<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn get(&self, key: &str) -> CostResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CostResult<()> {
        (**self).set(key, value)
    }
}

/// In-process blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> CostResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| CostError::storage_error("read", key, e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CostResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| CostError::storage_error("write", key, e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed blob store: one JSON file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Use `dir` for storage. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBlobStore { dir: dir.into() }
    }

    /// File path for a key.
    ///
    /// Keys are restricted to ASCII letters, digits, `_` and `-` so a key can
    /// never point outside the data directory.
    pub fn path_for(&self, key: &str) -> CostResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CostError::invalid_input(
                "key",
                key,
                "Storage keys may only contain letters, digits, '_' and '-'",
            ));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> CostResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| CostError::storage_error("read", path.display().to_string(), e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> CostResult<()> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            CostError::storage_error("create data dir", self.dir.display().to_string(), e.to_string())
        })?;

        let tmp_path = path.with_extension("json.tmp");

        let mut tmp_file = File::create(&tmp_path).map_err(|e| {
            CostError::storage_error("create temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        tmp_file.write_all(value.as_bytes()).map_err(|e| {
            CostError::storage_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        tmp_file.sync_all().map_err(|e| {
            CostError::storage_error("sync temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CostError::storage_error("rename to final", path.display().to_string(), e.to_string())
        })?;

        Ok(())
    }
}
