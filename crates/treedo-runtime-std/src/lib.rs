//! Standard platform services backed by Rust's `std` library.
//!
//! This crate provides concrete implementations of the platform traits
//! defined in `treedo-core`. Applications construct [`StdServices`] and hand
//! the resulting [`EngineServices`] to [`treedo_core::Engine`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use treedo_core::{Clock, EngineServices, IdGenerator, StorageBackend, StorageError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temporary file first and are renamed into place, so
/// a crash mid-write leaves the previous blob intact.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Unavailable {
                reason: format!("key {key:?} cannot be used as a file name"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(err: io::Error) -> StorageError {
    StorageError::Io {
        reason: err.to_string(),
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(err)),
        }
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, blob).map_err(io_error)?;
        fs::rename(&staging, &path).map_err(io_error)?;
        log::trace!("wrote {} bytes to {}", blob.len(), path.display());
        Ok(())
    }
}

/// Volatile storage for sessions that should not touch the disk.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, StorageError> {
        self.blobs.lock().map_err(|_| StorageError::Unavailable {
            reason: "memory storage lock poisoned".into(),
        })
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.lock().map(|blobs| blobs.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage").field("keys", &keys).finish()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Wall clock implementation backed by [`std::time::SystemTime`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
            Err(before_epoch) => -i64::try_from(before_epoch.duration().as_millis()).unwrap_or(i64::MAX),
        }
    }
}

/// Convenience constructors bundling std services around a storage backend.
#[derive(Debug)]
pub struct StdServices;

impl StdServices {
    /// File backed services rooted at `dir`.
    pub fn on_disk(dir: impl Into<PathBuf>) -> EngineServices {
        Self::with_storage(Arc::new(FileStorage::new(dir)))
    }

    /// Services that keep state in memory only.
    pub fn in_memory() -> EngineServices {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn StorageBackend>) -> EngineServices {
        EngineServices::new(storage, UuidIds, SystemClock)
    }
}
