//! Platform abstraction traits for the engine's external services.
//!
//! The engine never touches the filesystem, the system clock or a random
//! source directly. Hosts inject implementations through [`EngineServices`];
//! `treedo-runtime-std` provides the `std` backed ones.

use std::fmt;
use std::sync::Arc;

/// Failure reported by a [`StorageBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Io { reason: String },
    Unavailable { reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { reason } => write!(f, "i/o error: {reason}"),
            StorageError::Unavailable { reason } => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Opaque blob store keyed by string.
///
/// Implementations must be safe to use from the persistence worker thread.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), StorageError>;
}

/// Produces unique identifiers for new items and projects.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Provides wall clock timestamps for new items.
pub trait Clock {
    /// Milliseconds since the unix epoch.
    fn now_millis(&self) -> i64;
}

/// Bundle of the services an [`Engine`](crate::Engine) is constructed with.
pub struct EngineServices {
    pub storage: Arc<dyn StorageBackend>,
    pub ids: Box<dyn IdGenerator>,
    pub clock: Box<dyn Clock>,
}

impl EngineServices {
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        ids: impl IdGenerator + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            storage,
            ids: Box::new(ids),
            clock: Box::new(clock),
        }
    }
}

impl fmt::Debug for EngineServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineServices").finish_non_exhaustive()
    }
}
