use std::fmt;

use crate::platform::StorageError;

/// Failures reported by [`Engine`](crate::Engine) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested parent is neither the root nor an attached item.
    UnknownParent { id: String },
    /// The requested item is not attached to the current project.
    UnknownId { id: String },
    UnknownProject { id: String },
    /// An item with this id already exists (attached or in the trash).
    DuplicateId { id: String },
    /// A mutation was attempted before [`Engine::hydrate`](crate::Engine::hydrate) completed.
    NotHydrated,
    NoCurrentProject,
    /// Item text must not be empty.
    InvalidContent { id: String },
    UnsupportedVersion { found: u32, expected: u32 },
    /// The persisted state could not be decoded into a consistent tree.
    Corrupt { reason: String },
    Storage(StorageError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownParent { id } => write!(f, "parent {id} does not exist"),
            EngineError::UnknownId { id } => write!(f, "item {id} does not exist"),
            EngineError::UnknownProject { id } => write!(f, "project {id} does not exist"),
            EngineError::DuplicateId { id } => write!(f, "item {id} already exists"),
            EngineError::NotHydrated => write!(f, "state has not been hydrated yet"),
            EngineError::NoCurrentProject => write!(f, "no project is selected"),
            EngineError::InvalidContent { id } => write!(f, "item {id} has no text"),
            EngineError::UnsupportedVersion { found, expected } => {
                write!(f, "persisted state version {found} is not supported; expected {expected}")
            }
            EngineError::Corrupt { reason } => write!(f, "persisted state is corrupt: {reason}"),
            EngineError::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        EngineError::Storage(err)
    }
}
