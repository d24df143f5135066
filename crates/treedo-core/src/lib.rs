#![doc = r"Task tree model, mutation engine and persistence for Treedo."]

pub mod collections;
pub mod engine;
pub mod error;
pub mod mutation;
pub mod node;
pub mod persistence;
pub mod platform;
pub mod project;
pub mod serialize;
pub mod trash;
mod traversal;

pub use engine::{Engine, EngineOptions, MAX_UNDO_QUEUE_LENGTH};
pub use error::EngineError;
pub use mutation::{
    AccentColor, ItemUpdate, Move, Mutation, OrphanPolicy, Placement, Settings, SettingsMutation,
    TodoMutation, UnknownPolicy,
};
pub use node::{ItemContent, Node, NodeKind, RootContent, TodoItem, ROOT_ID};
pub use persistence::{PersistenceQueue, QueueStats, DEFAULT_STORAGE_KEY};
pub use platform::{Clock, EngineServices, IdGenerator, StorageBackend, StorageError};
pub use project::Project;
pub use serialize::{
    decode_state, deserialize_project, encode_state, serialize_project, SerializedItem,
    SerializedProject, SerializedState, STATE_VERSION,
};
pub use trash::Trash;

pub mod prelude {
    pub use crate::{
        AccentColor, Engine, EngineError, EngineOptions, EngineServices, Node, NodeKind,
        OrphanPolicy, Project, TodoItem, ROOT_ID,
    };
}
