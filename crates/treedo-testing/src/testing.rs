use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use treedo_core::{
    Clock, Engine, EngineOptions, EngineServices, IdGenerator, StorageBackend, StorageError,
    TodoItem,
};
use treedo_render_common::{FixedAdvanceMetrics, RecordingSurface};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory storage that remembers every write in order.
#[derive(Default)]
pub struct RecordingStorage {
    writes: Mutex<Vec<(String, Vec<u8>)>>,
    preset: Mutex<Option<Vec<u8>>>,
}

impl RecordingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Storage whose first `get` for any key returns `blob`.
    pub fn with_blob(blob: Vec<u8>) -> Arc<Self> {
        let storage = Self::default();
        *lock(&storage.preset) = Some(blob);
        Arc::new(storage)
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        lock(&self.writes).clone()
    }

    pub fn write_count(&self) -> usize {
        lock(&self.writes).len()
    }

    pub fn last_blob(&self) -> Option<Vec<u8>> {
        lock(&self.writes).last().map(|(_, blob)| blob.clone())
    }
}

impl StorageBackend for RecordingStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let latest = lock(&self.writes)
            .iter()
            .rev()
            .find(|(written, _)| written == key)
            .map(|(_, blob)| blob.clone());
        Ok(latest.or_else(|| lock(&self.preset).clone()))
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), StorageError> {
        lock(&self.writes).push((key.to_string(), blob.to_vec()));
        Ok(())
    }
}

/// Storage whose writes block until [`open`](Self::open) is called, and which
/// tracks how many writes were ever in flight at once.
#[derive(Default)]
pub struct GatedStorage {
    open: Mutex<bool>,
    opened: Condvar,
    inner: RecordingStorage,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl GatedStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open(&self) {
        *lock(&self.open) = true;
        self.opened.notify_all();
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.inner.writes()
    }
}

impl StorageBackend for GatedStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), StorageError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let mut open = lock(&self.open);
        while !*open {
            open = self
                .opened
                .wait(open)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        drop(open);
        let result = self.inner.set(key, blob);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Storage where reads find nothing and every write fails.
#[derive(Default)]
pub struct FailingStorage {
    attempts: AtomicUsize,
}

impl FailingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl StorageBackend for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _blob: &[u8]) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Io {
            reason: "disk full".into(),
        })
    }
}

/// Ids `"<prefix>-1"`, `"<prefix>-2"`, ...
#[derive(Clone, Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Deterministic services around `storage`.
pub fn services(storage: Arc<dyn StorageBackend>) -> EngineServices {
    EngineServices::new(storage, SequentialIds::default(), FixedClock(1_700_000_000_000))
}

/// A hydrated engine with a selected project named `name`.
pub fn engine_with_project(storage: Arc<dyn StorageBackend>, name: &str) -> Engine {
    engine_with_options(storage, name, EngineOptions::default())
}

pub fn engine_with_options(storage: Arc<dyn StorageBackend>, name: &str, options: EngineOptions) -> Engine {
    let mut engine = Engine::with_options(services(storage), options);
    engine.hydrate().expect("fresh storage hydrates");
    let id = engine.add_project(name).expect("hydrated engine accepts projects");
    engine.set_project(&id).expect("project was just added");
    engine
}

/// Adds an item whose id and text are both `id`.
pub fn add_item(engine: &mut Engine, id: &str, parent: &str) {
    engine
        .add_todo_item(TodoItem::new(id, id, 0), parent)
        .expect("item can be added");
}

/// Child ids of `id` in the current project.
pub fn child_ids(engine: &Engine, id: &str) -> Vec<String> {
    engine
        .current_project()
        .and_then(|project| project.children_of(id))
        .map(|children| children.iter().cloned().collect())
        .unwrap_or_default()
}

/// Recording surface measuring every character as half the font size wide.
pub fn recording_surface() -> RecordingSurface {
    RecordingSurface::with_measurer(FixedAdvanceMetrics::default())
}

