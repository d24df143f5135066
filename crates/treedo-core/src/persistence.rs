//! Serial, fire-and-forget persistence of whole-state snapshots.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

use crate::platform::{StorageBackend, StorageError};
use crate::serialize::{decode_state, encode_state, SerializedState};
use crate::EngineError;

/// Key under which the whole application state is stored.
pub const DEFAULT_STORAGE_KEY: &str = "app-state";

/// Counters describing what the worker has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued: u64,
    pub written: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Progress {
    pending: usize,
    stats: QueueStats,
}

struct Shared {
    progress: Mutex<Progress>,
    drained: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Progress> {
        match self.progress.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Funnels snapshot writes through one worker thread.
///
/// [`save_state`](Self::save_state) encodes the snapshot on the caller's
/// thread and returns at once. The worker issues one `set` at a time in
/// enqueue order, so the backend never sees concurrent or reordered writes and
/// ends up holding the most recently enqueued state.
pub struct PersistenceQueue {
    backend: Arc<dyn StorageBackend>,
    key: String,
    sender: Option<Sender<Vec<u8>>>,
    worker: Option<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl PersistenceQueue {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        let key = key.into();
        let shared = Arc::new(Shared {
            progress: Mutex::new(Progress::default()),
            drained: Condvar::new(),
        });
        let (sender, receiver) = unbounded::<Vec<u8>>();
        let worker_backend = Arc::clone(&backend);
        let worker_shared = Arc::clone(&shared);
        let worker_key = key.clone();
        let worker = thread::Builder::new()
            .name("treedo-persistence".into())
            .spawn(move || {
                for blob in receiver.iter() {
                    let result = store(worker_backend.as_ref(), &worker_key, &blob);
                    let mut progress = worker_shared.lock();
                    match result {
                        Ok(()) => progress.stats.written += 1,
                        Err(err) => {
                            progress.stats.failed += 1;
                            log::error!("failed to persist state ({} bytes): {err}", blob.len());
                        }
                    }
                    progress.pending -= 1;
                    if progress.pending == 0 {
                        worker_shared.drained.notify_all();
                    }
                }
            });
        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::error!("could not start persistence worker: {err}");
                None
            }
        };
        Self {
            backend,
            key,
            sender: worker.as_ref().map(|_| sender),
            worker,
            shared,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and decodes the stored state, if any.
    pub fn load(&self) -> Result<Option<SerializedState>, EngineError> {
        match self.backend.get(&self.key)? {
            Some(blob) => decode_state(&blob).map(Some),
            None => Ok(None),
        }
    }

    /// Enqueues a snapshot for writing without waiting for it.
    pub fn save_state(&self, state: &SerializedState) {
        let blob = match encode_state(state) {
            Ok(blob) => blob,
            Err(err) => {
                log::error!("failed to encode state snapshot: {err}");
                return;
            }
        };
        let Some(sender) = &self.sender else {
            self.write_inline(&blob);
            return;
        };
        {
            let mut progress = self.shared.lock();
            progress.pending += 1;
            progress.stats.enqueued += 1;
        }
        if let Err(err) = sender.send(blob) {
            let mut progress = self.shared.lock();
            progress.pending -= 1;
            log::error!("persistence worker is gone; dropping snapshot: {err}");
        }
    }

    /// Blocks until every enqueued snapshot has been handed to the backend.
    pub fn flush(&self) {
        let mut progress = self.shared.lock();
        while progress.pending > 0 {
            progress = match self.shared.drained.wait(progress) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    pub fn stats(&self) -> QueueStats {
        self.shared.lock().stats
    }

    fn write_inline(&self, blob: &[u8]) {
        let result = store(self.backend.as_ref(), &self.key, blob);
        let mut progress = self.shared.lock();
        progress.stats.enqueued += 1;
        match result {
            Ok(()) => progress.stats.written += 1,
            Err(err) => {
                progress.stats.failed += 1;
                log::error!("failed to persist state: {err}");
            }
        }
    }
}

/// Hands one blob to the backend. A panicking backend counts as a failed
/// write so the pending count still drains.
fn store(backend: &dyn StorageBackend, key: &str, blob: &[u8]) -> Result<(), StorageError> {
    panic::catch_unwind(AssertUnwindSafe(|| backend.set(key, blob))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "storage backend panicked".to_string());
        Err(StorageError::Unavailable { reason })
    })
}

impl Drop for PersistenceQueue {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("persistence worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for PersistenceQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceQueue")
            .field("key", &self.key)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/persistence_tests.rs"]
mod tests;
