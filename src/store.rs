//! Keyed entity storage for sessions and deployments.
//!
//! `Store<T>` is the seam for swapping the backing datastore; the in-memory
//! implementation is what the service runs with. `KeyedLocks` serializes
//! mutations of one entity without blocking any other entity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode entity: {0}")]
    Encoding(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key/value storage for one entity type
#[async_trait]
pub trait Store<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Load an entity by id
    async fn get(&self, id: &str) -> StoreResult<Option<T>>;

    /// Insert or replace an entity
    async fn put(&self, id: &str, value: T) -> StoreResult<()>;

    /// Remove an entity, returning whether it existed
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Number of stored entities
    async fn len(&self) -> StoreResult<usize>;
}

/// In-memory store backed by a `RwLock<HashMap>`
pub struct MemoryStore<T> {
    entries: RwLock<HashMap<String, T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, value: T) -> StoreResult<()> {
        self.entries.write().await.insert(id.to_string(), value);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self.entries.write().await.remove(id).is_some())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

/// Per-key async mutexes.
///
/// The outer map lock is only held long enough to fetch, insert or prune the
/// key's mutex, so holders of different keys never wait on each other. An
/// entry lives only while some caller holds or waits for its key.
#[derive(Default)]
pub struct KeyedLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> KeyGuard<'_> {
        let lock = self
            .table()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyGuard {
            owner: self,
            key: key.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        // The map holds no invariant a panicking holder could break
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clones only happen under the table lock, so a count of one means
    /// nobody else holds or waits for the key.
    fn release(&self, key: &str) {
        let mut table = self.table();
        if table
            .get(key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.table().len()
    }
}

/// Exclusive access to one key, released on drop
pub struct KeyGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Drop the inner guard first so its Arc no longer counts
        self.guard.take();
        self.owner.release(&self.key);
    }
}
