//! Synchronous key-value storage contracts and adapters.
//!
//! The contract mirrors the browser `Storage` interface: string keys, string values, and
//! synchronous calls that either complete or fail immediately. Adapters are constructed once at
//! startup and handed to the persistence layer explicitly.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use super::error::StorageError;

/// Host service for string values stored per key.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Quota`] when the write would exceed capacity, or another variant
    /// when the backing store fails.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Returns every key/value pair currently held by the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be enumerated.
    fn entries(&self) -> Result<Vec<(String, String)>, StorageError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets; reads are empty and writes are dropped.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    items: HashMap<String, String>,
    capacity_bytes: Option<usize>,
    pending_write_failures: VecDeque<StorageError>,
    pending_key_failures: HashMap<String, StorageError>,
}

impl MemoryState {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .items
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string.
///
/// Clones share the same underlying map. An optional byte capacity makes writes that would
/// exceed it fail with [`StorageError::Quota`], the same way a browser origin quota does.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<MemoryState>>,
}

impl MemoryKeyValueStore {
    /// Creates a store whose total key + value bytes may not exceed `capacity_bytes`.
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().capacity_bytes = Some(capacity_bytes);
        store
    }

    /// Queues `error` to be returned by the next [`KeyValueStore::set_item`] call.
    ///
    /// Queued failures are consumed in order, one per write, before capacity is considered.
    pub fn fail_next_write(&self, error: StorageError) {
        self.inner
            .borrow_mut()
            .pending_write_failures
            .push_back(error);
    }

    /// Makes the next [`KeyValueStore::set_item`] call for `key` fail with `error`.
    ///
    /// Key-specific failures take precedence over [`Self::fail_next_write`].
    pub fn fail_next_write_to(&self, key: &str, error: StorageError) {
        self.inner
            .borrow_mut()
            .pending_key_failures
            .insert(key.to_string(), error);
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = self.inner.borrow_mut();
        if let Some(error) = state.pending_key_failures.remove(key) {
            return Err(error);
        }
        if let Some(error) = state.pending_write_failures.pop_front() {
            return Err(error);
        }
        if let Some(capacity) = state.capacity_bytes {
            if state.used_bytes_with(key, value) > capacity {
                return Err(StorageError::quota_exceeded());
            }
        }
        state.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().items.remove(key);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut entries = self
            .inner
            .borrow()
            .items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        entries.sort();
        Ok(entries)
    }
}
