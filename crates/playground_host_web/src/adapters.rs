use playground_host::{KeyValueStore, MemoryKeyValueStore, StorageError};

use crate::WebLocalStorage;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `playground_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `playground_host_web`.
    Browser,
    /// In-memory store used for headless builds and previews without `localStorage`.
    MemoryStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "memory-host-stub")]
    {
        HostStrategy::MemoryStub
    }

    #[cfg(not(feature = "memory-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::MemoryStub => "memory-stub",
    }
}

/// Adapter enum that erases the concrete key-value backend behind [`KeyValueStore`].
#[derive(Debug, Clone)]
pub enum KeyValueStoreAdapter {
    /// Browser `localStorage`.
    Browser(WebLocalStorage),
    /// Process-local memory store.
    MemoryStub(MemoryKeyValueStore),
}

impl KeyValueStore for KeyValueStoreAdapter {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Browser(store) => store.get_item(key),
            Self::MemoryStub(store) => store.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Browser(store) => store.set_item(key, value),
            Self::MemoryStub(store) => store.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Browser(store) => store.remove_item(key),
            Self::MemoryStub(store) => store.remove_item(key),
        }
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        match self {
            Self::Browser(store) => store.entries(),
            Self::MemoryStub(store) => store.entries(),
        }
    }
}

/// Builds the key-value store for the selected host strategy.
///
/// Call once at startup and pass the result to the persistence layer.
pub fn key_value_store() -> KeyValueStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => KeyValueStoreAdapter::Browser(WebLocalStorage),
        HostStrategy::MemoryStub => {
            KeyValueStoreAdapter::MemoryStub(MemoryKeyValueStore::default())
        }
    }
}
