//! Browser (`wasm32`) implementations of [`playground_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer: a `localStorage`-backed
//! [`playground_host::KeyValueStore`], a DOM event presenter for storage warnings, and the
//! compile-time host strategy that picks between them and in-memory fallbacks.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod notifications;
pub mod storage;

pub use adapters::{
    host_strategy_name, key_value_store, selected_host_strategy, HostStrategy,
    KeyValueStoreAdapter,
};
pub use notifications::{WebWarningPresenter, STORAGE_WARNING_EVENT};
pub use storage::local_storage::WebLocalStorage;
