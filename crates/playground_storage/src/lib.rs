//! Persistence core for the message layout playground.
//!
//! This crate owns the editor's two durable records, the message configuration and the block
//! document, and everything that keeps them readable: a storage-safe configuration form, a
//! structural validator for hand-edited JSON, quota fallback through compression, corruption
//! purge on load, and usage warnings published on a [`NotificationBus`].
//!
//! # Example
//!
//! ```rust
//! use playground_storage::{
//!     MemoryKeyValueStore, NotificationBus, PersistenceStore, PlaygroundSession, SaveOutcome,
//! };
//!
//! let memory = MemoryKeyValueStore::default();
//! let persistence = PersistenceStore::new(memory.clone(), NotificationBus::default());
//! let mut session = PlaygroundSession::boot(persistence);
//! assert_eq!(session.config().name, "Acme Bot");
//!
//! let outcome = session
//!     .apply_config_json(r#"{"name": "Release Bot"}"#)
//!     .expect("valid configuration");
//! assert_eq!(outcome, SaveOutcome::Saved);
//! assert_eq!(memory.len(), 1);
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod blocks;
pub mod codec;
pub mod config;
pub mod health;
pub mod persistence;
pub mod presets;
pub mod session;
pub mod validation;

pub use blocks::{sample_blocks, BlockDocument, BlockDocumentError};
pub use codec::{CodecError, CompressionCodec, DeflateBase64Codec};
pub use config::{
    config_to_pretty_json, default_config, deserialize_config, format_timestamp,
    parse_timestamp, serialize_config, ConfigData, DirectoryEntry, MessageConfig,
    SerializedMessageConfig, Theme,
};
pub use health::{
    format_bytes, HealthMonitor, StorageUsage, DEFAULT_STORAGE_LIMIT_BYTES,
    DEFAULT_WARNING_THRESHOLD_PERCENT,
};
pub use persistence::{
    LoadOutcome, PersistenceStore, RecordKey, SaveOutcome, BLOCKS_STORAGE_KEY,
    COMPRESSED_SUFFIX, CONFIG_STORAGE_KEY,
};
pub use playground_host::{
    KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore, NotificationBus, StorageError,
    SubscriptionId,
};
pub use playground_host_web::{KeyValueStoreAdapter, WebWarningPresenter, STORAGE_WARNING_EVENT};
pub use presets::{config_presets, find_preset, ConfigPreset, DEFAULT_PRESET_ID};
pub use session::PlaygroundSession;
pub use validation::{
    check_config_json, is_valid_url, parse_config_json, validate_config_json, SchemaViolation,
    ValidationReport,
};

/// Builds the persistence store for the current host strategy.
///
/// Warnings published on `bus` are also dispatched as DOM events so page scripts can surface
/// them.
pub fn browser_persistence(bus: NotificationBus) -> PersistenceStore<KeyValueStoreAdapter> {
    WebWarningPresenter.attach(&bus);
    leptos::logging::log!(
        "playground storage host strategy: {}",
        playground_host_web::host_strategy_name()
    );
    PersistenceStore::new(playground_host_web::key_value_store(), bus)
}

/// Boots an editor session backed by the current host strategy.
pub fn boot_browser_session(bus: NotificationBus) -> PlaygroundSession<KeyValueStoreAdapter> {
    PlaygroundSession::boot(browser_persistence(bus))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn browser_session_boots_with_defaults_off_wasm() {
        let bus = NotificationBus::default();
        let session = boot_browser_session(bus.clone());
        assert_eq!(session.config().name, "Acme Bot");
        assert_eq!(session.blocks(), &sample_blocks());
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn browser_persistence_forwards_bus_messages() {
        let bus = NotificationBus::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |message| sink.borrow_mut().push(message.to_string()));

        let persistence = browser_persistence(bus);
        assert_eq!(persistence.bus().publish("hello"), 2);
        assert_eq!(seen.borrow().as_slice(), ["hello".to_string()]);
    }
}
