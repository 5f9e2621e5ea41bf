//! Durable storage of editor records with quota fallback and corruption recovery.
//!
//! Every logical record owns two keys: the payload and a companion `-compressed` flag. The flag
//! is `"true"` only while the payload holds codec output, and the two are always written as a
//! pair. Storage failures never escape this module; callers see [`SaveOutcome`] and
//! [`LoadOutcome`] values and warnings published on the [`NotificationBus`].

use std::fmt;

use leptos::logging;
use playground_host::{KeyValueStore, NotificationBus, StorageError};
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};

use crate::{
    blocks::BlockDocument,
    codec::{CompressionCodec, DeflateBase64Codec},
    config::{deserialize_config, serialize_config, MessageConfig, SerializedMessageConfig},
    health::{HealthMonitor, StorageUsage},
};

/// Payload key of the configuration record.
pub const CONFIG_STORAGE_KEY: &str = "slack-playground-config";
/// Payload key of the block document record.
pub const BLOCKS_STORAGE_KEY: &str = "slack-playground-blocks";
/// Suffix appended to a payload key to form its compressed-flag key.
pub const COMPRESSED_SUFFIX: &str = "-compressed";
const COMPRESSED_FLAG_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Identifies one logical record.
pub struct RecordKey {
    payload_key: &'static str,
    label: &'static str,
}

impl RecordKey {
    /// The configuration record.
    pub const CONFIG: Self = Self::new(CONFIG_STORAGE_KEY, "configuration");
    /// The block document record.
    pub const BLOCKS: Self = Self::new(BLOCKS_STORAGE_KEY, "blocks");

    /// Creates a record key with a user-facing label used in warnings.
    pub const fn new(payload_key: &'static str, label: &'static str) -> Self {
        Self { payload_key, label }
    }

    /// Key holding the payload.
    pub fn payload_key(&self) -> &'static str {
        self.payload_key
    }

    /// Key holding the compressed flag.
    pub fn compressed_key(&self) -> String {
        format!("{}{COMPRESSED_SUFFIX}", self.payload_key)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.payload_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a save.
pub enum SaveOutcome {
    /// The raw payload was written.
    Saved,
    /// The raw payload hit the quota; the compressed payload was written instead.
    QuotaFallback,
    /// Nothing was written; the previously persisted record is intact.
    Abandoned(StorageError),
}

impl SaveOutcome {
    /// Returns `true` when the new value is now persisted.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Saved | Self::QuotaFallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a load.
pub enum LoadOutcome<T> {
    /// The record was present and readable.
    Loaded(T),
    /// No record is stored.
    NotFound,
    /// The stored record was unreadable and has been purged.
    Corrupted,
}

impl<T> LoadOutcome<T> {
    /// Collapses the outcome into the loaded value, if any.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::NotFound | Self::Corrupted => None,
        }
    }

    /// Maps the loaded value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadOutcome<U> {
        match self {
            Self::Loaded(value) => LoadOutcome::Loaded(f(value)),
            Self::NotFound => LoadOutcome::NotFound,
            Self::Corrupted => LoadOutcome::Corrupted,
        }
    }
}

#[derive(Debug, Clone)]
/// Save/load front end over a [`KeyValueStore`].
///
/// Construct once at startup and share by reference.
pub struct PersistenceStore<S, C = DeflateBase64Codec> {
    store: S,
    codec: C,
    bus: NotificationBus,
    health: HealthMonitor,
}

impl<S: KeyValueStore> PersistenceStore<S> {
    /// Creates a store using the default codec and health monitor.
    pub fn new(store: S, bus: NotificationBus) -> Self {
        Self {
            store,
            codec: DeflateBase64Codec::default(),
            bus,
            health: HealthMonitor::default(),
        }
    }
}

impl<S: KeyValueStore, C: CompressionCodec> PersistenceStore<S, C> {
    /// Replaces the compression codec.
    pub fn with_codec<D: CompressionCodec>(self, codec: D) -> PersistenceStore<S, D> {
        PersistenceStore {
            store: self.store,
            codec,
            bus: self.bus,
            health: self.health,
        }
    }

    /// Replaces the health monitor.
    #[must_use]
    pub fn with_health_monitor(mut self, health: HealthMonitor) -> Self {
        self.health = health;
        self
    }

    /// Underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bus receiving storage warnings.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Current usage of the underlying store.
    pub fn usage(&self) -> StorageUsage {
        self.health.usage(&self.store)
    }

    /// Saves raw JSON text under `key`, falling back to compression when over quota.
    pub fn save_text(&self, key: RecordKey, text: &str) -> SaveOutcome {
        match self.write_record(key, text, false) {
            Ok(()) => {
                self.health.check_health(&self.store, &self.bus);
                SaveOutcome::Saved
            }
            Err(err) if err.is_quota() => self.save_compressed(key, text, err),
            Err(err) => {
                logging::error!("failed to save {key}: {err}");
                SaveOutcome::Abandoned(err)
            }
        }
    }

    fn save_compressed(&self, key: RecordKey, text: &str, quota: StorageError) -> SaveOutcome {
        let token = match self.codec.compress(text) {
            Ok(token) => token,
            Err(err) => {
                logging::error!("failed to compress {key} after quota error: {err}");
                self.warn_abandoned(key);
                return SaveOutcome::Abandoned(quota);
            }
        };
        match self.write_record(key, &token, true) {
            Ok(()) => {
                logging::warn!(
                    "{key} exceeded storage quota, saved compressed ({} -> {} bytes)",
                    text.len(),
                    token.len()
                );
                self.health.check_health(&self.store, &self.bus);
                SaveOutcome::QuotaFallback
            }
            Err(err) => {
                logging::error!("failed to save compressed {key}: {err}");
                self.warn_abandoned(key);
                SaveOutcome::Abandoned(err)
            }
        }
    }

    fn warn_abandoned(&self, key: RecordKey) {
        self.bus.publish(&format!(
            "Storage is full. Unable to save {}. \
             Consider exporting your data or clearing old content.",
            key.label
        ));
    }

    /// Writes payload and flag as a pair; a failure leaves the previous pair in place.
    fn write_record(
        &self,
        key: RecordKey,
        payload: &str,
        compressed: bool,
    ) -> Result<(), StorageError> {
        let flag_key = key.compressed_key();
        let previous = self.store.get_item(key.payload_key)?;

        self.store.set_item(key.payload_key, payload)?;
        let flag_result = if compressed {
            self.store.set_item(&flag_key, COMPRESSED_FLAG_VALUE)
        } else {
            self.store.remove_item(&flag_key)
        };
        if let Err(err) = flag_result {
            let restored = match previous.as_deref() {
                Some(previous) => self.store.set_item(key.payload_key, previous),
                None => self.store.remove_item(key.payload_key),
            };
            if let Err(restore_err) = restored {
                logging::error!("failed to restore {key} after partial write: {restore_err}");
                self.purge(key);
            }
            return Err(err);
        }
        Ok(())
    }

    fn purge(&self, key: RecordKey) {
        for target in [key.payload_key.to_string(), key.compressed_key()] {
            if let Err(err) = self.store.remove_item(&target) {
                logging::error!("failed to remove {target}: {err}");
            }
        }
    }

    fn is_compressed(&self, key: RecordKey) -> bool {
        matches!(
            self.store.get_item(&key.compressed_key()),
            Ok(Some(flag)) if flag == COMPRESSED_FLAG_VALUE
        )
    }

    /// Loads the JSON text stored under `key`.
    ///
    /// Text that does not parse as JSON is purged together with its flag and reported as
    /// [`LoadOutcome::Corrupted`].
    pub fn load_text(&self, key: RecordKey) -> LoadOutcome<String> {
        let raw = match self.store.get_item(key.payload_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::NotFound,
            Err(err) => {
                logging::error!("failed to read {key}: {err}");
                return LoadOutcome::NotFound;
            }
        };
        let text = if self.is_compressed(key) {
            self.codec.decompress(&raw)
        } else {
            raw
        };
        if let Err(err) = serde_json::from_str::<IgnoredAny>(&text) {
            logging::warn!("purging corrupted {key}: {err}");
            self.purge(key);
            return LoadOutcome::Corrupted;
        }
        LoadOutcome::Loaded(text)
    }

    /// Serializes `value` and saves it under `key`.
    pub fn save_json<T: Serialize>(&self, key: RecordKey, value: &T) -> SaveOutcome {
        match serde_json::to_string(value) {
            Ok(text) => self.save_text(key, &text),
            Err(err) => {
                logging::error!("failed to encode {key}: {err}");
                SaveOutcome::Abandoned(StorageError::from_exception(
                    "EncodingError",
                    err.to_string(),
                ))
            }
        }
    }

    /// Loads and decodes the value stored under `key`.
    ///
    /// Valid JSON that does not decode into `T` is purged like unparsable text.
    pub fn load_json<T: DeserializeOwned>(&self, key: RecordKey) -> LoadOutcome<T> {
        let text = match self.load_text(key) {
            LoadOutcome::Loaded(text) => text,
            LoadOutcome::NotFound => return LoadOutcome::NotFound,
            LoadOutcome::Corrupted => return LoadOutcome::Corrupted,
        };
        match serde_json::from_str(&text) {
            Ok(value) => LoadOutcome::Loaded(value),
            Err(err) => {
                logging::warn!("purging undecodable {key}: {err}");
                self.purge(key);
                LoadOutcome::Corrupted
            }
        }
    }

    /// Saves the configuration record.
    pub fn save_config(&self, config: &MessageConfig) -> SaveOutcome {
        self.save_json(RecordKey::CONFIG, &serialize_config(config))
    }

    /// Loads the configuration record.
    pub fn load_config(&self) -> LoadOutcome<MessageConfig> {
        self.load_json::<SerializedMessageConfig>(RecordKey::CONFIG)
            .map(deserialize_config)
    }

    /// Saves the block document record.
    pub fn save_blocks(&self, blocks: &BlockDocument) -> SaveOutcome {
        self.save_json(RecordKey::BLOCKS, blocks)
    }

    /// Loads the block document record.
    pub fn load_blocks(&self) -> LoadOutcome<BlockDocument> {
        self.load_json(RecordKey::BLOCKS)
    }

    /// Deletes a record and its flag.
    pub fn clear_record(&self, key: RecordKey) {
        self.purge(key);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use playground_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{codec::CodecError, config::default_config};

    fn recorded(bus: &NotificationBus) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |message| sink.borrow_mut().push(message.to_string()));
        seen
    }

    fn fixture() -> (MemoryKeyValueStore, PersistenceStore<MemoryKeyValueStore>) {
        let memory = MemoryKeyValueStore::default();
        let persistence = PersistenceStore::new(memory.clone(), NotificationBus::default());
        (memory, persistence)
    }

    #[test]
    fn compressed_key_appends_suffix() {
        assert_eq!(
            RecordKey::CONFIG.compressed_key(),
            "slack-playground-config-compressed"
        );
        assert_eq!(
            RecordKey::BLOCKS.compressed_key(),
            "slack-playground-blocks-compressed"
        );
    }

    #[test]
    fn save_then_load_returns_same_text() {
        let (memory, persistence) = fixture();
        let text = "{\"a\":[1,2,3]}";

        assert_eq!(persistence.save_text(RecordKey::BLOCKS, text), SaveOutcome::Saved);
        assert_eq!(
            persistence.load_text(RecordKey::BLOCKS),
            LoadOutcome::Loaded(text.to_string())
        );
        assert_eq!(
            memory.get_item("slack-playground-blocks-compressed").expect("read"),
            None
        );
    }

    #[test]
    fn missing_record_is_not_found() {
        let (_, persistence) = fixture();
        assert_eq!(persistence.load_text(RecordKey::CONFIG), LoadOutcome::NotFound);
        assert_eq!(persistence.load_config(), LoadOutcome::NotFound);
    }

    #[test]
    fn quota_error_retries_with_compression() {
        let (memory, persistence) = fixture();
        let text = json!({"blocks": vec!["repeated text"; 100]}).to_string();
        memory.fail_next_write(StorageError::from_exception("NS_ERROR_DOM_QUOTA_REACHED", ""));

        assert_eq!(
            persistence.save_text(RecordKey::BLOCKS, &text),
            SaveOutcome::QuotaFallback
        );
        assert_eq!(
            memory.get_item(&RecordKey::BLOCKS.compressed_key()).expect("read"),
            Some("true".to_string())
        );
        assert_ne!(
            memory.get_item(RecordKey::BLOCKS.payload_key()).expect("read"),
            Some(text.clone())
        );
        assert_eq!(persistence.load_text(RecordKey::BLOCKS), LoadOutcome::Loaded(text));
    }

    #[test]
    fn later_raw_save_clears_compressed_flag() {
        let (memory, persistence) = fixture();
        memory.fail_next_write(StorageError::quota_exceeded());
        assert_eq!(
            persistence.save_text(RecordKey::CONFIG, "{\"v\":1}"),
            SaveOutcome::QuotaFallback
        );

        assert_eq!(persistence.save_text(RecordKey::CONFIG, "{\"v\":2}"), SaveOutcome::Saved);
        assert_eq!(
            memory.get_item(&RecordKey::CONFIG.compressed_key()).expect("read"),
            None
        );
        assert_eq!(
            persistence.load_text(RecordKey::CONFIG),
            LoadOutcome::Loaded("{\"v\":2}".to_string())
        );
    }

    #[test]
    fn failed_compressed_write_keeps_previous_record_and_warns() {
        let (memory, persistence) = fixture();
        let seen = recorded(persistence.bus());
        persistence.save_text(RecordKey::CONFIG, "{\"v\":\"old\"}");

        memory.fail_next_write(StorageError::quota_exceeded());
        memory.fail_next_write(StorageError::quota_exceeded());
        let outcome = persistence.save_text(RecordKey::CONFIG, "{\"v\":\"new\"}");

        assert_eq!(outcome, SaveOutcome::Abandoned(StorageError::quota_exceeded()));
        assert!(!outcome.is_persisted());
        assert_eq!(
            persistence.load_text(RecordKey::CONFIG),
            LoadOutcome::Loaded("{\"v\":\"old\"}".to_string())
        );
        assert_eq!(seen.borrow().len(), 1);
        assert!(seen.borrow()[0].contains("configuration"));
    }

    #[test]
    fn unexpected_error_abandons_without_retry_or_warning() {
        let (memory, persistence) = fixture();
        let seen = recorded(persistence.bus());
        let failure = StorageError::from_exception("SecurityError", "blocked");
        memory.fail_next_write(failure.clone());

        assert_eq!(
            persistence.save_text(RecordKey::BLOCKS, "[]"),
            SaveOutcome::Abandoned(failure)
        );
        assert!(memory.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn failed_flag_write_restores_previous_payload() {
        let (memory, persistence) = fixture();
        persistence.save_text(RecordKey::BLOCKS, "[\"old\"]");

        memory.fail_next_write(StorageError::quota_exceeded());
        memory.fail_next_write_to(
            &RecordKey::BLOCKS.compressed_key(),
            StorageError::from_exception("InvalidStateError", "flag"),
        );
        let outcome = persistence.save_text(RecordKey::BLOCKS, "[\"new\"]");

        assert!(matches!(
            outcome,
            SaveOutcome::Abandoned(StorageError::Other { .. })
        ));
        assert_eq!(
            memory.get_item(RecordKey::BLOCKS.payload_key()).expect("read"),
            Some("[\"old\"]".to_string())
        );
        assert_eq!(
            memory.get_item(&RecordKey::BLOCKS.compressed_key()).expect("read"),
            None
        );
    }

    #[test]
    fn corrupted_payload_is_purged() {
        let (memory, persistence) = fixture();
        memory
            .set_item(RecordKey::CONFIG.payload_key(), "{not json")
            .expect("seed");

        assert_eq!(persistence.load_text(RecordKey::CONFIG), LoadOutcome::Corrupted);
        assert_eq!(memory.get_item(RecordKey::CONFIG.payload_key()).expect("read"), None);
        assert_eq!(
            memory.get_item(&RecordKey::CONFIG.compressed_key()).expect("read"),
            None
        );
        assert_eq!(persistence.load_text(RecordKey::CONFIG), LoadOutcome::NotFound);
    }

    #[test]
    fn corrupted_compressed_payload_is_purged_with_flag() {
        let (memory, persistence) = fixture();
        memory
            .set_item(RecordKey::BLOCKS.payload_key(), "@@not a token@@")
            .expect("seed");
        memory
            .set_item(&RecordKey::BLOCKS.compressed_key(), "true")
            .expect("seed");

        assert_eq!(persistence.load_blocks(), LoadOutcome::Corrupted);
        assert!(memory.is_empty());
    }

    #[test]
    fn flagged_raw_json_falls_back_to_raw_text() {
        let (memory, persistence) = fixture();
        memory
            .set_item(RecordKey::BLOCKS.payload_key(), "[1,2]")
            .expect("seed");
        memory
            .set_item(&RecordKey::BLOCKS.compressed_key(), "true")
            .expect("seed");

        assert_eq!(
            persistence.load_text(RecordKey::BLOCKS),
            LoadOutcome::Loaded("[1,2]".to_string())
        );
    }

    #[test]
    fn undecodable_config_is_purged() {
        let (memory, persistence) = fixture();
        memory
            .set_item(RecordKey::CONFIG.payload_key(), "{\"name\":\"x\",\"theme\":\"sepia\"}")
            .expect("seed");

        assert_eq!(persistence.load_config(), LoadOutcome::Corrupted);
        assert!(memory.is_empty());
    }

    #[test]
    fn config_round_trips_through_storage() {
        let (_, persistence) = fixture();
        let config = default_config();

        assert!(persistence.save_config(&config).is_persisted());
        assert_eq!(persistence.load_config(), LoadOutcome::Loaded(config));
    }

    #[test]
    fn successful_save_runs_health_check() {
        let memory = MemoryKeyValueStore::default();
        let bus = NotificationBus::default();
        let seen = recorded(&bus);
        let persistence =
            PersistenceStore::new(memory, bus).with_health_monitor(HealthMonitor::new(100));

        persistence.save_text(RecordKey::BLOCKS, &json!(["x".repeat(80)]).to_string());
        assert_eq!(seen.borrow().len(), 1);
        assert!(seen.borrow()[0].starts_with("Storage is "));
    }

    #[test]
    fn clear_record_removes_payload_and_flag() {
        let (memory, persistence) = fixture();
        memory.fail_next_write(StorageError::quota_exceeded());
        persistence.save_text(RecordKey::CONFIG, "{}");
        assert_eq!(memory.len(), 2);

        persistence.clear_record(RecordKey::CONFIG);
        assert!(memory.is_empty());
    }

    struct BrokenCodec;

    impl CompressionCodec for BrokenCodec {
        fn compress(&self, _text: &str) -> Result<String, CodecError> {
            Err(CodecError::Io(std::io::Error::other("encoder offline")))
        }

        fn decompress(&self, token: &str) -> String {
            token.to_string()
        }
    }

    #[test]
    fn codec_failure_abandons_with_original_quota_error() {
        let memory = MemoryKeyValueStore::default();
        let bus = NotificationBus::default();
        let seen = recorded(&bus);
        let persistence = PersistenceStore::new(memory.clone(), bus).with_codec(BrokenCodec);
        memory.fail_next_write(StorageError::quota_exceeded());

        assert_eq!(
            persistence.save_text(RecordKey::CONFIG, "{}"),
            SaveOutcome::Abandoned(StorageError::quota_exceeded())
        );
        assert!(memory.is_empty());
        assert_eq!(seen.borrow().len(), 1);
    }
}
