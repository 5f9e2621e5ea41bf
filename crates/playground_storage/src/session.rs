//! Editor session state hydrated from storage at boot and persisted on every change.

use leptos::logging;
use playground_host::KeyValueStore;

use crate::{
    blocks::{sample_blocks, BlockDocument, BlockDocumentError},
    codec::{CompressionCodec, DeflateBase64Codec},
    config::{config_to_pretty_json, default_config, MessageConfig},
    persistence::{LoadOutcome, PersistenceStore, RecordKey, SaveOutcome},
    presets::{find_preset, DEFAULT_PRESET_ID},
    validation::{parse_config_json, SchemaViolation},
};

#[derive(Debug)]
/// Current configuration and block document of one editor.
///
/// Every mutation is written through the owned [`PersistenceStore`]. A failed save never rolls
/// back the in-memory value; the editor keeps working and storage catches up on the next save.
pub struct PlaygroundSession<S, C = DeflateBase64Codec> {
    persistence: PersistenceStore<S, C>,
    config: MessageConfig,
    blocks: BlockDocument,
}

impl<S: KeyValueStore, C: CompressionCodec> PlaygroundSession<S, C> {
    /// Hydrates a session, substituting built-in defaults for missing or corrupted records.
    pub fn boot(persistence: PersistenceStore<S, C>) -> Self {
        let config = match persistence.load_config() {
            LoadOutcome::Loaded(config) => config,
            LoadOutcome::NotFound => default_config(),
            LoadOutcome::Corrupted => {
                logging::warn!("stored configuration was corrupted; using defaults");
                default_config()
            }
        };
        let blocks = match persistence.load_blocks() {
            LoadOutcome::Loaded(blocks) => blocks,
            LoadOutcome::NotFound => sample_blocks(),
            LoadOutcome::Corrupted => {
                logging::warn!("stored blocks were corrupted; using sample blocks");
                sample_blocks()
            }
        };
        Self {
            persistence,
            config,
            blocks,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    /// Current block document.
    pub fn blocks(&self) -> &BlockDocument {
        &self.blocks
    }

    /// Underlying persistence store.
    pub fn persistence(&self) -> &PersistenceStore<S, C> {
        &self.persistence
    }

    /// Current configuration as editor text.
    ///
    /// # Errors
    ///
    /// Returns an error when JSON encoding fails.
    pub fn config_json(&self) -> Result<String, serde_json::Error> {
        config_to_pretty_json(&self.config)
    }

    /// Applies an in-place edit to the configuration and persists the result.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut MessageConfig)) -> SaveOutcome {
        edit(&mut self.config);
        self.persistence.save_config(&self.config)
    }

    /// Validates editor text and, when it passes, replaces and persists the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violation; the current configuration and storage are untouched.
    pub fn apply_config_json(&mut self, text: &str) -> Result<SaveOutcome, SchemaViolation> {
        let config = parse_config_json(text)?;
        self.config = config;
        Ok(self.persistence.save_config(&self.config))
    }

    /// Replaces the configuration with a built-in preset.
    ///
    /// Returns `None` for an unknown preset id.
    pub fn apply_preset(&mut self, id: &str) -> Option<SaveOutcome> {
        let preset = find_preset(id)?;
        self.config = preset.config;
        Some(self.persistence.save_config(&self.config))
    }

    /// Deletes the stored configuration and persists the default preset in its place.
    pub fn reset_to_defaults(&mut self) -> SaveOutcome {
        self.persistence.clear_record(RecordKey::CONFIG);
        self.config = find_preset(DEFAULT_PRESET_ID)
            .map(|preset| preset.config)
            .unwrap_or_else(default_config);
        self.persistence.save_config(&self.config)
    }

    /// Replaces and persists the block document.
    pub fn set_blocks(&mut self, blocks: BlockDocument) -> SaveOutcome {
        self.blocks = blocks;
        self.persistence.save_blocks(&self.blocks)
    }

    /// Parses editor text into a block document and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a JSON array or object; nothing changes.
    pub fn set_blocks_json(&mut self, text: &str) -> Result<SaveOutcome, BlockDocumentError> {
        let blocks = BlockDocument::parse(text)?;
        Ok(self.set_blocks(blocks))
    }
}
