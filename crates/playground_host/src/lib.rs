//! Typed host contracts shared by the playground persistence layer and its browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the synchronous
//! key-value storage contract and its failure taxonomy, the warning notification bus, and time
//! helpers, while concrete browser adapters live in `playground_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod notifications;
pub mod storage;
pub mod time;

pub use notifications::bus::{NotificationBus, SubscriptionId};
pub use storage::error::{
    is_quota_error_name, StorageError, LEGACY_QUOTA_ERROR_NAME, QUOTA_EXCEEDED_ERROR_NAME,
    QUOTA_REACHED_ERROR_NAME,
};
pub use storage::key_value::{KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore};
pub use time::{current_timestamp, unix_time_ms_now};
