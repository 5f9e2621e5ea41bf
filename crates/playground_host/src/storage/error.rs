//! Storage failure taxonomy shared by every [`KeyValueStore`](super::key_value::KeyValueStore) adapter.

use thiserror::Error;

/// Exception name raised by standards-compliant browsers when a write exceeds the origin quota.
pub const QUOTA_EXCEEDED_ERROR_NAME: &str = "QuotaExceededError";
/// Exception name raised by Gecko-based browsers when the storage quota is reached.
pub const QUOTA_REACHED_ERROR_NAME: &str = "NS_ERROR_DOM_QUOTA_REACHED";
/// Legacy WebKit constant name for the quota exception.
pub const LEGACY_QUOTA_ERROR_NAME: &str = "QUOTA_EXCEEDED_ERR";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failure reported by a key-value store operation.
pub enum StorageError {
    /// The store refused the write because its capacity ceiling is reached.
    #[error("storage quota exceeded ({name})")]
    Quota {
        /// Exception name reported by the host.
        name: String,
    },
    /// The backing store is not reachable from the current host.
    #[error("storage unavailable")]
    Unavailable,
    /// Any other host failure.
    #[error("storage operation failed ({name}): {message}")]
    Other {
        /// Exception name reported by the host, when one exists.
        name: String,
        /// Host-provided failure description.
        message: String,
    },
}

impl StorageError {
    /// Classifies a host exception by name.
    ///
    /// Only the known quota exception names map to [`StorageError::Quota`]; everything else is
    /// reported as [`StorageError::Other`].
    pub fn from_exception(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        if is_quota_error_name(&name) {
            Self::Quota { name }
        } else {
            Self::Other {
                name,
                message: message.into(),
            }
        }
    }

    /// Builds the quota error a standards-compliant browser would raise.
    pub fn quota_exceeded() -> Self {
        Self::Quota {
            name: QUOTA_EXCEEDED_ERROR_NAME.to_string(),
        }
    }

    /// Returns `true` when the store rejected a write for capacity reasons.
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::Quota { .. })
    }
}

/// Returns `true` when `name` is one of the exception names browsers use for quota failures.
pub fn is_quota_error_name(name: &str) -> bool {
    matches!(
        name,
        QUOTA_EXCEEDED_ERROR_NAME | QUOTA_REACHED_ERROR_NAME | LEGACY_QUOTA_ERROR_NAME
    )
}
