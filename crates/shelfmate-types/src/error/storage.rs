//! Local persistence failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by the token store and key-value store.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details", rename_all = "snake_case")]
pub enum StorageFailure {
    /// Filesystem operation failed
    #[error("Storage error: {message}")]
    Io {
        /// Underlying I/O error
        message: String,
    },

    /// Stored value could not be decoded
    #[error("Stored value for '{key}' is corrupted: {message}")]
    Corrupted {
        /// Key whose value failed to decode
        key: String,
        /// Decoder error
        message: String,
    },
}

impl StorageFailure {
    /// Stable category tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Io { .. } => "storage.io",
            Self::Corrupted { .. } => "storage.corrupted",
        }
    }
}

impl From<std::io::Error> for StorageFailure {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}
