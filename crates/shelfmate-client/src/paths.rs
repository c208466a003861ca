//! Path utilities for local data storage.

use std::fs;
use std::path::PathBuf;

use shelfmate_types::StorageFailure;

/// Directory name for data storage.
pub const DATA_DIR: &str = ".shelfmate";
/// Filename for the persisted token pair.
pub const CREDENTIALS_FILE: &str = "credentials.json";
/// Filename for the key-value store (settings, cache, session queue).
pub const STORE_FILE: &str = "store.json";
/// Filename for client configuration.
pub const CONFIG_FILE: &str = "config.json";

/// Get the data directory path, creating it if needed.
///
/// Priority:
/// 1. `SHELFMATE_DATA_DIR` environment variable
/// 2. `~/.shelfmate`
pub fn get_data_dir() -> Result<PathBuf, StorageFailure> {
    let data_dir = if let Ok(custom_dir) = std::env::var("SHELFMATE_DATA_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = dirs::home_dir().ok_or_else(|| StorageFailure::Io {
            message: "Cannot get home directory".to_string(),
        })?;
        home.join(DATA_DIR)
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|e| StorageFailure::Io {
            message: format!("Failed to create data directory: {}", e),
        })?;
    }

    Ok(data_dir)
}
