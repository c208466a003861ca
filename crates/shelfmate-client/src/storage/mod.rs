//! Local persistence: credentials and a general key-value store.

mod kv;
mod tokens;

pub use kv::KeyValueStore;
pub use tokens::{FileTokenStore, MemoryTokenStore, TokenStore};

use shelfmate_types::StorageFailure;
use std::path::Path;

/// Write `content` to `path` via a temp file and rename.
pub(crate) async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageFailure> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("data");
    let temp_path = path.with_file_name(format!("{}.tmp", file_name));

    if let Err(e) = tokio::fs::write(&temp_path, content).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StorageFailure::Io { message: format!("Failed to write temp file: {}", e) });
    }

    restrict_permissions(&temp_path).await?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageFailure::Io { message: format!("Failed to replace {}: {}", path.display(), e) }
    })
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), StorageFailure> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(StorageFailure::from)
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), StorageFailure> {
    Ok(())
}
