use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

/// Outcome of making sure the database file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageStatus {
    /// The file was already there.
    Existing,
    /// The file (and any missing parent directories) was created empty.
    Created,
    /// Creation failed; later writes to this path will likely fail as well.
    Unavailable(String),
}

impl StorageStatus {
    pub fn is_available(&self) -> bool {
        !matches!(self, StorageStatus::Unavailable(_))
    }
}

/// Ensure the file at `path` and its parent directories exist.
///
/// Failures are logged and reported through the returned status, never as an error.
pub async fn prepare_storage(path: &Path) -> StorageStatus {
    if fs::metadata(path).await.is_ok() {
        return StorageStatus::Existing;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), error = %e, "cannot create storage directory");
            return StorageStatus::Unavailable(e.to_string());
        }
    }

    match fs::write(path, b"").await {
        Ok(()) => {
            info!(path = %path.display(), "created empty database file");
            StorageStatus::Created
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot create database file");
            StorageStatus::Unavailable(e.to_string())
        }
    }
}
