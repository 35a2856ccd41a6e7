//! File-backed storage backend.
//!
//! Each key is stored as a single JSON document in its own file under a base
//! directory, which keeps the three persisted values independently readable
//! and rewritable the way the original per-key storage was.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use insightforge_core::error::{ForgeError, Result};
use insightforge_core::store::StorageBackend;

use crate::paths::ForgePaths;

/// Storage backend writing one `<key>.json` file per key.
///
/// Writes go through a temp file and rename so a crash mid-write never
/// leaves a truncated document behind.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `base_dir`, creating the directory if needed.
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir).await.map_err(|e| {
            ForgeError::io(format!(
                "Failed to create store directory {}: {}",
                base_dir.display(),
                e
            ))
        })?;
        Ok(Self { base_dir })
    }

    /// Opens the store at the default per-user location.
    pub async fn open_default() -> Result<Self> {
        Self::new(ForgePaths::store_dir()?).await
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageBackend for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ForgeError::io(format!("Failed to read '{key}': {e}"))),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.base_dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| ForgeError::io(format!("Failed to write '{key}': {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| ForgeError::io(format!("Failed to commit '{key}': {e}")))?;
        tracing::debug!(key, path = %path.display(), "persisted value");
        Ok(())
    }
}
