//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use insightforge_core::error::Result;
use insightforge_core::store::StorageBackend;

/// Storage backend holding values in a process-local map.
///
/// Used as the fallback when the on-disk store cannot be opened (nothing
/// survives the process, but the application stays usable) and as the test
/// double for everything above the storage boundary.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.read("k").await.unwrap(), None);
        store.write("k", "v").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("v"));
        store.write("k", "w").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("w"));
    }
}
