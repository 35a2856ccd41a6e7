//! Persistent key-value store boundary.
//!
//! The application persists a handful of named values (session user, theme,
//! history). `StorageBackend` is the raw text-in/text-out seam implemented by
//! the infrastructure layer; `Store` layers JSON encoding and the
//! default-on-corrupt read contract on top of it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Names of the persisted values.
///
/// These match the storage keys of the original web build so exported data
/// stays recognizable.
pub mod keys {
    pub const USER: &str = "insightforge-user";
    pub const THEME: &str = "insightforge-theme";
    pub const HISTORY: &str = "insightforge-history";
}

/// Raw storage backend for named text values.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the stored text for `key`, or `None` if it was never written.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Typed store over a [`StorageBackend`].
///
/// Reads never fail: a missing key, an unreadable backend, or stored text
/// that no longer parses all yield the caller-supplied default so a corrupt
/// store can never break startup. Writes propagate backend errors.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
}

impl Store {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Reads and decodes the value stored under `key`, falling back to
    /// `default` when the key is absent or the stored text is unusable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.read(key).await {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "stored value is not parseable, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, using default");
                default
            }
        }
    }

    /// Encodes `value` as JSON and writes it under `key`.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.backend.write(key, &text).await
    }
}
