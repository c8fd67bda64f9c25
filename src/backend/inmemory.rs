//! In-memory storage backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Nothing is persisted beyond the process lifetime; use
//! [`super::JsonFileBackend`] when the data must survive restarts.

use super::StorageBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory storage backend.
///
/// Uses DashMap for lock-free concurrent access with fine-grained per-key
/// sharding. No async locks required - operations are non-blocking. Clones
/// share the same underlying map.
///
/// # Example
///
/// ```no_run
/// use booking_kit::backend::{InMemoryBackend, StorageBackend};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set("services_v1", "[]".to_string()).await?;
///     let value = backend.get("services_v1").await?;
///     assert_eq!(value.as_deref(), Some("[]"));
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, String>>,
}

impl InMemoryBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of stored keys.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the backend holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.store.get(key) {
            Some(entry) => {
                debug!("✓ InMemory GET {} -> HIT", key);
                Ok(Some(entry.clone()))
            }
            None => {
                debug!("✓ InMemory GET {} -> MISS", key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.store.insert(key.to_string(), value);
        debug!("✓ InMemory SET {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory REMOVE {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory backend is always healthy
        Ok(true)
    }
}
