//! Typed storage adapter over a [`StorageBackend`].
//!
//! The store reads and writes whole JSON documents under fixed string keys.
//! Reads never fail: an absent key, an unreadable backend, or a document that
//! no longer parses all fall back to the caller-supplied default, so a
//! corrupted value degrades to "empty" instead of wedging the engine. Writes
//! propagate errors.

use crate::backend::StorageBackend;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key for the one-time seed-completion marker.
pub const KEY_SEEDED: &str = "seeded_v1";
/// Storage key for the service reference list.
pub const KEY_SERVICES: &str = "services_v1";
/// Storage key for the credential/user list.
pub const KEY_USERS: &str = "users_v1";
/// Storage key for the live appointment collection.
pub const KEY_APPOINTMENTS: &str = "appointments_v1";
/// Storage key for the active session, absent when logged out.
pub const KEY_SESSION: &str = "session_v1";
/// Storage key for the per-year appointment number counters.
pub const KEY_COUNTERS: &str = "appointment_counters_v1";

/// Typed JSON store over a pluggable backend.
///
/// Cheap to clone: clones share the underlying backend.
#[derive(Clone)]
pub struct Store<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Store<B> {
    /// Create a store over the given backend.
    pub fn new(backend: B) -> Self {
        Store { backend }
    }

    /// Read and decode the value under `key`, or `None` when the key is
    /// absent, the backend is unreadable, or the stored text does not parse.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.backend.get(key).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("Storage read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored value under {} is not valid JSON: {}", key, e);
                None
            }
        }
    }

    /// Like [`Store::get`], falling back to `fallback` instead of `None`.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.get(key).await.unwrap_or(fallback)
    }

    /// Encode `value` as JSON and store it under `key`.
    ///
    /// # Errors
    /// Returns `Err` if encoding fails or the backend cannot be written
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.backend.set(key, text).await
    }

    /// Remove the value under `key`.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key).await
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::model::Service;

    fn store() -> Store<InMemoryBackend> {
        Store::new(InMemoryBackend::new())
    }

    #[tokio::test]
    async fn test_store_roundtrip() {
        let store = store();
        let services = vec![Service {
            id: "SVC-001".to_string(),
            name: "Account Opening".to_string(),
        }];

        store
            .set(KEY_SERVICES, &services)
            .await
            .expect("Failed to set");

        let loaded: Vec<Service> = store.get_or(KEY_SERVICES, Vec::new()).await;
        assert_eq!(loaded, services);
    }

    #[tokio::test]
    async fn test_store_absent_key_falls_back() {
        let store = store();
        let loaded: Vec<Service> = store.get_or(KEY_SERVICES, Vec::new()).await;
        assert!(loaded.is_empty());
        assert_eq!(store.get::<Vec<Service>>(KEY_SERVICES).await, None);
    }

    #[tokio::test]
    async fn test_store_corrupt_value_falls_back() {
        let store = store();
        store
            .backend()
            .set(KEY_SERVICES, "{definitely not json".to_string())
            .await
            .expect("Failed to set raw value");

        let fallback = vec![Service {
            id: "SVC-999".to_string(),
            name: "Fallback".to_string(),
        }];
        let loaded: Vec<Service> = store.get_or(KEY_SERVICES, fallback.clone()).await;
        assert_eq!(loaded, fallback);
    }

    #[tokio::test]
    async fn test_store_wrong_shape_falls_back() {
        let store = store();
        // Valid JSON, wrong type for the requested value.
        store
            .backend()
            .set(KEY_SEEDED, "[1,2,3]".to_string())
            .await
            .expect("Failed to set raw value");

        assert_eq!(store.get_or(KEY_SEEDED, false).await, false);
    }

    #[tokio::test]
    async fn test_store_remove() {
        let store = store();
        store.set(KEY_SEEDED, &true).await.expect("Failed to set");
        store.remove(KEY_SEEDED).await.expect("Failed to remove");
        assert_eq!(store.get::<bool>(KEY_SEEDED).await, None);
    }
}
