//! Storage backend implementations.

use crate::error::Result;

pub mod inmemory;
pub mod jsonfile;

pub use inmemory::InMemoryBackend;
pub use jsonfile::JsonFileBackend;

/// Trait for key-value storage backend implementations.
///
/// Abstracts the persistence provider the engine writes through: values are
/// JSON text stored under string keys, with no transactions. Implementations:
/// InMemory (default), JsonFile, or anything else that can hold strings.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Backend implementations should use interior mutability
/// (DashMap, locks, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait StorageBackend: Send + Sync + Clone {
    /// Retrieve the raw JSON text stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(text))` - Value present
    /// - `Ok(None)` - Key absent (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be read (I/O failure, etc.)
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store JSON text under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be read
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Health check - verify the backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if the backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
