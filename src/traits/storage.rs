//! Durable key/value storage trait abstraction.
//!
//! Snapshots are plain JSON strings; the store imposes no schema.

use async_trait::async_trait;

use crate::error::StorageError;

/// Trait for durable key/value storage.
///
/// # Example
///
/// ```ignore
/// use writeflow::traits::KeyValueStore;
///
/// async fn remember<S: KeyValueStore>(store: &S) -> Result<(), StorageError> {
///     store.set("writeflow.session", "{}").await?;
///     assert_eq!(store.get("writeflow.session").await?, Some("{}".to_string()));
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if nothing is stored under the key
    /// - `Err(error)` if reading failed
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
