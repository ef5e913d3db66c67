//! In-memory key/value store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::error::StorageError;
use crate::traits::KeyValueStore;

/// In-memory key/value store.
///
/// Clones share the same map, so a test can keep one handle for assertions
/// while the session owns another. Failures can be injected per operation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// Number of successful `set` calls
    writes: Arc<Mutex<usize>>,
    set_should_fail: Arc<Mutex<bool>>,
    get_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        lock(&store.entries).insert(key.to_string(), value.to_string());
        store
    }

    pub fn set_set_should_fail(&self, should_fail: bool) {
        *lock(&self.set_should_fail) = should_fail;
    }

    pub fn set_get_should_fail(&self, should_fail: bool) {
        *lock(&self.get_should_fail) = should_fail;
    }

    /// Current raw value without going through the trait
    pub fn raw(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if *lock(&self.get_should_fail) {
            return Err(StorageError::Unavailable("Mock get failure".to_string()));
        }
        Ok(lock(&self.entries).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *lock(&self.set_should_fail) {
            return Err(StorageError::Io("Mock set failure".to_string()));
        }
        lock(&self.entries).insert(key.to_string(), value.to_string());
        *lock(&self.writes) += 1;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.write_count(), 1);

        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = InMemoryStore::new();
        let other = store.clone();
        other.set("k", "v").await.unwrap();
        assert_eq!(store.raw("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryStore::with_entry("k", "v");
        store.set_set_should_fail(true);
        store.set_get_should_fail(true);

        assert!(matches!(store.set("k", "w").await, Err(StorageError::Io(_))));
        assert!(matches!(store.get("k").await, Err(StorageError::Unavailable(_))));
        assert_eq!(store.raw("k").as_deref(), Some("v"));
        assert_eq!(store.write_count(), 0);
    }
}
