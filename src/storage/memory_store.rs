//! In-memory key-value storage.
//!
//! Suitable for tests and for sessions that should not outlive the process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::ClientError;

use super::repository::KeyValueStore;

/// In-memory key-value storage.
///
/// Values live in a `HashMap` behind a `RwLock`. Clones share the same map,
/// which lets a test keep a handle while the context owns another.
///
/// # Note
///
/// Everything is lost when the process exits.
/// For durable storage, use [`FileKeyValueStore`](super::FileKeyValueStore).
#[derive(Clone, Debug, Default)]
pub struct InMemoryKeyValueStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.items.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items
            .read()
            .map(|guard| guard.contains_key(key))
            .unwrap_or(false)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ClientError> {
        let items = self
            .items
            .read()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?;

        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.items
            .write()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?
            .insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), ClientError> {
        self.items
            .write()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?
            .remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryKeyValueStore::new();

        store.set_item("auth_tokens", "{}").await.unwrap();

        let found = store.get_item("auth_tokens").await.unwrap();
        assert_eq!(found.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryKeyValueStore::new();

        let found = store.get_item("missing").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_is_last_write_wins() {
        let store = InMemoryKeyValueStore::new();

        store.set_item("k", "first").await.unwrap();
        store.set_item("k", "second").await.unwrap();

        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_multi_remove() {
        let store = InMemoryKeyValueStore::new();

        store.set_item("a", "1").await.unwrap();
        store.set_item("b", "2").await.unwrap();
        store.set_item("c", "3").await.unwrap();

        store.multi_remove(&["a", "b", "missing"]).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains_key("c"));
    }

    #[tokio::test]
    async fn test_clones_share_items() {
        let store = InMemoryKeyValueStore::new();
        let handle = store.clone();

        store.set_item("k", "v").await.unwrap();

        assert!(handle.contains_key("k"));
    }
}
