//! Key-value store trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ClientError;

/// Durable, async, string-keyed storage.
///
/// Implementations:
/// - [`InMemoryKeyValueStore`](super::InMemoryKeyValueStore): lost on restart, for tests
/// - [`FileKeyValueStore`](super::FileKeyValueStore): one file per key
///
/// Writers to the same key are last-write-wins; every key has a single
/// owning writer path, so no locking is provided across calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written or
    /// has been removed.
    async fn get_item(&self, key: &str) -> Result<Option<String>, ClientError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), ClientError>;

    /// Removes every key, continuing past failures and returning the first.
    async fn multi_remove(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut first_error = None;
        for key in keys {
            if let Err(e) = self.remove_item(key).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ClientError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), ClientError> {
        (**self).remove_item(key).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), ClientError> {
        (**self).multi_remove(keys).await
    }
}
