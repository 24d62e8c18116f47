//! File-based key-value storage.
//!
//! Stores each key as a JSON file in a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ClientError;

use super::repository::KeyValueStore;

/// File-based key-value storage.
///
/// Each key is stored in a file named `{key}.json` inside the configured
/// directory. Writes go through a temporary file and a rename so a crash
/// mid-write leaves the previous value in place.
///
/// # Example
///
/// ```rust,no_run
/// use nutritrack::storage::FileKeyValueStore;
///
/// let store = FileKeyValueStore::new("/data/data/app.nutritrack/files")?;
/// # Ok::<(), nutritrack::ClientError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    /// Creates the store, creating the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = directory.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ClientError::Storage(format!("Failed to create storage directory: {e}"))
        })?;
        Ok(Self { directory: dir })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

/// Keys map directly to file names, so only a safe alphabet is accepted.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ClientError> {
        if !is_valid_key(key) {
            return Ok(None);
        }

        let path = self.item_path(key);
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ClientError::Storage(format!("Failed to read {key}: {e}")))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
        if !is_valid_key(key) {
            return Err(ClientError::Storage(format!("Invalid storage key: {key:?}")));
        }

        let path = self.item_path(key);
        let tmp = self.directory.join(format!(".{key}.json.tmp"));

        std::fs::write(&tmp, value)
            .map_err(|e| ClientError::Storage(format!("Failed to write {key}: {e}")))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| ClientError::Storage(format!("Failed to write {key}: {e}")))?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), ClientError> {
        if !is_valid_key(key) {
            return Ok(());
        }

        let path = self.item_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| ClientError::Storage(format!("Failed to delete {key}: {e}")))?;
        }

        Ok(())
    }
}
