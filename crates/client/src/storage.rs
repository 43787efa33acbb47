//! Device-local key-value storage.
//!
//! A single JSON object in `storage.json` under the data directory. Every
//! write replaces the file atomically (temp file + rename), so a crash never
//! leaves a half-written store behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;

/// File name inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

/// Keys written by the client.
pub mod keys {
    /// Customer session.
    pub const USER: &str = "user";
    /// Admin session.
    pub const ADMIN: &str = "admin";
    /// Cached cart items.
    pub const CART_ITEMS: &str = "cartItems";
    /// Most recently placed order.
    pub const ORDER: &str = "order";
    /// Guest favourites.
    pub const FAVOURITES: &str = "favourites";
    /// The whole state store.
    pub const ROOT: &str = "root";
}

/// Errors reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage value for {key} is not valid: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON key-value store backed by one file.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    // Serialises read-modify-write cycles.
    lock: Mutex<()>,
}

impl LocalStorage {
    /// Open (or lazily create) storage in `dir`.
    #[must_use]
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: dir.as_ref().join(STORAGE_FILE),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Read and decode a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the value does not
    /// decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let _guard = self.inner.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries
            .remove(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|source| StorageError::Json {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Whether a key is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let _guard = self.inner.lock.lock().await;
        Ok(self.read_all().await?.contains_key(key))
    }

    /// Encode and store a value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(value).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        let _guard = self.inner.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }

    /// Remove keys; absent keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.inner.lock.lock().await;
        let mut entries = self.read_all().await?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before {
            return Ok(());
        }
        self.write_all(&entries).await
    }

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.inner.lock.lock().await;
        self.write_all(&Map::new()).await
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let path = &self.inner.path;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
            key: STORAGE_FILE.to_string(),
            source,
        })
    }

    async fn write_all(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        let path = &self.inner.path;
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Json {
            key: STORAGE_FILE.to_string(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        tracing::debug!(path = %path.display(), keys = entries.len(), "Local storage written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A fresh, empty storage directory under the system temp dir.
    pub(crate) fn temp_storage() -> LocalStorage {
        let dir = std::env::temp_dir().join(format!("shopfront-test-{}", uuid::Uuid::new_v4()));
        LocalStorage::open(dir)
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let storage = temp_storage();
        let value: Option<String> = storage.get(keys::USER).await.unwrap();
        assert!(value.is_none());
        assert!(!storage.contains(keys::USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = temp_storage();
        storage.set(keys::ORDER, &vec![1, 2, 3]).await.unwrap();
        storage.set(keys::USER, "ada").await.unwrap();

        let order: Option<Vec<u32>> = storage.get(keys::ORDER).await.unwrap();
        assert_eq!(order, Some(vec![1, 2, 3]));

        storage.remove(&[keys::ORDER, keys::CART_ITEMS]).await.unwrap();
        assert!(!storage.contains(keys::ORDER).await.unwrap());
        assert!(storage.contains(keys::USER).await.unwrap());

        storage.clear().await.unwrap();
        assert!(!storage.contains(keys::USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let storage = temp_storage();
        storage.set(keys::FAVOURITES, &["p1"]).await.unwrap();

        let dir = storage.path().parent().unwrap().to_path_buf();
        let reopened = LocalStorage::open(dir);
        let favourites: Option<Vec<String>> = reopened.get(keys::FAVOURITES).await.unwrap();
        assert_eq!(favourites, Some(vec!["p1".to_string()]));
    }

    #[tokio::test]
    async fn test_wrong_type_is_a_json_error() {
        let storage = temp_storage();
        storage.set(keys::USER, "not a number").await.unwrap();
        let err = storage.get::<u32>(keys::USER).await.unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == "user"));
    }
}
