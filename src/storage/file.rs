use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::{debug, instrument, warn};

use super::{KeyValueStore, StorageError};

/// JSON file-backed backend.
///
/// The whole map lives in one file as a JSON object. Every `set` rewrites the
/// file through a temporary sibling and a rename, so a crash mid-write leaves
/// the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty when the file does not exist
    /// or does not hold a JSON object of strings. A malformed file is
    /// replaced on the next `set`.
    ///
    /// # Errors
    /// Fails when the parent directory cannot be created or the file cannot
    /// be read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let file_path = path.as_ref().to_path_buf();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let map = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(error = %e, "Store file is malformed, starting empty");
                    HashMap::new()
                }
            },
            Err(source) if source.kind() == ErrorKind::NotFound => {
                debug!("No store file yet, starting empty");
                HashMap::new()
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: file_path,
                    source,
                })
            }
        };

        debug!(entries = map.len(), "Store opened");
        Ok(Self {
            inner: Arc::new(RwLock::new(map)),
            file_path,
        })
    }

    async fn write_file(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_vec(map)?;
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, data).await.map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StorageError::Io {
                path: self.file_path.clone(),
                source,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        // Held across the write so file order matches call order.
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key.to_string(), value);
        self.write_file(&next).await?;
        *map = next;
        Ok(())
    }
}
