//! Key-value storage trait and implementations

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::keys::StorageKey;

/// String values addressed by [`StorageKey`]. Writes overwrite wholesale.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when nothing is stored
    async fn get(&self, key: &StorageKey) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    async fn set(&self, key: &StorageKey, value: &str) -> Result<()>;
}

/// File-based store: one file per key under a base directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn value_path(&self, key: &StorageKey) -> PathBuf {
        let mut path = self.base_path.clone();
        let segments = key.segments();
        if let Some((last, parents)) = segments.split_last() {
            for segment in parents {
                path.push(encode_segment(segment));
            }
            path.push(format!("{}.json", encode_segment(last)));
        }
        path
    }
}

/// Escapes a key segment into a single safe file name component
fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for (index, byte) in segment.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || (byte == b'.' && index > 0);
        if keep {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    if encoded.is_empty() {
        encoded.push('%');
    }
    encoded
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>> {
        let path = self.value_path(key);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn set(&self, key: &StorageKey, value: &str) -> Result<()> {
        let path = self.value_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, value).await?;
        debug!("Stored {} at {}", key, path.display());
        Ok(())
    }
}

/// In-memory store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &StorageKey, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.clone(), value.to_string());
        Ok(())
    }
}
