//! Key-value storage for settings and the cached assignment list
//!
//! The sync pipeline is written against the [`Storage`] trait; the CLI backs
//! it with a JSON file under the user data directory, tests with an
//! in-memory map.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Key-value store the sync pipeline reads configuration and cached
/// assignments from.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the stored values for `keys`; keys with no stored value are
    /// absent from the returned map.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>>;

    /// Merge `entries` into the store.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<()>;
}

/// File-backed store persisting one JSON object
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default storage file under the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::data_dir().context("no user data directory available")?;
        Ok(dir.join("notion-sync").join("storage.json"))
    }

    async fn read_all(&self) -> Result<Map<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("malformed storage file {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read storage file {}", self.path.display())),
        }
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let all = self.read_all().await?;
        Ok(keys
            .iter()
            .filter_map(|&key| all.get(key).map(|value| (key.to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        let mut all = self.read_all().await?;
        for (key, value) in entries {
            all.insert(key, value);
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(&Value::Object(all))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("failed to write storage file {}", self.path.display()))
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(entries: HashMap<String, Value>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let entries = self.entries.lock().unwrap();
        Ok(keys
            .iter()
            .filter_map(|&key| entries.get(key).map(|value| (key.to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, new_entries: HashMap<String, Value>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.extend(new_entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("storage.json"));

        let values = storage.get(&["timezone"]).await.unwrap();
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested").join("storage.json"));

        storage
            .set(HashMap::from([
                ("timezone".to_string(), json!("Pacific/Auckland")),
                ("notion.databaseId".to_string(), json!("db-1")),
            ]))
            .await
            .unwrap();

        let values = storage
            .get(&["timezone", "notion.databaseId", "unknown"])
            .await
            .unwrap();
        assert_eq!(values.get("timezone"), Some(&json!("Pacific/Auckland")));
        assert_eq!(values.get("notion.databaseId"), Some(&json!("db-1")));
        assert!(!values.contains_key("unknown"));
    }

    #[tokio::test]
    async fn test_set_merges_with_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("storage.json"));

        storage
            .set(HashMap::from([("a".to_string(), json!(1))]))
            .await
            .unwrap();
        storage
            .set(HashMap::from([("b".to_string(), json!(2))]))
            .await
            .unwrap();

        let values = storage.get(&["a", "b"]).await.unwrap();
        assert_eq!(values.get("a"), Some(&json!(1)));
        assert_eq!(values.get("b"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage
            .set(HashMap::from([("key".to_string(), json!("value"))]))
            .await
            .unwrap();

        let values = storage.get(&["key"]).await.unwrap();
        assert_eq!(values.get("key"), Some(&json!("value")));
    }
}
