use crate::errors::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, warn};

pub const HABITS_SLOT: &str = "habits";
pub const FRIENDS_SLOT: &str = "friends";

/// Named JSON slots kept as `<root>/<key>.json`. Every save replaces the whole
/// slot; there is no partial update and no locking between processes.
#[derive(Debug, Clone)]
pub struct SlotStore {
    root: PathBuf,
}

impl SlotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub async fn ensure_root(&self) -> Result<(), std::io::Error> {
        fs::create_dir_all(&self.root).await
    }

    pub async fn read_raw(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.slot_path(key)).await {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read slot {key}: {err}");
                None
            }
        }
    }

    pub async fn write_raw(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        fs::write(self.slot_path(key), raw)
            .await
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })
    }

    /// Loads the collection stored at `key`. Never fails: an absent slot, a
    /// slot that is not JSON, or a slot that is not an array all yield an
    /// empty vector. Individual records that do not match `T` are skipped.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.read_raw(key).await {
            Some(raw) => parse_collection(key, &raw),
            None => Vec::new(),
        }
    }

    pub async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(items).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.write_raw(key, &payload).await
    }
}

fn parse_collection<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            error!("failed to parse slot {key}: {err}");
            return Vec::new();
        }
    };

    let Value::Array(entries) = value else {
        error!("slot {key} does not hold an array");
        return Vec::new();
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("skipping record {index} in slot {key}: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SlotStore;
    use tempfile::TempDir;

    /// A store rooted in a fresh directory that is removed when the returned
    /// guard drops.
    pub fn temp_store() -> (TempDir, SlotStore) {
        let dir = TempDir::new().unwrap();
        let store = SlotStore::new(dir.path());
        (dir, store)
    }
}
