use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions, rename, write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::storage::{
    KeyValueStore, StorageError,
    migrations::{CURRENT_VERSION, apply_migrations, detect_version},
};

/// On-disk layout of a [`JsonFileStore`]
#[derive(Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Key-value store persisted as a single JSON file.
///
/// Every mutation reloads the file under an exclusive lock and replaces it
/// through a temp file + rename, so readers never observe a partial write.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDocument, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default());
            }
            Err(e) => {
                return Err(StorageError::LoadFailed {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let mut data: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| StorageError::ParseFailed {
                path: self.path.clone(),
                source: e,
            })?;

        let file_version = detect_version(&data, &self.path)?;
        if file_version > CURRENT_VERSION {
            return Err(StorageError::FutureVersion(file_version));
        }
        if file_version < CURRENT_VERSION {
            tracing::info!(
                path = %self.path.display(),
                from = file_version,
                to = CURRENT_VERSION,
                "migrating store file"
            );
            data = apply_migrations(data, file_version, CURRENT_VERSION)?;
        }

        if let Some(obj) = data.as_object_mut() {
            obj.insert("version".to_string(), serde_json::json!(CURRENT_VERSION));
        }

        serde_json::from_value(data).map_err(|e| StorageError::ParseFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&self, document: &StoreDocument) -> Result<(), StorageError> {
        let json = to_string_pretty(document).map_err(|e| StorageError::EncodeFailed {
            path: self.path.clone(),
            source: e,
        })?;

        let unique_temp = format!("{}.tmp.{}", self.path.display(), Uuid::new_v4());
        let temp_path = PathBuf::from(&unique_temp);
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        rename(&temp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            StorageError::SaveFailed {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    fn lock(&self) -> Result<File, StorageError> {
        let lock_file_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path,
                source: e,
            })?;
        Ok(lock_file)
    }

    /// Loads, edits and saves the document while holding the file lock.
    fn modify(&self, edit: impl FnOnce(&mut StoreDocument)) -> Result<(), StorageError> {
        let lock_file = self.lock()?;

        let result = self.load().and_then(|mut document| {
            edit(&mut document);
            self.save(&document)
        });

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        result
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.modify(|document| {
            document.entries.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|document| {
            document.entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));

        store.set("pms_tasks", String::from("[]")).unwrap();
        store.set("pms_users", String::from("[1]")).unwrap();

        assert_eq!(store.get("pms_tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("pms_users").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("pms_projects").unwrap(), None);

        let reopened = JsonFileStore::new(dir.path().join("store.json"));
        assert_eq!(reopened.get("pms_users").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));

        store.set("k", String::from("1")).unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));

        for i in 0..5 {
            store.set("k", i.to_string()).unwrap();
        }

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ this is not valid json }").unwrap();

        let store = JsonFileStore::new(path);

        match store.get("k") {
            Err(StorageError::ParseFailed { .. }) => {}
            _ => panic!("Expected ParseFailed error, got something else"),
        }
    }

    #[test]
    fn test_load_v1_without_version_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{ "entries": { "pms_initialized": "true" } }"#).unwrap();

        let store = JsonFileStore::new(path);

        assert_eq!(store.get("pms_initialized").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_load_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{ "version": 999, "entries": {} }"#).unwrap();

        let store = JsonFileStore::new(path);

        match store.set("k", String::from("v")) {
            Err(StorageError::FutureVersion(999)) => {}
            _ => panic!("Expected FutureVersion(999) error"),
        }
        assert!(matches!(store.get("k"), Err(StorageError::FutureVersion(999))));
    }
}
