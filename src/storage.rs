use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod json;
pub mod memory;
pub mod migrations;

/// Names of the entries the application keeps in its key-value store.
pub mod keys {
    pub const TASKS: &str = "pms_tasks";
    pub const SUBTASKS: &str = "pms_subtasks";
    pub const COMMENTS: &str = "pms_comments";
    pub const USERS: &str = "pms_users";
    pub const PROJECTS: &str = "pms_projects";
    pub const CURRENT_USER: &str = "pms_current_user";
    pub const INITIALIZED: &str = "pms_initialized";

    pub const ALL: [&str; 7] = [
        TASKS,
        SUBTASKS,
        COMMENTS,
        USERS,
        PROJECTS,
        CURRENT_USER,
        INITIALIZED,
    ];
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load store from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save store to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    SerializeFailed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize store file '{path}': {source}")]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage quota exceeded writing '{key}': {required} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    #[error(
        "Store file was created by a newer version of taskflow (version {0}). Please upgrade taskflow to open this file."
    )]
    FutureVersion(u32),

    #[error("Store file has unsupported version {0}. This version of taskflow cannot read this file.")]
    UnsupportedVersion(u32),
}

/// A string key-value store in the manner of browser local storage.
///
/// Implementations must make each `set` all-or-nothing: after an error the
/// previous value under the key is still in place.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Typed JSON access on top of a [`KeyValueStore`].
pub struct Storage<B> {
    backend: B,
}

impl<B: KeyValueStore> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads and decodes the value under `key`.
    ///
    /// Never fails: a missing entry, a value that does not decode as `T`, or
    /// a backend that cannot be read all yield `default`.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt storage entry, using default");
                default
            }
        }
    }

    /// Reads a JSON array stored under `key`, decoding each record on its own.
    ///
    /// Records that do not decode as `T` are skipped, so one malformed entry
    /// never hides the rest of the collection. A missing or unreadable entry
    /// yields an empty collection.
    pub fn read_records<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw: Vec<serde_json::Value> = self.read(key, Vec::new());
        raw.into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key, index, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect()
    }

    /// Encodes `value` and replaces whatever is stored under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::SerializeFailed {
            key: key.to_string(),
            source: e,
        })?;
        tracing::debug!(key, bytes = json.len(), "writing storage entry");
        self.backend.set(key, json)
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }
}
