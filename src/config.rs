use std::path::{Path, PathBuf};

/// Environment variable overriding the store location
pub const STORE_ENV: &str = "TASKFLOW_STORE";

pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// Uses `store_path` when given, otherwise the platform data directory.
    pub fn resolve(store_path: Option<PathBuf>) -> Self {
        Self {
            store_path: store_path.unwrap_or_else(default_store_path),
        }
    }

    /// Creates the directory that will hold the store file
    pub fn prepare(&self) -> std::io::Result<()> {
        match self.store_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskflow")
        .join("store.json")
}
