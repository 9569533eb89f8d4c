use std::path::Path;

use serde_json::Value;

use crate::storage::StorageError;

/// Current version of the store file format
pub const CURRENT_VERSION: u32 = 1;

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![
        // v1→v2 goes here once the file format changes
    ]
}

/// Returns 1 if the version field is missing
pub fn detect_version(document: &Value, path: &Path) -> Result<u32, StorageError> {
    match document.get("version") {
        Some(v) => serde_json::from_value::<u32>(v.clone()).map_err(|e| StorageError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        }),
        None => Ok(1),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    if from_version == 0 {
        return Err(StorageError::UnsupportedVersion(0));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration_idx = (version - 1) as usize; // v1→v2 is at index 0

        if migration_idx >= migrations.len() {
            return Err(StorageError::UnsupportedVersion(version));
        }

        data = migrations[migration_idx](data)?;
    }

    Ok(data)
}
