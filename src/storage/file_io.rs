//! Local JSON files with atomic writes
//!
//! Only small client-side state lives on disk (tokens, the bank sync cursor);
//! everything else belongs to the API.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BudgetwiseError;

/// Read JSON from `path`, or `None` if the file does not exist
pub fn read_json_optional<T, P>(path: P) -> Result<Option<T>, BudgetwiseError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|e| {
        BudgetwiseError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| BudgetwiseError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to `path` through a temp file and rename
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BudgetwiseError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BudgetwiseError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path)
        .map_err(|e| BudgetwiseError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BudgetwiseError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| BudgetwiseError::Storage(format!("Failed to flush data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BudgetwiseError::Storage(format!("Failed to rename temp file: {}", e))
    })
}

/// Delete `path`; a missing file is not an error
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<(), BudgetwiseError> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BudgetwiseError::Storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Cursor {
        value: String,
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Cursor> =
            read_json_optional(temp_dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_read_remove() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("cursor.json");
        let cursor = Cursor {
            value: "abc".into(),
        };

        write_json_atomic(&path, &cursor).unwrap();
        assert!(!temp_dir.path().join("nested").join("cursor.json.tmp").exists());
        assert_eq!(read_json_optional::<Cursor, _>(&path).unwrap(), Some(cursor));

        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
        remove_if_exists(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json_optional::<Cursor, _>(&path).unwrap_err();
        assert!(matches!(err, BudgetwiseError::Storage(_)));
    }
}
