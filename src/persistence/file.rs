//! File-backed store (native)
//!
//! All keys live in one JSON object. Writes go to a temp file first and are
//! renamed over the original.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::{KeyValueStore, StorageError};

const FILE_NAME: &str = "storage.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory, creating it if needed
    pub fn in_data_dir() -> Result<Self, StorageError> {
        let project_dirs =
            ProjectDirs::from("", "", "skyhop").ok_or(StorageError::Unavailable)?;
        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;
        Ok(Self::at(data_dir.join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut items = self.read_all().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable {}: {}", self.path.display(), e);
            BTreeMap::new()
        });
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("skyhop-test-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(FILE_NAME)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let store = FileStore::at(&path);
        assert_eq!(store.get_item("highScore").unwrap(), None);
    }

    #[test]
    fn test_round_trip_keeps_other_keys() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);
        let mut store = FileStore::at(&path);
        store.set_item("highScore", "12").unwrap();
        store.set_item("other", "x").unwrap();

        let reopened = FileStore::at(&path);
        assert_eq!(reopened.get_item("highScore").unwrap().as_deref(), Some("12"));
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_errors_on_read_and_heals_on_write() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let mut store = FileStore::at(&path);
        assert!(matches!(store.get_item("highScore"), Err(StorageError::Json(_))));

        store.set_item("highScore", "3").unwrap();
        assert_eq!(store.get_item("highScore").unwrap().as_deref(), Some("3"));
    }
}
