//! File-backed key/value storage.
//!
//! All keys live in one small JSON object. Writes go to a temporary sibling
//! file that is renamed over the original, so a crash never leaves a
//! half-written file behind.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use mindspace_core::repository::storage::SessionStorage;
use mindspace_types::error::StorageError;

pub struct FileSessionStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StorageError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        // A corrupt file is replaced rather than blocking every future write.
        let mut values = self.read_all().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable storage file");
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindspace_core::auth::session::{SESSION_KEY, SessionStore};
    use mindspace_types::identity::{Identity, UserId};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("storage.json"));
        assert_eq!(storage.get("userId").unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested").join("storage.json"));

        storage.set("userId", "1093").unwrap();
        storage.set("theme", "dark").unwrap();
        assert_eq!(storage.get("userId").unwrap().as_deref(), Some("1093"));

        storage.remove("userId").unwrap();
        assert_eq!(storage.get("userId").unwrap(), None);
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_values_survive_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        FileSessionStorage::new(&path).set("userId", "7").unwrap();

        let reopened = FileSessionStorage::new(&path);
        assert_eq!(reopened.get("userId").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_corrupt_file_reports_error_and_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();
        let storage = FileSessionStorage::new(&path);

        assert!(matches!(storage.get("userId"), Err(StorageError::Corrupt(_))));

        storage.set("userId", "1").unwrap();
        assert_eq!(storage.get("userId").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_session_store_roundtrip_across_restarts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = SessionStore::new(FileSessionStorage::new(&path));
        store.login(Identity {
            id: UserId::new("1093"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            picture_url: String::new(),
        });

        let mut restarted = SessionStore::new(FileSessionStorage::new(&path));
        restarted.restore();
        assert_eq!(restarted.current().unwrap().user_id().as_str(), "1093");

        restarted.logout();
        assert_eq!(FileSessionStorage::new(&path).get(SESSION_KEY).unwrap(), None);
    }
}
