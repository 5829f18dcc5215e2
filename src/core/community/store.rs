//! Read access to the community document store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::snapshot::CommunitySnapshot;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No community data found at {0} (run `init` to create one)")]
    Missing(PathBuf),
    #[error("Failed to read community data: {0}")]
    Io(#[from] io::Error),
    #[error("Community data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of community documents.
pub trait CommunityStore {
    fn load(&self) -> Result<CommunitySnapshot, StoreError>;
    fn save(&self, snapshot: &CommunitySnapshot) -> Result<(), StoreError>;
}

/// Snapshot kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` as the snapshot file. Refuses to overwrite unless `force`.
    pub fn write_raw(&self, contents: &str, force: bool) -> io::Result<()> {
        if self.path.exists() && !force {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", self.path.display()),
            ));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)
    }
}

impl CommunityStore for JsonFileStore {
    fn load(&self) -> Result<CommunitySnapshot, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, snapshot: &CommunitySnapshot) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(snapshot)?;
        self.write_raw(&data, true)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(matches!(store.load(), Err(StoreError::Missing(_))));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::new(path).load(),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn partial_snapshot_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("c.json"));
        store
            .write_raw(r#"{"community": {"name": "Riverside"}}"#, false)
            .unwrap();
        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.community.name.as_deref(), Some("Riverside"));
        assert!(snapshot.posts.is_empty());
        assert!(snapshot.ai_settings.api_key.is_none());
    }

    #[test]
    fn save_then_load_keeps_messages() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("c.json"));
        let mut snapshot = CommunitySnapshot::default();
        snapshot
            .messages
            .push(crate::core::community::messages::new_message("u1", "admin", "hello"));
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.messages[0].receiver_id, "admin");
        assert!(!loaded.messages[0].read);
    }

    #[test]
    fn write_raw_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("c.json"));
        store.write_raw("{}", false).unwrap();
        let err = store.write_raw("{}", false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        store.write_raw("{\"posts\": []}", true).unwrap();
    }
}
