use super::SnapshotStore;
use crate::error::{Result, ServiceDueError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Snapshot store in a directory shared by the application and the widget
/// host (the app-group container). One `<key>.json` file per key, replaced
/// through a temporary file and a rename.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ServiceDueError::Validation(format!(
                "Invalid snapshot key: {}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let tmp_file = self.dir.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_file, bytes)?;
        fs::rename(&tmp_file, path)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotReader, WidgetSnapshot, SNAPSHOT_KEY};

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSnapshotStore::new(dir.path().join("shared"));
        store.write(SNAPSHOT_KEY, b"{}").unwrap();
        assert!(store.dir().join(format!("{}.json", SNAPSHOT_KEY)).exists());
        assert_eq!(store.read(SNAPSHOT_KEY).unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        assert_eq!(store.read(SNAPSHOT_KEY).unwrap(), None);
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSnapshotStore::new(dir.path());
        assert!(store.write("../escape", b"x").is_err());
    }

    #[test]
    fn reader_in_separate_instance_sees_latest_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FileSnapshotStore::new(dir.path());
        let mut snapshot = WidgetSnapshot::placeholder();
        snapshot.placeholder = false;
        snapshot.cars[0].name = "Golf".to_string();
        writer
            .write(SNAPSHOT_KEY, &serde_json::to_vec(&snapshot).unwrap())
            .unwrap();

        let reader = SnapshotReader::new(FileSnapshotStore::new(dir.path()));
        let loaded = reader.load_or_placeholder();
        assert!(!loaded.placeholder);
        assert_eq!(loaded.cars[0].name, "Golf");
    }
}
