use super::{Changeset, DataStore, Document};
use crate::error::{Result, ServiceDueError};
use crate::model::{Car, FuelEntry, Reminder};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DATA_FILENAME: &str = "data.json";

/// File-backed store. The whole document lives in `data.json` and every
/// commit rewrites it through a temporary file and a rename, so readers never
/// see a half-written document.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn load(&self) -> Result<Document> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(Document::default());
        }
        let content = fs::read_to_string(data_file)?;
        let doc: Document = serde_json::from_str(&content)?;
        Ok(doc)
    }

    fn save(&self, doc: &Document) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        let content = serde_json::to_string_pretty(doc)?;

        let tmp_file = self.root.join(format!(".data-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        fs::rename(&tmp_file, self.data_file())?;
        Ok(())
    }
}

impl DataStore for FileStore {
    fn commit(&mut self, changes: Changeset) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut doc = self.load()?;
        doc.apply(changes)?;
        self.save(&doc)
    }

    fn get_car(&self, id: &Uuid) -> Result<Car> {
        self.load()?
            .cars
            .remove(id)
            .ok_or_else(|| ServiceDueError::CarNotFound(id.to_string()))
    }

    fn list_cars(&self) -> Result<Vec<Car>> {
        Ok(self.load()?.sorted_cars())
    }

    fn get_reminder(&self, id: &Uuid) -> Result<Reminder> {
        self.load()?
            .reminders
            .remove(id)
            .ok_or(ServiceDueError::ReminderNotFound(*id))
    }

    fn list_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.load()?.reminders.into_values().collect())
    }

    fn delete_reminder(&mut self, id: &Uuid) -> Result<()> {
        let mut doc = self.load()?;
        if doc.reminders.remove(id).is_none() {
            return Err(ServiceDueError::ReminderNotFound(*id));
        }
        self.save(&doc)
    }

    fn list_fuel_entries(&self) -> Result<Vec<FuelEntry>> {
        Ok(self.load()?.fuel_entries.into_values().collect())
    }
}
