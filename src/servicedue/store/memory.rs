use super::{Changeset, DataStore, Document};
use crate::error::{Result, ServiceDueError};
use crate::model::{Car, FuelEntry, Reminder};
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    doc: Document,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for InMemoryStore {
    fn commit(&mut self, changes: Changeset) -> Result<()> {
        // Apply to a copy so a rejected changeset leaves nothing behind.
        let mut next = self.doc.clone();
        next.apply(changes)?;
        self.doc = next;
        Ok(())
    }

    fn get_car(&self, id: &Uuid) -> Result<Car> {
        self.doc
            .cars
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceDueError::CarNotFound(id.to_string()))
    }

    fn list_cars(&self) -> Result<Vec<Car>> {
        Ok(self.doc.sorted_cars())
    }

    fn get_reminder(&self, id: &Uuid) -> Result<Reminder> {
        self.doc
            .reminders
            .get(id)
            .cloned()
            .ok_or(ServiceDueError::ReminderNotFound(*id))
    }

    fn list_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.doc.reminders.values().cloned().collect())
    }

    fn delete_reminder(&mut self, id: &Uuid) -> Result<()> {
        if self.doc.reminders.remove(id).is_none() {
            return Err(ServiceDueError::ReminderNotFound(*id));
        }
        Ok(())
    }

    fn list_fuel_entries(&self) -> Result<Vec<FuelEntry>> {
        Ok(self.doc.fuel_entries.values().cloned().collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::ReminderType;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub car: Car,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        /// A store holding one car, "Civic", at 10 000.
        pub fn new() -> Self {
            let car = Car::new("Civic", 10_000);
            let mut store = InMemoryStore::new();
            store.commit(Changeset::new().car(car.clone())).unwrap();
            Self { store, car }
        }

        pub fn with_car(mut self, name: &str, odometer: i64) -> Self {
            let car = Car::new(name, odometer);
            self.store.commit(Changeset::new().car(car)).unwrap();
            self
        }

        pub fn with_reminder(mut self, reminder: Reminder) -> Self {
            self.store
                .commit(Changeset::new().reminder(reminder))
                .unwrap();
            self
        }

        /// A reminder for the fixture car, not yet stored.
        pub fn reminder(&self, title: &str) -> Reminder {
            Reminder::new(self.car.id, ReminderType::Service, title)
        }
    }
}
