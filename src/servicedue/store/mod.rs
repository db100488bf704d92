//! # Storage Layer
//!
//! The Reminder Store contract. [`DataStore`] is the only way the rest of the
//! crate reads or writes cars, reminders and fuel entries.
//!
//! ## Transactions
//!
//! All writes go through [`DataStore::commit`] with a [`Changeset`]. A changeset
//! is validated as a whole before anything is written, so a rejected commit
//! leaves the store exactly as it was. Completing a recurring reminder commits
//! the completed reminder and its successor together; recording fuel commits
//! the entry and the car's new odometer together.
//!
//! Reminders are never hard-deleted by the engine. [`DataStore::delete_reminder`]
//! exists for the user-facing delete command only.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: a single `data.json` document, replaced atomically on commit.
//! - [`memory::InMemoryStore`]: for tests.

use crate::error::{Result, ServiceDueError};
use crate::model::{Car, FuelEntry, Reminder};
use crate::recurrence::sort_reminders;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// A set of records to create or replace in one transaction.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    pub cars: Vec<Car>,
    pub reminders: Vec<Reminder>,
    pub fuel_entries: Vec<FuelEntry>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn car(mut self, car: Car) -> Self {
        self.cars.push(car);
        self
    }

    pub fn reminder(mut self, reminder: Reminder) -> Self {
        self.reminders.push(reminder);
        self
    }

    pub fn fuel_entry(mut self, entry: FuelEntry) -> Self {
        self.fuel_entries.push(entry);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty() && self.reminders.is_empty() && self.fuel_entries.is_empty()
    }
}

/// Abstract interface for the reminder store.
pub trait DataStore {
    /// Create or replace every record in `changes`, or nothing at all.
    fn commit(&mut self, changes: Changeset) -> Result<()>;

    fn get_car(&self, id: &Uuid) -> Result<Car>;

    fn list_cars(&self) -> Result<Vec<Car>>;

    fn get_reminder(&self, id: &Uuid) -> Result<Reminder>;

    fn list_reminders(&self) -> Result<Vec<Reminder>>;

    /// Permanently remove a reminder (user action only)
    fn delete_reminder(&mut self, id: &Uuid) -> Result<()>;

    fn list_fuel_entries(&self) -> Result<Vec<FuelEntry>>;

    /// Reminders that are not completed, optionally for one car, in listing order.
    fn active_reminders(&self, car_id: Option<&Uuid>) -> Result<Vec<Reminder>> {
        let mut reminders: Vec<Reminder> = self
            .list_reminders()?
            .into_iter()
            .filter(|r| r.is_active())
            .filter(|r| car_id.map_or(true, |id| &r.car_id == id))
            .collect();
        sort_reminders(&mut reminders);
        Ok(reminders)
    }

    fn fuel_entries_for(&self, car_id: &Uuid) -> Result<Vec<FuelEntry>> {
        Ok(self
            .list_fuel_entries()?
            .into_iter()
            .filter(|e| &e.car_id == car_id)
            .collect())
    }
}

/// The full contents of a store. Both backends keep one of these and apply
/// changesets to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default)]
    pub cars: HashMap<Uuid, Car>,
    #[serde(default)]
    pub reminders: HashMap<Uuid, Reminder>,
    #[serde(default)]
    pub fuel_entries: HashMap<Uuid, FuelEntry>,
}

impl Document {
    /// Validate `changes` against the current contents, then apply them.
    pub fn apply(&mut self, changes: Changeset) -> Result<()> {
        self.check(&changes)?;

        for car in changes.cars {
            self.cars.insert(car.id, car);
        }
        for reminder in changes.reminders {
            self.reminders.insert(reminder.id, reminder);
        }
        for entry in changes.fuel_entries {
            self.fuel_entries.insert(entry.id, entry);
        }
        Ok(())
    }

    fn check(&self, changes: &Changeset) -> Result<()> {
        let car_known =
            |id: &Uuid| self.cars.contains_key(id) || changes.cars.iter().any(|c| &c.id == id);

        for car in &changes.cars {
            if car.name.trim().is_empty() {
                return Err(ServiceDueError::Store("Car name cannot be empty".to_string()));
            }
            let duplicate = self
                .cars
                .values()
                .any(|c| c.id != car.id && c.name.eq_ignore_ascii_case(&car.name));
            if duplicate {
                return Err(ServiceDueError::Store(format!(
                    "A car named '{}' already exists",
                    car.name
                )));
            }
        }
        for reminder in &changes.reminders {
            reminder.validate()?;
            if !car_known(&reminder.car_id) {
                return Err(ServiceDueError::CarNotFound(reminder.car_id.to_string()));
            }
        }
        for entry in &changes.fuel_entries {
            entry.validate()?;
            if !car_known(&entry.car_id) {
                return Err(ServiceDueError::CarNotFound(entry.car_id.to_string()));
            }
        }
        Ok(())
    }

    pub fn sorted_cars(&self) -> Vec<Car> {
        let mut cars: Vec<Car> = self.cars.values().cloned().collect();
        cars.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        cars
    }
}
