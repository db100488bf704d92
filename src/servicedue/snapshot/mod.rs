//! # Widget Snapshot Protocol
//!
//! The widget host runs in its own process on its own timeline and cannot ask
//! the application for data. The application therefore publishes a small,
//! versioned [`WidgetSnapshot`] into a shared [`SnapshotStore`] after every
//! change that could alter it, and the widget reads whatever was published last.
//!
//! ```text
//!  application                       shared store                 widget host
//!  mutation ─► SnapshotPublisher ─► write(key, bytes) ◄─ read(key) ◄─ SnapshotReader
//! ```
//!
//! The channel is one-way. The snapshot is a cache: it may be stale or missing
//! and is never read back by the application. A failed write is reported as
//! [`ServiceDueError::SnapshotWriteFailed`] but never undoes the mutation that
//! triggered it.
//!
//! On the reader side a missing, corrupt or wrong-version snapshot is not an
//! error the widget ever sees: [`SnapshotReader::load_or_placeholder`] falls
//! back to [`WidgetSnapshot::placeholder`].

use crate::error::{Result, ServiceDueError};
use crate::model::{Car, FuelAggregate, Reminder};
use crate::recurrence::{compute_due_status, sort_reminders};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

pub mod fs;
pub mod memory;

pub const SNAPSHOT_VERSION: u32 = 1;
pub const SNAPSHOT_KEY: &str = "widget-snapshot";
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Cross-process byte store. Last write wins; no other guarantees.
pub trait SnapshotStore {
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSnapshot {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
    pub cars: Vec<SnapshotCar>,
    pub upcoming_reminders: Vec<SnapshotReminder>,
    pub fuel: SnapshotFuel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCar {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReminder {
    pub id: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub is_overdue: bool,
    pub car_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFuel {
    pub average_consumption: Option<f64>,
    pub total_cost_this_period: f64,
    pub last_unit_price: Option<f64>,
}

impl From<FuelAggregate> for SnapshotFuel {
    fn from(agg: FuelAggregate) -> Self {
        Self {
            average_consumption: agg.average_consumption,
            total_cost_this_period: agg.total_cost_this_period,
            last_unit_price: agg.last_unit_price,
        }
    }
}

impl WidgetSnapshot {
    /// Projects domain state into a snapshot. Only active reminders are kept,
    /// in listing order, at most `limit` of them.
    pub fn build(
        cars: &[Car],
        reminders: &[Reminder],
        fuel: FuelAggregate,
        today: NaiveDate,
        limit: usize,
    ) -> Self {
        let cars_by_id: HashMap<Uuid, &Car> = cars.iter().map(|c| (c.id, c)).collect();

        let mut upcoming: Vec<Reminder> =
            reminders.iter().filter(|r| r.is_active()).cloned().collect();
        sort_reminders(&mut upcoming);

        let upcoming_reminders = upcoming
            .iter()
            .take(limit)
            .map(|r| {
                let car = cars_by_id.get(&r.car_id);
                let status = compute_due_status(r, today, car.map(|c| c.odometer));
                SnapshotReminder {
                    id: r.id,
                    title: r.title.clone(),
                    due_date: r.due_date,
                    is_overdue: status.is_overdue,
                    car_name: car.map(|c| c.name.clone()),
                }
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            generated_at: Utc::now(),
            placeholder: false,
            cars: cars
                .iter()
                .map(|c| SnapshotCar {
                    id: c.id,
                    name: c.name.clone(),
                })
                .collect(),
            upcoming_reminders,
            fuel: fuel.into(),
        }
    }

    /// Fixed sample data shown when no usable snapshot exists.
    pub fn placeholder() -> Self {
        let car_name = "My Car".to_string();
        Self {
            version: SNAPSHOT_VERSION,
            generated_at: DateTime::<Utc>::UNIX_EPOCH,
            placeholder: true,
            cars: vec![SnapshotCar {
                id: Uuid::from_u128(1),
                name: car_name.clone(),
            }],
            upcoming_reminders: vec![
                SnapshotReminder {
                    id: Uuid::from_u128(2),
                    title: "Oil change".to_string(),
                    due_date: NaiveDate::from_ymd_opt(2025, 1, 15),
                    is_overdue: false,
                    car_name: Some(car_name.clone()),
                },
                SnapshotReminder {
                    id: Uuid::from_u128(3),
                    title: "Insurance renewal".to_string(),
                    due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
                    is_overdue: false,
                    car_name: Some(car_name),
                },
            ],
            fuel: SnapshotFuel {
                average_consumption: Some(6.8),
                total_cost_this_period: 142.5,
                last_unit_price: Some(1.79),
            },
        }
    }
}

/// Writes snapshots for the widget host.
pub struct SnapshotPublisher<W: SnapshotStore> {
    store: W,
    upcoming_limit: usize,
}

impl<W: SnapshotStore> SnapshotPublisher<W> {
    pub fn new(store: W, upcoming_limit: usize) -> Self {
        Self {
            store,
            upcoming_limit,
        }
    }

    pub fn store(&self) -> &W {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut W {
        &mut self.store
    }

    /// Builds a snapshot from current state and replaces the published one.
    pub fn publish(
        &mut self,
        cars: &[Car],
        reminders: &[Reminder],
        fuel: FuelAggregate,
        today: NaiveDate,
    ) -> Result<WidgetSnapshot> {
        let snapshot = WidgetSnapshot::build(cars, reminders, fuel, today, self.upcoming_limit);
        let bytes = serde_json::to_vec(&snapshot)
            .map_err(|e| ServiceDueError::SnapshotWriteFailed(e.to_string()))?;
        self.store
            .write(SNAPSHOT_KEY, &bytes)
            .map_err(|e| ServiceDueError::SnapshotWriteFailed(e.to_string()))?;

        info!(
            cars = snapshot.cars.len(),
            upcoming = snapshot.upcoming_reminders.len(),
            "widget snapshot published"
        );
        Ok(snapshot)
    }
}

/// Reads snapshots on the widget host side. Never writes.
pub struct SnapshotReader<R: SnapshotStore> {
    store: R,
}

impl<R: SnapshotStore> SnapshotReader<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// The last published snapshot, with the reason it is unusable otherwise.
    pub fn try_load(&self) -> Result<WidgetSnapshot> {
        let bytes = self
            .store
            .read(SNAPSHOT_KEY)
            .map_err(|e| ServiceDueError::SnapshotUnavailable(e.to_string()))?
            .ok_or_else(|| ServiceDueError::SnapshotUnavailable("nothing published".to_string()))?;

        let snapshot: WidgetSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceDueError::SnapshotUnavailable(format!("corrupt snapshot: {}", e)))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ServiceDueError::SnapshotUnavailable(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    pub fn load(&self) -> Option<WidgetSnapshot> {
        match self.try_load() {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!(error = %e, "no usable widget snapshot");
                None
            }
        }
    }

    pub fn load_or_placeholder(&self) -> WidgetSnapshot {
        self.load().unwrap_or_else(|| {
            debug!("falling back to placeholder widget snapshot");
            WidgetSnapshot::placeholder()
        })
    }
}
