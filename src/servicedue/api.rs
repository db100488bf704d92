//! # API Facade
//!
//! The single entry point for all operations, whatever the UI. It dispatches
//! to `commands/*.rs` and does the input normalization the commands do not:
//!
//! - resolving reminder selectors (list position or id prefix) to ids
//! - resolving car references (name or id prefix) to cars
//! - turning CLI-shaped drafts into [`Reminder`] and [`FuelEntry`] values
//! - supplying `now`
//!
//! `ServiceDueApi<S, A, W>` is generic over the store, the alert service and
//! the snapshot store, so it can be exercised entirely in memory.

use crate::commands::{self, CmdResult};
use crate::error::{Result, ServiceDueError};
use crate::model::{Car, FuelEntry, Reminder, ReminderType};
use crate::notify::AlertService;
use crate::snapshot::SnapshotStore;
use crate::store::DataStore;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::str::FromStr;
use uuid::Uuid;

const MIN_ID_PREFIX: usize = 4;

/// How the user points at a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderSelector {
    /// 1-based position in the active listing
    Index(usize),
    /// Leading characters of the reminder id
    IdPrefix(String),
}

impl FromStr for ReminderSelector {
    type Err = ServiceDueError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            if n == 0 {
                return Err(ServiceDueError::Api("Indexes start at 1".to_string()));
            }
            return Ok(ReminderSelector::Index(n));
        }
        let is_hex = s.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
        if s.len() >= MIN_ID_PREFIX && is_hex {
            return Ok(ReminderSelector::IdPrefix(s.to_lowercase()));
        }
        Err(ServiceDueError::Api(format!(
            "'{}' is neither a list index nor an id prefix",
            s
        )))
    }
}

/// A new reminder as entered by the user, before it is tied to a car.
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub kind: ReminderType,
    pub title: String,
    pub notes: String,
    pub due_date: Option<NaiveDate>,
    pub due_odometer: Option<i64>,
    pub notify_days_before: Option<u32>,
    pub notify_km_before: Option<i64>,
    pub every_months: Option<u32>,
    pub every_km: Option<i64>,
}

impl ReminderDraft {
    pub fn new(kind: ReminderType, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            notes: String::new(),
            due_date: None,
            due_odometer: None,
            notify_days_before: None,
            notify_km_before: None,
            every_months: None,
            every_km: None,
        }
    }

    fn into_reminder(self, car_id: Uuid) -> Reminder {
        let mut reminder = Reminder::new(car_id, self.kind, self.title).with_notes(self.notes);
        reminder.due_date = self.due_date;
        reminder.due_odometer = self.due_odometer;
        reminder.notify_days_before = self.notify_days_before;
        reminder.notify_km_before = self.notify_km_before;
        if self.every_months.is_some() || self.every_km.is_some() {
            reminder = reminder.recurring(self.every_months, self.every_km);
        }
        reminder
    }
}

#[derive(Debug, Clone)]
pub struct FuelDraft {
    pub date: Option<NaiveDate>,
    pub odometer: i64,
    pub volume: f64,
    pub unit_price: f64,
    pub total_cost: Option<f64>,
    pub partial: bool,
}

pub struct ServiceDueApi<S: DataStore, A: AlertService, W: SnapshotStore> {
    services: Services<S, A, W>,
    paths: AppPaths,
    clock: Option<NaiveDateTime>,
}

impl<S: DataStore, A: AlertService, W: SnapshotStore> ServiceDueApi<S, A, W> {
    pub fn new(services: Services<S, A, W>, paths: AppPaths) -> Self {
        Self {
            services,
            paths,
            clock: None,
        }
    }

    /// Pin "now" instead of reading the local clock.
    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn add_car(&mut self, name: String, odometer: i64) -> Result<CmdResult> {
        let now = self.now();
        commands::cars::add(&mut self.services, name, odometer, now)
    }

    pub fn list_cars(&self) -> Result<CmdResult> {
        commands::cars::list(&self.services.store)
    }

    pub fn create_reminder(&mut self, car: &str, draft: ReminderDraft) -> Result<CmdResult> {
        let car = self.resolve_car(car)?;
        let now = self.now();
        commands::create::run(&mut self.services, draft.into_reminder(car.id), now)
    }

    pub fn update_reminder(
        &mut self,
        selector: &ReminderSelector,
        update: commands::update::ReminderUpdate,
    ) -> Result<CmdResult> {
        let id = self.resolve_reminder(selector)?;
        let now = self.now();
        commands::update::run(&mut self.services, &id, update, now)
    }

    pub fn complete_reminder(&mut self, selector: &ReminderSelector) -> Result<CmdResult> {
        let id = self.resolve_reminder(selector)?;
        let now = self.now();
        commands::complete::run(&mut self.services, &id, now)
    }

    pub fn delete_reminder(&mut self, selector: &ReminderSelector) -> Result<CmdResult> {
        let id = self.resolve_reminder(selector)?;
        let now = self.now();
        commands::delete::run(&mut self.services, &id, now)
    }

    pub fn list_reminders(&self, car: Option<&str>, include_completed: bool) -> Result<CmdResult> {
        let car_id = match car {
            Some(reference) => Some(self.resolve_car(reference)?.id),
            None => None,
        };
        let filter = ReminderFilter {
            car_id,
            include_completed,
        };
        commands::list::run(&self.services.store, &filter, self.now().date())
    }

    pub fn record_fuel(&mut self, car: &str, draft: FuelDraft) -> Result<CmdResult> {
        let car = self.resolve_car(car)?;
        let now = self.now();
        let date = draft.date.unwrap_or(now.date());
        let mut entry = FuelEntry::new(car.id, date, draft.odometer, draft.volume, draft.unit_price);
        if let Some(total) = draft.total_cost {
            entry.total_cost = total;
        }
        if draft.partial {
            entry = entry.partial();
        }
        commands::readings::record_fuel(&mut self.services, entry, now)
    }

    pub fn record_odometer(&mut self, car: &str, reading: i64) -> Result<CmdResult> {
        let car = self.resolve_car(car)?;
        let now = self.now();
        commands::readings::record_odometer(&mut self.services, &car.id, reading, now)
    }

    pub fn alerts(&self) -> Result<CmdResult> {
        commands::alerts::run(self.services.scheduler.service())
    }

    pub fn sync(&mut self) -> Result<CmdResult> {
        let now = self.now();
        commands::sync::run(&mut self.services, now)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    fn resolve_car(&self, reference: &str) -> Result<Car> {
        let reference = reference.trim();
        let cars = self.services.store.list_cars()?;

        if let Some(car) = cars.iter().find(|c| c.name.eq_ignore_ascii_case(reference)) {
            return Ok(car.clone());
        }

        let needle = reference.to_lowercase();
        let by_id: Vec<&Car> = if needle.len() >= MIN_ID_PREFIX {
            cars.iter()
                .filter(|c| c.id.to_string().starts_with(&needle))
                .collect()
        } else {
            Vec::new()
        };
        match by_id.as_slice() {
            [car] => Ok((*car).clone()),
            [] => Err(ServiceDueError::CarNotFound(reference.to_string())),
            _ => Err(ServiceDueError::Api(format!(
                "'{}' matches more than one car",
                reference
            ))),
        }
    }

    fn resolve_reminder(&self, selector: &ReminderSelector) -> Result<Uuid> {
        match selector {
            ReminderSelector::Index(n) => self
                .services
                .store
                .active_reminders(None)?
                .get(n.wrapping_sub(1))
                .map(|r| r.id)
                .ok_or_else(|| ServiceDueError::Api(format!("No active reminder at index {}", n))),
            ReminderSelector::IdPrefix(prefix) => {
                let matches: Vec<Uuid> = self
                    .services
                    .store
                    .list_reminders()?
                    .into_iter()
                    .map(|r| r.id)
                    .filter(|id| id.to_string().starts_with(prefix.as_str()))
                    .collect();
                match matches.as_slice() {
                    [id] => Ok(*id),
                    [] => Err(ServiceDueError::Api(format!(
                        "No reminder id starts with {}",
                        prefix
                    ))),
                    _ => Err(ServiceDueError::Api(format!(
                        "Id prefix {} is ambiguous",
                        prefix
                    ))),
                }
            }
        }
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::list::ReminderFilter;
pub use crate::commands::update::ReminderUpdate;
pub use crate::commands::{AppPaths, CmdMessage, ListedReminder, MessageLevel, Services};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::notify::memory::InMemoryAlertService;
    use crate::snapshot::memory::InMemorySnapshotStore;
    use crate::store::memory::InMemoryStore;
    use std::path::PathBuf;

    type TestApi = ServiceDueApi<InMemoryStore, InMemoryAlertService, InMemorySnapshotStore>;

    fn api() -> TestApi {
        let services = Services::new(
            InMemoryStore::new(),
            InMemoryAlertService::new(),
            InMemorySnapshotStore::new(),
            &AppConfig::default(),
        );
        let paths = AppPaths {
            data: PathBuf::from("/nonexistent"),
            shared: PathBuf::from("/nonexistent/shared"),
        };
        let now = NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        ServiceDueApi::new(services, paths).with_clock(now)
    }

    fn insurance_draft() -> ReminderDraft {
        let mut draft = ReminderDraft::new(ReminderType::Insurance, "Insurance");
        draft.due_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        draft.notify_days_before = Some(7);
        draft
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(
            "2".parse::<ReminderSelector>().unwrap(),
            ReminderSelector::Index(2)
        );
        assert_eq!(
            "AB12cd".parse::<ReminderSelector>().unwrap(),
            ReminderSelector::IdPrefix("ab12cd".into())
        );
        assert!("0".parse::<ReminderSelector>().is_err());
        assert!("ab".parse::<ReminderSelector>().is_err());
        assert!("oil".parse::<ReminderSelector>().is_err());
    }

    #[test]
    fn car_resolves_by_name_case_insensitively() {
        let mut api = api();
        api.add_car("Civic".into(), 0).unwrap();
        let result = api.create_reminder("civic", insurance_draft()).unwrap();
        assert_eq!(result.affected_reminders.len(), 1);
        assert!(api.create_reminder("Golf", insurance_draft()).is_err());
    }

    #[test]
    fn car_resolves_by_id_prefix() {
        let mut api = api();
        let car = api.add_car("Civic".into(), 0).unwrap().cars.remove(0);
        let prefix = &car.id.to_string()[..8];
        assert!(api.create_reminder(prefix, insurance_draft()).is_ok());
    }

    #[test]
    fn complete_by_index_and_prefix() {
        let mut api = api();
        api.add_car("Civic".into(), 0).unwrap();
        let first = api.create_reminder("Civic", insurance_draft()).unwrap();
        let mut second = insurance_draft();
        second.title = "Registration".to_string();
        api.create_reminder("Civic", second).unwrap();

        api.complete_reminder(&ReminderSelector::Index(2)).unwrap();
        assert_eq!(api.list_reminders(None, false).unwrap().listed_reminders.len(), 1);

        let id = first.affected_reminders[0].id.to_string();
        let selector: ReminderSelector = id[..8].parse().unwrap();
        api.complete_reminder(&selector).unwrap();
        assert!(api.list_reminders(None, false).unwrap().listed_reminders.is_empty());
    }

    #[test]
    fn out_of_range_index_errors() {
        let mut api = api();
        assert!(api.complete_reminder(&ReminderSelector::Index(1)).is_err());
    }

    #[test]
    fn draft_with_interval_becomes_recurring() {
        let mut api = api();
        api.add_car("Civic".into(), 0).unwrap();
        let mut draft = insurance_draft();
        draft.every_months = Some(12);
        let result = api.create_reminder("Civic", draft).unwrap();
        assert!(result.affected_reminders[0].is_recurring);
    }

    #[test]
    fn fuel_defaults_to_today_and_explicit_total() {
        let mut api = api();
        api.add_car("Civic".into(), 1_000).unwrap();
        let draft = FuelDraft {
            date: None,
            odometer: 1_500,
            volume: 30.0,
            unit_price: 1.5,
            total_cost: Some(44.0),
            partial: false,
        };
        let result = api.record_fuel("Civic", draft).unwrap();
        let fuel = result.snapshot.unwrap().fuel;
        assert!((fuel.total_cost_this_period - 44.0).abs() < 1e-9);
        assert_eq!(result.cars[0].odometer, 1_500);
    }

    #[test]
    fn scheduled_alert_matches_lead_time() {
        let mut api = api();
        api.add_car("Civic".into(), 0).unwrap();
        api.create_reminder("Civic", insurance_draft()).unwrap();
        let alerts = api.alerts().unwrap().alerts;
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].fire_at.date(),
            NaiveDate::from_ymd_opt(2025, 5, 25).unwrap()
        );
    }
}
