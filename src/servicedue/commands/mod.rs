//! # Command Layer
//!
//! Business operations. Each command takes [`Services`] and an explicit `now`,
//! and returns a [`CmdResult`]; none of them print.
//!
//! Every command that changes reminders, cars or fuel entries ends with
//! [`finish`]: reconcile the alerts of the touched reminders, then publish a
//! fresh widget snapshot. Both steps are best effort. Their failures become
//! warnings on the result and never undo the committed change.

use crate::config::AppConfig;
use crate::error::{Result, ServiceDueError};
use crate::fuel;
use crate::model::{Car, DueStatus, Reminder};
use crate::notify::{AlertService, NotificationScheduler, ScheduledAlert};
use crate::odometer::OdometerReport;
use crate::snapshot::{SnapshotPublisher, SnapshotStore, WidgetSnapshot};
use crate::store::DataStore;
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub mod alerts;
pub mod cars;
pub mod complete;
pub mod config;
pub mod create;
pub mod delete;
pub mod list;
pub mod readings;
pub mod sync;
pub mod update;

pub const HOME_ENV: &str = "SERVICEDUE_HOME";
pub const SHARED_DIR_ENV: &str = "SERVICEDUE_SHARED_DIR";

#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Application-private data: store, alert registry, config.
    pub data: PathBuf,
    /// Directory shared with the widget host.
    pub shared: PathBuf,
}

impl AppPaths {
    /// `SERVICEDUE_HOME`, else the platform data dir. The shared directory
    /// defaults to `<data>/shared` unless `SERVICEDUE_SHARED_DIR` is set.
    pub fn from_env() -> Result<Self> {
        let data = match env::var_os(HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => ProjectDirs::from("com", "servicedue", "servicedue")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    ServiceDueError::Api("Could not determine data directory".to_string())
                })?,
        };
        let shared = env::var_os(SHARED_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data.join("shared"));
        Ok(Self { data, shared })
    }
}

/// The store and the two external resources every mutation touches.
pub struct Services<S: DataStore, A: AlertService, W: SnapshotStore> {
    pub store: S,
    pub scheduler: NotificationScheduler<A>,
    pub publisher: SnapshotPublisher<W>,
}

impl<S: DataStore, A: AlertService, W: SnapshotStore> Services<S, A, W> {
    pub fn new(store: S, alerts: A, snapshots: W, config: &AppConfig) -> Self {
        Self {
            store,
            scheduler: NotificationScheduler::new(alerts, config.alert_hour),
            publisher: SnapshotPublisher::new(snapshots, config.upcoming_limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A reminder as shown in a listing.
#[derive(Debug, Clone)]
pub struct ListedReminder {
    /// 1-based position among all active reminders; `None` once completed.
    pub index: Option<usize>,
    pub reminder: Reminder,
    pub status: DueStatus,
    pub car_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_reminders: Vec<Reminder>,
    pub listed_reminders: Vec<ListedReminder>,
    pub cars: Vec<Car>,
    pub alerts: Vec<ScheduledAlert>,
    pub odometer: Option<OdometerReport>,
    pub snapshot: Option<WidgetSnapshot>,
    pub config: Option<AppConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_reminders(mut self, reminders: Vec<Reminder>) -> Self {
        self.affected_reminders = reminders;
        self
    }

    pub fn with_listed_reminders(mut self, reminders: Vec<ListedReminder>) -> Self {
        self.listed_reminders = reminders;
        self
    }

    pub fn with_cars(mut self, cars: Vec<Car>) -> Self {
        self.cars = cars;
        self
    }

    pub fn with_alerts(mut self, alerts: Vec<ScheduledAlert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Post-mutation pipeline: reconcile alerts for `touched`, then republish the
/// widget snapshot.
pub fn finish<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    touched: &[Reminder],
    now: NaiveDateTime,
    result: &mut CmdResult,
) {
    for reminder in touched {
        if let Err(e) = services.scheduler.reconcile(reminder, now) {
            warn!(reminder = %reminder.id, error = %e, "alert reconciliation failed");
            result.add_message(CmdMessage::warning(format!(
                "Could not update the alert for '{}': {}",
                reminder.title, e
            )));
        }
    }
    surface_denial(services, result);
    publish(services, now, result);
}

pub(crate) fn surface_denial<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    result: &mut CmdResult,
) {
    match services.scheduler.take_denial_notice() {
        Ok(Some(notice)) => result.add_message(CmdMessage::warning(notice)),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not record alert denial notice"),
    }
}

/// Rebuilds and writes the widget snapshot. Failures are reported, not raised.
pub(crate) fn publish<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    now: NaiveDateTime,
    result: &mut CmdResult,
) {
    match try_publish(services, now) {
        Ok(snapshot) => result.snapshot = Some(snapshot),
        Err(e) => {
            warn!(error = %e, "widget snapshot not updated");
            result.add_message(CmdMessage::warning(format!(
                "Widget data was not updated: {}",
                e
            )));
        }
    }
}

fn try_publish<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    now: NaiveDateTime,
) -> Result<WidgetSnapshot> {
    let today = now.date();
    let cars = services.store.list_cars()?;
    let active = services.store.active_reminders(None)?;
    let aggregate = fuel::aggregate(&services.store.list_fuel_entries()?, today);
    services.publisher.publish(&cars, &active, aggregate, today)
}
