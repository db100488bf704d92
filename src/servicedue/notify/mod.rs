//! # Notification Scheduler
//!
//! Maps active reminders onto timed alerts held by an [`AlertService`] (the
//! OS alert registry, or a stand-in for it).
//!
//! ## Invariant
//!
//! At most one outstanding alert per active, date-bearing reminder, keyed by
//! the reminder id. Completed and undated reminders have none.
//!
//! Every reconcile cancels by id before registering, so running it twice with
//! the same input leaves exactly one alert behind.
//!
//! ## Authorization
//!
//! When the service reports [`Authorization::Denied`], reconciliation skips
//! registration and reports [`ReconcileOutcome::Suppressed`]. Reminder data is
//! unaffected. The scheduler remembers the denial and hands out a single user
//! notice through [`NotificationScheduler::take_denial_notice`]; the service
//! records that it was shown so the notice is not repeated on later runs.
//!
//! Distance-based reminders are not scheduled here, see [`crate::odometer`].

use crate::error::{Result, ServiceDueError};
use crate::model::Reminder;
use chrono::{Days, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod fs;
pub mod memory;

pub const DENIAL_NOTICE: &str =
    "Notifications are disabled; reminders are tracked but no alerts will be shown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub reminder_id: Uuid,
    pub title: String,
    pub body: String,
}

/// One timed alert, keyed by the id of the reminder it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAlert {
    pub id: Uuid,
    pub fire_at: NaiveDateTime,
    pub payload: AlertPayload,
}

/// The OS alert service contract. `register` and `cancel` are idempotent
/// and keyed by the reminder id.
pub trait AlertService {
    fn authorization(&self) -> Authorization;

    /// Register `alert`, replacing any alert with the same id.
    fn register(&mut self, alert: ScheduledAlert) -> Result<()>;

    /// Remove the alert for `id`. Missing ids are not an error.
    fn cancel(&mut self, id: &Uuid) -> Result<()>;

    fn pending(&self) -> Result<Vec<ScheduledAlert>>;

    /// Whether the user has already been told alerts are disabled.
    fn denial_acknowledged(&self) -> bool {
        false
    }

    fn acknowledge_denial(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Scheduled(ScheduledAlert),
    Cancelled,
    Suppressed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub scheduled: usize,
    pub cancelled: usize,
    pub suppressed: usize,
}

pub struct NotificationScheduler<A: AlertService> {
    service: A,
    alert_time: NaiveTime,
    denied: bool,
}

impl<A: AlertService> NotificationScheduler<A> {
    /// `alert_hour` is the local hour at which lead-time alerts fire.
    pub fn new(service: A, alert_hour: u32) -> Self {
        let alert_time = NaiveTime::from_hms_opt(alert_hour.min(23), 0, 0).unwrap_or_default();
        Self {
            service,
            alert_time,
            denied: false,
        }
    }

    pub fn service(&self) -> &A {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut A {
        &mut self.service
    }

    /// When the alert for `reminder` should fire, or `None` if it should have none.
    pub fn fire_at(&self, reminder: &Reminder, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if reminder.is_completed {
            return None;
        }
        let due = reminder.due_date?;
        let lead = Days::new(u64::from(reminder.notify_days_before.unwrap_or(0)));
        let target = due
            .checked_sub_days(lead)
            .map(|day| day.and_time(self.alert_time))
            .unwrap_or(now);
        Some(target.max(now))
    }

    pub fn reconcile(&mut self, reminder: &Reminder, now: NaiveDateTime) -> Result<ReconcileOutcome> {
        // The previous alert goes first so no stale one survives a denial
        self.service.cancel(&reminder.id)?;

        let Some(fire_at) = self.fire_at(reminder, now) else {
            debug!(reminder = %reminder.id, "alert cancelled");
            return Ok(ReconcileOutcome::Cancelled);
        };

        if self.service.authorization() == Authorization::Denied {
            self.note_denial();
            return Ok(ReconcileOutcome::Suppressed);
        }

        let alert = ScheduledAlert {
            id: reminder.id,
            fire_at,
            payload: payload_for(reminder),
        };

        match self.service.register(alert.clone()) {
            Ok(()) => {
                debug!(reminder = %reminder.id, %fire_at, "alert scheduled");
                Ok(ReconcileOutcome::Scheduled(alert))
            }
            Err(ServiceDueError::AlertAuthorizationDenied) => {
                self.note_denial();
                Ok(ReconcileOutcome::Suppressed)
            }
            Err(e) => Err(e),
        }
    }

    /// Reconcile the complete set of active reminders, and cancel any
    /// outstanding alert whose reminder is not in it.
    pub fn reconcile_all(
        &mut self,
        reminders: &[Reminder],
        now: NaiveDateTime,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        let known: HashSet<Uuid> = reminders.iter().map(|r| r.id).collect();
        for stale in self.service.pending()? {
            if !known.contains(&stale.id) {
                self.service.cancel(&stale.id)?;
                debug!(reminder = %stale.id, "stale alert cancelled");
                report.cancelled += 1;
            }
        }

        for reminder in reminders {
            match self.reconcile(reminder, now)? {
                ReconcileOutcome::Scheduled(_) => report.scheduled += 1,
                ReconcileOutcome::Cancelled => report.cancelled += 1,
                ReconcileOutcome::Suppressed => report.suppressed += 1,
            }
        }
        Ok(report)
    }

    /// The one-time notice that alerts are disabled, if it is due.
    pub fn take_denial_notice(&mut self) -> Result<Option<&'static str>> {
        if !self.denied || self.service.denial_acknowledged() {
            return Ok(None);
        }
        self.service.acknowledge_denial()?;
        Ok(Some(DENIAL_NOTICE))
    }

    fn note_denial(&mut self) {
        if !self.denied {
            warn!("alert authorization denied, alerts will not be scheduled");
        }
        self.denied = true;
    }
}

fn payload_for(reminder: &Reminder) -> AlertPayload {
    let body = match reminder.due_date {
        Some(due) => format!("{} is due on {}", reminder.kind.label(), due.format("%Y-%m-%d")),
        None => format!("{} is due", reminder.kind.label()),
    };
    AlertPayload {
        reminder_id: reminder.id,
        title: reminder.title.clone(),
        body,
    }
}
