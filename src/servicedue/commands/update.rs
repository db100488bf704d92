use crate::commands::{finish, CmdMessage, CmdResult, Services};
use crate::error::{Result, ServiceDueError};
use crate::model::{Reminder, ReminderType};
use crate::notify::AlertService;
use crate::snapshot::SnapshotStore;
use crate::store::{Changeset, DataStore};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// Field changes for an existing reminder. `None` leaves a field alone; for
/// optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ReminderUpdate {
    pub kind: Option<ReminderType>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_odometer: Option<Option<i64>>,
    pub notify_days_before: Option<Option<u32>>,
    pub notify_km_before: Option<Option<i64>>,
    pub recurring_interval_months: Option<Option<u32>>,
    pub recurring_interval_km: Option<Option<i64>>,
}

impl ReminderUpdate {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.title.is_none()
            && self.notes.is_none()
            && self.due_date.is_none()
            && self.due_odometer.is_none()
            && self.notify_days_before.is_none()
            && self.notify_km_before.is_none()
            && self.recurring_interval_months.is_none()
            && self.recurring_interval_km.is_none()
    }

    fn apply(self, reminder: &mut Reminder) {
        if let Some(kind) = self.kind {
            reminder.kind = kind;
        }
        if let Some(title) = self.title {
            reminder.title = title;
        }
        if let Some(notes) = self.notes {
            reminder.notes = notes;
        }
        if let Some(due_date) = self.due_date {
            reminder.due_date = due_date;
        }
        if let Some(due_odometer) = self.due_odometer {
            reminder.due_odometer = due_odometer;
        }
        if let Some(days) = self.notify_days_before {
            reminder.notify_days_before = days;
        }
        if let Some(km) = self.notify_km_before {
            reminder.notify_km_before = km;
        }
        if let Some(months) = self.recurring_interval_months {
            reminder.recurring_interval_months = months;
        }
        if let Some(km) = self.recurring_interval_km {
            reminder.recurring_interval_km = km;
        }
        reminder.is_recurring = reminder.recurring_interval_months.is_some()
            || reminder.recurring_interval_km.is_some();
    }
}

pub fn run<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    id: &Uuid,
    update: ReminderUpdate,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let mut reminder = services.store.get_reminder(id)?;
    if reminder.is_completed {
        return Err(ServiceDueError::Api(format!(
            "'{}' is completed and can no longer be edited",
            reminder.title
        )));
    }

    let mut result = CmdResult::default();
    if update.is_empty() {
        result.add_message(CmdMessage::info("Nothing to change"));
        return Ok(result);
    }

    update.apply(&mut reminder);
    services
        .store
        .commit(Changeset::new().reminder(reminder.clone()))?;

    result.add_message(CmdMessage::success(format!(
        "Reminder updated: {}",
        reminder.title
    )));
    finish(services, std::slice::from_ref(&reminder), now, &mut result);
    result.affected_reminders.push(reminder);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{at, services};
    use crate::commands::{complete, create};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn moving_due_date_reschedules_alert() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Service, "Service")
            .with_due_date(date(2025, 6, 1));
        create::run(&mut services, reminder.clone(), at(2025, 5, 1)).unwrap();

        let update = ReminderUpdate {
            due_date: Some(Some(date(2025, 8, 1))),
            ..Default::default()
        };
        run(&mut services, &reminder.id, update, at(2025, 5, 1)).unwrap();

        let pending = services.scheduler.service().pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at.date(), date(2025, 8, 1));
    }

    #[test]
    fn clearing_due_date_cancels_alert() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Service, "Service")
            .with_due_date(date(2025, 6, 1));
        create::run(&mut services, reminder.clone(), at(2025, 5, 1)).unwrap();

        let update = ReminderUpdate {
            due_date: Some(None),
            due_odometer: Some(Some(20_000)),
            ..Default::default()
        };
        run(&mut services, &reminder.id, update, at(2025, 5, 1)).unwrap();
        assert!(services.scheduler.service().pending().unwrap().is_empty());
    }

    #[test]
    fn clearing_intervals_stops_recurrence() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Tires, "Tires")
            .with_due_date(date(2025, 10, 1))
            .recurring(Some(6), None);
        create::run(&mut services, reminder.clone(), at(2025, 5, 1)).unwrap();

        let update = ReminderUpdate {
            recurring_interval_months: Some(None),
            ..Default::default()
        };
        let result = run(&mut services, &reminder.id, update, at(2025, 5, 1)).unwrap();
        assert!(!result.affected_reminders[0].is_recurring);
    }

    #[test]
    fn completed_reminders_are_not_editable() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Service, "Service");
        create::run(&mut services, reminder.clone(), at(2025, 5, 1)).unwrap();
        complete::run(&mut services, &reminder.id, at(2025, 5, 1)).unwrap();

        let update = ReminderUpdate {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(run(&mut services, &reminder.id, update, at(2025, 5, 2)).is_err());
    }

    #[test]
    fn empty_title_is_rejected() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Service, "Service");
        create::run(&mut services, reminder.clone(), at(2025, 5, 1)).unwrap();

        let update = ReminderUpdate {
            title: Some(" ".into()),
            ..Default::default()
        };
        assert!(matches!(
            run(&mut services, &reminder.id, update, at(2025, 5, 2)),
            Err(ServiceDueError::Validation(_))
        ));
        assert_eq!(
            services.store.get_reminder(&reminder.id).unwrap().title,
            "Service"
        );
    }
}
