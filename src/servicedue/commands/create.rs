use crate::commands::{finish, CmdMessage, CmdResult, Services};
use crate::error::Result;
use crate::model::Reminder;
use crate::notify::AlertService;
use crate::snapshot::SnapshotStore;
use crate::store::{Changeset, DataStore};
use chrono::NaiveDateTime;

pub fn run<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    reminder: Reminder,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    services
        .store
        .commit(Changeset::new().reminder(reminder.clone()))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Reminder created: {}",
        reminder.title
    )));
    if reminder.due_date.is_none() && reminder.due_odometer.is_none() {
        result.add_message(CmdMessage::info(
            "No due date or odometer set; this reminder will never become due",
        ));
    }

    finish(services, std::slice::from_ref(&reminder), now, &mut result);
    result.affected_reminders.push(reminder);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{at, services};
    use crate::error::ServiceDueError;
    use crate::model::ReminderType;
    use crate::notify::Authorization;
    use crate::snapshot::SnapshotReader;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn creates_schedules_and_publishes() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Inspection, "Inspection")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .notify_days_before(7);

        let result = run(&mut services, reminder.clone(), at(2025, 5, 1)).unwrap();
        assert_eq!(result.affected_reminders.len(), 1);
        assert!(!result.has_warnings());

        assert_eq!(services.store.get_reminder(&reminder.id).unwrap(), reminder);
        let pending = services.scheduler.service().pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, reminder.id);

        let snapshot = SnapshotReader::new(services.publisher.store().clone())
            .load()
            .unwrap();
        assert_eq!(snapshot.upcoming_reminders[0].id, reminder.id);
    }

    #[test]
    fn unknown_car_is_rejected_without_side_effects() {
        let (mut services, _) = services();
        let reminder = Reminder::new(Uuid::new_v4(), ReminderType::Service, "Service")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        let result = run(&mut services, reminder, at(2025, 5, 1));
        assert!(matches!(result, Err(ServiceDueError::CarNotFound(_))));
        assert!(services.scheduler.service().pending().unwrap().is_empty());
        assert!(services.publisher.store().read("widget-snapshot").unwrap().is_none());
    }

    #[test]
    fn denied_alerts_still_store_reminder_and_warn_once() {
        let (mut services, car) = services();
        services
            .scheduler
            .service_mut()
            .set_authorization(Authorization::Denied);

        let first = Reminder::new(car.id, ReminderType::Insurance, "Insurance")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let second = Reminder::new(car.id, ReminderType::Registration, "Registration")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());

        let result = run(&mut services, first.clone(), at(2025, 5, 1)).unwrap();
        assert!(result.has_warnings());
        let result = run(&mut services, second, at(2025, 5, 1)).unwrap();
        assert!(!result.has_warnings());

        assert!(services.store.get_reminder(&first.id).is_ok());
        assert!(services.scheduler.service().pending().unwrap().is_empty());
    }

    #[test]
    fn reminder_without_triggers_gets_a_hint() {
        let (mut services, car) = services();
        let reminder = Reminder::new(car.id, ReminderType::Custom, "Someday");
        let result = run(&mut services, reminder, at(2025, 5, 1)).unwrap();
        assert_eq!(result.messages.len(), 2);
    }
}
