use crate::commands::{finish, CmdMessage, CmdResult, Services};
use crate::error::Result;
use crate::notify::AlertService;
use crate::recurrence;
use crate::snapshot::SnapshotStore;
use crate::store::{Changeset, DataStore};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Completes a reminder. For recurring reminders the completed record and its
/// successor are committed together.
pub fn run<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    id: &Uuid,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let reminder = services.store.get_reminder(id)?;
    let completion = recurrence::complete(&reminder, now.date())?;

    let mut changes = Changeset::new().reminder(completion.completed.clone());
    if let Some(next) = &completion.successor {
        changes = changes.reminder(next.clone());
    }
    services.store.commit(changes)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Completed: {}",
        completion.completed.title
    )));

    let mut touched = vec![completion.completed];
    if let Some(next) = completion.successor {
        result.add_message(CmdMessage::info(format!(
            "Next {} {}",
            next.title,
            describe_due(&next)
        )));
        touched.push(next);
    }

    finish(services, &touched, now, &mut result);
    Ok(result.with_affected_reminders(touched))
}

fn describe_due(reminder: &crate::model::Reminder) -> String {
    match (reminder.due_date, reminder.due_odometer) {
        (Some(date), Some(km)) => format!("due {} or at {}", date, km),
        (Some(date), None) => format!("due {}", date),
        (None, Some(km)) => format!("due at {}", km),
        (None, None) => "has no due trigger".to_string(),
    }
}
