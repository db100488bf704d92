use crate::commands::{publish, CmdMessage, CmdResult, Services};
use crate::error::Result;
use crate::notify::AlertService;
use crate::snapshot::SnapshotStore;
use crate::store::DataStore;
use chrono::NaiveDateTime;
use tracing::warn;
use uuid::Uuid;

/// Permanently removes a reminder at the user's request, along with its alert.
pub fn run<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    id: &Uuid,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let reminder = services.store.get_reminder(id)?;
    services.store.delete_reminder(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Reminder deleted: {}",
        reminder.title
    )));

    if let Err(e) = services.scheduler.service_mut().cancel(id) {
        warn!(reminder = %id, error = %e, "could not cancel alert of deleted reminder");
        result.add_message(CmdMessage::warning(format!(
            "Could not remove the alert for '{}': {}",
            reminder.title, e
        )));
    }
    publish(services, now, &mut result);
    result.affected_reminders.push(reminder);
    Ok(result)
}
