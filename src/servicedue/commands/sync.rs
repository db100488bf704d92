use crate::commands::{publish, surface_denial, CmdMessage, CmdResult, Services};
use crate::error::Result;
use crate::notify::AlertService;
use crate::snapshot::SnapshotStore;
use crate::store::DataStore;
use chrono::NaiveDateTime;
use tracing::info;

/// Full reconciliation, as run on application start: every active reminder
/// gets its alert re-registered, alerts of vanished reminders are cancelled,
/// and the widget snapshot is republished.
pub fn run<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let active = services.store.active_reminders(None)?;
    let report = services.scheduler.reconcile_all(&active, now)?;
    info!(
        scheduled = report.scheduled,
        cancelled = report.cancelled,
        suppressed = report.suppressed,
        "alerts reconciled"
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Synced {} reminders: {} alerts scheduled",
        active.len(),
        report.scheduled
    )));
    surface_denial(services, &mut result);
    publish(services, now, &mut result);
    Ok(result)
}
