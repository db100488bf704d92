//! # Odometer Threshold Monitor
//!
//! Distance triggers cannot be put on a clock, so they are re-checked each
//! time a car gets a new odometer reading (a fuel entry or a manual reading).
//!
//! The monitor compares every active, odometer-bearing reminder of that car at
//! the previous reading and at the new one, and reports the ones that crossed
//! into overdue or into their `notify_km_before` window. Transitions are
//! surfaced through due status only; no alert is registered for them.

use crate::model::{DueStatus, Reminder};
use crate::recurrence::compute_due_status;
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct OdometerReport {
    pub car_id: Uuid,
    pub previous: Option<i64>,
    pub current: i64,
    /// Number of reminders re-evaluated.
    pub evaluated: usize,
    pub newly_overdue: Vec<Reminder>,
    pub entered_notice_window: Vec<Reminder>,
}

impl OdometerReport {
    pub fn has_transitions(&self) -> bool {
        !self.newly_overdue.is_empty() || !self.entered_notice_window.is_empty()
    }
}

/// Re-evaluates distance triggers of `car_id` after its reading moved from
/// `previous` to `current`.
pub fn evaluate(
    reminders: &[Reminder],
    car_id: Uuid,
    previous: Option<i64>,
    current: i64,
    today: NaiveDate,
) -> OdometerReport {
    let mut report = OdometerReport {
        car_id,
        previous,
        current,
        ..Default::default()
    };

    let watched = reminders
        .iter()
        .filter(|r| r.is_active() && r.car_id == car_id && r.due_odometer.is_some());

    for reminder in watched {
        report.evaluated += 1;
        let before = compute_due_status(reminder, today, previous);
        let after = compute_due_status(reminder, today, Some(current));

        if after.is_overdue && !before.is_overdue {
            report.newly_overdue.push(reminder.clone());
        } else if in_notice_window(reminder, &after) && !in_notice_window(reminder, &before) {
            report.entered_notice_window.push(reminder.clone());
        }
    }

    report
}

fn in_notice_window(reminder: &Reminder, status: &DueStatus) -> bool {
    match (reminder.notify_km_before, status.distance_until_due) {
        (Some(lead), Some(left)) => left > 0 && left <= lead,
        _ => false,
    }
}
