//! # Recurrence Engine
//!
//! Pure functions over [`Reminder`] values: due-status computation, completion
//! with successor derivation, and the ordering used by every reminder listing.
//!
//! Nothing here touches a store. Completing a reminder returns the updated
//! reminder and, for recurring ones, a fresh successor; the caller persists both.
//!
//! ## Successor odometer
//!
//! The successor's due reading is the predecessor's *due* reading plus the
//! interval, not the reading at which the work was actually done. A service due
//! at 10 000 and completed at 10 200 with a 5 000 interval is next due at 15 000.

use crate::error::{Result, ServiceDueError};
use crate::model::{DueStatus, Reminder};
use chrono::{Months, NaiveDate, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

/// Result of completing a reminder.
#[derive(Debug, Clone)]
pub struct Completion {
    pub completed: Reminder,
    pub successor: Option<Reminder>,
}

/// Due state of `reminder` as of `today`, given the car's latest odometer reading.
pub fn compute_due_status(
    reminder: &Reminder,
    today: NaiveDate,
    latest_odometer: Option<i64>,
) -> DueStatus {
    let days_until_due = reminder
        .due_date
        .map(|due| due.signed_duration_since(today).num_days());

    let distance_until_due = match (reminder.due_odometer, latest_odometer) {
        (Some(due), Some(latest)) => Some(due - latest),
        _ => None,
    };

    let date_overdue = reminder.due_date.is_some_and(|due| due < today);
    let distance_overdue = distance_until_due.is_some_and(|left| left <= 0);

    DueStatus {
        is_overdue: date_overdue || distance_overdue,
        days_until_due,
        distance_until_due,
    }
}

/// Marks `reminder` completed on `today` and derives its successor if it recurs.
pub fn complete(reminder: &Reminder, today: NaiveDate) -> Result<Completion> {
    if reminder.is_completed {
        return Err(ServiceDueError::AlreadyCompleted(reminder.id));
    }

    let mut completed = reminder.clone();
    completed.is_completed = true;
    completed.completed_date = Some(today);

    let successor = if reminder.is_recurring {
        Some(next_occurrence(reminder)?)
    } else {
        None
    };

    Ok(Completion {
        completed,
        successor,
    })
}

fn next_occurrence(reminder: &Reminder) -> Result<Reminder> {
    let due_date = match (reminder.due_date, reminder.recurring_interval_months) {
        (Some(date), Some(months)) => Some(add_months(date, months)?),
        _ => None,
    };
    let due_odometer = match (reminder.due_odometer, reminder.recurring_interval_km) {
        (Some(odometer), Some(km)) => Some(odometer.checked_add(km).ok_or_else(|| {
            ServiceDueError::Validation(format!("{} + {} km is out of range", odometer, km))
        })?),
        _ => None,
    };

    Ok(Reminder {
        id: Uuid::new_v4(),
        due_date,
        due_odometer,
        is_completed: false,
        completed_date: None,
        created_at: Utc::now(),
        ..reminder.clone()
    })
}

/// Adds calendar months, clamping to the last day of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        ServiceDueError::Validation(format!("{} + {} months is out of range", date, months))
    })
}

/// Listing order: due date ascending with undated reminders last, then due
/// odometer ascending (missing last), then title and id for stability.
pub fn compare_reminders(a: &Reminder, b: &Reminder) -> Ordering {
    missing_last(a.due_date, b.due_date)
        .then_with(|| missing_last(a.due_odometer, b.due_odometer))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_reminders(reminders: &mut [Reminder]) {
    reminders.sort_by(compare_reminders);
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
