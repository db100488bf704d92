use crate::commands::{CmdResult, ListedReminder};
use crate::error::Result;
use crate::model::{Car, Reminder};
use crate::recurrence::{compute_due_status, sort_reminders};
use crate::store::DataStore;
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub car_id: Option<Uuid>,
    pub include_completed: bool,
}

/// Lists reminders with their due status as of `today`.
///
/// Active reminders are numbered by their position across all cars, so an
/// index stays the same whether or not the listing is filtered by car.
/// Completed reminders, when included, follow unnumbered, most recent first.
pub fn run<S: DataStore>(store: &S, filter: &ReminderFilter, today: NaiveDate) -> Result<CmdResult> {
    let cars: HashMap<Uuid, Car> = store.list_cars()?.into_iter().map(|c| (c.id, c)).collect();
    let active = store.active_reminders(None)?;

    let mut listed: Vec<ListedReminder> = active
        .into_iter()
        .enumerate()
        .map(|(i, reminder)| listed_entry(reminder, Some(i + 1), &cars, today))
        .collect();

    if filter.include_completed {
        let mut completed: Vec<Reminder> = store
            .list_reminders()?
            .into_iter()
            .filter(|r| r.is_completed)
            .collect();
        sort_reminders(&mut completed);
        completed.sort_by(|a, b| b.completed_date.cmp(&a.completed_date));
        listed.extend(
            completed
                .into_iter()
                .map(|reminder| listed_entry(reminder, None, &cars, today)),
        );
    }

    if let Some(car_id) = &filter.car_id {
        listed.retain(|l| &l.reminder.car_id == car_id);
    }

    Ok(CmdResult::default().with_listed_reminders(listed))
}

fn listed_entry(
    reminder: Reminder,
    index: Option<usize>,
    cars: &HashMap<Uuid, Car>,
    today: NaiveDate,
) -> ListedReminder {
    let car = cars.get(&reminder.car_id);
    let status = compute_due_status(&reminder, today, car.map(|c| c.odometer));
    ListedReminder {
        index,
        car_name: car.map(|c| c.name.clone()),
        reminder,
        status,
    }
}
