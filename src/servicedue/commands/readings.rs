use crate::commands::{finish, CmdMessage, CmdResult, Services};
use crate::error::{Result, ServiceDueError};
use crate::model::{Car, FuelEntry};
use crate::notify::AlertService;
use crate::odometer;
use crate::snapshot::SnapshotStore;
use crate::store::{Changeset, DataStore};
use chrono::NaiveDateTime;
use tracing::debug;
use uuid::Uuid;

/// Records a plain odometer reading for a car.
pub fn record_odometer<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    car_id: &Uuid,
    reading: i64,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let car = services.store.get_car(car_id)?;
    if reading < car.odometer {
        return Err(ServiceDueError::Validation(format!(
            "Reading {} is below the current odometer of {}",
            reading, car.odometer
        )));
    }
    let mut result = apply_reading(services, car, reading, None, now)?;
    result.messages.insert(
        0,
        CmdMessage::success(format!("Odometer set to {}", reading)),
    );
    Ok(result)
}

/// Records a fuel entry. Its odometer value doubles as a new reading, though
/// a back-dated entry never moves the car's odometer backwards.
pub fn record_fuel<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    entry: FuelEntry,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let car = services.store.get_car(&entry.car_id)?;
    let reading = entry.odometer;
    let summary = format!(
        "Fuel recorded: {:.2} at {:.3} ({:.2} total)",
        entry.volume, entry.unit_price, entry.total_cost
    );
    let mut result = apply_reading(services, car, reading, Some(entry), now)?;
    result.messages.insert(0, CmdMessage::success(summary));
    Ok(result)
}

fn apply_reading<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    mut car: Car,
    reading: i64,
    entry: Option<FuelEntry>,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let previous = car.odometer;
    car.odometer = previous.max(reading);

    let mut changes = Changeset::new().car(car.clone());
    if let Some(entry) = entry {
        changes = changes.fuel_entry(entry);
    }
    services.store.commit(changes)?;

    let active = services.store.active_reminders(Some(&car.id))?;
    let report = odometer::evaluate(&active, car.id, Some(previous), car.odometer, now.date());
    debug!(
        car = %car.id,
        previous,
        current = car.odometer,
        evaluated = report.evaluated,
        "odometer thresholds re-evaluated"
    );

    let mut result = CmdResult::default();
    for reminder in &report.newly_overdue {
        result.add_message(CmdMessage::warning(format!(
            "Now due: {} ({})",
            reminder.title, car.name
        )));
    }
    for reminder in &report.entered_notice_window {
        let left = reminder.due_odometer.unwrap_or(car.odometer) - car.odometer;
        result.add_message(CmdMessage::info(format!(
            "Coming up: {} in {} ({})",
            reminder.title, left, car.name
        )));
    }
    result.odometer = Some(report);

    finish(services, &[], now, &mut result);
    Ok(result.with_cars(vec![car]))
}
