use crate::commands::{publish, CmdMessage, CmdResult, Services};
use crate::error::{Result, ServiceDueError};
use crate::model::Car;
use crate::notify::AlertService;
use crate::snapshot::SnapshotStore;
use crate::store::{Changeset, DataStore};
use chrono::NaiveDateTime;

pub fn add<S: DataStore, A: AlertService, W: SnapshotStore>(
    services: &mut Services<S, A, W>,
    name: String,
    odometer: i64,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    if odometer < 0 {
        return Err(ServiceDueError::Validation(
            "Odometer cannot be negative".to_string(),
        ));
    }
    let car = Car::new(name.trim(), odometer);
    services.store.commit(Changeset::new().car(car.clone()))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Car added: {}", car.name)));
    publish(services, now, &mut result);
    Ok(result.with_cars(vec![car]))
}

pub fn list<S: DataStore>(store: &S) -> Result<CmdResult> {
    Ok(CmdResult::default().with_cars(store.list_cars()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{at, services};

    #[test]
    fn added_car_shows_up_in_list_and_snapshot() {
        let (mut services, _) = services();
        let result = add(&mut services, " Golf ".into(), 42_000, at(2025, 5, 1)).unwrap();
        assert_eq!(result.cars[0].name, "Golf");

        let snapshot = result.snapshot.unwrap();
        assert!(snapshot.cars.iter().any(|c| c.name == "Golf"));

        let listed = list(&services.store).unwrap();
        assert_eq!(listed.cars.len(), 2);
    }

    #[test]
    fn blank_name_is_rejected() {
        let (mut services, _) = services();
        assert!(add(&mut services, "   ".into(), 0, at(2025, 5, 1)).is_err());
    }

    #[test]
    fn negative_odometer_is_rejected() {
        let (mut services, _) = services();
        assert!(matches!(
            add(&mut services, "Golf".into(), -1, at(2025, 5, 1)),
            Err(ServiceDueError::Validation(_))
        ));
    }
}
