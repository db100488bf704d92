use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::notify::{AlertService, Authorization};

/// Lists outstanding alerts in firing order.
pub fn run<A: AlertService>(service: &A) -> Result<CmdResult> {
    let mut alerts = service.pending()?;
    alerts.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));

    let mut result = CmdResult::default();
    if service.authorization() == Authorization::Denied {
        result.add_message(CmdMessage::warning(
            "Notifications are disabled; no alerts are being scheduled",
        ));
    }
    Ok(result.with_alerts(alerts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::testing::{at, services};
    use crate::model::{Reminder, ReminderType};
    use crate::notify::memory::InMemoryAlertService;
    use chrono::NaiveDate;

    #[test]
    fn alerts_come_back_in_firing_order() {
        let (mut services, car) = services();
        for (title, day) in [("Later", 20), ("Sooner", 10)] {
            let reminder = Reminder::new(car.id, ReminderType::Service, title)
                .with_due_date(NaiveDate::from_ymd_opt(2025, 6, day).unwrap());
            create::run(&mut services, reminder, at(2025, 5, 1)).unwrap();
        }

        let result = run(services.scheduler.service()).unwrap();
        let titles: Vec<&str> = result
            .alerts
            .iter()
            .map(|a| a.payload.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[test]
    fn denied_service_warns() {
        let service = InMemoryAlertService::new().with_authorization(Authorization::Denied);
        let result = run(&service).unwrap();
        assert!(result.alerts.is_empty());
        assert!(result.has_warnings());
    }
}
