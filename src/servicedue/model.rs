use crate::error::{Result, ServiceDueError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category tag for a reminder. Carries display hints only, no behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Service,
    OilChange,
    Tires,
    Inspection,
    Insurance,
    Registration,
    Custom,
}

impl ReminderType {
    pub const ALL: [ReminderType; 7] = [
        ReminderType::Service,
        ReminderType::OilChange,
        ReminderType::Tires,
        ReminderType::Inspection,
        ReminderType::Insurance,
        ReminderType::Registration,
        ReminderType::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReminderType::Service => "Service",
            ReminderType::OilChange => "Oil change",
            ReminderType::Tires => "Tires",
            ReminderType::Inspection => "Inspection",
            ReminderType::Insurance => "Insurance",
            ReminderType::Registration => "Registration",
            ReminderType::Custom => "Custom",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ReminderType::Service => "wrench",
            ReminderType::OilChange => "drop",
            ReminderType::Tires => "circle",
            ReminderType::Inspection => "checklist",
            ReminderType::Insurance => "shield",
            ReminderType::Registration => "doc",
            ReminderType::Custom => "bell",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ReminderType::Service => "service",
            ReminderType::OilChange => "oil_change",
            ReminderType::Tires => "tires",
            ReminderType::Inspection => "inspection",
            ReminderType::Insurance => "insurance",
            ReminderType::Registration => "registration",
            ReminderType::Custom => "custom",
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ReminderType {
    type Err = ServiceDueError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        ReminderType::ALL
            .into_iter()
            .find(|t| t.key() == normalized)
            .ok_or_else(|| ServiceDueError::Validation(format!("Unknown reminder type: {}", s)))
    }
}

/// A vehicle. Reminders and fuel entries point at it by id; it owns neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    /// Latest known odometer reading, in the base distance unit.
    pub odometer: i64,
    pub created_at: DateTime<Utc>,
}

impl Car {
    pub fn new(name: impl Into<String>, odometer: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            odometer,
            created_at: Utc::now(),
        }
    }
}

/// One maintenance obligation.
///
/// The two due triggers are independent: a reminder may carry a date, an
/// odometer value, both, or neither (in which case it never becomes due).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub car_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ReminderType,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    pub due_date: Option<NaiveDate>,
    pub due_odometer: Option<i64>,
    pub notify_days_before: Option<u32>,
    pub notify_km_before: Option<i64>,
    pub is_recurring: bool,
    pub recurring_interval_months: Option<u32>,
    pub recurring_interval_km: Option<i64>,
    pub is_completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(car_id: Uuid, kind: ReminderType, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            kind,
            title: title.into(),
            notes: String::new(),
            due_date: None,
            due_odometer: None,
            notify_days_before: None,
            notify_km_before: None,
            is_recurring: false,
            recurring_interval_months: None,
            recurring_interval_km: None,
            is_completed: false,
            completed_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_due_odometer(mut self, odometer: i64) -> Self {
        self.due_odometer = Some(odometer);
        self
    }

    pub fn notify_days_before(mut self, days: u32) -> Self {
        self.notify_days_before = Some(days);
        self
    }

    pub fn notify_km_before(mut self, km: i64) -> Self {
        self.notify_km_before = Some(km);
        self
    }

    pub fn recurring(mut self, months: Option<u32>, km: Option<i64>) -> Self {
        self.is_recurring = true;
        self.recurring_interval_months = months;
        self.recurring_interval_km = km;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// Checks the invariants a reminder must hold before it is stored.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ServiceDueError::Validation(
                "Reminder title cannot be empty".to_string(),
            ));
        }
        if self.is_recurring
            && self.recurring_interval_months.is_none()
            && self.recurring_interval_km.is_none()
        {
            return Err(ServiceDueError::Validation(
                "A recurring reminder needs a month or distance interval".to_string(),
            ));
        }
        if self.recurring_interval_months == Some(0) || self.recurring_interval_km == Some(0) {
            return Err(ServiceDueError::Validation(
                "Recurrence intervals must be greater than zero".to_string(),
            ));
        }
        if matches!(self.recurring_interval_km, Some(km) if km < 0)
            || matches!(self.notify_km_before, Some(km) if km < 0)
            || matches!(self.due_odometer, Some(km) if km < 0)
        {
            return Err(ServiceDueError::Validation(
                "Distances cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Computed due state of a reminder. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueStatus {
    pub is_overdue: bool,
    pub days_until_due: Option<i64>,
    /// Negative once the odometer has passed the due reading.
    pub distance_until_due: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEntry {
    pub id: Uuid,
    pub car_id: Uuid,
    pub date: NaiveDate,
    pub odometer: i64,
    pub volume: f64,
    pub unit_price: f64,
    pub total_cost: f64,
    pub is_full_tank: bool,
}

impl FuelEntry {
    pub fn new(car_id: Uuid, date: NaiveDate, odometer: i64, volume: f64, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            date,
            odometer,
            volume,
            unit_price,
            total_cost: volume * unit_price,
            is_full_tank: true,
        }
    }

    pub fn partial(mut self) -> Self {
        self.is_full_tank = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.odometer < 0 {
            return Err(ServiceDueError::Validation(
                "Odometer cannot be negative".to_string(),
            ));
        }
        if !(self.volume > 0.0) || !(self.unit_price >= 0.0) {
            return Err(ServiceDueError::Validation(
                "Fuel volume must be positive and price non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fuel figures shown next to the reminders on the widget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FuelAggregate {
    /// Volume per 100 distance units.
    pub average_consumption: Option<f64>,
    pub total_cost_this_period: f64,
    pub last_unit_price: Option<f64>,
}
