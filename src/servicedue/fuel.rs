use crate::model::{FuelAggregate, FuelEntry};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Aggregates fuel entries for display.
///
/// Consumption is measured per car between its first and last full-tank
/// fills: every fill after the first full tank refills what was burned since,
/// so their volumes over the distance between the two full tanks gives the
/// average. Cars are then combined by total volume over total distance.
/// The cost period is the calendar month containing `today`.
pub fn aggregate(entries: &[FuelEntry], today: NaiveDate) -> FuelAggregate {
    let mut ordered: Vec<&FuelEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.odometer.cmp(&b.odometer)));

    let total_cost_this_period = ordered
        .iter()
        .filter(|e| e.date.year() == today.year() && e.date.month() == today.month())
        .map(|e| e.total_cost)
        .sum();

    FuelAggregate {
        average_consumption: average_consumption(&ordered),
        total_cost_this_period,
        last_unit_price: ordered.last().map(|e| e.unit_price),
    }
}

fn average_consumption(ordered: &[&FuelEntry]) -> Option<f64> {
    let mut by_car: BTreeMap<Uuid, Vec<&FuelEntry>> = BTreeMap::new();
    for entry in ordered {
        by_car.entry(entry.car_id).or_default().push(entry);
    }

    let (volume, distance) = by_car
        .values()
        .filter_map(|fills| full_tank_span(fills))
        .fold((0.0, 0i64), |(v, d), (volume, distance)| (v + volume, d + distance));

    if distance <= 0 {
        return None;
    }
    Some(volume / distance as f64 * 100.0)
}

/// Volume burned and distance driven between one car's first and last full tank.
fn full_tank_span(fills: &[&FuelEntry]) -> Option<(f64, i64)> {
    let first = fills.iter().position(|e| e.is_full_tank)?;
    let last = fills.iter().rposition(|e| e.is_full_tank)?;
    if last <= first {
        return None;
    }

    let distance = fills[last].odometer - fills[first].odometer;
    if distance <= 0 {
        return None;
    }

    let volume: f64 = fills[first + 1..=last].iter().map(|e| e.volume).sum();
    Some((volume, distance))
}
