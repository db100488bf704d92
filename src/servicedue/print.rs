use chrono::NaiveDateTime;
use colored::*;
use servicedue::api::{CmdMessage, ListedReminder, MessageLevel};
use servicedue::config::AppConfig;
use servicedue::model::{Car, DueStatus};
use servicedue::notify::ScheduledAlert;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const STATUS_WIDTH: usize = 26;
const CAR_WIDTH: usize = 14;
const RECURRING_MARKER: &str = "↻";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_cars(cars: &[Car], config: &AppConfig) {
    if cars.is_empty() {
        println!("No cars yet. Add one with `servicedue car add <name>`.");
        return;
    }
    for car in cars {
        let id = car.id.to_string();
        println!(
            "  {}  {}  {} {}",
            id[..8].dimmed(),
            pad_to_width(&car.name, CAR_WIDTH).bold(),
            car.odometer,
            config.distance_unit
        );
    }
}

pub fn print_reminders(reminders: &[ListedReminder], config: &AppConfig) {
    if reminders.is_empty() {
        println!("No reminders found.");
        return;
    }

    for listed in reminders {
        let idx_str = match listed.index {
            Some(n) => format!("{:>3}. ", n),
            None => "   ✓ ".to_string(),
        };
        let marker = if listed.reminder.is_recurring {
            format!("{} ", RECURRING_MARKER)
        } else {
            "  ".to_string()
        };
        let car = pad_to_width(listed.car_name.as_deref().unwrap_or("?"), CAR_WIDTH);
        let status = if listed.reminder.is_completed {
            match listed.reminder.completed_date {
                Some(date) => format!("done {}", date.format("%Y-%m-%d")),
                None => "done".to_string(),
            }
        } else {
            format_status(&listed.status, &config.distance_unit)
        };

        let fixed = idx_str.width() + marker.width() + CAR_WIDTH + 1 + STATUS_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&listed.reminder.title, available);
        let padding = available.saturating_sub(title.width());

        let status_colored = if listed.reminder.is_completed {
            status.dimmed()
        } else if listed.status.is_overdue {
            status.red()
        } else if is_soon(&listed.status) {
            status.yellow()
        } else {
            status.normal()
        };
        let idx_colored = if listed.status.is_overdue && !listed.reminder.is_completed {
            idx_str.red()
        } else {
            idx_str.normal()
        };

        println!(
            "{}{}{} {}{}{}",
            idx_colored,
            car.dimmed(),
            marker,
            title,
            " ".repeat(padding),
            status_colored
        );
    }
}

pub fn print_alerts(alerts: &[ScheduledAlert], now: NaiveDateTime) {
    if alerts.is_empty() {
        println!("No alerts scheduled.");
        return;
    }
    for alert in alerts {
        let when = if alert.fire_at <= now {
            pad_to_width("due now", 16).yellow()
        } else {
            pad_to_width(&alert.fire_at.format("%Y-%m-%d %H:%M").to_string(), 16).normal()
        };
        println!(
            "  {}  {}  {}",
            when,
            alert.payload.title.bold(),
            alert.payload.body.dimmed()
        );
    }
}

pub fn print_config(config: &AppConfig) {
    for key in AppConfig::KEYS {
        if let Ok(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

/// Human-readable due status: days, distance, or both.
pub fn format_status(status: &DueStatus, distance_unit: &str) -> String {
    let mut parts = Vec::new();
    if let Some(days) = status.days_until_due {
        parts.push(match days {
            0 => "due today".to_string(),
            1 => "tomorrow".to_string(),
            -1 => "1 day overdue".to_string(),
            d if d < 0 => format!("{} days overdue", -d),
            d => format!("in {} days", d),
        });
    }
    if let Some(distance) = status.distance_until_due {
        parts.push(match distance {
            0 => "due now".to_string(),
            d if d < 0 => format!("{} {} over", -d, distance_unit),
            d => format!("in {} {}", d, distance_unit),
        });
    }
    if parts.is_empty() {
        return "no due point".to_string();
    }
    parts.join(" / ")
}

fn is_soon(status: &DueStatus) -> bool {
    matches!(status.days_until_due, Some(d) if d <= 7)
}

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}
