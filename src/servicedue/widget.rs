//! Widget host. Renders the last published snapshot from the shared
//! directory, or sample data when there is none. It never opens the
//! reminder store and always exits successfully.

use clap::Parser;
use colored::*;
use servicedue::api::AppPaths;
use servicedue::snapshot::fs::FileSnapshotStore;
use servicedue::snapshot::{SnapshotReader, WidgetSnapshot};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SERVICEDUE_LOG";

#[derive(Parser, Debug)]
#[command(name = "servicedue-widget")]
#[command(about = "Show the ServiceDue widget", long_about = None)]
struct Cli {
    /// Print the snapshot as JSON instead of rendering it
    #[arg(long)]
    json: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let default = if cli.verbose { "warn,servicedue=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let snapshot = match AppPaths::from_env() {
        Ok(paths) => SnapshotReader::new(FileSnapshotStore::new(paths.shared)).load_or_placeholder(),
        Err(e) => {
            warn!(error = %e, "no shared directory, showing sample data");
            WidgetSnapshot::placeholder()
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(error = %e, "could not encode snapshot"),
        }
    } else {
        render(&snapshot);
    }
}

fn render(snapshot: &WidgetSnapshot) {
    let heading = "ServiceDue".bold();
    if snapshot.placeholder {
        println!("{} {}", heading, "(sample data)".dimmed());
    } else {
        println!("{}", heading);
    }

    let cars: Vec<&str> = snapshot.cars.iter().map(|c| c.name.as_str()).collect();
    if !cars.is_empty() {
        println!("{}", cars.join(", ").dimmed());
    }

    println!();
    if snapshot.upcoming_reminders.is_empty() {
        println!("  Nothing due");
    }
    for reminder in &snapshot.upcoming_reminders {
        let due = match reminder.due_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "by odometer".to_string(),
        };
        let line = format!(
            "  {:<28} {:<12} {}",
            reminder.title,
            due,
            reminder.car_name.as_deref().unwrap_or("")
        );
        if reminder.is_overdue {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }

    println!();
    let fuel = &snapshot.fuel;
    let average = fuel
        .average_consumption
        .map(|avg| format!("{:.1}/100", avg))
        .unwrap_or_else(|| "-".to_string());
    let price = fuel
        .last_unit_price
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {} {}   {} {:.2}   {} {}",
        "avg".dimmed(),
        average,
        "this month".dimmed(),
        fuel.total_cost_this_period,
        "last price".dimmed(),
        price
    );
}
