use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use servicedue::model::ReminderType;

#[derive(Parser, Debug)]
#[command(name = "servicedue")]
#[command(about = "Maintenance reminders for your cars", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage cars
    Car {
        #[command(subcommand)]
        action: CarCommands,
    },

    /// Add a reminder to a car
    #[command(alias = "n")]
    Add {
        /// Car name or id prefix
        car: String,

        /// Title of the reminder
        title: String,

        /// Reminder type (service, oil-change, tires, inspection, insurance, registration, custom)
        #[arg(short = 't', long = "type", default_value = "service")]
        kind: ReminderType,

        #[arg(long)]
        notes: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<NaiveDate>,

        /// Odometer reading at which it is due
        #[arg(short = 'k', long)]
        due_km: Option<i64>,

        /// Alert this many days before the due date
        #[arg(long)]
        notify_days: Option<u32>,

        /// Warn this far before the due odometer
        #[arg(long)]
        notify_km: Option<i64>,

        /// Repeat every N months after completion
        #[arg(long)]
        every_months: Option<u32>,

        /// Repeat every N distance units after completion
        #[arg(long)]
        every_km: Option<i64>,
    },

    /// Change an active reminder
    #[command(alias = "e")]
    Edit {
        /// List index or id prefix
        reminder: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<ReminderType>,

        #[arg(long)]
        notes: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(short = 'k', long, conflicts_with = "clear_due_km")]
        due_km: Option<i64>,

        /// Remove the due odometer
        #[arg(long)]
        clear_due_km: bool,

        #[arg(long)]
        notify_days: Option<u32>,

        #[arg(long)]
        notify_km: Option<i64>,

        #[arg(long, conflicts_with = "no_repeat")]
        every_months: Option<u32>,

        #[arg(long, conflicts_with = "no_repeat")]
        every_km: Option<i64>,

        /// Stop the reminder from recurring
        #[arg(long)]
        no_repeat: bool,
    },

    /// List reminders with their due status
    #[command(alias = "ls")]
    List {
        /// Only reminders for this car
        #[arg(short, long)]
        car: Option<String>,

        /// Include completed reminders
        #[arg(short, long)]
        all: bool,
    },

    /// Mark a reminder done (schedules the next one if it repeats)
    #[command(alias = "done")]
    Complete {
        /// List index or id prefix
        reminder: String,
    },

    /// Delete a reminder
    #[command(alias = "rm")]
    Delete {
        /// List index or id prefix
        reminder: String,
    },

    /// Record a fuel fill-up
    Fuel {
        /// Car name or id prefix
        car: String,

        /// Odometer at the fill-up
        #[arg(short, long)]
        odometer: i64,

        /// Volume filled
        #[arg(short = 'l', long)]
        volume: f64,

        /// Price per unit of volume
        #[arg(short, long)]
        price: f64,

        /// Total paid, if it differs from volume x price
        #[arg(long)]
        total: Option<f64>,

        /// Date of the fill-up (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// The tank was not filled up completely
        #[arg(long)]
        partial: bool,
    },

    /// Record an odometer reading
    #[command(alias = "odo")]
    Odometer {
        /// Car name or id prefix
        car: String,

        reading: i64,
    },

    /// Show scheduled alerts
    Alerts,

    /// Rebuild alerts and widget data from the stored reminders
    Sync,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., alert-hour)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CarCommands {
    /// Add a car
    Add {
        name: String,

        /// Current odometer reading
        #[arg(short, long, default_value_t = 0)]
        odometer: i64,
    },

    /// List cars
    #[command(alias = "ls")]
    List,
}
