use chrono::Local;
use clap::Parser;
use servicedue::api::{
    AppPaths, ConfigAction, FuelDraft, ReminderDraft, ReminderSelector, ReminderUpdate,
    ServiceDueApi, Services,
};
use servicedue::config::AppConfig;
use servicedue::error::Result;
use servicedue::notify::fs::FileAlertRegistry;
use servicedue::notify::Authorization;
use servicedue::snapshot::fs::FileSnapshotStore;
use servicedue::store::fs::FileStore;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod args;
mod print;
use args::{CarCommands, Cli, Commands};
use print::{print_alerts, print_cars, print_config, print_messages, print_reminders};

const LOG_ENV: &str = "SERVICEDUE_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,servicedue=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

type CliApi = ServiceDueApi<FileStore, FileAlertRegistry, FileSnapshotStore>;

struct AppContext {
    api: CliApi,
    config: AppConfig,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Car { action }) => handle_car(&mut ctx, action),
        Some(Commands::Add {
            car,
            title,
            kind,
            notes,
            due,
            due_km,
            notify_days,
            notify_km,
            every_months,
            every_km,
        }) => {
            let mut draft = ReminderDraft::new(kind, title);
            draft.notes = notes.unwrap_or_default();
            draft.due_date = due;
            draft.due_odometer = due_km;
            draft.notify_days_before = notify_days;
            draft.notify_km_before = notify_km;
            draft.every_months = every_months;
            draft.every_km = every_km;
            handle_add(&mut ctx, &car, draft)
        }
        Some(Commands::Edit {
            reminder,
            title,
            kind,
            notes,
            due,
            clear_due,
            due_km,
            clear_due_km,
            notify_days,
            notify_km,
            every_months,
            every_km,
            no_repeat,
        }) => {
            let update = ReminderUpdate {
                kind,
                title,
                notes,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                due_odometer: if clear_due_km {
                    Some(None)
                } else {
                    due_km.map(Some)
                },
                notify_days_before: notify_days.map(Some),
                notify_km_before: notify_km.map(Some),
                recurring_interval_months: if no_repeat {
                    Some(None)
                } else {
                    every_months.map(Some)
                },
                recurring_interval_km: if no_repeat {
                    Some(None)
                } else {
                    every_km.map(Some)
                },
            };
            handle_edit(&mut ctx, &reminder, update)
        }
        Some(Commands::List { car, all }) => handle_list(&ctx, car.as_deref(), all),
        Some(Commands::Complete { reminder }) => handle_complete(&mut ctx, &reminder),
        Some(Commands::Delete { reminder }) => handle_delete(&mut ctx, &reminder),
        Some(Commands::Fuel {
            car,
            odometer,
            volume,
            price,
            total,
            date,
            partial,
        }) => {
            let draft = FuelDraft {
                date,
                odometer,
                volume,
                unit_price: price,
                total_cost: total,
                partial,
            };
            handle_fuel(&mut ctx, &car, draft)
        }
        Some(Commands::Odometer { car, reading }) => handle_odometer(&mut ctx, &car, reading),
        Some(Commands::Alerts) => handle_alerts(&ctx),
        Some(Commands::Sync) => handle_sync(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, None, false),
    }
}

fn init_context() -> Result<AppContext> {
    let paths = AppPaths::from_env()?;
    let config = AppConfig::load(&paths.data).unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        AppConfig::default()
    });

    let authorization = if config.notifications_enabled {
        Authorization::Granted
    } else {
        Authorization::Denied
    };
    let services = Services::new(
        FileStore::new(&paths.data),
        FileAlertRegistry::new(&paths.data, authorization),
        FileSnapshotStore::new(&paths.shared),
        &config,
    );

    Ok(AppContext {
        api: ServiceDueApi::new(services, paths),
        config,
    })
}

fn handle_car(ctx: &mut AppContext, action: CarCommands) -> Result<()> {
    let result = match action {
        CarCommands::Add { name, odometer } => ctx.api.add_car(name, odometer)?,
        CarCommands::List => {
            let result = ctx.api.list_cars()?;
            print_cars(&result.cars, &ctx.config);
            result
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, car: &str, draft: ReminderDraft) -> Result<()> {
    let result = ctx.api.create_reminder(car, draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, reminder: &str, update: ReminderUpdate) -> Result<()> {
    let selector: ReminderSelector = reminder.parse()?;
    let result = ctx.api.update_reminder(&selector, update)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, car: Option<&str>, all: bool) -> Result<()> {
    let result = ctx.api.list_reminders(car, all)?;
    print_reminders(&result.listed_reminders, &ctx.config);
    print_messages(&result.messages);
    Ok(())
}

fn handle_complete(ctx: &mut AppContext, reminder: &str) -> Result<()> {
    let selector: ReminderSelector = reminder.parse()?;
    let result = ctx.api.complete_reminder(&selector)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, reminder: &str) -> Result<()> {
    let selector: ReminderSelector = reminder.parse()?;
    let result = ctx.api.delete_reminder(&selector)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_fuel(ctx: &mut AppContext, car: &str, draft: FuelDraft) -> Result<()> {
    let result = ctx.api.record_fuel(car, draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_odometer(ctx: &mut AppContext, car: &str, reading: i64) -> Result<()> {
    let result = ctx.api.record_odometer(car, reading)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_alerts(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.alerts()?;
    print_alerts(&result.alerts, Local::now().naive_local());
    print_messages(&result.messages);
    Ok(())
}

fn handle_sync(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.sync()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
