//! # ServiceDue Architecture
//!
//! ServiceDue tracks maintenance reminders for cars: date and distance based due
//! points, recurring services, fuel history, alerts ahead of a due date and a
//! compact snapshot that a separate display surface (the widget) can read.
//!
//! Like any UI-agnostic library, the core never prints and never exits. The
//! `servicedue` binary is one client of it. The `servicedue-widget` binary is
//! another, and it only ever sees the published snapshot.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (args.rs, print.rs, main.rs) / widget.rs               │
//! │  - Parses arguments, formats output, owns stdout/stderr     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Resolves list positions, id prefixes and car names       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Store write, then alert reconciliation, then snapshot    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engines and contracts                                      │
//! │  - recurrence, fuel, odometer: pure functions               │
//! │  - store::DataStore, notify::AlertService,                  │
//! │    snapshot::SnapshotStore: file and in-memory backends     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//!
//! The reminder store is the source of truth. Alerts and the widget snapshot are
//! derived from it and rebuilt after every mutation; when either one cannot be
//! updated the command still succeeds and reports a warning. `servicedue sync`
//! rebuilds both from scratch.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`model`]: `Car`, `Reminder`, `FuelEntry` and friends
//! - [`recurrence`]: Due status, completion and successors, ordering
//! - [`fuel`]: Fuel aggregates shown on the widget
//! - [`odometer`]: Threshold transitions when a car's reading changes
//! - [`notify`]: Alert service contract and the notification scheduler
//! - [`snapshot`]: Widget snapshot format, publisher and reader
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fuel;
pub mod model;
pub mod notify;
pub mod odometer;
pub mod recurrence;
pub mod snapshot;
pub mod store;
