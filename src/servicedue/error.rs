use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceDueError {
    #[error("Reminder not found: {0}")]
    ReminderNotFound(Uuid),

    #[error("Car not found: {0}")]
    CarNotFound(String),

    #[error("Reminder already completed: {0}")]
    AlreadyCompleted(Uuid),

    #[error("Alert authorization denied")]
    AlertAuthorizationDenied,

    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    #[error("Snapshot write failed: {0}")]
    SnapshotWriteFailed(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ServiceDueError>;
