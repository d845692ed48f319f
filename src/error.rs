use thiserror::Error;

/// Failures surfaced to the user for a single interaction. None are retried.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Incorrect Username/Password")]
    AuthFailure,
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Stored date is not YYYY-MM-DD: {value}")]
    InvalidDate { value: String },
    #[error("CSV line {line}: amount must be a finite number, got {value}")]
    NonFiniteAmount { line: u64, value: f64 },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejections raised by the add-expense form before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
    #[error("Amount must be a number, got '{0}'")]
    InvalidAmount(String),
    #[error("Amount must be at least 0.01, got {0}")]
    AmountBelowMinimum(f64),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
