// Expense Tracker - Core Library
// Exposes all modules for use in the CLI/TUI, the API server, and tests

pub mod aggregate;
pub mod auth;
pub mod code_examples;
pub mod config;
pub mod controller;
pub mod currency;
pub mod db;
pub mod error;
pub mod export;
pub mod form;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use aggregate::{
    by_category, by_day, by_month, recent, summarize, top_n, total, MonthlySummary, Summary,
};
pub use auth::{authenticate, CredentialVerifier, Credentials, StaticCredentials};
pub use code_examples::Language;
pub use config::{init_logger, Settings};
pub use controller::{Page, Request, Screen, Submission, ViewController, Visualization};
pub use currency::Currency;
pub use db::{Category, ExpenseRecord, Store};
pub use error::{Result, TrackerError, ValidationError};
pub use export::{load_csv, read_csv, to_csv, write_csv};
pub use form::ExpenseForm;
