//! Settings shared by the CLI and the server, plus logger setup.

use crate::auth::StaticCredentials;
use crate::controller::ViewController;
use crate::currency::Currency;
use clap::Args;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Storage, gate and display settings. Defaults match a fresh install:
/// `expenses.db` in the working directory and the admin/password pair.
#[derive(Debug, Args, Clone)]
pub struct Settings {
    /// The SQLite database file holding expenses. Created if absent.
    #[arg(long, env = "EXPENSE_TRACKER_DB", default_value = "expenses.db")]
    db: PathBuf,

    /// The username the Session Gate accepts.
    #[arg(long, env = "EXPENSE_TRACKER_AUTH_USERNAME", default_value = "admin")]
    auth_username: String,

    /// The password the Session Gate accepts. Compared as plain text.
    #[arg(
        long,
        env = "EXPENSE_TRACKER_AUTH_PASSWORD",
        default_value = "password",
        hide_env_values = true
    )]
    auth_password: String,

    /// Display currency label: USD, EUR, GBP or INR. Amounts are never converted.
    #[arg(long, env = "EXPENSE_TRACKER_CURRENCY", default_value_t = Currency::Usd)]
    currency: Currency,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Settings {
    pub fn db(&self) -> &Path {
        &self.db
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn verifier(&self) -> StaticCredentials {
        StaticCredentials::new(&self.auth_username, &self.auth_password)
    }

    pub fn controller(&self) -> ViewController<StaticCredentials> {
        ViewController::new(&self.db, self.verifier())
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate only.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> io::Result<()> {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["expense-tracker"]).unwrap();
        let settings = cli.settings;

        // The environment may carry overrides; only check what it cannot touch.
        assert_eq!(settings.log_level(), LevelFilter::INFO);
        assert!(settings.log_file().is_none());
    }

    #[test]
    fn test_flags_override() {
        let cli = TestCli::try_parse_from([
            "expense-tracker",
            "--db",
            "/tmp/other.db",
            "--auth-username",
            "alice",
            "--auth-password",
            "s3cret",
            "--currency",
            "gbp",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let settings = cli.settings;

        assert_eq!(settings.db(), Path::new("/tmp/other.db"));
        assert_eq!(settings.currency(), Currency::Gbp);
        assert_eq!(settings.log_level(), LevelFilter::DEBUG);
        assert_eq!(settings.controller().store_path(), Path::new("/tmp/other.db"));

        use crate::auth::CredentialVerifier;
        let verifier = settings.verifier();
        assert!(verifier.verify("alice", "s3cret"));
        assert!(!verifier.verify("admin", "password"));
    }

    #[test]
    fn test_rejects_unknown_currency() {
        assert!(TestCli::try_parse_from(["expense-tracker", "--currency", "JPY"]).is_err());
    }
}
