// Expense Tracker - Web Server
// JSON API over the same controller the TUI uses

use anyhow::{Context, Result};
use clap::Parser;
use expense_tracker::server::{router, AppState, PASSWORD_HEADER, USERNAME_HEADER};
use expense_tracker::{init_logger, Settings};
use tracing::info;

/// expense-tracker-server: serve the expense dashboard as a JSON API.
#[derive(Debug, Parser)]
#[command(version)]
struct ServerArgs {
    #[command(flatten)]
    settings: Settings,

    /// Address to listen on.
    #[arg(long, env = "EXPENSE_TRACKER_BIND", default_value = "127.0.0.1:8501")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_logger(args.settings.log_level(), args.settings.log_file())?;

    let state = AppState::new(args.settings.controller(), args.settings.currency());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;

    info!(db = %args.settings.db().display(), "using expense store");
    info!("Server running on http://{}", args.bind);
    info!(
        "Send {} / {} headers with every request, e.g. GET /api/expenses",
        USERNAME_HEADER, PASSWORD_HEADER
    );

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
