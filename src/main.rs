// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use expense_tracker::code_examples::Language;
use expense_tracker::{
    init_logger, load_csv, Credentials, Currency, ExpenseForm, ExpenseRecord, Page, Request,
    Screen, Settings, Submission, Visualization,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

/// expense-tracker: record expenses, list them, and view spending summaries.
///
/// Without a subcommand this opens the interactive dashboard.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Username submitted to the login gate (non-interactive commands).
    #[arg(long, env = "EXPENSE_TRACKER_USERNAME", default_value = "")]
    username: String,

    /// Password submitted to the login gate (non-interactive commands).
    #[arg(
        long,
        env = "EXPENSE_TRACKER_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    password: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive dashboard (the default).
    Ui,
    /// Add one expense.
    Add {
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        amount: String,
        /// Food, Transportation, Housing, Utilities, Entertainment or Other.
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Print every stored expense.
    List,
    /// Write all expenses as CSV.
    Export {
        /// Output file, stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the spending analysis.
    Report,
    /// Print a static code example.
    Examples {
        #[arg(long, default_value_t = Language::Python)]
        language: Language,
    },
    /// Append every row of a CSV file (date,amount,category,description).
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so without a log file it stays silent.
    let interactive = matches!(cli.command, None | Some(Command::Ui));
    let level = if interactive && cli.settings.log_file().is_none() {
        LevelFilter::OFF
    } else {
        cli.settings.log_level()
    };
    init_logger(level, cli.settings.log_file())?;
    debug!("Log level set to {}", level.to_string().to_lowercase());

    let credentials = Credentials::new(&cli.username, &cli.password);
    let currency = cli.settings.currency();

    match cli.command {
        None | Some(Command::Ui) => run_ui_mode(&cli.settings)?,
        Some(Command::Add {
            date,
            amount,
            category,
            description,
        }) => {
            let controller = cli.settings.controller();
            controller.admit(&credentials)?;

            let date = date.unwrap_or_else(|| today().format("%Y-%m-%d").to_string());
            let form = ExpenseForm::parse(&date, &amount, &category, &description)?;
            let request = Request::new(credentials, Page::AddExpense)
                .with_currency(currency)
                .with_submission(form);

            match controller.handle(&request)? {
                Screen::AddExpense {
                    submission: Some(Submission::Added(record)),
                    ..
                } => {
                    println!("✅ Expense Added Successfully");
                    print_records(&[record], currency);
                }
                Screen::AddExpense {
                    submission: Some(Submission::Rejected(e)),
                    ..
                } => bail!(e),
                other => bail!("unexpected screen: {:?}", other.page()),
            }
        }
        Some(Command::List) => {
            let request = Request::new(credentials, Page::ViewExpenses).with_currency(currency);
            let screen = cli.settings.controller().handle(&request)?;
            if let Screen::ViewExpenses { records, .. } = screen {
                print_records(&records, currency);
                println!("\n{} expenses", records.len());
            }
        }
        Some(Command::Export { output }) => {
            let request = Request::new(credentials, Page::ViewExpenses);
            let screen = cli.settings.controller().handle(&request)?;
            if let Screen::ViewExpenses { export, .. } = screen {
                let Some(csv) = export else {
                    bail!("No expenses recorded yet, nothing to export.");
                };
                match output {
                    Some(path) => {
                        std::fs::write(&path, csv)?;
                        info!(path = %path.display(), "exported expenses");
                    }
                    None => print!("{}", csv),
                }
            }
        }
        Some(Command::Report) => {
            let request = Request::new(credentials, Page::Visualize).with_currency(currency);
            let screen = cli.settings.controller().handle(&request)?;
            if let Screen::Visualize { visualization, .. } = screen {
                print_report(&visualization, currency);
            }
        }
        Some(Command::Examples { language }) => {
            let request = Request::new(credentials, Page::CodeExamples).with_language(language);
            let screen = cli.settings.controller().handle(&request)?;
            if let Screen::CodeExamples { language, snippet } = screen {
                println!("── {} ──\n{}", language, snippet);
            }
        }
        Some(Command::Import { file }) => {
            let imported = cli.settings.controller().with_store(&credentials, |store| {
                let records = load_csv(&file)?;
                for record in &records {
                    store.append_record(record)?;
                }
                store.count().map(|total| (records.len(), total))
            })?;
            println!("✓ Imported {} expenses ({} stored)", imported.0, imported.1);
        }
    }

    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_records(records: &[ExpenseRecord], currency: Currency) {
    println!(
        "{:<12} {:>16}  {:<16} {}",
        "Date", "Amount", "Category", "Description"
    );
    for r in records {
        println!(
            "{:<12} {:>16}  {:<16} {}",
            r.date.to_string(),
            currency.format(r.amount),
            r.category,
            r.description
        );
    }
}

fn print_report(visualization: &Visualization, currency: Currency) {
    let summary = match visualization {
        Visualization::Empty { notice } => {
            println!("⚠ {}", notice);
            return;
        }
        Visualization::Charts(summary) => summary,
    };

    println!("Total Spending: {}\n", currency.format(summary.total));

    println!("Spending by Category");
    for (category, amount) in &summary.by_category {
        let share = amount / summary.total * 100.0;
        println!("  {:<16} {:>16}  {:>5.1}%", category, currency.format(*amount), share);
    }

    println!("\nTop 5 Expenses");
    for r in &summary.top {
        println!("  {:<30} {:>16}", r.description, currency.format(r.amount));
    }

    println!("\nDaily Spending Trend");
    for (date, amount) in &summary.by_day {
        println!("  {}  {:>16}", date, currency.format(*amount));
    }

    println!("\nMonthly Summary");
    println!(
        "  {:<8} {:>16} {:>16} {:>8}",
        "Month", "Total Spent", "Average Expense", "Count"
    );
    for m in &summary.by_month {
        println!(
            "  {:<8} {:>16} {:>16} {:>8}",
            m.month,
            currency.format(m.total),
            currency.format(m.mean),
            m.count
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(settings: &Settings) -> Result<()> {
    let mut app = ui::App::new(settings.controller(), settings.currency(), today());
    ui::run_ui(&mut app)?;
    println!("✅ Expense Tracker closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_settings: &Settings) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand: expense-tracker --help");
    std::process::exit(1);
}
