// 🧭 View Controller
//
// One handler per navigation page. Every interaction is a fresh pass:
// gate -> open store -> render page -> close store. Nothing is carried
// between passes; front ends resend the whole request each time.

use crate::aggregate::{self, Summary};
use crate::auth::{authenticate, CredentialVerifier, Credentials, StaticCredentials};
use crate::code_examples::Language;
use crate::currency::Currency;
use crate::db::{ExpenseRecord, Store};
use crate::error::{Result, TrackerError, ValidationError};
use crate::export;
use crate::form::ExpenseForm;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How many rows the Dashboard's recent list shows.
pub const RECENT_COUNT: usize = 5;

/// How many bars the Visualize page's ranking shows.
pub const TOP_COUNT: usize = 5;

pub const EMPTY_NOTICE: &str = "No expenses recorded yet. Add some expenses to see visualizations.";

// ============================================================================
// NAVIGATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    AddExpense,
    ViewExpenses,
    Visualize,
    CodeExamples,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::AddExpense,
        Page::ViewExpenses,
        Page::Visualize,
        Page::CodeExamples,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::AddExpense,
            Page::AddExpense => Page::ViewExpenses,
            Page::ViewExpenses => Page::Visualize,
            Page::Visualize => Page::CodeExamples,
            Page::CodeExamples => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::CodeExamples,
            Page::AddExpense => Page::Dashboard,
            Page::ViewExpenses => Page::AddExpense,
            Page::Visualize => Page::ViewExpenses,
            Page::CodeExamples => Page::Visualize,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::AddExpense => "Add Expense",
            Page::ViewExpenses => "View Expenses",
            Page::Visualize => "Data Visualization",
            Page::CodeExamples => "Code Examples",
        }
    }

    /// Whether the page carries the add-expense form.
    pub fn has_form(&self) -> bool {
        matches!(self, Page::Dashboard | Page::AddExpense)
    }
}

// ============================================================================
// REQUEST / RESPONSE
// ============================================================================

/// Everything one interaction submits.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub credentials: Credentials,
    pub page: Page,
    pub currency: Currency,
    /// A pressed "Add Expense" button. Ignored on pages without the form.
    pub submission: Option<ExpenseForm>,
    pub language: Language,
}

impl Request {
    pub fn new(credentials: Credentials, page: Page) -> Self {
        Self {
            credentials,
            page,
            currency: Currency::default(),
            submission: None,
            language: Language::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_submission(mut self, form: ExpenseForm) -> Self {
        self.submission = Some(form);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Outcome of a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Added(ExpenseRecord),
    Rejected(ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visualization {
    /// Nothing stored; no charts are computed.
    Empty { notice: &'static str },
    Charts(Summary),
}

/// What a front end should draw for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Dashboard {
        currency: Currency,
        submission: Option<Submission>,
        recent: Vec<ExpenseRecord>,
    },
    AddExpense {
        currency: Currency,
        submission: Option<Submission>,
    },
    ViewExpenses {
        currency: Currency,
        records: Vec<ExpenseRecord>,
        /// CSV download, offered only when there is something to export.
        export: Option<String>,
    },
    Visualize {
        currency: Currency,
        visualization: Visualization,
    },
    CodeExamples {
        language: Language,
        snippet: &'static str,
    },
}

impl Screen {
    pub fn page(&self) -> Page {
        match self {
            Screen::Dashboard { .. } => Page::Dashboard,
            Screen::AddExpense { .. } => Page::AddExpense,
            Screen::ViewExpenses { .. } => Page::ViewExpenses,
            Screen::Visualize { .. } => Page::Visualize,
            Screen::CodeExamples { .. } => Page::CodeExamples,
        }
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct ViewController<V = StaticCredentials> {
    store_path: PathBuf,
    verifier: V,
}

impl<V: CredentialVerifier> ViewController<V> {
    pub fn new(store_path: impl Into<PathBuf>, verifier: V) -> Self {
        Self {
            store_path: store_path.into(),
            verifier,
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// The Session Gate on its own. Callers that must parse untrusted input
    /// run this before touching it.
    pub fn admit(&self, credentials: &Credentials) -> Result<()> {
        if authenticate(&self.verifier, credentials) {
            Ok(())
        } else {
            Err(TrackerError::AuthFailure)
        }
    }

    /// Runs `f` against a store handle that lives for exactly this call.
    ///
    /// The gate runs first; on failure the store is never opened. The handle
    /// is closed whether or not `f` succeeds.
    pub fn with_store<T, F>(&self, credentials: &Credentials, f: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T>,
    {
        self.admit(credentials)?;

        let store = Store::open(&self.store_path)?;
        let result = f(&store);
        let closed = store.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// One full interaction.
    pub fn handle(&self, request: &Request) -> Result<Screen> {
        debug!(page = request.page.title(), "handling interaction");
        self.with_store(&request.credentials, |store| render(store, request))
    }
}

/// Renders `request.page` against an already-authorized store.
pub fn render(store: &Store, request: &Request) -> Result<Screen> {
    let currency = request.currency;

    let submission = if request.page.has_form() {
        request
            .submission
            .as_ref()
            .map(|form| submit(store, form))
            .transpose()?
    } else {
        None
    };

    let screen = match request.page {
        Page::Dashboard => {
            let records = store.read_all()?;
            Screen::Dashboard {
                currency,
                submission,
                recent: aggregate::recent(&records, RECENT_COUNT),
            }
        }
        Page::AddExpense => Screen::AddExpense {
            currency,
            submission,
        },
        Page::ViewExpenses => {
            let records = store.read_all()?;
            let export = if records.is_empty() {
                None
            } else {
                Some(export::to_csv(&records)?)
            };
            Screen::ViewExpenses {
                currency,
                records,
                export,
            }
        }
        Page::Visualize => {
            let records = store.read_all()?;
            let visualization = match aggregate::summarize(&records) {
                Some(summary) => Visualization::Charts(summary),
                None => Visualization::Empty {
                    notice: EMPTY_NOTICE,
                },
            };
            Screen::Visualize {
                currency,
                visualization,
            }
        }
        Page::CodeExamples => Screen::CodeExamples {
            language: request.language,
            snippet: request.language.snippet(),
        },
    };

    Ok(screen)
}

fn submit(store: &Store, form: &ExpenseForm) -> Result<Submission> {
    match form.validate() {
        Ok(record) => {
            store.append_record(&record)?;
            info!(
                date = %record.date,
                amount = record.amount,
                category = %record.category,
                "Expense Added Successfully"
            );
            Ok(Submission::Added(record))
        }
        Err(e) => {
            warn!(error = %e, "expense form rejected");
            Ok(Submission::Rejected(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Category;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn admin() -> Credentials {
        Credentials::new("admin", "password")
    }

    fn form(date: &str, amount: f64, category: Category, description: &str) -> ExpenseForm {
        ExpenseForm {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            category,
            description: description.to_string(),
        }
    }

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        for f in [
            form("2024-01-01", 50.0, Category::Food, "Lunch"),
            form("2024-01-02", 20.0, Category::Food, "Coffee"),
            form("2024-02-01", 100.0, Category::Housing, "Rent"),
        ] {
            store.append_record(&f.validate().unwrap()).unwrap();
        }
        store
    }

    fn controller(dir: &TempDir) -> ViewController {
        ViewController::new(dir.path().join("expenses.db"), StaticCredentials::default())
    }

    #[test]
    fn test_page_cycle() {
        let mut page = Page::Dashboard;
        for _ in 0..Page::ALL.len() {
            assert_eq!(page.next().previous(), page);
            page = page.next();
        }
        assert_eq!(page, Page::Dashboard);
    }

    #[test]
    fn test_auth_failure_never_opens_store() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);

        let request = Request::new(Credentials::new("admin", "wrong"), Page::Dashboard);
        match controller.handle(&request) {
            Err(TrackerError::AuthFailure) => {}
            other => panic!("expected AuthFailure, got {:?}", other),
        }
        assert!(
            !controller.store_path().exists(),
            "store file must not be created for a rejected login"
        );
    }

    #[test]
    fn test_admit_checks_gate_without_store() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);

        assert!(controller.admit(&admin()).is_ok());
        assert!(matches!(
            controller.admit(&Credentials::new("intruder", "x")),
            Err(TrackerError::AuthFailure)
        ));
        assert!(!controller.store_path().exists());
    }

    #[test]
    fn test_add_then_dashboard_shows_recent() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);

        for i in 1..=6 {
            let request = Request::new(admin(), Page::AddExpense).with_submission(form(
                &format!("2024-03-0{}", i),
                i as f64,
                Category::Other,
                &format!("item {}", i),
            ));
            let screen = controller.handle(&request).unwrap();
            assert!(matches!(
                screen,
                Screen::AddExpense {
                    submission: Some(Submission::Added(_)),
                    ..
                }
            ));
        }

        let request = Request::new(admin(), Page::Dashboard).with_submission(form(
            "2024-03-07",
            7.0,
            Category::Food,
            "item 7",
        ));
        match controller.handle(&request).unwrap() {
            Screen::Dashboard {
                recent, submission, ..
            } => {
                assert!(matches!(submission, Some(Submission::Added(_))));
                let labels: Vec<&str> = recent.iter().map(|r| r.description.as_str()).collect();
                assert_eq!(labels, vec!["item 3", "item 4", "item 5", "item 6", "item 7"]);
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_rejected_form_never_reaches_store() {
        let store = Store::open_in_memory().unwrap();
        let request = Request::new(admin(), Page::AddExpense)
            .with_submission(form("2024-01-01", 0.0, Category::Food, "free"));

        let screen = render(&store, &request).unwrap();
        assert_eq!(
            screen,
            Screen::AddExpense {
                currency: Currency::Usd,
                submission: Some(Submission::Rejected(ValidationError::AmountBelowMinimum(0.0))),
            }
        );
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_submission_ignored_off_form_pages() {
        let store = Store::open_in_memory().unwrap();
        let request = Request::new(admin(), Page::ViewExpenses)
            .with_submission(form("2024-01-01", 5.0, Category::Food, ""));

        render(&store, &request).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_view_expenses_with_export() {
        let store = seeded_store();
        match render(&store, &Request::new(admin(), Page::ViewExpenses)).unwrap() {
            Screen::ViewExpenses {
                records, export, ..
            } => {
                assert_eq!(records.len(), 3);
                let csv = export.expect("export offered for a non-empty table");
                assert_eq!(csv.lines().count(), 4);
                assert_eq!(csv.lines().next(), Some("date,amount,category,description"));
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_view_expenses_empty_offers_no_export() {
        let store = Store::open_in_memory().unwrap();
        match render(&store, &Request::new(admin(), Page::ViewExpenses)).unwrap() {
            Screen::ViewExpenses {
                records, export, ..
            } => {
                assert!(records.is_empty());
                assert!(export.is_none());
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_visualize_empty_store_shows_notice() {
        let store = Store::open_in_memory().unwrap();
        let screen = render(&store, &Request::new(admin(), Page::Visualize)).unwrap();
        assert_eq!(
            screen,
            Screen::Visualize {
                currency: Currency::Usd,
                visualization: Visualization::Empty {
                    notice: EMPTY_NOTICE
                },
            }
        );
    }

    #[test]
    fn test_visualize_charts() {
        let store = seeded_store();
        let request = Request::new(admin(), Page::Visualize).with_currency(Currency::Inr);

        match render(&store, &request).unwrap() {
            Screen::Visualize {
                currency,
                visualization: Visualization::Charts(summary),
            } => {
                assert_eq!(currency, Currency::Inr);
                assert_eq!(summary.total, 170.0, "currency never converts amounts");
                assert_eq!(summary.by_category.len(), 2);
                assert_eq!(summary.top[0].description, "Rent");
                assert_eq!(summary.by_day.len(), 3);
                assert_eq!(summary.by_month.len(), 2);
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_code_examples_static() {
        let store = Store::open_in_memory().unwrap();
        let request = Request::new(admin(), Page::CodeExamples).with_language(Language::Sql);

        match render(&store, &request).unwrap() {
            Screen::CodeExamples { language, snippet } => {
                assert_eq!(language, Language::Sql);
                assert_eq!(snippet, Language::Sql.snippet());
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_with_store_reports_closure_error() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);

        let result: Result<()> = controller.with_store(&admin(), |_| {
            Err(TrackerError::InvalidDate {
                value: "x".to_string(),
            })
        });
        assert!(matches!(result, Err(TrackerError::InvalidDate { .. })));

        // The handle was released; the next interaction opens cleanly.
        let count = controller.with_store(&admin(), |store| store.count()).unwrap();
        assert_eq!(count, 0);
    }
}
