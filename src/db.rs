// 🗄️ Record Store - one append-only SQLite relation of expenses
//
// expenses(date TEXT, amount REAL, category TEXT, description TEXT)
//
// No primary key, no update, no delete. A row exists by position only.

use crate::error::{Result, TrackerError, ValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Storage format for `date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// CATEGORY
// ============================================================================

/// The closed set offered by the add-expense form.
///
/// The store itself keeps categories as free text, so records read back
/// carry a `String` rather than this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transportation,
        Category::Housing,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let i = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// EXPENSE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
            description: description.into(),
        }
    }
}

// ============================================================================
// STORE HANDLE
// ============================================================================

/// An open handle on the expenses relation.
///
/// Handles are scoped to one interaction: open, use, `close`. Closing
/// consumes the handle, so a closed handle cannot be used again.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (creating if absent) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening expense store");
        let conn = Connection::open(path)?;

        // WAL for crash recovery; SQLite reports the resulting mode back.
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        setup_database(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(Self { conn })
    }

    /// Inserts one row and commits it immediately.
    pub fn append(
        &self,
        date: NaiveDate,
        amount: f64,
        category: &str,
        description: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO expenses (date, amount, category, description) VALUES (?1, ?2, ?3, ?4)",
            params![
                date.format(DATE_FORMAT).to_string(),
                amount,
                category,
                description
            ],
        )?;
        debug!(%date, amount, category, "appended expense");
        Ok(())
    }

    pub fn append_record(&self, record: &ExpenseRecord) -> Result<()> {
        self.append(
            record.date,
            record.amount,
            &record.category,
            &record.description,
        )
    }

    /// Full scan in insertion order.
    pub fn read_all(&self) -> Result<Vec<ExpenseRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, amount, category, description FROM expenses ORDER BY rowid")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let records = rows
            .into_iter()
            .map(|(date, amount, category, description)| {
                let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|_| TrackerError::InvalidDate { value: date })?;
                Ok(ExpenseRecord {
                    date,
                    amount,
                    category,
                    description: description.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = records.len(), "read expenses");
        Ok(records)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Releases the handle, reporting any error SQLite raises while closing.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| TrackerError::Store(e))
    }
}

fn setup_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            date TEXT,
            amount REAL,
            category TEXT,
            description TEXT
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_read_all_round_trips_fields() {
        let store = Store::open_in_memory().unwrap();

        let inserted = vec![
            ExpenseRecord::new(date("2024-01-01"), 50.0, "Food", "Lunch"),
            ExpenseRecord::new(date("2024-01-02"), 20.25, "Food", "Coffee, large"),
            ExpenseRecord::new(date("2024-02-01"), 100.0, "Housing", ""),
            ExpenseRecord::new(date("2024-02-01"), 100.0, "Housing", ""),
        ];
        for record in &inserted {
            store.append_record(record).unwrap();
        }

        let records = store.read_all().unwrap();
        assert_eq!(records, inserted, "Rows should come back unchanged in insertion order");
        assert_eq!(store.count().unwrap(), 4, "Identical rows are not deduplicated");
    }

    #[test]
    fn test_store_accepts_any_amount_and_category() {
        let store = Store::open_in_memory().unwrap();
        store.append(date("2024-03-01"), -5.0, "Groceries", "refund").unwrap();
        store.append(date("2024-03-02"), 0.0, "Food", "").unwrap();

        let records = store.read_all().unwrap();
        assert_eq!(records[0].amount, -5.0);
        assert_eq!(records[0].category, "Groceries");
        assert_eq!(records[1].amount, 0.0);
    }

    #[test]
    fn test_empty_store() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
        store.close().unwrap();
    }

    #[test]
    fn test_dates_stored_as_iso_text() {
        let store = Store::open_in_memory().unwrap();
        store.append(date("2024-01-05"), 1.0, "Other", "x").unwrap();

        let raw: String = store
            .conn
            .query_row("SELECT date FROM expenses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "2024-01-05");
    }

    #[test]
    fn test_unparseable_stored_date() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO expenses VALUES ('yesterday', 1.0, 'Food', 'x')",
                [],
            )
            .unwrap();

        match store.read_all() {
            Err(TrackerError::InvalidDate { value }) => assert_eq!(value, "yesterday"),
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_file_store_persists_across_handles() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("expenses.db");
        assert!(!path.exists());

        let store = Store::open(&path).unwrap();
        store.append(date("2024-01-01"), 50.0, "Food", "Lunch").unwrap();
        store.close().unwrap();
        assert!(path.exists(), "open() should create the database file");

        let store = Store::open(&path).unwrap();
        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "Lunch");
        store.close().unwrap();
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Housing".parse::<Category>().unwrap(), Category::Housing);
        assert_eq!(
            "food".parse::<Category>(),
            Err(ValidationError::UnknownCategory("food".to_string()))
        );
        assert_eq!(Category::Other.next(), Category::Food);
        assert_eq!(Category::Food.previous(), Category::Other);
    }
}
