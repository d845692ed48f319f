// 📤 CSV export / import
//
// Header `date,amount,category,description`, one row per record in store
// order, quoting left to the csv crate's defaults.

use crate::db::ExpenseRecord;
use crate::error::{Result, TrackerError};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

pub const HEADER: [&str; 4] = ["date", "amount", "category", "description"];

/// File name offered for the download.
pub const EXPORT_FILE_NAME: &str = "expenses.csv";

pub fn write_csv<W: Write>(records: &[ExpenseRecord], writer: W) -> Result<()> {
    // Header written by hand so an empty export still carries it.
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv(records: &[ExpenseRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    let csv = String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(csv)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let record: ExpenseRecord = row.deserialize(Some(&headers))?;
        // SQLite stores NaN as NULL, which no later read can decode.
        if !record.amount.is_finite() {
            return Err(TrackerError::NonFiniteAmount {
                line: row.position().map_or(0, |p| p.line()),
                value: record.amount,
            });
        }
        records.push(record);
    }

    debug!(count = records.len(), "parsed expenses from CSV");
    Ok(records)
}

pub fn load_csv(path: &Path) -> Result<Vec<ExpenseRecord>> {
    let file = File::open(path)?;
    read_csv(file)
}
