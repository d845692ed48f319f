// 📊 Aggregator - pure summaries over the full record set
//
// Every function scans the whole slice returned by `Store::read_all`.
// Empty input gives empty maps/sequences and a zero total.

use crate::db::ExpenseRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-month row of the monthly summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
    pub mean: f64,
    pub count: usize,
}

/// Everything the Visualize page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: f64,
    pub by_category: BTreeMap<String, f64>,
    pub top: Vec<ExpenseRecord>,
    pub by_day: BTreeMap<NaiveDate, f64>,
    pub by_month: Vec<MonthlySummary>,
}

pub fn total(records: &[ExpenseRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}

pub fn by_category(records: &[ExpenseRecord]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }
    sums
}

/// The `n` largest expenses, descending. Ties keep store order.
pub fn top_n(records: &[ExpenseRecord], n: usize) -> Vec<ExpenseRecord> {
    let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted.into_iter().take(n).cloned().collect()
}

pub fn by_day(records: &[ExpenseRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(record.date).or_insert(0.0) += record.amount;
    }
    sums
}

pub fn by_month(records: &[ExpenseRecord]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = months
            .entry((record.date.year(), record.date.month()))
            .or_insert((0.0, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|((year, month), (total, count))| MonthlySummary {
            month: format!("{:04}-{:02}", year, month),
            total,
            mean: total / count as f64,
            count,
        })
        .collect()
}

/// The last `n` records in store order.
pub fn recent(records: &[ExpenseRecord], n: usize) -> Vec<ExpenseRecord> {
    let start = records.len().saturating_sub(n);
    records[start..].to_vec()
}

/// Bundles the Visualize views. `None` when there is nothing to chart.
pub fn summarize(records: &[ExpenseRecord]) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }

    Some(Summary {
        total: total(records),
        by_category: by_category(records),
        top: top_n(records, 5),
        by_day: by_day(records),
        by_month: by_month(records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, amount: f64, category: &str, description: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            category,
            description,
        )
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            record("2024-01-01", 50.00, "Food", "Lunch"),
            record("2024-01-02", 20.00, "Food", "Coffee"),
            record("2024-02-01", 100.00, "Housing", "Rent"),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_three_record_scenario() {
        let records = sample();

        assert!(approx(total(&records), 170.0));

        let categories = by_category(&records);
        assert_eq!(categories.len(), 2);
        assert!(approx(categories["Food"], 70.0));
        assert!(approx(categories["Housing"], 100.0));

        let months = by_month(&records);
        assert_eq!(
            months,
            vec![
                MonthlySummary {
                    month: "2024-01".to_string(),
                    total: 70.0,
                    mean: 35.0,
                    count: 2,
                },
                MonthlySummary {
                    month: "2024-02".to_string(),
                    total: 100.0,
                    mean: 100.0,
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<ExpenseRecord> = Vec::new();
        assert_eq!(total(&records), 0.0);
        assert!(by_category(&records).is_empty());
        assert!(top_n(&records, 5).is_empty());
        assert!(by_day(&records).is_empty());
        assert!(by_month(&records).is_empty());
        assert!(recent(&records, 5).is_empty());
        assert!(summarize(&records).is_none());
    }

    #[test]
    fn test_category_sums_partition_total() {
        let mut records = sample();
        records.push(record("2024-02-03", 12.34, "Transportation", "Bus"));
        records.push(record("2024-02-04", 7.66, "Food", "Snack"));
        records.push(record("2024-03-09", 0.01, "Other", ""));

        let category_sum: f64 = by_category(&records).values().sum();
        assert!(approx(category_sum, total(&records)));
    }

    #[test]
    fn test_top_n_descending_stable_subset() {
        let records = vec![
            record("2024-01-01", 10.0, "Food", "a"),
            record("2024-01-02", 30.0, "Food", "b"),
            record("2024-01-03", 20.0, "Food", "c"),
            record("2024-01-04", 30.0, "Food", "d"),
            record("2024-01-05", 5.0, "Food", "e"),
            record("2024-01-06", 40.0, "Food", "f"),
            record("2024-01-07", 1.0, "Food", "g"),
        ];

        let top = top_n(&records, 5);
        let labels: Vec<&str> = top.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(labels, vec!["f", "b", "d", "c", "a"], "ties keep store order");
        assert!(top.windows(2).all(|w| w[0].amount >= w[1].amount));
        assert!(top.iter().all(|r| records.contains(r)));

        assert_eq!(top_n(&sample(), 5).len(), 3, "never more than available");
    }

    #[test]
    fn test_by_day_ordered_ascending() {
        let records = vec![
            record("2024-01-03", 1.0, "Food", ""),
            record("2024-01-01", 2.0, "Food", ""),
            record("2024-01-03", 4.0, "Other", ""),
        ];

        let days: Vec<(String, f64)> = by_day(&records)
            .into_iter()
            .map(|(d, v)| (d.to_string(), v))
            .collect();
        assert_eq!(
            days,
            vec![
                ("2024-01-01".to_string(), 2.0),
                ("2024-01-03".to_string(), 5.0)
            ]
        );
    }

    #[test]
    fn test_by_month_orders_across_years() {
        let records = vec![
            record("2024-01-15", 3.0, "Food", ""),
            record("2023-12-31", 1.0, "Food", ""),
        ];
        let months: Vec<String> = by_month(&records).into_iter().map(|m| m.month).collect();
        assert_eq!(months, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn test_recent_takes_last_in_store_order() {
        let records: Vec<ExpenseRecord> = (1..=7)
            .map(|i| record(&format!("2024-01-0{}", i), i as f64, "Food", &i.to_string()))
            .collect();

        let last: Vec<String> = recent(&records, 5)
            .into_iter()
            .map(|r| r.description)
            .collect();
        assert_eq!(last, vec!["3", "4", "5", "6", "7"]);
    }
}
