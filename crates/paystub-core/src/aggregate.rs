//! Aggregation of statement records into one uniform table.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::layout::Cell;
use crate::models::statement::{StatementRecord, Withholding};

/// Columns preceding the deduction columns.
pub const FIXED_COLUMNS: [&str; 8] = [
    "Pay Date",
    "Federal withholding",
    "Federal extra",
    "State withholding",
    "State extra",
    "Local withholding",
    "Local extra",
    "Gross Pay",
];

/// Last column of every table.
pub const NET_PAY_COLUMN: &str = "Net Pay";

/// Header plus one string row per statement, ready for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AggregatedTable {
    /// Deduction category columns, in header order.
    pub fn deduction_columns(&self) -> &[String] {
        let end = self.headers.len().saturating_sub(1);
        self.headers.get(FIXED_COLUMNS.len()..end).unwrap_or(&[])
    }
}

/// Accumulates records and the categories seen across them.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    categories: BTreeSet<String>,
    records: Vec<StatementRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; rows keep insertion order.
    pub fn push(&mut self, record: StatementRecord) {
        self.categories.extend(record.deductions.keys().cloned());
        self.records.push(record);
    }

    /// Deduction categories seen so far, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the table: fixed columns, one column per category, net pay.
    pub fn finish(self) -> AggregatedTable {
        let mut headers: Vec<String> = FIXED_COLUMNS.iter().map(|h| h.to_string()).collect();
        headers.extend(self.categories.iter().cloned());
        headers.push(NET_PAY_COLUMN.to_string());

        let rows = self
            .records
            .iter()
            .map(|record| table_row(record, &self.categories))
            .collect();

        AggregatedTable { headers, rows }
    }
}

impl Extend<StatementRecord> for Aggregator {
    fn extend<T: IntoIterator<Item = StatementRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Aggregate records in the given order.
pub fn aggregate(records: impl IntoIterator<Item = StatementRecord>) -> AggregatedTable {
    let mut aggregator = Aggregator::new();
    aggregator.extend(records);
    aggregator.finish()
}

fn table_row(record: &StatementRecord, categories: &BTreeSet<String>) -> Vec<String> {
    let mut row = Vec::with_capacity(FIXED_COLUMNS.len() + categories.len() + 1);

    row.push(record.pay_date.clone().unwrap_or_default());
    push_withholding(&mut row, Some(&record.federal));
    push_withholding(&mut row, Some(&record.state));
    push_withholding(&mut row, record.local.as_ref());
    row.push(record.gross_pay.to_string());

    row.extend(categories.iter().map(|category| {
        record
            .deduction(category)
            .map(|amount| Cell::Decimal(amount).to_string())
            .unwrap_or_default()
    }));

    row.push(record.net_pay.to_string());
    row
}

fn push_withholding(row: &mut Vec<String>, withholding: Option<&Withholding>) {
    match withholding {
        Some(w) => {
            row.push(w.allowances.to_string());
            row.push(w.extra.to_string());
        }
        None => {
            row.push(String::new());
            row.push(String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(date: &str, deductions: &[(&str, &str)]) -> StatementRecord {
        StatementRecord {
            pay_date: Some(date.to_string()),
            federal: Withholding::new(2, "20"),
            state: Withholding::new(1, 0i64),
            local: None,
            gross_pay: Cell::Decimal(dec("2307.69")),
            net_pay: Cell::Decimal(dec("1554.32")),
            deductions: deductions
                .iter()
                .map(|(k, v)| (k.to_string(), dec(v)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_headers_union_sorted() {
        let table = aggregate(vec![
            record("01/01/2017", &[("Medicare Tax", "33.46")]),
            record("01/15/2017", &[("401k", "50.00"), ("Dental", "4.10")]),
        ]);

        assert_eq!(table.deduction_columns(), &["401k", "Dental", "Medicare Tax"]);
        assert_eq!(table.headers.first().map(String::as_str), Some("Pay Date"));
        assert_eq!(table.headers.last().map(String::as_str), Some("Net Pay"));
        assert_eq!(table.headers.len(), 12);
    }

    #[test]
    fn test_missing_categories_are_empty() {
        let table = aggregate(vec![
            record("01/01/2017", &[]),
            record("01/15/2017", &[("401k", "50.00")]),
        ]);

        assert_eq!(
            table.rows[0],
            vec!["01/01/2017", "2", "20", "1", "0", "", "", "2307.69", "", "1554.32"]
        );
        assert_eq!(
            table.rows[1],
            vec!["01/15/2017", "2", "20", "1", "0", "", "", "2307.69", "50.00", "1554.32"]
        );
    }

    #[test]
    fn test_local_and_missing_pay_date() {
        let mut first = record("", &[]);
        first.pay_date = None;
        first.local = Some(Withholding::new(1, "5"));

        let table = aggregate(vec![first]);

        assert_eq!(&table.rows[0][..7], &["", "2", "20", "1", "0", "1", "5"]);
    }

    #[test]
    fn test_aggregator_tracks_categories() {
        let mut aggregator = Aggregator::new();
        assert!(aggregator.is_empty());

        aggregator.push(record("a", &[("B", "1.00")]));
        aggregator.push(record("b", &[("A", "2.00"), ("B", "3.00")]));

        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.categories().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_table() {
        let table = aggregate(Vec::new());
        assert!(table.rows.is_empty());
        assert_eq!(table.headers.len(), FIXED_COLUMNS.len() + 1);
        assert!(table.deduction_columns().is_empty());
    }
}
