//! Locating and reading the deductions sub-table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use super::labels::{DEDUCTIONS_START, NET_PAY, NON_DEDUCTIONS};
use crate::layout::Row;

/// Window scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowState {
    Outside,
    Collecting,
}

/// Collect the rows of the deductions block.
///
/// On every row the start label is checked first, then the end label, and
/// only then is the row collected. The start row is therefore part of the
/// window and the net pay row is not.
pub fn deduction_window(rows: &[Row]) -> Vec<&Row> {
    let mut state = WindowState::Outside;
    let mut window = Vec::new();

    for row in rows {
        if row.starts_with(DEDUCTIONS_START) {
            state = WindowState::Collecting;
        }
        if row.starts_with(NET_PAY) {
            state = WindowState::Outside;
        }
        if state == WindowState::Collecting {
            window.push(row);
        }
    }

    window
}

/// Drop window rows that are not money rows.
///
/// A row survives when its label is not a known non-deduction and the last of
/// its first two cells was coerced to a decimal.
pub fn filter_deduction_rows<'a>(window: &[&'a Row]) -> Vec<&'a Row> {
    window
        .iter()
        .copied()
        .filter(|row| {
            !NON_DEDUCTIONS
                .iter()
                .any(|label| row.starts_with(label))
        })
        .filter(|row| {
            row.cells()[..row.len().min(2)]
                .last()
                .is_some_and(|cell| cell.is_decimal())
        })
        .collect()
}

/// Deduction amounts keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deductions {
    /// Amount per category.
    pub amounts: BTreeMap<String, Decimal>,
    /// Rows that were skipped as malformed.
    pub warnings: Vec<String>,
}

/// Build the deduction mapping from the rows of a statement.
///
/// Rows with three or more cells map label to second cell. Two-cell rows
/// carry no current amount and are skipped silently; shorter rows are
/// reported.
pub fn extract_deductions(rows: &[Row]) -> Deductions {
    let mut deductions = Deductions::default();

    for row in filter_deduction_rows(&deduction_window(rows)) {
        match row.cells() {
            [label, amount, _, ..] => {
                if let Some(value) = amount.as_decimal() {
                    deductions.amounts.insert(label.to_string(), value);
                }
            }
            [_, _] => {}
            _ => {
                warn!("Skipping malformed deduction row: {}", row);
                deductions
                    .warnings
                    .push(format!("malformed deduction row: {}", row));
            }
        }
    }

    deductions
}
