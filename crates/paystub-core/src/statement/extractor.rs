//! Statement field extraction from reconstructed rows.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::Result;
use super::deductions::extract_deductions;
use super::labels::*;
use crate::error::ExtractionError;
use crate::layout::{Cell, Row};
use crate::models::statement::{StatementRecord, Withholding};

/// Result of extracting one statement.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Extracted statement fields.
    pub record: StatementRecord,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<String>,
}

/// Rule-based extractor for the statement layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementExtractor;

impl StatementExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a statement record from the rows of its page.
    ///
    /// Fails when the federal, state, regular earnings or net pay row is
    /// missing, or when a withholding allowance is not an integer.
    pub fn extract(&self, rows: &[Row]) -> Result<Extraction> {
        let index = RowIndex::new(rows);
        let deductions = extract_deductions(rows);

        let federal = withholding(index.require(FEDERAL)?, FEDERAL)?;
        let state = withholding(index.require(STATE)?, STATE)?;
        let local = index
            .by_first(LOCAL)
            .map(|row| withholding(row, LOCAL))
            .transpose()?;

        let record = StatementRecord {
            pay_date: pay_date(&index)?,
            federal,
            state,
            local,
            gross_pay: cell_at(index.require(REGULAR)?, 2, REGULAR)?.clone(),
            net_pay: cell_at(index.require(NET_PAY)?, 1, NET_PAY)?.clone(),
            deductions: deductions.amounts,
        };

        debug!(
            "Extracted statement dated {:?} with {} deductions",
            record.pay_date,
            record.deductions.len()
        );

        Ok(Extraction {
            record,
            warnings: deductions.warnings,
        })
    }
}

/// Rows keyed by their first and second text cells; later rows win.
struct RowIndex<'a> {
    first: HashMap<&'a str, &'a Row>,
    second: HashMap<&'a str, &'a Row>,
}

impl<'a> RowIndex<'a> {
    fn new(rows: &'a [Row]) -> Self {
        let mut first = HashMap::new();
        let mut second = HashMap::new();

        for row in rows {
            if let Some(label) = row.first().and_then(Cell::as_text) {
                first.insert(label, row);
            }
            if let Some(label) = row.second().and_then(Cell::as_text) {
                second.insert(label, row);
            }
        }

        Self { first, second }
    }

    fn by_first(&self, label: &str) -> Option<&'a Row> {
        self.first.get(label).copied()
    }

    fn by_second(&self, label: &str) -> Option<&'a Row> {
        self.second.get(label).copied()
    }

    fn require(&self, label: &str) -> Result<&'a Row> {
        self.by_first(label)
            .ok_or_else(|| ExtractionError::MissingRow(label.to_string()))
    }
}

fn cell_at<'r>(row: &'r Row, index: usize, label: &str) -> Result<&'r Cell> {
    row.get(index).ok_or_else(|| ExtractionError::MissingCell {
        label: label.to_string(),
        index,
    })
}

/// Pay date, trying each known label layout in turn.
///
/// The third layout prints the label in the second cell, so the date is the
/// third cell there.
fn pay_date(index: &RowIndex<'_>) -> Result<Option<String>> {
    let found = if let Some(row) = index.by_first(PAY_DATE) {
        Some(cell_at(row, 1, PAY_DATE)?)
    } else if let Some(row) = index.by_first(PAY_DATE_LOWER) {
        Some(cell_at(row, 1, PAY_DATE_LOWER)?)
    } else if let Some(row) = index.by_second(PAY_DATE) {
        Some(cell_at(row, 2, PAY_DATE)?)
    } else {
        None
    };

    Ok(found.map(Cell::to_string))
}

fn withholding(row: &Row, label: &str) -> Result<Withholding> {
    let allowances = to_integer(cell_at(row, 1, label)?, label)?;
    let extra = match row.cells() {
        [_, _, extra] => extra_amount(extra),
        _ => Cell::Integer(0),
    };

    Ok(Withholding { allowances, extra })
}

/// Integer value of a cell; decimals truncate toward zero.
fn to_integer(cell: &Cell, field: &str) -> Result<i64> {
    let parse_error = || ExtractionError::Parse {
        field: field.to_string(),
        value: cell.to_string(),
    };

    match cell {
        Cell::Integer(n) => Ok(*n),
        Cell::Decimal(d) => d.trunc().to_i64().ok_or_else(parse_error),
        Cell::Text(s) => s.trim().parse().map_err(|_| parse_error()),
    }
}

/// Extra withholding with the `$` sign and the trailing label removed.
fn extra_amount(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(s.replace('$', "").replace(EXTRA_SUFFIX, "")),
        other => other.clone(),
    }
}
