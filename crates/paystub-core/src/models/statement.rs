//! Pay statement data model.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::layout::Cell;

/// Fields extracted from a single pay statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRecord {
    /// Pay date as printed on the statement.
    pub pay_date: Option<String>,

    /// Federal income tax withholding.
    pub federal: Withholding,

    /// State income tax withholding.
    pub state: Withholding,

    /// Local (city) income tax withholding, when the statement has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<Withholding>,

    /// Gross pay from the regular earnings row.
    pub gross_pay: Cell,

    /// Net pay.
    pub net_pay: Cell,

    /// Deduction amounts keyed by category.
    pub deductions: BTreeMap<String, Decimal>,
}

/// A tax withholding row: the declared allowances plus any extra amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Withholding {
    /// Withholding allowances/exemptions.
    pub allowances: i64,

    /// Additional withholding; `0` when the statement lists none.
    pub extra: Cell,
}

impl Withholding {
    pub fn new(allowances: i64, extra: impl Into<Cell>) -> Self {
        Self {
            allowances,
            extra: extra.into(),
        }
    }
}

impl StatementRecord {
    /// Deduction amount for a category, if present.
    pub fn deduction(&self, category: &str) -> Option<Decimal> {
        self.deductions.get(category).copied()
    }
}
