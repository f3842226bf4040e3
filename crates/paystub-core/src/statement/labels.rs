//! Row labels printed on the statements.

/// First cell of the row opening the statutory deductions block.
pub const DEDUCTIONS_START: &str = "Statutory";

/// First cell of the net pay row; closes the deductions block.
pub const NET_PAY: &str = "Net Pay";

/// Rows inside the deductions block that are not deductions.
pub const NON_DEDUCTIONS: [&str; 3] = ["Mcttax", "Hlth Plan Value", "Max Elig/Comp"];

pub const FEDERAL: &str = "Federal:";
pub const STATE: &str = "NY:";
pub const LOCAL: &str = "New York Cit:";

/// Regular earnings row; gross pay is its third cell.
pub const REGULAR: &str = "Regular";

/// Pay date label spellings, tried in order.
pub const PAY_DATE: &str = "Pay Date:";
pub const PAY_DATE_LOWER: &str = "Pay date:";

/// Text wrapped around extra withholding amounts.
pub const EXTRA_SUFFIX: &str = " Additional Tax";
