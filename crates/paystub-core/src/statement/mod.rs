//! Statement field extraction module.

pub mod deductions;
mod extractor;
pub mod labels;

pub use deductions::{Deductions, deduction_window, extract_deductions, filter_deduction_rows};
pub use extractor::{Extraction, StatementExtractor};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
