//! Core library for pay statement extraction.
//!
//! This crate provides:
//! - Reading positioned text boxes from `pdftohtml -xml` output
//! - Row reconstruction and best-effort numeric coercion of cells
//! - Statement field extraction (withholdings, pay, deductions)
//! - Aggregation of many statements into one uniform table

pub mod aggregate;
pub mod batch;
pub mod convert;
pub mod error;
pub mod layout;
pub mod models;
pub mod statement;

pub use aggregate::{AggregatedTable, Aggregator, aggregate};
pub use batch::{BatchReport, BatchRunner, DocumentFailure, PageSource, PdfToHtmlSource, list_documents};
pub use convert::{Converter, PdfToHtml, XmlCache};
pub use error::{PaystubError, Result};
pub use layout::{Cell, Row, TextBox, reconstruct_rows};
pub use models::config::PaystubConfig;
pub use models::statement::{StatementRecord, Withholding};
pub use statement::{Extraction, StatementExtractor};
